// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mass properties and repair verification on reference solids

use approx::assert_relative_eq;
use meshprep::geometry::{
    analyze, compute_mass_properties, is_watertight, repair, validate_mesh, Primitive,
    RepairOptions,
};
use nalgebra::Vector3;
use std::f64::consts::PI;

#[test]
fn test_cube_inertia_matches_closed_form() {
    let a = 0.3;
    let mut mesh = Primitive::cube(Vector3::new(a, a, a), true).to_mesh();
    repair(&mut mesh, &RepairOptions::default());

    let props = compute_mass_properties(&mesh, 1000.0);
    assert_relative_eq!(props.volume, a * a * a, max_relative = 1e-12);
    assert_relative_eq!(props.mass, 1000.0 * a * a * a, max_relative = 1e-12);

    // rho * a^5 / 6 on the diagonal, zero products of inertia
    let expected = 1000.0 * a.powi(5) / 6.0;
    for i in 0..3 {
        assert_relative_eq!(props.inertia[(i, i)], expected, max_relative = 1e-9);
        for j in 0..3 {
            if i != j {
                assert_relative_eq!(props.inertia[(i, j)], 0.0, epsilon = 1e-12);
            }
        }
        assert_relative_eq!(props.center_of_mass[i], 0.0, epsilon = 1e-12);
    }
}

#[test]
fn test_box_inertia_is_anisotropic() {
    let (x, y, z) = (2.0, 1.0, 0.5);
    let mut mesh = Primitive::cube(Vector3::new(x, y, z), false).to_mesh();
    repair(&mut mesh, &RepairOptions::default());

    let props = compute_mass_properties(&mesh, 1.0);
    let m = x * y * z;
    assert_relative_eq!(props.inertia[(0, 0)], m * (y * y + z * z) / 12.0, max_relative = 1e-9);
    assert_relative_eq!(props.inertia[(1, 1)], m * (x * x + z * z) / 12.0, max_relative = 1e-9);
    assert_relative_eq!(props.inertia[(2, 2)], m * (x * x + y * y) / 12.0, max_relative = 1e-9);
    assert_relative_eq!(props.center_of_mass.x, 1.0, epsilon = 1e-12);
}

#[test]
fn test_cylinder_approaches_analytic_values() {
    let (h, r) = (2.0, 0.5);
    let mesh = Primitive::cylinder(h, r, 256).to_mesh();
    assert!(is_watertight(&mesh));

    let props = compute_mass_properties(&mesh, 1.0);
    let volume = PI * r * r * h;
    assert_relative_eq!(props.volume, volume, max_relative = 1e-3);
    assert_relative_eq!(props.center_of_mass.z, h / 2.0, epsilon = 1e-9);
    // Axial and transverse moments of a solid cylinder
    assert_relative_eq!(props.inertia[(2, 2)], volume * r * r / 2.0, max_relative = 1e-3);
    assert_relative_eq!(
        props.inertia[(0, 0)],
        volume * (3.0 * r * r + h * h) / 12.0,
        max_relative = 1e-3
    );
}

#[test]
fn test_uv_sphere_becomes_watertight_after_repair() {
    let mut mesh = Primitive::sphere(1.0, 48).to_mesh();
    assert!(!is_watertight(&mesh));

    repair(&mut mesh, &RepairOptions::default());
    let validation = validate_mesh(&mesh);
    assert!(validation.is_watertight);
    assert!(validation.is_winding_consistent);

    let props = compute_mass_properties(&mesh, 1.0);
    assert_relative_eq!(props.volume, 4.0 / 3.0 * PI, max_relative = 2e-2);
    assert!(props.center_of_mass.coords.norm() < 1e-9);
}

#[test]
fn test_analyze_reports_open_mesh_without_mass() {
    let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh();
    repair(&mut mesh, &RepairOptions::default());
    mesh.triangles.pop();

    let stats = analyze(&mesh, 1.0);
    assert!(!stats.validation.is_watertight);
    assert_eq!(stats.validation.boundary_edge_count, 3);
    assert!(stats.mass_properties.is_none());
    assert_relative_eq!(stats.surface_area, 5.5, epsilon = 1e-12);
}
