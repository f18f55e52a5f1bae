// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry statistics for inspection output

use super::mass::{compute_mass_properties, MassProperties};
use super::mesh_utils::{validate_mesh, MeshValidation};
use super::Mesh;
use serde::{Deserialize, Serialize};

/// Geometry statistics and analytics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryStats {
    pub vertex_count: usize,
    pub triangle_count: usize,
    /// Total surface area in square units
    pub surface_area: f64,
    /// Bounding box [min_x, min_y, min_z, max_x, max_y, max_z]
    pub bbox: [f64; 6],
    pub validation: MeshValidation,
    /// Only meaningful when the mesh is watertight
    pub mass_properties: Option<MassProperties>,
}

impl GeometryStats {
    /// Pretty print statistics
    pub fn print(&self, title: &str) {
        println!("╔══════════════════════════════════════════════════════════╗");
        println!("║ {:<56} ║", title);
        println!("╠══════════════════════════════════════════════════════════╣");
        println!("║ Vertices:        {:>12}                            ║", self.vertex_count);
        println!("║ Triangles:       {:>12}                            ║", self.triangle_count);
        println!("║ Surface Area:    {:>12.6}                            ║", self.surface_area);
        println!(
            "║ BBox Min:        ({:>10.4}, {:>10.4}, {:>10.4})      ║",
            self.bbox[0], self.bbox[1], self.bbox[2]
        );
        println!(
            "║ BBox Max:        ({:>10.4}, {:>10.4}, {:>10.4})      ║",
            self.bbox[3], self.bbox[4], self.bbox[5]
        );
        println!(
            "║ Watertight:      {:>12}                            ║",
            yes_no(self.validation.is_watertight)
        );
        println!(
            "║ Winding OK:      {:>12}                            ║",
            yes_no(self.validation.is_winding_consistent)
        );
        println!(
            "║ Boundary Edges:  {:>12}                            ║",
            self.validation.boundary_edge_count
        );
        println!(
            "║ Non-manifold:    {:>12}                            ║",
            self.validation.non_manifold_edge_count
        );
        if let Some(props) = &self.mass_properties {
            println!("║                                                          ║");
            println!("║ Volume:          {:>12.6e}                            ║", props.volume);
            println!(
                "║ Center of Mass:  ({:>10.4}, {:>10.4}, {:>10.4})      ║",
                props.center_of_mass.x, props.center_of_mass.y, props.center_of_mass.z
            );
            for row in 0..3 {
                println!(
                    "║ Inertia[{}]:      ({:>10.3e}, {:>10.3e}, {:>10.3e})      ║",
                    row,
                    props.inertia[(row, 0)],
                    props.inertia[(row, 1)],
                    props.inertia[(row, 2)]
                );
            }
        }
        println!("╚══════════════════════════════════════════════════════════╝");
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Analyze mesh geometry; mass properties are computed at `density` for watertight meshes
pub fn analyze(mesh: &Mesh, density: f64) -> GeometryStats {
    let validation = validate_mesh(mesh);
    let mass_properties = validation
        .is_watertight
        .then(|| compute_mass_properties(mesh, density));

    GeometryStats {
        vertex_count: mesh.vertex_count(),
        triangle_count: mesh.triangle_count(),
        surface_area: surface_area(mesh),
        bbox: bounding_box(mesh),
        validation,
        mass_properties,
    }
}

fn bounding_box(mesh: &Mesh) -> [f64; 6] {
    if mesh.vertices.is_empty() {
        return [0.0; 6];
    }

    let mut bbox = [
        f64::MAX,
        f64::MAX,
        f64::MAX,
        f64::MIN,
        f64::MIN,
        f64::MIN,
    ];
    for vertex in &mesh.vertices {
        for axis in 0..3 {
            bbox[axis] = bbox[axis].min(vertex.position[axis]);
            bbox[axis + 3] = bbox[axis + 3].max(vertex.position[axis]);
        }
    }
    bbox
}

fn surface_area(mesh: &Mesh) -> f64 {
    mesh.triangles
        .iter()
        .map(|triangle| {
            let [v0, v1, v2] = mesh.triangle_positions(triangle);
            (v1 - v0).cross(&(v2 - v0)).norm() / 2.0
        })
        .sum()
}
