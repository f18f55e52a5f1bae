// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mass properties of closed triangle meshes.
//!
//! Volume, first and second moments are accumulated per triangle with the
//! divergence theorem (Eberly, "Polyhedral Mass Properties"). The result is
//! exact for a closed, consistently outward-wound surface; on an open or
//! inverted surface the volume comes out wrong or negative.

use super::Mesh;
use nalgebra::{Matrix3, Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Mass, center of mass and inertia of a solid at uniform density
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub volume: f64,
    pub density: f64,
    pub mass: f64,
    pub center_of_mass: Point3<f64>,
    /// Inertia tensor about the center of mass, in the mesh frame
    pub inertia: Matrix3<f64>,
}

impl MassProperties {
    /// Same body at a different density; mass and inertia scale linearly
    pub fn with_density(&self, density: f64) -> Self {
        let scale = density / self.density;
        Self {
            density,
            mass: self.mass * scale,
            inertia: self.inertia * scale,
            ..*self
        }
    }

    /// Inertia rescaled to `density` with every component clamped to `[-limit, limit]`
    pub fn clamped_inertia(&self, density: f64, limit: f64) -> Matrix3<f64> {
        self.with_density(density)
            .inertia
            .map(|value| clamp_symmetric(value, limit))
    }

    /// Row-major flattening, `I_00, I_01, ..., I_22`
    pub fn inertia_row_major(inertia: &Matrix3<f64>) -> [f64; 9] {
        let mut flat = [0.0; 9];
        for row in 0..3 {
            for col in 0..3 {
                flat[row * 3 + col] = inertia[(row, col)];
            }
        }
        flat
    }

    /// A positive, finite volume is the precondition for a usable center of mass
    pub fn has_valid_volume(&self) -> bool {
        self.volume.is_finite() && self.volume > 0.0
    }
}

/// Clamp to `[-limit, limit]`
pub fn clamp_symmetric(value: f64, limit: f64) -> f64 {
    value.max(-limit).min(limit)
}

/// Compute mass properties at `density`
pub fn compute_mass_properties(mesh: &Mesh, density: f64) -> MassProperties {
    // 1, x, y, z, x^2, y^2, z^2, xy, yz, zx
    let mut integral = [0.0f64; 10];

    for triangle in &mesh.triangles {
        let [p0, p1, p2] = mesh.triangle_positions(triangle);
        let d: Vector3<f64> = (p1 - p0).cross(&(p2 - p0));

        let (f1x, f2x, f3x, g0x, g1x, g2x) = subexpressions(p0.x, p1.x, p2.x);
        let (_, f2y, f3y, g0y, g1y, g2y) = subexpressions(p0.y, p1.y, p2.y);
        let (_, f2z, f3z, g0z, g1z, g2z) = subexpressions(p0.z, p1.z, p2.z);

        integral[0] += d.x * f1x;
        integral[1] += d.x * f2x;
        integral[2] += d.y * f2y;
        integral[3] += d.z * f2z;
        integral[4] += d.x * f3x;
        integral[5] += d.y * f3y;
        integral[6] += d.z * f3z;
        integral[7] += d.x * (p0.y * g0x + p1.y * g1x + p2.y * g2x);
        integral[8] += d.y * (p0.z * g0y + p1.z * g1y + p2.z * g2y);
        integral[9] += d.z * (p0.x * g0z + p1.x * g1z + p2.x * g2z);
    }

    const WEIGHTS: [f64; 10] = [
        1.0 / 6.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 24.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 60.0,
        1.0 / 120.0,
        1.0 / 120.0,
        1.0 / 120.0,
    ];
    for (value, weight) in integral.iter_mut().zip(WEIGHTS) {
        *value *= weight;
    }

    let volume = integral[0];
    let com = Point3::new(integral[1], integral[2], integral[3]) / volume;

    let ixx = integral[5] + integral[6] - volume * (com.y * com.y + com.z * com.z);
    let iyy = integral[4] + integral[6] - volume * (com.z * com.z + com.x * com.x);
    let izz = integral[4] + integral[5] - volume * (com.x * com.x + com.y * com.y);
    let ixy = integral[7] - volume * com.x * com.y;
    let iyz = integral[8] - volume * com.y * com.z;
    let ixz = integral[9] - volume * com.z * com.x;

    #[rustfmt::skip]
    let inertia = Matrix3::new(
        ixx, -ixy, -ixz,
        -ixy, iyy, -iyz,
        -ixz, -iyz, izz,
    ) * density;

    MassProperties {
        volume,
        density,
        mass: volume * density,
        center_of_mass: com,
        inertia,
    }
}

fn subexpressions(w0: f64, w1: f64, w2: f64) -> (f64, f64, f64, f64, f64, f64) {
    let temp0 = w0 + w1;
    let f1 = temp0 + w2;
    let temp1 = w0 * w0;
    let temp2 = temp1 + w1 * temp0;
    let f2 = temp2 + w2 * f1;
    let f3 = w0 * temp1 + w1 * temp2 + w2 * f2;
    let g0 = f2 + w0 * (f1 + w0);
    let g1 = f2 + w1 * (f1 + w1);
    let g2 = f2 + w2 * (f1 + w2);
    (f1, f2, f3, g0, g1, g2)
}
