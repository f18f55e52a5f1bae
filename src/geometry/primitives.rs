// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Reference solids with known mass properties.
//!
//! The cube is emitted as a triangle soup (every face owns its corners) and the
//! sphere keeps its seam and pole duplicates, so both exercise the repair path
//! the same way exported OBJ files do. The cylinder is already indexed and closed.

use super::{Mesh, Triangle, Vertex};
use nalgebra::{Point3, Vector3};
use std::f64::consts::PI;

/// Geometric primitives
pub enum Primitive {
    Cube { size: Vector3<f64>, center: bool },
    Sphere { radius: f64, segments: u32 },
    Cylinder { height: f64, radius: f64, segments: u32 },
}

impl Primitive {
    pub fn cube(size: Vector3<f64>, center: bool) -> Self {
        Self::Cube { size, center }
    }

    pub fn sphere(radius: f64, segments: u32) -> Self {
        Self::Sphere {
            radius,
            segments: segments.max(3),
        }
    }

    pub fn cylinder(height: f64, radius: f64, segments: u32) -> Self {
        Self::Cylinder {
            height,
            radius,
            segments: segments.max(3),
        }
    }

    pub fn to_mesh(&self) -> Mesh {
        match self {
            Self::Cube { size, center } => cube_mesh(*size, *center),
            Self::Sphere { radius, segments } => sphere_mesh(*radius, *segments),
            Self::Cylinder {
                height,
                radius,
                segments,
            } => cylinder_mesh(*height, *radius, *segments),
        }
    }
}

fn cube_mesh(size: Vector3<f64>, center: bool) -> Mesh {
    let min = if center { -size / 2.0 } else { Vector3::zeros() };
    let max = min + size;

    let corners = [
        Point3::new(min.x, min.y, min.z),
        Point3::new(max.x, min.y, min.z),
        Point3::new(max.x, max.y, min.z),
        Point3::new(min.x, max.y, min.z),
        Point3::new(min.x, min.y, max.z),
        Point3::new(max.x, min.y, max.z),
        Point3::new(max.x, max.y, max.z),
        Point3::new(min.x, max.y, max.z),
    ];

    // Counter-clockwise seen from outside
    let faces: [([usize; 3], Vector3<f64>); 12] = [
        ([4, 5, 6], Vector3::z()),
        ([4, 6, 7], Vector3::z()),
        ([1, 0, 3], -Vector3::z()),
        ([1, 3, 2], -Vector3::z()),
        ([5, 1, 2], Vector3::x()),
        ([5, 2, 6], Vector3::x()),
        ([0, 4, 7], -Vector3::x()),
        ([0, 7, 3], -Vector3::x()),
        ([7, 6, 2], Vector3::y()),
        ([7, 2, 3], Vector3::y()),
        ([0, 1, 5], -Vector3::y()),
        ([0, 5, 4], -Vector3::y()),
    ];

    let mut mesh = Mesh::with_capacity(36, 12);
    for (corner_ids, normal) in faces {
        let indices = corner_ids.map(|c| mesh.add_vertex(Vertex::new(corners[c], normal)));
        mesh.add_triangle(Triangle::new(indices));
    }
    mesh
}

fn sphere_mesh(radius: f64, segments: u32) -> Mesh {
    let stacks = segments as usize;
    let slices = segments as usize;
    let mut mesh = Mesh::with_capacity((stacks + 1) * (slices + 1), 2 * stacks * slices);

    for i in 0..=stacks {
        let phi = PI * i as f64 / stacks as f64;
        let (ring_radius, y) = (radius * phi.sin(), radius * phi.cos());
        for j in 0..=slices {
            let theta = 2.0 * PI * j as f64 / slices as f64;
            let position = Point3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            let normal = position.coords.try_normalize(1e-30).unwrap_or_else(Vector3::y);
            mesh.add_vertex(Vertex::new(position, normal));
        }
    }

    for i in 0..stacks {
        for j in 0..slices {
            let first = i * (slices + 1) + j;
            let second = first + slices + 1;
            mesh.add_triangle(Triangle::new([first, first + 1, second]));
            mesh.add_triangle(Triangle::new([second, first + 1, second + 1]));
        }
    }

    mesh
}

fn cylinder_mesh(height: f64, radius: f64, segments: u32) -> Mesh {
    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(2 * n + 2, 4 * n);

    let bottom_center = mesh.add_vertex(Vertex::new(Point3::origin(), -Vector3::z()));
    let top_center = mesh.add_vertex(Vertex::new(Point3::new(0.0, 0.0, height), Vector3::z()));

    let mut bottom = Vec::with_capacity(n);
    let mut top = Vec::with_capacity(n);
    for i in 0..n {
        let angle = 2.0 * PI * i as f64 / n as f64;
        let (sin, cos) = angle.sin_cos();
        let radial = Vector3::new(cos, sin, 0.0);
        bottom.push(mesh.add_vertex(Vertex::new(
            Point3::new(radius * cos, radius * sin, 0.0),
            radial,
        )));
        top.push(mesh.add_vertex(Vertex::new(
            Point3::new(radius * cos, radius * sin, height),
            radial,
        )));
    }

    for i in 0..n {
        let next = (i + 1) % n;
        mesh.add_triangle(Triangle::new([bottom_center, bottom[next], bottom[i]]));
        mesh.add_triangle(Triangle::new([top_center, top[i], top[next]]));
        mesh.add_triangle(Triangle::new([bottom[i], bottom[next], top[next]]));
        mesh.add_triangle(Triangle::new([bottom[i], top[next], top[i]]));
    }

    mesh
}
