// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Vertex with position and normal
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Vertex with a placeholder normal, for loaders that recompute normals later
    pub fn at(position: Point3<f64>) -> Self {
        Self::new(position, Vector3::z())
    }

    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|c| c.is_finite())
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }

    /// Same triangle with opposite winding
    pub fn flipped(&self) -> Self {
        Self::new([self.indices[0], self.indices[2], self.indices[1]])
    }

    /// Vertex set key, independent of winding and rotation
    pub fn sorted_indices(&self) -> [usize; 3] {
        let mut key = self.indices;
        key.sort_unstable();
        key
    }

    /// Directed edges in winding order
    pub fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.indices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Triangular mesh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Corner positions of a triangle
    pub fn triangle_positions(&self, triangle: &Triangle) -> [Point3<f64>; 3] {
        [
            self.vertices[triangle.indices[0]].position,
            self.vertices[triangle.indices[1]].position,
            self.vertices[triangle.indices[2]].position,
        ]
    }

    /// Unit face normal from the triangle's winding, zero for degenerate faces
    pub fn face_normal(&self, triangle: &Triangle) -> Vector3<f64> {
        let [v0, v1, v2] = self.triangle_positions(triangle);
        let normal = (v1 - v0).cross(&(v2 - v0));
        let length = normal.norm();
        if length > 1e-30 {
            normal / length
        } else {
            Vector3::zeros()
        }
    }

    /// Merge with another mesh (simple concatenation)
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len();
        self.vertices.extend_from_slice(&other.vertices);

        for triangle in &other.triangles {
            self.triangles.push(Triangle::new([
                triangle.indices[0] + offset,
                triangle.indices[1] + offset,
                triangle.indices[2] + offset,
            ]));
        }
    }

    /// Weld vertices whose positions fall into the same `epsilon` grid cell.
    /// A non-positive epsilon welds only bit-identical positions.
    /// Returns the number of vertices removed
    pub fn weld_vertices(&mut self, epsilon: f64) -> usize {
        if self.vertices.is_empty() {
            return 0;
        }

        let original_count = self.vertices.len();
        let mut cells: HashMap<WeldKey, usize> = HashMap::with_capacity(original_count);
        let mut new_vertices: Vec<Vertex> = Vec::with_capacity(original_count);
        let mut new_indices: Vec<usize> = vec![0; original_count];

        for (i, vertex) in self.vertices.iter().enumerate() {
            // Non-finite positions never merge; repair drops their triangles later
            if !vertex.is_finite() {
                new_vertices.push(*vertex);
                new_indices[i] = new_vertices.len() - 1;
                continue;
            }
            let key = weld_key(&vertex.position, epsilon);
            let index = *cells.entry(key).or_insert_with(|| {
                new_vertices.push(*vertex);
                new_vertices.len() - 1
            });
            new_indices[i] = index;
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = new_indices[*index];
            }
        }

        self.vertices = new_vertices;
        original_count - self.vertices.len()
    }

    /// Remove triangles that reference out-of-range or non-finite vertices.
    /// Returns the number of triangles removed
    pub fn remove_invalid_triangles(&mut self) -> usize {
        let original_count = self.triangles.len();
        let vertices = &self.vertices;
        self.triangles.retain(|triangle| {
            triangle
                .indices
                .iter()
                .all(|&i| i < vertices.len() && vertices[i].is_finite())
        });
        original_count - self.triangles.len()
    }

    /// Remove degenerate triangles: repeated indices or zero area.
    /// Returns the number of triangles removed
    pub fn remove_degenerate_triangles(&mut self, area_epsilon: f64) -> usize {
        let original_count = self.triangles.len();
        let vertices = &self.vertices;
        self.triangles.retain(|triangle| {
            let [i0, i1, i2] = triangle.indices;
            if i0 == i1 || i1 == i2 || i0 == i2 {
                return false;
            }
            let v0 = vertices[i0].position;
            let v1 = vertices[i1].position;
            let v2 = vertices[i2].position;
            (v1 - v0).cross(&(v2 - v0)).norm() * 0.5 > area_epsilon
        });
        original_count - self.triangles.len()
    }

    /// Remove triangles covering a vertex set already seen, regardless of winding.
    /// The first occurrence is kept. Returns the number of triangles removed
    pub fn remove_duplicate_triangles(&mut self) -> usize {
        let original_count = self.triangles.len();
        let mut seen: HashSet<[usize; 3]> = HashSet::with_capacity(original_count);
        self.triangles
            .retain(|triangle| seen.insert(triangle.sorted_indices()));
        original_count - self.triangles.len()
    }

    /// Remove orphaned vertices (vertices not referenced by any triangle)
    /// Returns the number of vertices removed
    pub fn remove_orphaned_vertices(&mut self) -> usize {
        if self.triangles.is_empty() {
            let removed = self.vertices.len();
            self.vertices.clear();
            return removed;
        }

        let mut used_vertices = vec![false; self.vertices.len()];
        for triangle in &self.triangles {
            for &index in &triangle.indices {
                used_vertices[index] = true;
            }
        }

        // old_index -> new_index
        let mut new_indices = vec![0; self.vertices.len()];
        let mut new_vertices = Vec::new();

        for (old_idx, &used) in used_vertices.iter().enumerate() {
            if used {
                new_indices[old_idx] = new_vertices.len();
                new_vertices.push(self.vertices[old_idx]);
            }
        }

        for triangle in &mut self.triangles {
            for index in &mut triangle.indices {
                *index = new_indices[*index];
            }
        }

        let removed = self.vertices.len() - new_vertices.len();
        self.vertices = new_vertices;
        removed
    }

    /// Recompute vertex normals from triangle geometry
    /// Face normals are area-weighted and averaged at shared vertices
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];

        for triangle in &self.triangles {
            let [v0, v1, v2] = self.triangle_positions(triangle);
            // Cross product length is twice the area, so this is already area-weighted
            let face_normal = (v1 - v0).cross(&(v2 - v0));
            if face_normal.norm() > 1e-30 {
                for &idx in &triangle.indices {
                    normal_sums[idx] += face_normal;
                }
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(normal_sums) {
            vertex.normal = sum.try_normalize(1e-30).unwrap_or_else(Vector3::z);
        }
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

/// Grid cell for tolerant welding, or the exact coordinate bits when the
/// cell index would not fit an `i64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum WeldKey {
    Grid([i64; 3]),
    Exact([u64; 3]),
}

// Below i64::MAX with room for rounding
const MAX_GRID_CELL: f64 = 9.0e18;

fn weld_key(position: &Point3<f64>, epsilon: f64) -> WeldKey {
    if epsilon > 0.0 {
        let cells = [
            (position.x / epsilon).round(),
            (position.y / epsilon).round(),
            (position.z / epsilon).round(),
        ];
        if cells.iter().all(|c| c.abs() < MAX_GRID_CELL) {
            return WeldKey::Grid(cells.map(|c| c as i64));
        }
    }
    // +0.0 and -0.0 must land in the same cell
    WeldKey::Exact([
        (position.x + 0.0).to_bits(),
        (position.y + 0.0).to_bits(),
        (position.z + 0.0).to_bits(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Primitive;

    #[test]
    fn test_weld_soup_cube() {
        let mut mesh = Primitive::cube(Vector3::new(1.0, 1.0, 1.0), false).to_mesh();
        assert_eq!(mesh.vertex_count(), 36);

        let removed = mesh.weld_vertices(1e-9);
        assert_eq!(removed, 28);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn test_weld_exact_only() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vertex::at(Point3::new(0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3::new(-0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3::new(1e-9, 0.0, 0.0)));

        assert_eq!(mesh.weld_vertices(0.0), 1);
        assert_eq!(mesh.vertex_count(), 2);
    }

    #[test]
    fn test_weld_far_from_origin_keeps_distinct_vertices() {
        let mut mesh = Mesh::new();
        for x in [1e7, 2e7, 3e7, 3e7] {
            mesh.add_vertex(Vertex::at(Point3::new(x, -x, 0.5)));
        }
        mesh.add_triangle(Triangle::new([0, 1, 2]));
        mesh.add_triangle(Triangle::new([0, 1, 3]));

        assert_eq!(mesh.weld_vertices(1e-12), 1);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangles[0].indices, [0, 1, 2]);
        assert_eq!(mesh.triangles[1].indices, [0, 1, 2]);
    }

    #[test]
    fn test_remove_degenerate_and_duplicates() {
        let mut mesh = Mesh::new();
        for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [2.0, 0.0, 0.0]] {
            mesh.add_vertex(Vertex::at(Point3::new(p[0], p[1], p[2])));
        }
        mesh.add_triangle(Triangle::new([0, 1, 2]));
        mesh.add_triangle(Triangle::new([2, 1, 0])); // same set, opposite winding
        mesh.add_triangle(Triangle::new([0, 0, 2])); // repeated index
        mesh.add_triangle(Triangle::new([0, 1, 3])); // collinear

        assert_eq!(mesh.remove_degenerate_triangles(1e-12), 2);
        assert_eq!(mesh.remove_duplicate_triangles(), 1);
        assert_eq!(mesh.triangles, vec![Triangle::new([0, 1, 2])]);

        assert_eq!(mesh.remove_orphaned_vertices(), 1);
        assert_eq!(mesh.vertex_count(), 3);
    }

    #[test]
    fn test_remove_invalid_triangles() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vertex::at(Point3::new(0.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3::new(1.0, 0.0, 0.0)));
        mesh.add_vertex(Vertex::at(Point3::new(f64::NAN, 1.0, 0.0)));
        mesh.add_triangle(Triangle::new([0, 1, 2]));
        mesh.add_triangle(Triangle::new([0, 1, 7]));

        assert_eq!(mesh.remove_invalid_triangles(), 2);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_recompute_normals() {
        let mut mesh = Primitive::cylinder(10.0, 5.0, 32).to_mesh();
        mesh.recompute_normals();

        assert!(mesh.vertices.iter().all(|v| {
            let norm = v.normal.norm();
            norm > 0.9 && norm < 1.1
        }));
    }
}
