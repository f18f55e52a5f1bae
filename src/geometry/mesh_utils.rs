// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edge connectivity checks: watertightness, winding consistency, boundaries

use super::Mesh;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Undirected edge, smaller index first for consistent hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub v0: usize,
    pub v1: usize,
}

impl Edge {
    pub fn new(v0: usize, v1: usize) -> Self {
        if v0 < v1 {
            Self { v0, v1 }
        } else {
            Self { v0: v1, v1: v0 }
        }
    }
}

/// Count how many triangles use each undirected edge
pub fn build_edge_counts(mesh: &Mesh) -> HashMap<Edge, u32> {
    let mut edge_counts: HashMap<Edge, u32> = HashMap::with_capacity(mesh.triangles.len() * 3 / 2);

    for triangle in &mesh.triangles {
        for (a, b) in triangle.edges() {
            *edge_counts.entry(Edge::new(a, b)).or_insert(0) += 1;
        }
    }

    edge_counts
}

/// Map every undirected edge to the triangles that use it
pub fn build_edge_faces(mesh: &Mesh) -> HashMap<Edge, Vec<usize>> {
    let mut edge_faces: HashMap<Edge, Vec<usize>> = HashMap::with_capacity(mesh.triangles.len() * 3 / 2);

    for (face, triangle) in mesh.triangles.iter().enumerate() {
        for (a, b) in triangle.edges() {
            edge_faces.entry(Edge::new(a, b)).or_default().push(face);
        }
    }

    edge_faces
}

/// Closed surface: non-empty and every edge shared by exactly 2 triangles
pub fn is_watertight(mesh: &Mesh) -> bool {
    !mesh.is_empty() && build_edge_counts(mesh).values().all(|&count| count == 2)
}

/// Manifold edges: every edge shared by at most 2 triangles
pub fn is_manifold(mesh: &Mesh) -> bool {
    build_edge_counts(mesh).values().all(|&count| count <= 2)
}

/// Every directed edge appears at most once, so neighbours traverse
/// their shared edge in opposite directions
pub fn is_winding_consistent(mesh: &Mesh) -> bool {
    let mut directed: HashMap<(usize, usize), u32> = HashMap::with_capacity(mesh.triangles.len() * 3);
    for triangle in &mesh.triangles {
        for edge in triangle.edges() {
            let count = directed.entry(edge).or_insert(0);
            *count += 1;
            if *count > 1 {
                return false;
            }
        }
    }
    true
}

/// Group triangles into edge-connected components, in order of first triangle
pub fn connected_components(mesh: &Mesh) -> Vec<Vec<usize>> {
    let edge_faces = build_edge_faces(mesh);
    let mut component_of: Vec<Option<usize>> = vec![None; mesh.triangles.len()];
    let mut components = Vec::new();

    for seed in 0..mesh.triangles.len() {
        if component_of[seed].is_some() {
            continue;
        }

        let id = components.len();
        let mut members = vec![seed];
        let mut stack = vec![seed];
        component_of[seed] = Some(id);

        while let Some(face) = stack.pop() {
            for (a, b) in mesh.triangles[face].edges() {
                for &neighbour in &edge_faces[&Edge::new(a, b)] {
                    if component_of[neighbour].is_none() {
                        component_of[neighbour] = Some(id);
                        members.push(neighbour);
                        stack.push(neighbour);
                    }
                }
            }
        }

        members.sort_unstable();
        components.push(members);
    }

    components
}

/// Mesh validation report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeshValidation {
    pub is_watertight: bool,
    pub is_manifold: bool,
    pub is_winding_consistent: bool,
    pub edge_count: usize,
    /// Edges used by exactly one triangle
    pub boundary_edge_count: usize,
    /// Edges used by three or more triangles
    pub non_manifold_edge_count: usize,
}

pub fn validate_mesh(mesh: &Mesh) -> MeshValidation {
    let edge_counts = build_edge_counts(mesh);

    let boundary_edge_count = edge_counts.values().filter(|&&count| count == 1).count();
    let non_manifold_edge_count = edge_counts.values().filter(|&&count| count > 2).count();

    MeshValidation {
        is_watertight: !mesh.is_empty() && boundary_edge_count == 0 && non_manifold_edge_count == 0,
        is_manifold: non_manifold_edge_count == 0,
        is_winding_consistent: is_winding_consistent(mesh),
        edge_count: edge_counts.len(),
        boundary_edge_count,
        non_manifold_edge_count,
    }
}
