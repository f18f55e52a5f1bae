// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Automated repair toward a watertight, outward-oriented solid.
//!
//! The pass is conservative: it only merges coincident vertices, drops faces
//! that cannot contribute volume, fills small boundary loops on request and
//! makes the winding agree across every shared edge. It never invents
//! geometry beyond those fills, so a mesh with large holes stays open.

use super::mesh_utils::{build_edge_counts, build_edge_faces, connected_components, Edge};
use super::{Mesh, Triangle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Repair knobs
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RepairOptions {
    /// Vertices closer than this are merged
    pub merge_tolerance: f64,
    /// Close boundary loops of at most `max_hole_edges` edges
    pub fill_holes: bool,
    pub max_hole_edges: usize,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            merge_tolerance: 1e-12,
            fill_holes: false,
            max_hole_edges: 4,
        }
    }
}

/// What a repair pass changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairSummary {
    pub invalid_triangles_removed: usize,
    pub vertices_welded: usize,
    pub degenerate_triangles_removed: usize,
    pub duplicate_triangles_removed: usize,
    pub orphaned_vertices_removed: usize,
    pub holes_filled: usize,
    pub triangles_flipped: usize,
    pub components_inverted: usize,
}

impl RepairSummary {
    pub fn changed(&self) -> bool {
        *self != Self::default()
    }
}

/// Run the full repair pass in place
pub fn repair(mesh: &mut Mesh, options: &RepairOptions) -> RepairSummary {
    let mut summary = RepairSummary {
        invalid_triangles_removed: mesh.remove_invalid_triangles(),
        vertices_welded: mesh.weld_vertices(options.merge_tolerance),
        degenerate_triangles_removed: mesh.remove_degenerate_triangles(0.0),
        duplicate_triangles_removed: mesh.remove_duplicate_triangles(),
        orphaned_vertices_removed: mesh.remove_orphaned_vertices(),
        ..RepairSummary::default()
    };

    if options.fill_holes {
        // Loops are traced along boundary half-edges, which needs agreeing winding
        fix_winding(mesh);
        summary.holes_filled = fill_small_holes(mesh, options.max_hole_edges);
    }

    let (flipped, inverted) = fix_winding(mesh);
    summary.triangles_flipped = flipped;
    summary.components_inverted = inverted;

    mesh.recompute_normals();

    debug!(?summary, "repair pass finished");
    summary
}

/// Make neighbouring triangles traverse shared edges in opposite directions,
/// then flip every component whose enclosed signed volume is negative.
/// Returns (triangles flipped while propagating, components inverted)
pub fn fix_winding(mesh: &mut Mesh) -> (usize, usize) {
    let edge_faces = build_edge_faces(mesh);
    let mut visited = vec![false; mesh.triangles.len()];
    let mut flipped = 0;

    for seed in 0..mesh.triangles.len() {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        let mut stack = vec![seed];

        while let Some(face) = stack.pop() {
            for (a, b) in mesh.triangles[face].edges() {
                let faces = &edge_faces[&Edge::new(a, b)];
                // Orientation is undefined across non-manifold edges
                if faces.len() != 2 {
                    continue;
                }
                for &neighbour in faces {
                    if visited[neighbour] {
                        continue;
                    }
                    if mesh.triangles[neighbour].edges().contains(&(a, b)) {
                        mesh.triangles[neighbour] = mesh.triangles[neighbour].flipped();
                        flipped += 1;
                    }
                    visited[neighbour] = true;
                    stack.push(neighbour);
                }
            }
        }
    }

    let mut inverted = 0;
    for component in connected_components(mesh) {
        let volume: f64 = component
            .iter()
            .map(|&face| signed_tetra_volume(mesh, &mesh.triangles[face]))
            .sum();
        if volume < 0.0 {
            for &face in &component {
                mesh.triangles[face] = mesh.triangles[face].flipped();
            }
            inverted += 1;
        }
    }

    (flipped, inverted)
}

/// Close boundary loops of at most `max_edges` edges with a triangle fan.
/// Returns the number of holes filled
pub fn fill_small_holes(mesh: &mut Mesh, max_edges: usize) -> usize {
    let edge_counts = build_edge_counts(mesh);

    // Walking a hole reverses each boundary half-edge a->b into b->a
    let mut next: BTreeMap<usize, usize> = BTreeMap::new();
    let mut ambiguous: HashSet<usize> = HashSet::new();
    for triangle in &mesh.triangles {
        for (a, b) in triangle.edges() {
            if edge_counts[&Edge::new(a, b)] == 1 && next.insert(b, a).is_some() {
                ambiguous.insert(b);
            }
        }
    }

    let mut used: HashSet<usize> = HashSet::new();
    let mut new_triangles = Vec::new();
    let mut filled = 0;

    for &start in next.keys() {
        if used.contains(&start) || ambiguous.contains(&start) {
            continue;
        }

        let mut hole = vec![start];
        let mut current = start;
        let closed = loop {
            match next.get(&current) {
                Some(&following) if following == start => break true,
                Some(&following)
                    if hole.len() < max_edges
                        && !ambiguous.contains(&following)
                        && !hole.contains(&following) =>
                {
                    hole.push(following);
                    current = following;
                }
                _ => break false,
            }
        };

        used.extend(hole.iter().copied());
        if !closed || hole.len() < 3 {
            continue;
        }

        for i in 1..hole.len() - 1 {
            new_triangles.push(Triangle::new([hole[0], hole[i], hole[i + 1]]));
        }
        filled += 1;
    }

    mesh.triangles.extend(new_triangles);
    filled
}

fn signed_tetra_volume(mesh: &Mesh, triangle: &Triangle) -> f64 {
    let [v0, v1, v2] = mesh.triangle_positions(triangle);
    v0.coords.dot(&v1.coords.cross(&v2.coords)) / 6.0
}
