// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-object processing: load, repair, mass properties, export

use super::types::{ItemOutcome, ProcessedRecord, SkipReason};
use crate::config::PrepConfig;
use crate::geometry::{
    compute_mass_properties, is_watertight, is_winding_consistent, repair, validate_mesh,
    MassProperties, Mesh,
};
use crate::io::{export_stl, load_mesh};
use tracing::{debug, warn};

/// Mesh ready for mass properties
#[derive(Debug, Clone)]
pub struct PreparedMesh {
    pub mesh: Mesh,
    /// Whether the repair pass had to run
    pub repaired: bool,
}

/// Weld on load and repair if needed. Fails when the mesh stays open.
///
/// Repair runs on open meshes, on inconsistent winding and on closed
/// meshes that enclose a negative volume (wound inside out).
pub fn prepare_mesh(mut mesh: Mesh, config: &PrepConfig) -> Result<PreparedMesh, SkipReason> {
    mesh.weld_vertices(config.merge_tolerance);

    let repaired = !is_watertight(&mesh)
        || !is_winding_consistent(&mesh)
        || compute_mass_properties(&mesh, 1.0).volume < 0.0;
    if repaired {
        repair(&mut mesh, &config.repair_options());
    }

    let validation = validate_mesh(&mesh);
    if !validation.is_watertight {
        return Err(SkipReason::NotWatertight {
            boundary_edges: validation.boundary_edge_count,
            non_manifold_edges: validation.non_manifold_edge_count,
        });
    }

    Ok(PreparedMesh { mesh, repaired })
}

/// Mass properties at the configured density, rejecting non-positive volumes
pub fn solid_properties(mesh: &Mesh, config: &PrepConfig) -> Result<MassProperties, SkipReason> {
    let properties = compute_mass_properties(mesh, config.default_density);
    if !properties.has_valid_volume() {
        return Err(SkipReason::DegenerateVolume {
            volume: properties.volume,
        });
    }
    Ok(properties)
}

/// Run one object through the whole chain. Never fails the batch.
pub fn process_object(name: &str, config: &PrepConfig) -> ItemOutcome {
    match try_process(name, config) {
        Ok((record, repaired)) => {
            debug!(name, repaired, "processed");
            ItemOutcome::Processed { record, repaired }
        }
        Err(reason) => {
            warn!(name, reason = %reason, "skipping object");
            ItemOutcome::Skipped {
                name: name.to_string(),
                reason,
            }
        }
    }
}

fn try_process(name: &str, config: &PrepConfig) -> Result<(ProcessedRecord, bool), SkipReason> {
    let mesh = load_mesh(config.mesh_path(name)).map_err(|e| SkipReason::LoadFailed {
        error: e.to_string(),
    })?;

    let PreparedMesh { mesh, repaired } = prepare_mesh(mesh, config)?;
    let properties = solid_properties(&mesh, config)?;
    let inertia = properties.clamped_inertia(config.target_density, config.inertia_clamp);

    export_stl(&mesh, config.export_path(name)).map_err(|e| SkipReason::ExportFailed {
        error: e.to_string(),
    })?;

    let com = properties.center_of_mass;
    let record = ProcessedRecord {
        name: name.to_string(),
        mass: config.target_mass,
        center_of_mass: [com.x, com.y, com.z],
        inertia: MassProperties::inertia_row_major(&inertia),
    };
    Ok((record, repaired))
}
