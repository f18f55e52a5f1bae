// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh representation, repair and mass properties

mod analytics;
mod mass;
mod mesh;
pub mod mesh_utils;
mod primitives;
pub mod repair;

pub use analytics::{analyze, GeometryStats};
pub use mass::{clamp_symmetric, compute_mass_properties, MassProperties};
pub use mesh::{Mesh, Triangle, Vertex};
pub use mesh_utils::{is_watertight, is_winding_consistent, validate_mesh, MeshValidation};
pub use primitives::Primitive;
pub use repair::{repair, RepairOptions, RepairSummary};
