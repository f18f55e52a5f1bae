// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh preprocessing for morphed object datasets
//!
//! Pairs morphed object meshes with their morph parameter files, drops
//! objects that were morphed with identical coefficients, repairs each mesh
//! into a watertight solid and computes its mass properties. Results are
//! written as binary STL files plus one summary table for the batch.

pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod params;
pub mod pipeline;

pub use config::PrepConfig;
pub use error::{ExportError, MeshLoadError, ParamError};
pub use geometry::{Mesh, Primitive};
pub use io::{export_stl, load_mesh};
pub use pipeline::{run, ItemOutcome, ProcessedRecord, RunReport, SkipReason};

use anyhow::Result;
use std::path::Path;

/// Run the batch with the configuration file at `path`
pub fn run_with_config_file(path: impl AsRef<Path>) -> Result<RunReport> {
    let config = PrepConfig::from_file(path)?;
    run(&config)
}
