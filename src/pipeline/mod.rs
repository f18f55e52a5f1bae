// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch preprocessing pipeline

mod processor;
mod runner;
mod types;

pub use processor::{prepare_mesh, process_object, solid_properties, PreparedMesh};
pub use runner::run;
pub use types::{ItemOutcome, MergeStats, ProcessedRecord, RunReport, SkipReason};
