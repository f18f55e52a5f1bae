// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - mesh import/export, summary table and run report

mod exporter;
mod importer;
pub mod report;
mod summary;

pub use exporter::export_stl;
pub use importer::{load_mesh, load_obj, load_stl};
pub use summary::{file_sha256, format_row, read_summary, write_summary, SUMMARY_FIELD_COUNT};
