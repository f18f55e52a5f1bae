// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Morph parameter files: parsing, merging and deduplication

mod dedup;
mod merger;
mod record;

pub use dedup::{class_prefix, unique_objects, Deduplication};
pub use merger::{geometry_names, merge_parameter_files, parameter_names, MergeResult};
pub use record::{ParameterRecord, COEFFICIENT_COUNT, PARAM_FIELD_COUNT};
