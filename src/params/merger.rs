// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pair geometry files with parameter files and merge the parameters

use super::record::ParameterRecord;
use crate::error::ParamError;
use crate::pipeline::MergeStats;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Parameters of every paired object, in name order
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    pub records: Vec<ParameterRecord>,
    /// Paired objects whose parameter file was rejected
    pub malformed: Vec<(String, ParamError)>,
    pub stats: MergeStats,
}

/// Object names of files in `dir` with the given extension (case-insensitive)
pub fn geometry_names(dir: &Path, extension: &str) -> Result<BTreeSet<String>> {
    let extension = extension.trim_start_matches('.');
    let names = list_files(dir)?
        .into_iter()
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map_or(false, |e| e.eq_ignore_ascii_case(extension))
        })
        .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .collect();
    Ok(names)
}

/// Object names of files in `dir` whose file name ends with `suffix`
pub fn parameter_names(dir: &Path, suffix: &str) -> Result<BTreeSet<String>> {
    let names = list_files(dir)?
        .into_iter()
        .filter_map(|path| {
            let file_name = path.file_name()?.to_str()?;
            let name = file_name.strip_suffix(suffix)?;
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect();
    Ok(names)
}

/// Merge the parameter files of every object that also has a geometry file.
///
/// Malformed parameter files are excluded from `records` and listed in
/// `malformed`; they never abort the merge. Only an unreadable directory does.
pub fn merge_parameter_files(
    object_dir: &Path,
    param_dir: &Path,
    extension: &str,
    suffix: &str,
) -> Result<MergeResult> {
    let geometry = geometry_names(object_dir, extension)?;
    let parameters = parameter_names(param_dir, suffix)?;

    let mut result = MergeResult {
        stats: MergeStats {
            parameters_without_geometry: parameters.difference(&geometry).count(),
            geometry_without_parameters: geometry.difference(&parameters).count(),
            ..MergeStats::default()
        },
        ..MergeResult::default()
    };

    for name in parameters.difference(&geometry) {
        debug!(name = %name, "parameter file has no geometry counterpart");
    }

    for name in geometry.intersection(&parameters) {
        result.stats.paired += 1;
        let path = param_dir.join(format!("{}{}", name, suffix));

        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| ParamError::Io(e.to_string()))
            .and_then(|content| ParameterRecord::parse(name.as_str(), &content));

        match parsed {
            Ok(record) => result.records.push(record),
            Err(error) => {
                debug!(name = %name, %error, "discarding malformed parameter file");
                result.malformed.push((name.clone(), error));
            }
        }
    }

    result.stats.merged = result.records.len();
    Ok(result)
}

fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read directory: {:?}", dir))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
