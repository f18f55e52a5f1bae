// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Batch runner: merge, deduplicate, process and summarize

use super::processor::process_object;
use super::types::{ItemOutcome, RunReport, SkipReason};
use crate::config::PrepConfig;
use crate::io::{file_sha256, report, write_summary};
use crate::params::{merge_parameter_files, unique_objects};
use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use tracing::{debug, info};

/// Run the whole preprocessing batch described by `config`.
///
/// Per-object problems become skip outcomes in the report. Only invalid
/// configuration, unreadable input directories and unwritable outputs are
/// returned as errors.
pub fn run(config: &PrepConfig) -> Result<RunReport> {
    config.validate()?;

    fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create output directory: {:?}", config.output_dir)
    })?;

    let merged = merge_parameter_files(
        &config.object_dir,
        &config.param_dir,
        &config.mesh_extension,
        &config.param_suffix,
    )?;
    info!(
        paired = merged.stats.paired,
        merged = merged.stats.merged,
        without_geometry = merged.stats.parameters_without_geometry,
        without_parameters = merged.stats.geometry_without_parameters,
        "merged parameter files"
    );

    let mut outcomes: Vec<ItemOutcome> = merged
        .malformed
        .iter()
        .map(|(name, error)| ItemOutcome::Skipped {
            name: name.clone(),
            reason: SkipReason::MalformedParameters {
                error: error.to_string(),
            },
        })
        .collect();

    let dedup = unique_objects(&merged.records, config.class_separator);
    for &(index, original) in &dedup.dropped {
        let name = &merged.records[index].name;
        let of = &merged.records[original].name;
        debug!(name = %name, of = %of, "dropping duplicate coefficients");
        outcomes.push(ItemOutcome::Skipped {
            name: name.clone(),
            reason: SkipReason::Duplicate { of: of.clone() },
        });
    }
    info!(
        retained = dedup.keep.len(),
        dropped = dedup.dropped.len(),
        "deduplicated parameter records"
    );

    let progress = progress_bar(dedup.keep.len() as u64, config.show_progress)?;
    let mut processed = 0;
    let mut repaired = 0;
    for &index in &dedup.keep {
        let name = &merged.records[index].name;
        progress.set_message(name.clone());

        let outcome = process_object(name, config);
        if let ItemOutcome::Processed { repaired: was_repaired, .. } = &outcome {
            processed += 1;
            if *was_repaired {
                repaired += 1;
            }
        }
        outcomes.push(outcome);
        progress.inc(1);
    }
    progress.finish_and_clear();

    let summary_path = config.summary_path();
    write_summary(
        &summary_path,
        outcomes.iter().filter_map(ItemOutcome::record),
    )?;
    let summary_sha256 = file_sha256(&summary_path)?;

    let report = RunReport {
        timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        summary_path,
        summary_sha256,
        merge: merged.stats,
        retained: dedup.keep.len(),
        processed,
        repaired,
        outcomes,
    };

    if let Some(path) = config.report_path() {
        report::write_json(&report, &path)?;
    }

    info!(
        processed = report.processed,
        skipped = report.outcomes.len() - report.processed,
        repaired = report.repaired,
        "number of processed mesh files: {}",
        report.processed
    );
    Ok(report)
}

fn progress_bar(len: u64, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(bar)
}
