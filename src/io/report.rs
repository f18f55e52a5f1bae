// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Run report output

use crate::pipeline::{ItemOutcome, RunReport};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

/// Write the full report as pretty JSON
pub fn write_json(report: &RunReport, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path.as_ref(), json)
        .with_context(|| format!("Failed to write report: {:?}", path.as_ref()))?;
    Ok(())
}

/// Read a report written by [`write_json`]
pub fn read_json(path: impl AsRef<Path>) -> Result<RunReport> {
    let content = fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read report: {:?}", path.as_ref()))?;
    Ok(serde_json::from_str(&content)?)
}

/// Print terminal summary
pub fn print_summary(report: &RunReport) {
    print_summary_with_verbose(report, false)
}

/// Print terminal summary; verbose mode lists every skipped object
pub fn print_summary_with_verbose(report: &RunReport, verbose: bool) {
    let skipped = report.outcomes.len() - report.processed;

    println!("\n{}", "═".repeat(80).white());
    println!("{}", "Mesh Preprocessing Report".bold());
    println!("{}", "═".repeat(80).white());
    println!("  {} {}", "Timestamp:".white(), report.timestamp.cyan());
    println!(
        "  {} {}",
        "Paired objects:".white(),
        report.merge.paired.to_string().cyan()
    );
    println!(
        "  {} {}",
        "Parameters without geometry:".white(),
        report.merge.parameters_without_geometry.to_string().yellow()
    );
    println!(
        "  {} {}",
        "Geometry without parameters:".white(),
        report.merge.geometry_without_parameters.to_string().yellow()
    );
    println!(
        "  {} {}",
        "Retained after dedup:".white(),
        report.retained.to_string().cyan()
    );
    println!(
        "  {} {} ({} repaired)",
        "Processed:".white(),
        report.processed.to_string().green(),
        report.repaired
    );
    println!(
        "  {} {}",
        "Skipped:".white(),
        if skipped > 0 {
            skipped.to_string().yellow()
        } else {
            skipped.to_string().green()
        }
    );

    let counts = report.skip_counts();
    if !counts.is_empty() {
        println!("\n{}", "Skip Reasons".bold());
        println!("{}", "─".repeat(80).white());
        for (label, count) in &counts {
            println!("  {} {}: {}", "✗".red(), label, count.to_string().yellow());
        }
    }

    if verbose {
        let mut header_printed = false;
        for outcome in &report.outcomes {
            if let ItemOutcome::Skipped { name, reason } = outcome {
                if !header_printed {
                    println!("\n{}", "Skipped Objects".bold());
                    println!("{}", "─".repeat(80).white());
                    header_printed = true;
                }
                println!("  {} {}", name.cyan(), reason.to_string().dimmed());
            }
        }
    }

    println!("\n{}", "Output".bold());
    println!("{}", "─".repeat(80).white());
    println!(
        "  {} {}",
        "Summary:".white(),
        report.summary_path.display().to_string().cyan()
    );
    println!("  {} {}", "SHA-256:".white(), report.summary_sha256.dimmed());
    println!("{}", "═".repeat(80).white());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{MergeStats, ProcessedRecord, SkipReason};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn sample_report() -> RunReport {
        RunReport {
            timestamp: "2025-01-01 00:00:00 UTC".to_string(),
            summary_path: PathBuf::from("out/objects.txt"),
            summary_sha256: "00".repeat(32),
            merge: MergeStats {
                paired: 2,
                merged: 2,
                parameters_without_geometry: 1,
                geometry_without_parameters: 0,
            },
            retained: 2,
            processed: 1,
            repaired: 1,
            outcomes: vec![
                ItemOutcome::Processed {
                    record: ProcessedRecord {
                        name: "box-01".to_string(),
                        mass: 1.0,
                        center_of_mass: [0.0; 3],
                        inertia: [0.1; 9],
                    },
                    repaired: true,
                },
                ItemOutcome::Skipped {
                    name: "cup-01".to_string(),
                    reason: SkipReason::DegenerateVolume { volume: 0.0 },
                },
            ],
        }
    }

    #[test]
    fn test_json_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("report.json");
        let report = sample_report();

        write_json(&report, &path)?;
        let loaded = read_json(&path)?;

        assert_eq!(loaded.outcomes, report.outcomes);
        assert_eq!(loaded.merge, report.merge);
        assert_eq!(loaded.summary_sha256, report.summary_sha256);
        Ok(())
    }

    #[test]
    fn test_print_summary_does_not_panic() {
        print_summary_with_verbose(&sample_report(), true);
    }
}
