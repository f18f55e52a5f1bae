// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Per-object outcomes and the run report

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub name: String,
    pub mass: f64,
    pub center_of_mass: [f64; 3],
    /// Row-major, `I_00 .. I_22`
    pub inertia: [f64; 9],
}

/// Why an object did not make it into the summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MalformedParameters { error: String },
    Duplicate { of: String },
    LoadFailed { error: String },
    NotWatertight {
        boundary_edges: usize,
        non_manifold_edges: usize,
    },
    DegenerateVolume { volume: f64 },
    ExportFailed { error: String },
}

impl SkipReason {
    /// Stable label used to group skips in summaries
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::MalformedParameters { .. } => "malformed parameters",
            SkipReason::Duplicate { .. } => "duplicate coefficients",
            SkipReason::LoadFailed { .. } => "load failed",
            SkipReason::NotWatertight { .. } => "not watertight",
            SkipReason::DegenerateVolume { .. } => "degenerate volume",
            SkipReason::ExportFailed { .. } => "export failed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedParameters { error } => write!(f, "malformed parameters: {}", error),
            SkipReason::Duplicate { of } => write!(f, "duplicate coefficients of {}", of),
            SkipReason::LoadFailed { error } => write!(f, "load failed: {}", error),
            SkipReason::NotWatertight {
                boundary_edges,
                non_manifold_edges,
            } => write!(
                f,
                "cannot be made watertight ({} boundary edges, {} non-manifold edges)",
                boundary_edges, non_manifold_edges
            ),
            SkipReason::DegenerateVolume { volume } => {
                write!(f, "enclosed volume {} is not positive", volume)
            }
            SkipReason::ExportFailed { error } => write!(f, "export failed: {}", error),
        }
    }
}

/// Result for one object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ItemOutcome {
    Processed {
        record: ProcessedRecord,
        /// Whether the repair pass had to run
        repaired: bool,
    },
    Skipped { name: String, reason: SkipReason },
}

impl ItemOutcome {
    pub fn name(&self) -> &str {
        match self {
            ItemOutcome::Processed { record, .. } => &record.name,
            ItemOutcome::Skipped { name, .. } => name,
        }
    }

    pub fn record(&self) -> Option<&ProcessedRecord> {
        match self {
            ItemOutcome::Processed { record, .. } => Some(record),
            ItemOutcome::Skipped { .. } => None,
        }
    }
}

/// Counts from pairing geometry and parameter files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStats {
    /// Names with both a geometry and a parameter file
    pub paired: usize,
    /// Paired names whose parameter file parsed
    pub merged: usize,
    pub parameters_without_geometry: usize,
    pub geometry_without_parameters: usize,
}

/// Everything a run did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub summary_path: PathBuf,
    /// Hex SHA-256 of the summary table bytes
    pub summary_sha256: String,
    pub merge: MergeStats,
    /// Records left after deduplication
    pub retained: usize,
    pub processed: usize,
    pub repaired: usize,
    pub outcomes: Vec<ItemOutcome>,
}

impl RunReport {
    pub fn records(&self) -> impl Iterator<Item = &ProcessedRecord> {
        self.outcomes.iter().filter_map(ItemOutcome::record)
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &SkipReason)> {
        self.outcomes.iter().filter_map(|outcome| match outcome {
            ItemOutcome::Skipped { name, reason } => Some((name.as_str(), reason)),
            ItemOutcome::Processed { .. } => None,
        })
    }

    /// Skip counts keyed by reason label, in label order
    pub fn skip_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for (_, reason) in self.skipped() {
            *counts.entry(reason.label()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> ProcessedRecord {
        ProcessedRecord {
            name: name.to_string(),
            mass: 1.0,
            center_of_mass: [0.0; 3],
            inertia: [0.0; 9],
        }
    }

    #[test]
    fn test_skip_counts() {
        let report = RunReport {
            timestamp: String::new(),
            summary_path: PathBuf::from("objects.txt"),
            summary_sha256: String::new(),
            merge: MergeStats::default(),
            retained: 3,
            processed: 1,
            repaired: 0,
            outcomes: vec![
                ItemOutcome::Processed {
                    record: record("box-01"),
                    repaired: false,
                },
                ItemOutcome::Skipped {
                    name: "box-02".to_string(),
                    reason: SkipReason::Duplicate {
                        of: "box-01".to_string(),
                    },
                },
                ItemOutcome::Skipped {
                    name: "cup-01".to_string(),
                    reason: SkipReason::LoadFailed {
                        error: "bad".to_string(),
                    },
                },
            ],
        };

        assert_eq!(report.records().count(), 1);
        let counts = report.skip_counts();
        assert_eq!(counts["duplicate coefficients"], 1);
        assert_eq!(counts["load failed"], 1);
        assert_eq!(report.outcomes[1].name(), "box-02");
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() -> anyhow::Result<()> {
        let outcome = ItemOutcome::Skipped {
            name: "mug-03".to_string(),
            reason: SkipReason::NotWatertight {
                boundary_edges: 4,
                non_manifold_edges: 0,
            },
        };
        let json = serde_json::to_value(&outcome)?;
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"]["kind"], "not_watertight");
        assert_eq!(json["reason"]["boundary_edges"], 4);
        Ok(())
    }
}
