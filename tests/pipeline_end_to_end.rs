// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end batch runs over temporary datasets

use anyhow::Result;
use approx::assert_relative_eq;
use meshprep::io::{read_summary, report};
use meshprep::pipeline::{ItemOutcome, SkipReason};
use meshprep::{run, PrepConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CUBE_FACES: [[usize; 3]; 12] = [
    [1, 4, 3],
    [1, 3, 2],
    [5, 6, 7],
    [5, 7, 8],
    [1, 2, 6],
    [1, 6, 5],
    [2, 3, 7],
    [2, 7, 6],
    [3, 4, 8],
    [3, 8, 7],
    [4, 1, 5],
    [4, 5, 8],
];

const CUBE_CORNERS: [[f64; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Axis-aligned cube OBJ with its min corner at `origin`; `faces` of the 12 are kept
fn cube_obj(size: f64, origin: [f64; 3], faces: usize) -> String {
    let mut obj = String::new();
    for corner in CUBE_CORNERS {
        obj.push_str(&format!(
            "v {} {} {}\n",
            origin[0] + corner[0] * size,
            origin[1] + corner[1] * size,
            origin[2] + corner[2] * size
        ));
    }
    for face in CUBE_FACES.iter().take(faces) {
        obj.push_str(&format!("f {} {} {}\n", face[0], face[1], face[2]));
    }
    obj
}

/// Same cube as an unindexed triangle soup
fn soup_cube_obj(size: f64) -> String {
    let mut obj = String::new();
    for face in CUBE_FACES {
        for index in face {
            let c = CUBE_CORNERS[index - 1];
            obj.push_str(&format!("v {} {} {}\n", c[0] * size, c[1] * size, c[2] * size));
        }
    }
    for i in 0..12 {
        obj.push_str(&format!("f {} {} {}\n", 3 * i + 1, 3 * i + 2, 3 * i + 3));
    }
    obj
}

fn params(coefficients: [f64; 5]) -> String {
    coefficients
        .iter()
        .copied()
        .chain((5..24).map(|v| v as f64))
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

struct Dataset {
    _root: TempDir,
    config: PrepConfig,
}

impl Dataset {
    fn new() -> Result<Self> {
        let root = TempDir::new()?;
        let config = PrepConfig {
            object_dir: root.path().join("object_files"),
            param_dir: root.path().join("morph_files"),
            output_dir: root.path().join("meshes"),
            show_progress: false,
            ..PrepConfig::default()
        };
        fs::create_dir_all(&config.object_dir)?;
        fs::create_dir_all(&config.param_dir)?;
        Ok(Self {
            _root: root,
            config,
        })
    }

    fn geometry(&self, name: &str, obj: &str) -> Result<()> {
        fs::write(self.config.object_dir.join(format!("{}.obj", name)), obj)?;
        Ok(())
    }

    fn parameters(&self, name: &str, content: &str) -> Result<()> {
        fs::write(
            self.config.param_dir.join(format!("{}-params.csv", name)),
            content,
        )?;
        Ok(())
    }
}

fn skip_reason<'a>(outcomes: &'a [ItemOutcome], name: &str) -> Option<&'a SkipReason> {
    outcomes.iter().find_map(|outcome| match outcome {
        ItemOutcome::Skipped { name: n, reason } if n == name => Some(reason),
        _ => None,
    })
}

fn populate(data: &Dataset) -> Result<()> {
    let unit = cube_obj(1.0, [0.0; 3], 12);

    // Identical coefficients within one class
    data.geometry("box-01", &unit)?;
    data.parameters("box-01", &params([1.0, 0.5, 0.25, 0.0, 2.0]))?;
    data.geometry("box-02", &cube_obj(2.0, [0.0; 3], 12))?;
    data.parameters("box-02", &params([1.0, 0.5, 0.25, 0.0, 2.0]))?;

    // Small enough that the inertia stays inside the clamp range
    data.geometry("box-03", &cube_obj(0.1, [1.0, 2.0, 3.0], 12))?;
    data.parameters("box-03", &params([9.0, 0.5, 0.25, 0.0, 2.0]))?;

    // Same coefficients as box-01 but another class
    data.geometry("crate-01", &soup_cube_obj(1.0))?;
    data.parameters("crate-01", &params([1.0, 0.5, 0.25, 0.0, 2.0]))?;

    // Parameters without geometry, geometry without parameters
    data.parameters("cup-01", &params([3.0; 5]))?;
    data.geometry("vase-01", &unit)?;

    // Open box with a square hole
    data.geometry("bowl-01", &cube_obj(1.0, [0.0; 3], 10))?;
    data.parameters("bowl-01", &params([4.0; 5]))?;

    data.geometry("mug-01", &unit)?;
    data.parameters("mug-01", "1,2,3")?;

    data.geometry("pan-01", "v 0 0 0\nv 1 0 0\n")?;
    data.parameters("pan-01", &params([5.0; 5]))?;
    Ok(())
}

#[test]
fn test_full_batch() -> Result<()> {
    let data = Dataset::new()?;
    populate(&data)?;
    let config = &data.config;

    let report = run(config)?;

    assert_eq!(report.merge.paired, 7);
    assert_eq!(report.merge.merged, 6);
    assert_eq!(report.merge.parameters_without_geometry, 1);
    assert_eq!(report.merge.geometry_without_parameters, 1);
    assert_eq!(report.retained, 5);

    let names: Vec<_> = report.records().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["box-01", "box-03", "crate-01"]);
    assert_eq!(report.processed, 3);

    // Every paired object gets exactly one outcome
    assert_eq!(report.outcomes.len(), 7);
    assert!(report.outcomes.iter().all(|o| o.name() != "cup-01" && o.name() != "vase-01"));

    assert_eq!(
        skip_reason(&report.outcomes, "box-02"),
        Some(&SkipReason::Duplicate {
            of: "box-01".to_string()
        })
    );
    assert!(matches!(
        skip_reason(&report.outcomes, "bowl-01"),
        Some(SkipReason::NotWatertight { boundary_edges: 4, .. })
    ));
    assert!(matches!(
        skip_reason(&report.outcomes, "mug-01"),
        Some(SkipReason::MalformedParameters { .. })
    ));
    assert!(matches!(
        skip_reason(&report.outcomes, "pan-01"),
        Some(SkipReason::LoadFailed { .. })
    ));

    // Converted meshes only for processed objects
    for name in ["box-01", "box-03", "crate-01"] {
        assert!(config.export_path(name).exists(), "{} not exported", name);
    }
    for name in ["box-02", "bowl-01", "mug-01", "pan-01", "cup-01", "vase-01"] {
        assert!(!config.export_path(name).exists(), "{} exported", name);
    }

    let rows = read_summary(config.summary_path())?;
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.mass, 1.0);
        assert!(row.inertia.iter().all(|v| (-0.1..=0.1).contains(v)));
    }

    let small = &rows[1];
    assert_relative_eq!(small.center_of_mass[0], 1.05, epsilon = 1e-6);
    assert_relative_eq!(small.center_of_mass[1], 2.05, epsilon = 1e-6);
    assert_relative_eq!(small.center_of_mass[2], 3.05, epsilon = 1e-6);
    // rho * a^5 / 6 with rho = 1000, a = 0.1
    assert_relative_eq!(small.inertia[0], 1000.0 * 1e-5 / 6.0, max_relative = 1e-6);
    assert_relative_eq!(small.inertia[8], 1000.0 * 1e-5 / 6.0, max_relative = 1e-6);
    assert_relative_eq!(small.inertia[1], 0.0, epsilon = 1e-12);

    let saved = report::read_json(config.report_path().unwrap_or_default())?;
    let saved_names: Vec<_> = saved.outcomes.iter().map(|o| o.name()).collect();
    let names: Vec<_> = report.outcomes.iter().map(|o| o.name()).collect();
    assert_eq!(saved_names, names);
    assert_eq!(saved.summary_sha256, report.summary_sha256);
    Ok(())
}

#[test]
fn test_rerun_is_byte_identical() -> Result<()> {
    let data = Dataset::new()?;
    populate(&data)?;

    let first = run(&data.config)?;
    let bytes = fs::read(data.config.summary_path())?;
    let second = run(&data.config)?;

    assert_eq!(first.summary_sha256, second.summary_sha256);
    assert_eq!(fs::read(data.config.summary_path())?, bytes);
    Ok(())
}

#[test]
fn test_all_identical_class_collapses() -> Result<()> {
    let data = Dataset::new()?;
    let unit = cube_obj(1.0, [0.0; 3], 12);
    for i in 1..=4 {
        let name = format!("jar-{:02}", i);
        data.geometry(&name, &unit)?;
        data.parameters(&name, &params([0.1, 0.2, 0.3, 0.4, 0.5]))?;
    }

    let report = run(&data.config)?;
    assert_eq!(report.retained, 1);
    assert_eq!(read_summary(data.config.summary_path())?.len(), 1);
    assert_eq!(report.skip_counts()["duplicate coefficients"], 3);
    Ok(())
}

#[test]
fn test_hole_filling_recovers_open_box() -> Result<()> {
    let mut data = Dataset::new()?;
    data.config.fill_holes = true;
    data.geometry("bowl-01", &cube_obj(1.0, [0.0; 3], 10))?;
    data.parameters("bowl-01", &params([4.0; 5]))?;

    let report = run(&data.config)?;
    assert_eq!(report.processed, 1);
    assert_eq!(report.repaired, 1);
    Ok(())
}

#[test]
fn test_empty_dataset_writes_empty_summary() -> Result<()> {
    let data = Dataset::new()?;
    let report = run(&data.config)?;

    assert!(report.outcomes.is_empty());
    assert!(fs::read_to_string(data.config.summary_path())?.is_empty());
    Ok(())
}

#[test]
fn test_missing_input_directory_is_fatal() -> Result<()> {
    let data = Dataset::new()?;
    let config = PrepConfig {
        object_dir: Path::new("/nonexistent/object_files").to_path_buf(),
        ..data.config.clone()
    };
    assert!(run(&config).is_err());
    Ok(())
}
