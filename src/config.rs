// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Preprocessing configuration

use crate::geometry::RepairOptions;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory by [`PrepConfig::load`]
pub const DEFAULT_CONFIG_FILE: &str = "meshprep.toml";

/// Preprocessing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    /// Directory holding `<object>.<mesh_extension>` geometry files
    pub object_dir: PathBuf,
    /// Directory holding `<object><param_suffix>` parameter files
    pub param_dir: PathBuf,
    /// Converted meshes and the summary table are written here
    pub output_dir: PathBuf,
    pub mesh_extension: String,
    pub param_suffix: String,
    /// Summary table file name inside `output_dir`
    pub summary_file: String,
    /// JSON run report file name inside `output_dir`
    pub report_file: Option<String>,
    /// Mass written for every object
    pub target_mass: f64,
    /// Density the inertia tensor is rescaled to
    pub target_density: f64,
    /// Density mass properties are first computed at
    pub default_density: f64,
    /// Inertia components are clamped to `[-inertia_clamp, inertia_clamp]`
    pub inertia_clamp: f64,
    /// Object class is the name up to this character
    pub class_separator: char,
    /// Vertices closer than this are merged on load and during repair
    pub merge_tolerance: f64,
    pub fill_holes: bool,
    pub max_hole_edges: usize,
    pub show_progress: bool,
    /// tracing filter directive, e.g. "info" or "meshprep=debug"
    pub log_level: String,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            object_dir: PathBuf::from("data/meshes/object_files"),
            param_dir: PathBuf::from("data/meshes/morph_files"),
            output_dir: PathBuf::from("data/meshes/meshes"),
            mesh_extension: "obj".to_string(),
            param_suffix: "-params.csv".to_string(),
            summary_file: "objects.txt".to_string(),
            report_file: Some("report.json".to_string()),
            target_mass: 1.0,
            target_density: 1000.0,
            default_density: 1.0,
            inertia_clamp: 0.1,
            class_separator: '-',
            merge_tolerance: 1e-12,
            fill_holes: false,
            max_hole_edges: 4,
            show_progress: true,
            log_level: "info".to_string(),
        }
    }
}

impl PrepConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: PrepConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Load `meshprep.toml` if present, else defaults, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(DEFAULT_CONFIG_FILE).exists() {
            Self::from_file(DEFAULT_CONFIG_FILE)?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var("MESHPREP_OBJECT_DIR") {
            self.object_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("MESHPREP_PARAM_DIR") {
            self.param_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("MESHPREP_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Ok(level) = std::env::var("MESHPREP_LOG") {
            self.log_level = level;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject values that would make the output meaningless
    pub fn validate(&self) -> Result<()> {
        if self.mesh_extension.trim_start_matches('.').is_empty() {
            bail!("mesh_extension must not be empty");
        }
        if self.param_suffix.is_empty() {
            bail!("param_suffix must not be empty");
        }
        if self.summary_file.is_empty() {
            bail!("summary_file must not be empty");
        }
        if !(self.default_density.is_finite() && self.default_density > 0.0) {
            bail!("default_density must be positive, got {}", self.default_density);
        }
        if !(self.target_density.is_finite() && self.target_density > 0.0) {
            bail!("target_density must be positive, got {}", self.target_density);
        }
        if !(self.inertia_clamp.is_finite() && self.inertia_clamp >= 0.0) {
            bail!("inertia_clamp must be non-negative, got {}", self.inertia_clamp);
        }
        if !self.target_mass.is_finite() {
            bail!("target_mass must be finite");
        }
        if !self.merge_tolerance.is_finite() || self.merge_tolerance < 0.0 {
            bail!("merge_tolerance must be a non-negative number, got {}", self.merge_tolerance);
        }
        if self.fill_holes && self.max_hole_edges < 3 {
            bail!("max_hole_edges must be at least 3 when fill_holes is set");
        }
        Ok(())
    }

    pub fn repair_options(&self) -> RepairOptions {
        RepairOptions {
            merge_tolerance: self.merge_tolerance,
            fill_holes: self.fill_holes,
            max_hole_edges: self.max_hole_edges,
        }
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(&self.summary_file)
    }

    pub fn report_path(&self) -> Option<PathBuf> {
        self.report_file.as_ref().map(|file| self.output_dir.join(file))
    }

    /// Geometry file of an object
    pub fn mesh_path(&self, name: &str) -> PathBuf {
        self.object_dir.join(format!(
            "{}.{}",
            name,
            self.mesh_extension.trim_start_matches('.')
        ))
    }

    /// Converted mesh of an object
    pub fn export_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("{}.stl", name))
    }
}
