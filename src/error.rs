// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Typed errors for the per-item stages. Run-level failures use `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read a mesh file into memory
#[derive(Debug, Error)]
pub enum MeshLoadError {
    #[error("failed to open mesh file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse OBJ file {path:?}: {reason}")]
    Obj { path: PathBuf, reason: String },

    #[error("failed to parse STL file {path:?}: {reason}")]
    Stl { path: PathBuf, reason: String },

    #[error("mesh file {path:?} contains no triangles")]
    Empty { path: PathBuf },

    #[error("unsupported mesh format {extension:?} for {path:?} (expected obj or stl)")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// A parameter file that does not hold the expected flat list of numbers
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParamError {
    #[error("failed to read parameter file: {0}")]
    Io(String),

    #[error("parameter file is empty")]
    Empty,

    #[error("field {index} is not a number: {token:?}")]
    InvalidNumber { index: usize, token: String },

    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
}

/// Failure to write a converted mesh
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create {path:?}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write STL {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to export an empty mesh to {path:?}")]
    EmptyMesh { path: PathBuf },
}
