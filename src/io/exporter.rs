// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Binary STL export

use crate::error::ExportError;
use crate::geometry::Mesh;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use stl_io::{Normal, Triangle as StlTriangle, Vertex as StlVertex};

/// Write `mesh` as binary STL, one facet per triangle with its geometric normal
pub fn export_stl(mesh: &Mesh, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    if mesh.is_empty() {
        return Err(ExportError::EmptyMesh {
            path: path.to_path_buf(),
        });
    }

    let triangles: Vec<StlTriangle> = mesh
        .triangles
        .iter()
        .map(|triangle| {
            let normal = mesh.face_normal(triangle);
            let [v0, v1, v2] = mesh.triangle_positions(triangle);
            StlTriangle {
                normal: Normal::new([normal.x as f32, normal.y as f32, normal.z as f32]),
                vertices: [
                    StlVertex::new([v0.x as f32, v0.y as f32, v0.z as f32]),
                    StlVertex::new([v1.x as f32, v1.y as f32, v1.z as f32]),
                    StlVertex::new([v2.x as f32, v2.y as f32, v2.z as f32]),
                ],
            }
        })
        .collect();

    let file = File::create(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);

    stl_io::write_stl(&mut writer, triangles.iter())
        .and_then(|_| writer.flush())
        .map_err(|source| ExportError::Write {
            path: path.to_path_buf(),
            source,
        })
}
