// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh file importer (OBJ and STL)

use crate::error::MeshLoadError;
use crate::geometry::{Mesh, Triangle, Vertex};
use nalgebra::Point3;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a mesh, picking the reader from the file extension.
/// The result is raw: vertices are not welded and normals are recomputed.
pub fn load_mesh(path: impl AsRef<Path>) -> Result<Mesh, MeshLoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mut mesh = match extension.as_str() {
        "obj" => load_obj(path)?,
        "stl" => load_stl(path)?,
        _ => {
            return Err(MeshLoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            })
        }
    };

    if mesh.is_empty() {
        return Err(MeshLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    mesh.recompute_normals();
    Ok(mesh)
}

/// Load every model of an OBJ file into one mesh, triangulating polygons
pub fn load_obj(path: &Path) -> Result<Mesh, MeshLoadError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };

    let (models, _materials) = tobj::load_obj(path, &options).map_err(|e| match e {
        tobj::LoadError::OpenFileFailed => MeshLoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, e.to_string()),
        },
        other => MeshLoadError::Obj {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    })?;

    let mut mesh = Mesh::new();
    for model in &models {
        let offset = mesh.vertex_count();
        let positions = &model.mesh.positions;

        for chunk in positions.chunks_exact(3) {
            mesh.add_vertex(Vertex::at(Point3::new(
                chunk[0] as f64,
                chunk[1] as f64,
                chunk[2] as f64,
            )));
        }

        let local_count = positions.len() / 3;
        for face in model.mesh.indices.chunks_exact(3) {
            let local = [face[0] as usize, face[1] as usize, face[2] as usize];
            if local.iter().any(|&i| i >= local_count) {
                return Err(MeshLoadError::Obj {
                    path: path.to_path_buf(),
                    reason: format!("model '{}' references a missing vertex", model.name),
                });
            }
            mesh.add_triangle(Triangle::new(local.map(|i| i + offset)));
        }
    }

    Ok(mesh)
}

/// Load an ASCII or binary STL file
pub fn load_stl(path: &Path) -> Result<Mesh, MeshLoadError> {
    let file = File::open(path).map_err(|source| MeshLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshLoadError::Stl {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut mesh = Mesh::with_capacity(stl.vertices.len(), stl.faces.len());
    for vertex in &stl.vertices {
        mesh.add_vertex(Vertex::at(Point3::new(
            vertex[0] as f64,
            vertex[1] as f64,
            vertex[2] as f64,
        )));
    }
    for face in &stl.faces {
        mesh.add_triangle(Triangle::new(face.vertices));
    }

    Ok(mesh)
}
