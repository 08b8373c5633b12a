// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! GLTF/GLB exporter

use crate::builder::BuiltMesh;
use crate::geometry::Mesh;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::{json, Value};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const FLOAT: u32 = 5126;
const UNSIGNED_INT: u32 = 5125;
const ARRAY_BUFFER: u32 = 34962;
const ELEMENT_ARRAY_BUFFER: u32 = 34963;

/// Export built meshes to GLTF (embedded buffer) or GLB, picked by extension
pub fn export(meshes: &[BuiltMesh], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let binary = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("glb"));

    let result = if binary {
        export_glb(meshes, path)
    } else {
        export_gltf_embedded(meshes, path)
    };
    result.with_context(|| format!("Failed to export glTF: {:?}", path))
}

/// Export meshes to GLB (binary GLTF)
fn export_glb(meshes: &[BuiltMesh], path: &Path) -> Result<()> {
    let document = Document::build(meshes);
    let gltf = document.to_json(None);

    let json_string = serde_json::to_string(&gltf)?;
    let mut json_offset = json_string.len();
    align_to_multiple_of_four(&mut json_offset);
    let json_padding = json_offset - json_string.len();

    let buffer_data = &document.buffer;
    let mut buffer_offset = buffer_data.len();
    align_to_multiple_of_four(&mut buffer_offset);
    let buffer_padding = buffer_offset - buffer_data.len();

    let total_length = 12 + 8 + json_offset + 8 + buffer_offset;

    let mut file = File::create(path)?;

    // GLB header
    file.write_all(&0x46546C67u32.to_le_bytes())?; // magic: "glTF"
    file.write_all(&2u32.to_le_bytes())?; // version
    file.write_all(&(total_length as u32).to_le_bytes())?;

    // JSON chunk
    file.write_all(&(json_offset as u32).to_le_bytes())?;
    file.write_all(&0x4E4F534Au32.to_le_bytes())?; // type: "JSON"
    file.write_all(json_string.as_bytes())?;
    file.write_all(&vec![b' '; json_padding])?;

    // BIN chunk
    file.write_all(&(buffer_offset as u32).to_le_bytes())?;
    file.write_all(&0x004E4942u32.to_le_bytes())?; // type: "BIN\0"
    file.write_all(buffer_data)?;
    file.write_all(&vec![0u8; buffer_padding])?;

    Ok(())
}

/// Export meshes to a single .gltf with the buffer as a data URI
fn export_gltf_embedded(meshes: &[BuiltMesh], path: &Path) -> Result<()> {
    let document = Document::build(meshes);
    let uri = format!("data:application/octet-stream;base64,{}", STANDARD.encode(&document.buffer));
    let json_string = serde_json::to_string_pretty(&document.to_json(Some(uri)))?;
    std::fs::write(path, json_string)?;
    Ok(())
}

/// Buffer plus the JSON arrays that index into it
#[derive(Default)]
struct Document {
    buffer: Vec<u8>,
    views: Vec<Value>,
    accessors: Vec<Value>,
    meshes: Vec<Value>,
    nodes: Vec<Value>,
}

impl Document {
    fn build(meshes: &[BuiltMesh]) -> Self {
        let mut document = Self::default();
        for built in meshes.iter().filter(|b| !b.mesh.is_empty()) {
            document.push(built);
        }
        document
    }

    fn push(&mut self, built: &BuiltMesh) {
        let mesh = &built.mesh;
        let bounds = mesh.bounding_box();

        let position = self.push_floats(
            mesh.vertices.iter().flat_map(|v| [v.position.x, v.position.y, v.position.z]),
            mesh.vertex_count(),
            "VEC3",
            Some((bounds.min.coords.as_slice().to_vec(), bounds.max.coords.as_slice().to_vec())),
        );
        let normal = self.push_floats(
            mesh.vertices.iter().flat_map(|v| [v.normal.x, v.normal.y, v.normal.z]),
            mesh.vertex_count(),
            "VEC3",
            None,
        );
        let tangent = self.push_floats(
            mesh.vertices.iter().flat_map(|v| [v.tangent.x, v.tangent.y, v.tangent.z, v.tangent.w]),
            mesh.vertex_count(),
            "VEC4",
            None,
        );
        let uv = self.push_floats(
            mesh.vertices.iter().flat_map(|v| [v.uv.x, v.uv.y]),
            mesh.vertex_count(),
            "VEC2",
            None,
        );
        let indices = self.push_indices(mesh);

        let mesh_index = self.meshes.len();
        self.meshes.push(json!({
            "name": built.name,
            "primitives": [
                {
                    "attributes": {
                        "POSITION": position,
                        "NORMAL": normal,
                        "TANGENT": tangent,
                        "TEXCOORD_0": uv
                    },
                    "indices": indices,
                    "mode": 4
                }
            ]
        }));

        let rotation = built.transform.unit_rotation();
        let q = rotation.quaternion();
        self.nodes.push(json!({
            "name": built.name,
            "mesh": mesh_index,
            "translation": built.transform.position,
            "rotation": [q.i, q.j, q.k, q.w],
            "extras": {
                "kind": built.kind,
                "style": built.style,
                "renderer": built.renderer,
                "collider": built.collider
            }
        }));
    }

    fn push_floats(
        &mut self,
        values: impl Iterator<Item = f64>,
        count: usize,
        kind: &str,
        bounds: Option<(Vec<f64>, Vec<f64>)>,
    ) -> usize {
        let offset = self.buffer.len();
        for value in values {
            self.buffer.extend_from_slice(&(value as f32).to_le_bytes());
        }
        let view = self.push_view(offset, ARRAY_BUFFER);

        let mut accessor = json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": FLOAT,
            "count": count,
            "type": kind
        });
        if let Some((min, max)) = bounds {
            let narrow = |v: Vec<f64>| v.into_iter().map(|x| x as f32).collect::<Vec<_>>();
            accessor["min"] = json!(narrow(min));
            accessor["max"] = json!(narrow(max));
        }
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn push_indices(&mut self, mesh: &Mesh) -> usize {
        let offset = self.buffer.len();
        let indices = mesh.indices();
        for index in &indices {
            self.buffer.extend_from_slice(&index.to_le_bytes());
        }
        let view = self.push_view(offset, ELEMENT_ARRAY_BUFFER);

        self.accessors.push(json!({
            "bufferView": view,
            "byteOffset": 0,
            "componentType": UNSIGNED_INT,
            "count": indices.len(),
            "type": "SCALAR"
        }));
        self.accessors.len() - 1
    }

    fn push_view(&mut self, offset: usize, target: u32) -> usize {
        self.views.push(json!({
            "buffer": 0,
            "byteOffset": offset,
            "byteLength": self.buffer.len() - offset,
            "target": target
        }));
        self.views.len() - 1
    }

    fn to_json(&self, uri: Option<String>) -> Value {
        let mut buffer = json!({ "byteLength": self.buffer.len() });
        if let Some(uri) = uri {
            buffer["uri"] = json!(uri);
        }

        json!({
            "asset": {
                "generator": "Roadmesh",
                "version": "2.0"
            },
            "scene": 0,
            "scenes": [
                {
                    "nodes": (0..self.nodes.len()).collect::<Vec<_>>()
                }
            ],
            "nodes": self.nodes,
            "meshes": self.meshes,
            "accessors": self.accessors,
            "bufferViews": self.views,
            "buffers": [buffer]
        })
    }
}

fn align_to_multiple_of_four(n: &mut usize) {
    *n = (*n + 3) & !3;
}
