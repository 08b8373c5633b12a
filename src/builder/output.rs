// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Built meshes, their delivery and the build summary

use super::line_cache::LineStyle;
use crate::error::MeshError;
use crate::geometry::Mesh;
use crate::map::Transform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a built mesh was made from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshKind {
    Lane,
    Intersection,
    Line,
}

impl fmt::Display for MeshKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshKind::Lane => write!(f, "lane"),
            MeshKind::Intersection => write!(f, "intersection"),
            MeshKind::Line => write!(f, "line"),
        }
    }
}

/// Surface a mesh should be drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum MeshStyle {
    Road,
    Line(LineStyle),
}

/// One finished mesh, positioned by `transform`
#[derive(Debug, Clone)]
pub struct BuiltMesh {
    /// `<source-name>_mesh`
    pub name: String,
    pub kind: MeshKind,
    pub style: MeshStyle,
    pub transform: Transform,
    /// Vertices relative to `transform`
    pub mesh: Mesh,
    pub renderer: bool,
    pub collider: bool,
}

impl BuiltMesh {
    pub fn mesh_name(source: &str) -> String {
        format!("{}_mesh", source)
    }
}

/// Destination of built meshes
pub trait MeshSink {
    fn accept(&mut self, mesh: BuiltMesh);
}

impl<F: FnMut(BuiltMesh)> MeshSink for F {
    fn accept(&mut self, mesh: BuiltMesh) {
        self(mesh)
    }
}

impl MeshSink for Vec<BuiltMesh> {
    fn accept(&mut self, mesh: BuiltMesh) {
        self.push(mesh);
    }
}

/// An entity that was skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFailure {
    pub entity: String,
    pub kind: MeshKind,
    pub error: String,
}

impl EntityFailure {
    pub fn new(entity: &str, kind: MeshKind, error: &MeshError) -> Self {
        Self {
            entity: entity.to_string(),
            kind,
            error: error.to_string(),
        }
    }
}

/// Summary of a finished build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub lanes: usize,
    pub intersections: usize,
    pub lines: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub cached_lines: usize,
    pub welded_groups: usize,
    pub outward_lines: usize,
    pub failures: Vec<EntityFailure>,
    pub duration_ms: u64,
}

impl BuildReport {
    pub fn record(&mut self, built: &BuiltMesh) {
        match built.kind {
            MeshKind::Lane => self.lanes += 1,
            MeshKind::Intersection => self.intersections += 1,
            MeshKind::Line => self.lines += 1,
        }
        self.vertices += built.mesh.vertex_count();
        self.triangles += built.mesh.triangle_count();
    }

    pub fn meshes(&self) -> usize {
        self.lanes + self.intersections + self.lines
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
