// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Boundary line cache and the shared vertex arena
//!
//! Every boundary line is converted to world space once. Its vertices live in a
//! [`VertexArena`] and are addressed by [`VertexId`]; welding links vertices of
//! different lines by id, never by reference.

use crate::error::{MeshError, Result};
use crate::map::{LineId, LineType, MapLine, Transform};
use ahash::AHashMap;
use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable index of a vertex in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

/// A boundary vertex, possibly welded to vertices of other lines
#[derive(Debug, Clone)]
pub struct BoundaryVertex {
    pub position: Point3<f64>,
    /// Horizontal push-out direction; zero until the outward pass sets it
    pub outward: Vector3<f64>,
    links: Vec<VertexId>,
}

impl BoundaryVertex {
    fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            outward: Vector3::zeros(),
            links: Vec::new(),
        }
    }

    /// Vertices welded to this one
    pub fn links(&self) -> &[VertexId] {
        &self.links
    }
}

/// Owner of all boundary vertices
#[derive(Debug, Clone, Default)]
pub struct VertexArena {
    vertices: Vec<BoundaryVertex>,
}

impl VertexArena {
    pub fn push(&mut self, position: Point3<f64>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(BoundaryVertex::new(position));
        id
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn get(&self, id: VertexId) -> &BoundaryVertex {
        &self.vertices[id.0]
    }

    pub fn position(&self, id: VertexId) -> Point3<f64> {
        self.vertices[id.0].position
    }

    pub fn outward(&self, id: VertexId) -> Vector3<f64> {
        self.vertices[id.0].outward
    }

    pub fn links(&self, id: VertexId) -> &[VertexId] {
        &self.vertices[id.0].links
    }

    pub fn set_position(&mut self, id: VertexId, position: Point3<f64>) {
        self.vertices[id.0].position = position;
    }

    pub fn set_outward(&mut self, id: VertexId, outward: Vector3<f64>) {
        self.vertices[id.0].outward = outward;
    }

    /// Link every vertex in `group` to every other one
    pub fn link_all(&mut self, group: &[VertexId]) {
        for &a in group {
            for &b in group {
                if a != b && !self.vertices[a.0].links.contains(&b) {
                    self.vertices[a.0].links.push(b);
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &BoundaryVertex)> {
        self.vertices.iter().enumerate().map(|(i, v)| (VertexId(i), v))
    }
}

/// Paint shape of a boundary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineShape {
    None,
    Solid,
    Dotted,
    Double,
}

/// Paint color of a boundary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineColor {
    White,
    Yellow,
}

/// Shape and color of a line's paint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineStyle {
    pub shape: LineShape,
    pub color: Option<LineColor>,
}

impl LineStyle {
    pub const NONE: LineStyle = LineStyle {
        shape: LineShape::None,
        color: None,
    };

    fn painted(shape: LineShape, color: LineColor) -> Self {
        Self {
            shape,
            color: Some(color),
        }
    }

    pub fn classify(line_type: LineType) -> Self {
        use LineColor::{White, Yellow};
        use LineShape::{Dotted, Double, Solid};

        match line_type {
            LineType::Unknown | LineType::Virtual => Self::NONE,
            LineType::Curb | LineType::Stop => Self::painted(Solid, White),
            LineType::SolidWhite => Self::painted(Solid, White),
            LineType::SolidYellow => Self::painted(Solid, Yellow),
            LineType::DottedWhite => Self::painted(Dotted, White),
            LineType::DottedYellow => Self::painted(Dotted, Yellow),
            LineType::DoubleWhite => Self::painted(Double, White),
            LineType::DoubleYellow => Self::painted(Double, Yellow),
        }
    }

    pub fn is_painted(&self) -> bool {
        self.shape != LineShape::None
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Some(color) => write!(f, "{:?} {:?}", self.shape, color),
            None => write!(f, "{:?}", self.shape),
        }
    }
}

/// A cached boundary line
#[derive(Debug, Clone)]
pub struct BoundaryLine {
    pub id: LineId,
    pub name: String,
    pub transform: Transform,
    pub vertices: Vec<VertexId>,
    pub style: LineStyle,
    /// Number of lane references (intersection-exclusive lines start at 1)
    pub usage: u32,
}

impl BoundaryLine {
    pub fn first(&self) -> VertexId {
        self.vertices[0]
    }

    pub fn last(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }
}

/// Position of a line in the cache; valid for the cache that issued it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSlot(usize);

/// Boundary lines keyed by identity, in insertion order
#[derive(Debug, Clone, Default)]
pub struct LineCache {
    arena: VertexArena,
    lines: Vec<BoundaryLine>,
    index: AHashMap<LineId, usize>,
}

impl LineCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the cached line on first use; later calls return the same entry
    pub fn get_or_build(&mut self, line: &MapLine) -> Result<&BoundaryLine> {
        let slot = self.ensure(line)?;
        Ok(self.at(slot))
    }

    /// Like [`get_or_build`](Self::get_or_build) but returns the slot
    pub fn ensure(&mut self, line: &MapLine) -> Result<LineSlot> {
        match self.index.get(&line.id) {
            Some(&slot) => Ok(LineSlot(slot)),
            None => self.build(line).map(LineSlot),
        }
    }

    fn build(&mut self, line: &MapLine) -> Result<usize> {
        let style = LineStyle::classify(LineType::resolve(&line.line_type, &line.name)?);
        if line.points.is_empty() {
            return Err(MeshError::EmptyLine {
                line: line.name.clone(),
            });
        }

        let vertices = line
            .world_points()
            .into_iter()
            .map(|p| self.arena.push(p))
            .collect();

        let slot = self.lines.len();
        self.lines.push(BoundaryLine {
            id: line.id,
            name: line.name.clone(),
            transform: line.transform,
            vertices,
            style,
            usage: 0,
        });
        self.index.insert(line.id, slot);
        Ok(slot)
    }

    /// Count one more lane reference, building the line if needed
    pub fn increment_usage(&mut self, line: &MapLine) -> Result<u32> {
        let LineSlot(slot) = self.ensure(line)?;
        let entry = &mut self.lines[slot];
        entry.usage += 1;
        Ok(entry.usage)
    }

    /// Register a line owned by an intersection
    ///
    /// A line not seen before starts with usage 1 so it is treated as a road
    /// edge even if no lane references it. Already cached lines are untouched.
    pub fn register_exclusive(&mut self, line: &MapLine) -> Result<()> {
        if !self.index.contains_key(&line.id) {
            let slot = self.build(line)?;
            self.lines[slot].usage = 1;
        }
        Ok(())
    }

    pub fn at(&self, slot: LineSlot) -> &BoundaryLine {
        &self.lines[slot.0]
    }

    pub fn line(&self, id: LineId) -> Option<&BoundaryLine> {
        self.index.get(&id).map(|&slot| &self.lines[slot])
    }

    pub fn usage(&self, id: LineId) -> Option<u32> {
        self.line(id).map(|line| line.usage)
    }

    /// All lines in insertion order
    pub fn lines(&self) -> &[BoundaryLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Current world positions of a line's vertices
    pub fn positions(&self, line: &BoundaryLine) -> Vec<Point3<f64>> {
        line.vertices.iter().map(|&v| self.arena.position(v)).collect()
    }

    pub fn arena(&self) -> &VertexArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut VertexArena {
        &mut self.arena
    }
}
