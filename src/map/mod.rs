// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Map module - the read-only HD map graph consumed by the mesh builder
//!
//! The builder never talks to a scene or editor directly. Everything it needs
//! is pulled through [`MapSource`], which [`MapData`] implements for maps
//! loaded from JSON.

mod data;
mod line_type;
mod transform;

pub use data::MapData;
pub use line_type::{LineType, RawLineType};
pub use transform::Transform;

use crate::error::{MeshError, Result};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a lane entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(pub u32);

/// Identity of a boundary line entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub u32);

/// Identity of an intersection entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntersectionId(pub u32);

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane#{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line#{}", self.0)
    }
}

impl fmt::Display for IntersectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "intersection#{}", self.0)
    }
}

/// A boundary or marking line, points in the line's local frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLine {
    pub id: LineId,
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    pub points: Vec<[f64; 3]>,
    pub line_type: RawLineType,
}

impl MapLine {
    pub fn world_points(&self) -> Vec<Point3<f64>> {
        self.points
            .iter()
            .map(|p| self.transform.transform_point(&Point3::from(*p)))
            .collect()
    }
}

/// A traffic lane, centerline points in the lane's local frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapLane {
    pub id: LaneId,
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    pub points: Vec<[f64; 3]>,
    pub left_boundary: LineId,
    pub right_boundary: LineId,
    #[serde(default)]
    pub predecessors: Vec<LaneId>,
    #[serde(default)]
    pub successors: Vec<LaneId>,
}

impl MapLane {
    /// First centerline point in world space
    pub fn world_start(&self) -> Result<Point3<f64>> {
        let first = self.points.first().ok_or_else(|| MeshError::EmptyLane {
            lane: self.name.clone(),
        })?;
        Ok(self.transform.transform_point(&Point3::from(*first)))
    }
}

/// A grouping of lanes and dedicated lines merged into one surface
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapIntersection {
    pub id: IntersectionId,
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub lanes: Vec<LaneId>,
    #[serde(default)]
    pub lines: Vec<LineId>,
}

/// Read-only query interface over an HD map graph
pub trait MapSource {
    /// Lanes that do not belong to any intersection, in map order
    fn traffic_lanes(&self) -> Vec<&MapLane>;

    /// All intersections, in map order
    fn intersections(&self) -> Vec<&MapIntersection>;

    fn lane(&self, id: LaneId) -> Option<&MapLane>;

    fn line(&self, id: LineId) -> Option<&MapLine>;

    /// Left and right boundary of `lane`; a dangling reference is fatal
    fn boundaries_for<'a>(&'a self, lane: &MapLane) -> Result<(&'a MapLine, &'a MapLine)> {
        let lookup = |id: LineId| {
            self.line(id).ok_or_else(|| MeshError::MissingLine {
                owner: lane.name.clone(),
                line: id,
            })
        };
        Ok((lookup(lane.left_boundary)?, lookup(lane.right_boundary)?))
    }
}
