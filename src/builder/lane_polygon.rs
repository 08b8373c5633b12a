// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Closed lane outlines from a lane's two boundaries

use super::lanes::PreparedLane;
use super::line_cache::{BoundaryLine, LineCache};
use crate::geometry::{Polygon, DUPLICATE_EPSILON};
use nalgebra::Point3;

/// Coordinate frame of a built polygon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Space {
    #[default]
    World,
    /// The lane's own transform
    Local,
}

/// Builds a lane polygon: right boundary, then left boundary, pushed outward
#[derive(Debug, Clone, Copy)]
pub struct PolygonBuilder {
    push_distance: f64,
}

impl PolygonBuilder {
    pub fn new(push_distance: f64) -> Self {
        Self { push_distance }
    }

    pub fn build(&self, lane: &PreparedLane, cache: &LineCache, space: Space) -> Polygon {
        let orientation = lane.orientation(cache);

        let mut points = self.pushed(lane.right_line(cache), cache);
        if orientation.right_reversed {
            points.reverse();
        }
        let mut left = self.pushed(lane.left_line(cache), cache);
        if !orientation.left_reversed {
            left.reverse();
        }
        points.extend(left);

        let mut polygon = Polygon::new(points);
        polygon.remove_duplicates(DUPLICATE_EPSILON);

        if space == Space::Local {
            for point in &mut polygon.points {
                *point = lane.transform.inverse_transform_point(point);
            }
        }
        polygon
    }

    fn pushed(&self, line: &BoundaryLine, cache: &LineCache) -> Vec<Point3<f64>> {
        let arena = cache.arena();
        line.vertices
            .iter()
            .map(|&v| {
                let vertex = arena.get(v);
                vertex.position + vertex.outward * self.push_distance
            })
            .collect()
    }
}
