// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lane topology prepared against a [`LineCache`]
//!
//! Preparing the lanes also fills the cache in the order the later stages
//! depend on: intersection boundaries first, then intersection-owned lines,
//! then one usage count per lane reference.

use super::line_cache::{BoundaryLine, LineCache, LineSlot, VertexId};
use crate::error::{MeshError, Result};
use crate::map::{IntersectionId, LaneId, MapLane, MapSource, Transform};
use ahash::AHashMap;
use nalgebra::Point3;
use tracing::debug;

/// Which boundary of a lane a vertex belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

/// Whether each boundary runs against the lane's direction of travel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub left_reversed: bool,
    pub right_reversed: bool,
}

/// A lane with its boundaries resolved to cache slots
#[derive(Debug, Clone)]
pub struct PreparedLane {
    pub id: LaneId,
    pub name: String,
    pub transform: Transform,
    /// First centerline point in world space
    pub start: Point3<f64>,
    pub left: LineSlot,
    pub right: LineSlot,
    pub predecessors: Vec<usize>,
    pub successors: Vec<usize>,
    pub intersection: Option<IntersectionId>,
}

impl PreparedLane {
    pub fn left_line<'a>(&self, cache: &'a LineCache) -> &'a BoundaryLine {
        cache.at(self.left)
    }

    pub fn right_line<'a>(&self, cache: &'a LineCache) -> &'a BoundaryLine {
        cache.at(self.right)
    }

    /// The four boundary endpoints: left first, left last, right first, right last
    pub fn endpoints(&self, cache: &LineCache) -> impl Iterator<Item = (VertexId, Side)> {
        let left = self.left_line(cache);
        let right = self.right_line(cache);
        [
            (left.first(), Side::Left),
            (left.last(), Side::Left),
            (right.first(), Side::Right),
            (right.last(), Side::Right),
        ]
        .into_iter()
    }

    /// Boundary orientation from the current (possibly welded) positions
    pub fn orientation(&self, cache: &LineCache) -> Orientation {
        let arena = cache.arena();
        let reversed = |line: &BoundaryLine| {
            let to_first = (arena.position(line.first()) - self.start).norm();
            let to_last = (arena.position(line.last()) - self.start).norm();
            to_last < to_first
        };
        Orientation {
            left_reversed: reversed(self.left_line(cache)),
            right_reversed: reversed(self.right_line(cache)),
        }
    }
}

/// All lanes of a map: traffic lanes first, then intersection lanes
#[derive(Debug, Clone, Default)]
pub struct LaneTopology {
    lanes: Vec<PreparedLane>,
    traffic_count: usize,
}

impl LaneTopology {
    /// Resolve every lane and fill `cache` with boundary lines and usage counts
    pub fn prepare<S: MapSource + ?Sized>(source: &S, cache: &mut LineCache) -> Result<Self> {
        let traffic = source.traffic_lanes();
        let mut owned: Vec<(&MapLane, IntersectionId)> = Vec::new();

        for intersection in source.intersections() {
            for &lane_id in &intersection.lanes {
                let lane = source.lane(lane_id).ok_or_else(|| MeshError::MissingLane {
                    owner: intersection.name.clone(),
                    lane: lane_id,
                })?;
                let (left, right) = source.boundaries_for(lane)?;
                cache.ensure(left)?;
                cache.ensure(right)?;
                owned.push((lane, intersection.id));
            }

            for &line_id in &intersection.lines {
                let line = source.line(line_id).ok_or_else(|| MeshError::MissingLine {
                    owner: intersection.name.clone(),
                    line: line_id,
                })?;
                cache.register_exclusive(line)?;
            }
        }

        let all: Vec<(&MapLane, Option<IntersectionId>)> = traffic
            .iter()
            .map(|&lane| (lane, None))
            .chain(owned.iter().map(|&(lane, owner)| (lane, Some(owner))))
            .collect();

        let mut positions: AHashMap<LaneId, usize> = AHashMap::with_capacity(all.len());
        for (i, (lane, _)) in all.iter().enumerate() {
            positions.entry(lane.id).or_insert(i);
        }

        let resolve = |lane: &MapLane, ids: &[LaneId]| -> Result<Vec<usize>> {
            ids.iter()
                .map(|id| {
                    positions.get(id).copied().ok_or_else(|| MeshError::MissingLane {
                        owner: lane.name.clone(),
                        lane: *id,
                    })
                })
                .collect()
        };

        let mut lanes = Vec::with_capacity(all.len());
        for &(lane, intersection) in &all {
            let (left, right) = source.boundaries_for(lane)?;
            cache.increment_usage(left)?;
            cache.increment_usage(right)?;

            lanes.push(PreparedLane {
                id: lane.id,
                name: lane.name.clone(),
                transform: lane.transform,
                start: lane.world_start()?,
                left: cache.ensure(left)?,
                right: cache.ensure(right)?,
                predecessors: resolve(lane, &lane.predecessors)?,
                successors: resolve(lane, &lane.successors)?,
                intersection,
            });
        }

        debug!(
            lanes = lanes.len(),
            traffic = traffic.len(),
            lines = cache.len(),
            vertices = cache.arena().len(),
            "Prepared lane topology"
        );

        Ok(Self {
            lanes,
            traffic_count: traffic.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn get(&self, index: usize) -> &PreparedLane {
        &self.lanes[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PreparedLane> {
        self.lanes.iter()
    }

    /// Lanes outside intersections, in map order
    pub fn traffic(&self) -> &[PreparedLane] {
        &self.lanes[..self.traffic_count]
    }

    /// Lanes owned by `intersection`, in the intersection's order
    pub fn owned_by(&self, intersection: IntersectionId) -> impl Iterator<Item = &PreparedLane> {
        self.lanes[self.traffic_count..]
            .iter()
            .filter(move |lane| lane.intersection == Some(intersection))
    }

    /// The lane plus its predecessors and successors, each with their
    /// successors and predecessors respectively
    pub fn relevant(&self, index: usize) -> Vec<usize> {
        let lane = &self.lanes[index];
        let mut relevant = vec![index];
        let mut add = |i: usize| {
            if !relevant.contains(&i) {
                relevant.push(i);
            }
        };

        for &prev in &lane.predecessors {
            add(prev);
            for &next in &self.lanes[prev].successors {
                add(next);
            }
        }
        for &next in &lane.successors {
            add(next);
            for &prev in &self.lanes[next].predecessors {
                add(prev);
            }
        }
        relevant
    }
}
