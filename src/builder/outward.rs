// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Outward push directions for road-edge boundaries

use super::lanes::LaneTopology;
use super::line_cache::{LineCache, LineSlot, VertexId};
use crate::utils::math::horizontal_perpendicular;
use nalgebra::Vector3;
use tracing::debug;

/// Squared length a push vector needs to count as set
const MIN_OUTWARD_SQUARED: f64 = 0.5;

/// Computes horizontal outward vectors for boundaries used by a single lane
#[derive(Debug, Clone, Copy, Default)]
pub struct OutwardVectorSolver;

impl OutwardVectorSolver {
    pub fn new() -> Self {
        Self
    }

    /// Returns the number of boundary lines that received vectors
    pub fn compute(&self, topology: &LaneTopology, cache: &mut LineCache) -> usize {
        let mut solved = 0;

        for lane in topology.iter() {
            let left_edge = lane.left_line(cache).usage == 1;
            let right_edge = lane.right_line(cache).usage == 1;
            if !left_edge && !right_edge {
                continue;
            }

            let orientation = lane.orientation(cache);
            if left_edge {
                solve_line(cache, lane.left, !orientation.left_reversed);
                solved += 1;
            }
            if right_edge {
                solve_line(cache, lane.right, orientation.right_reversed);
                solved += 1;
            }
        }

        let mut reconciled = 0;
        for lane in topology.iter() {
            let endpoints: Vec<_> = lane.endpoints(cache).collect();
            for (vertex, _) in endpoints {
                if reconcile(cache, vertex) {
                    reconciled += 1;
                }
            }
        }

        debug!(lines = solved, endpoints = reconciled, "Computed outward vectors");
        solved
    }
}

/// Tangent-based outward vectors along one line, walked backwards if `reversed`
fn solve_line(cache: &mut LineCache, slot: LineSlot, reversed: bool) {
    let mut vertices = cache.at(slot).vertices.clone();
    if reversed {
        vertices.reverse();
    }

    let positions: Vec<_> = vertices.iter().map(|&v| cache.arena().position(v)).collect();
    let n = positions.len();
    let arena = cache.arena_mut();

    for i in 0..n {
        let mut tangent = Vector3::zeros();
        if i > 0 {
            tangent += positions[i] - positions[i - 1];
        }
        if i + 1 < n {
            tangent += positions[i + 1] - positions[i];
        }

        let outward = horizontal_perpendicular(&tangent)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        arena.set_outward(vertices[i], outward);
    }
}

/// Average the set outward vectors of a vertex and its links, then write the
/// result to all of them
fn reconcile(cache: &mut LineCache, vertex: VertexId) -> bool {
    let arena = cache.arena_mut();
    let links = arena.links(vertex).to_vec();

    let (sum, count) = std::iter::once(vertex)
        .chain(links.iter().copied())
        .map(|v| arena.outward(v))
        .filter(|out| out.norm_squared() > MIN_OUTWARD_SQUARED)
        .fold((Vector3::zeros(), 0usize), |(sum, count), out| (sum + out, count + 1));

    if count == 0 {
        return false;
    }

    let outward = (sum / count as f64)
        .try_normalize(f64::EPSILON)
        .unwrap_or_else(Vector3::zeros);
    arena.set_outward(vertex, outward);
    for v in links {
        arena.set_outward(v, outward);
    }
    true
}
