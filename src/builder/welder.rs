// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Lane end welding
//!
//! Lanes are processed in topology order and later lanes see the welds of
//! earlier ones, so the result depends on lane order.

use super::lanes::LaneTopology;
use super::line_cache::{LineCache, VertexId};
use nalgebra::{Point3, Vector3};
use tracing::debug;

/// Statistics from one welding pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeldStats {
    /// Number of link groups that were averaged
    pub groups: usize,
    /// Total vertices written across all groups
    pub vertices: usize,
}

/// Snaps boundary endpoints of connected lanes together
#[derive(Debug, Clone, Copy)]
pub struct VertexWelder {
    threshold: f64,
}

impl VertexWelder {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Welds every connected lane end within the threshold.
    ///
    /// A second pass changes nothing as long as every lane is longer than
    /// the threshold. A shorter lane can match both of its own ends, and
    /// repeated passes keep pulling those ends together.
    pub fn weld(&self, topology: &LaneTopology, cache: &mut LineCache) -> WeldStats {
        let mut stats = WeldStats::default();

        for index in 0..topology.len() {
            let endpoints: Vec<_> = topology.get(index).endpoints(cache).collect();
            let relevant = topology.relevant(index);

            for (vertex, side) in endpoints {
                let origin = cache.arena().position(vertex);
                let mut matched = vec![vertex];

                for &candidate in &relevant {
                    let mut best: Option<(VertexId, f64)> = None;
                    for (other, other_side) in topology.get(candidate).endpoints(cache) {
                        if other_side != side {
                            continue;
                        }
                        let distance = (cache.arena().position(other) - origin).norm();
                        if distance < self.threshold && best.map_or(true, |(_, d)| distance < d) {
                            best = Some((other, distance));
                        }
                    }
                    if let Some((other, _)) = best {
                        if !matched.contains(&other) {
                            matched.push(other);
                        }
                    }
                }

                let mut group = matched.clone();
                for &m in &matched {
                    for &linked in cache.arena().links(m) {
                        if !group.contains(&linked) {
                            group.push(linked);
                        }
                    }
                }

                if group.len() > 1 {
                    merge_group(cache, &group);
                    stats.groups += 1;
                    stats.vertices += group.len();
                }
            }
        }

        debug!(
            groups = stats.groups,
            vertices = stats.vertices,
            threshold = self.threshold,
            "Welded lane ends"
        );
        stats
    }
}

/// Move every vertex of `group` to the group average and link them pairwise
fn merge_group(cache: &mut LineCache, group: &[VertexId]) {
    let arena = cache.arena_mut();
    let first = arena.position(group[0]);

    // Coincident groups keep their exact position so repeated passes are stable
    if group.iter().any(|&v| arena.position(v) != first) {
        let sum = group
            .iter()
            .fold(Vector3::zeros(), |acc, &v| acc + arena.position(v).coords);
        let average = Point3::from(sum / group.len() as f64);
        for &v in group {
            arena.set_position(v, average);
        }
    }
    arena.link_all(group);
}
