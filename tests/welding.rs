// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Line cache, welding and outline invariants on a multi-row corridor

mod common;

use anyhow::Result;
use common::corridor;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use roadmesh::builder::{
    LaneTopology, LineCache, OutwardVectorSolver, PolygonBuilder, Space, VertexWelder,
};
use roadmesh::map::{LineId, MapData};
use std::collections::BTreeMap;

fn prepared(map: &MapData) -> Result<(LaneTopology, LineCache)> {
    let mut cache = LineCache::new();
    let topology = LaneTopology::prepare(map, &mut cache)?;
    Ok((topology, cache))
}

fn usage_counts(cache: &LineCache) -> BTreeMap<LineId, u32> {
    cache.lines().iter().map(|line| (line.id, line.usage)).collect()
}

#[test]
fn test_usage_counts_ignore_lane_order() -> Result<()> {
    let map = corridor(3, 4);

    let mut expected: BTreeMap<LineId, u32> = BTreeMap::new();
    for lane in &map.lanes {
        *expected.entry(lane.left_boundary).or_default() += 1;
        *expected.entry(lane.right_boundary).or_default() += 1;
    }

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..5 {
        let mut lanes = map.lanes.clone();
        lanes.shuffle(&mut rng);
        let shuffled = MapData::new(lanes, map.lines.clone(), Vec::new());

        let (_, cache) = prepared(&shuffled)?;
        assert_eq!(usage_counts(&cache), expected);
    }

    // Outer curbs are used once, shared boundaries twice
    assert_eq!(expected[&LineId(0)], 1);
    assert_eq!(expected[&LineId(4)], 2);
    assert_eq!(expected[&LineId(12)], 1);
    Ok(())
}

#[test]
fn test_weld_is_idempotent() -> Result<()> {
    let map = corridor(3, 4);
    let (topology, mut cache) = prepared(&map)?;
    let welder = VertexWelder::new(0.2);

    let stats = welder.weld(&topology, &mut cache);
    assert!(stats.groups > 0);
    let once: Vec<_> = cache.arena().iter().map(|(_, v)| v.position).collect();

    welder.weld(&topology, &mut cache);
    let twice: Vec<_> = cache.arena().iter().map(|(_, v)| v.position).collect();
    assert_eq!(once, twice);
    Ok(())
}

#[test]
fn test_linked_vertices_are_bit_identical() -> Result<()> {
    let map = corridor(3, 4);
    let (topology, mut cache) = prepared(&map)?;
    VertexWelder::new(0.2).weld(&topology, &mut cache);

    let arena = cache.arena();
    let mut linked = 0;
    for (id, vertex) in arena.iter() {
        for &other in vertex.links() {
            assert_ne!(other, id);
            assert_eq!(arena.position(other), vertex.position);
            linked += 1;
        }
    }

    // Every interior segment junction on every boundary row is welded
    assert_eq!(linked, 4 * 3 * 2);
    Ok(())
}

#[test]
fn test_zero_push_outline_is_the_boundaries() -> Result<()> {
    let map = corridor(2, 3);
    let (topology, cache) = prepared(&map)?;
    let builder = PolygonBuilder::new(0.0);

    for lane in topology.iter() {
        let orientation = lane.orientation(&cache);
        let mut expected = cache.positions(lane.right_line(&cache));
        if orientation.right_reversed {
            expected.reverse();
        }
        let mut left = cache.positions(lane.left_line(&cache));
        if !orientation.left_reversed {
            left.reverse();
        }
        expected.extend(left);

        let polygon = builder.build(lane, &cache, Space::World);
        assert_eq!(polygon.points, expected, "outline of {}", lane.name);
    }
    Ok(())
}

#[test]
fn test_pushed_outlines_stay_simple() -> Result<()> {
    let map = corridor(3, 5);
    let (topology, mut cache) = prepared(&map)?;
    VertexWelder::new(0.2).weld(&topology, &mut cache);
    let solved = OutwardVectorSolver::new().compute(&topology, &mut cache);

    // Only the two outer curb rows are road edges
    assert_eq!(solved, 2 * 5);

    let builder = PolygonBuilder::new(0.1);
    for lane in topology.iter() {
        let polygon = builder.build(lane, &cache, Space::World);
        assert_eq!(polygon.len(), 6);
        assert!(
            polygon.find_self_intersection().is_none(),
            "{} folded over itself",
            lane.name
        );
        assert!(polygon.signed_area_xz().abs() > 25.0);
    }
    Ok(())
}
