// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Shared map fixtures for integration tests

#![allow(dead_code)]

use roadmesh::map::{
    IntersectionId, LaneId, LineId, LineType, MapData, MapIntersection, MapLane, MapLine, Transform,
};
use roadmesh::MeshSettings;

pub fn line(id: u32, points: Vec<[f64; 3]>, line_type: LineType) -> MapLine {
    MapLine {
        id: LineId(id),
        name: format!("line_{}", id),
        transform: Transform::identity(),
        points,
        line_type: line_type.into(),
    }
}

pub fn lane(id: u32, points: Vec<[f64; 3]>, left: u32, right: u32) -> MapLane {
    MapLane {
        id: LaneId(id),
        name: format!("lane_{}", id),
        transform: Transform::identity(),
        points,
        left_boundary: LineId(left),
        right_boundary: LineId(right),
        predecessors: Vec::new(),
        successors: Vec::new(),
    }
}

/// Settings with welding and pushing off, so outlines match the input exactly
pub fn exact_settings() -> MeshSettings {
    MeshSettings {
        snap_lane_ends: false,
        push_outer_verts: false,
        ..Default::default()
    }
}

/// One lane along +X from the origin, `width` wide
pub fn straight_lane(length: f64, width: f64, line_type: LineType) -> MapData {
    let half = width * 0.5;
    MapData::new(
        vec![lane(0, vec![[0.0, 0.0, 0.0], [length, 0.0, 0.0]], 1, 2)],
        vec![
            line(1, vec![[0.0, 0.0, half], [length, 0.0, half]], line_type),
            line(2, vec![[0.0, 0.0, -half], [length, 0.0, -half]], line_type),
        ],
        Vec::new(),
    )
}

/// Two consecutive 10 m lanes; the second starts `gap` after the first ends
pub fn lane_chain(gap: f64) -> MapData {
    let start = 10.0 + gap;
    let mut first = lane(0, vec![[0.0, 0.0, 0.0], [10.0, 0.0, 0.0]], 1, 2);
    let mut second = lane(1, vec![[start, 0.0, 0.0], [20.0, 0.0, 0.0]], 3, 4);
    first.successors = vec![LaneId(1)];
    second.predecessors = vec![LaneId(0)];

    MapData::new(
        vec![first, second],
        vec![
            line(1, vec![[0.0, 0.0, 1.5], [10.0, 0.0, 1.5]], LineType::SolidWhite),
            line(2, vec![[0.0, 0.0, -1.5], [10.0, 0.0, -1.5]], LineType::Curb),
            line(3, vec![[start, 0.0, 1.5], [20.0, 0.0, 1.5]], LineType::SolidWhite),
            line(4, vec![[start, 0.0, -1.5], [20.0, 0.0, -1.5]], LineType::Curb),
        ],
        Vec::new(),
    )
}

/// Two 20 m lanes crossing at the origin inside one intersection, plus a
/// stop line owned by the intersection
pub fn crossing() -> MapData {
    MapData::new(
        vec![
            lane(100, vec![[-10.0, 0.0, 0.0], [10.0, 0.0, 0.0]], 100, 101),
            lane(101, vec![[0.0, 0.0, -10.0], [0.0, 0.0, 10.0]], 102, 103),
        ],
        vec![
            line(100, vec![[-10.0, 0.0, 1.5], [10.0, 0.0, 1.5]], LineType::Virtual),
            line(101, vec![[-10.0, 0.0, -1.5], [10.0, 0.0, -1.5]], LineType::Virtual),
            line(102, vec![[-1.5, 0.0, -10.0], [-1.5, 0.0, 10.0]], LineType::Virtual),
            line(103, vec![[1.5, 0.0, -10.0], [1.5, 0.0, 10.0]], LineType::Virtual),
            line(104, vec![[-1.5, 0.0, -10.0], [1.5, 0.0, -10.0]], LineType::Stop),
        ],
        vec![MapIntersection {
            id: IntersectionId(0),
            name: "crossing".into(),
            transform: Transform::identity(),
            lanes: vec![LaneId(100), LaneId(101)],
            lines: vec![LineId(104)],
        }],
    )
}

/// `rows` parallel lanes, each split into `segments` consecutive 10 m pieces
///
/// Neighboring rows share their boundary line. Segment starts sit 5 cm after
/// the previous segment's end, and every line bends gently in Z.
pub fn corridor(rows: u32, segments: u32) -> MapData {
    let bend = |x: f64| 0.3 * (x / 7.0).sin();
    let span = |s: u32| {
        let x0 = s as f64 * 10.0 + if s > 0 { 0.05 } else { 0.0 };
        let x1 = (s + 1) as f64 * 10.0;
        (x0, x1)
    };

    let mut lines = Vec::new();
    for b in 0..=rows {
        let z = b as f64 * 3.0 - 1.5;
        for s in 0..segments {
            let (x0, x1) = span(s);
            let xm = (x0 + x1) * 0.5;
            let line_type = if b == 0 || b == rows {
                LineType::Curb
            } else {
                LineType::DottedWhite
            };
            lines.push(line(
                b * segments + s,
                vec![[x0, 0.0, z + bend(x0)], [xm, 0.0, z + bend(xm)], [x1, 0.0, z + bend(x1)]],
                line_type,
            ));
        }
    }

    let mut lanes = Vec::new();
    for r in 0..rows {
        let z = r as f64 * 3.0;
        for s in 0..segments {
            let (x0, x1) = span(s);
            let id = r * segments + s;
            let mut lane = lane(
                id,
                vec![[x0, 0.0, z + bend(x0)], [x1, 0.0, z + bend(x1)]],
                (r + 1) * segments + s,
                r * segments + s,
            );
            if s > 0 {
                lane.predecessors.push(LaneId(id - 1));
            }
            if s + 1 < segments {
                lane.successors.push(LaneId(id + 1));
            }
            lanes.push(lane);
        }
    }

    MapData::new(lanes, lines, Vec::new())
}
