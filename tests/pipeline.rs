// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end map mesh builds

mod common;

use anyhow::Result;
use approx::assert_relative_eq;
use common::*;
use roadmesh::builder::{ProgressObserver, Stage};
use roadmesh::map::{LaneId, LineId, LineType, MapData, MapIntersection, RawLineType, Transform};
use roadmesh::{BuiltMesh, MapMeshBuilder, MeshError, MeshKind, MeshSettings, MeshStyle};

fn build(map: &MapData, settings: MeshSettings) -> Result<(Vec<BuiltMesh>, roadmesh::BuildReport)> {
    Ok(MapMeshBuilder::new(settings)?.build_all(map)?)
}

fn find<'a>(meshes: &'a [BuiltMesh], name: &str) -> &'a BuiltMesh {
    meshes
        .iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("no mesh named {}", name))
}

#[test]
fn test_straight_lane_is_a_quad() -> Result<()> {
    let map = straight_lane(10.0, 3.0, LineType::SolidWhite);
    let (meshes, report) = build(&map, exact_settings())?;

    assert_eq!(report.lanes, 1);
    assert_eq!(report.lines, 2);
    assert!(report.is_clean());

    let lane = find(&meshes, "lane_0_mesh");
    assert_eq!(lane.kind, MeshKind::Lane);
    assert_eq!(lane.style, MeshStyle::Road);
    assert_eq!(lane.mesh.vertex_count(), 4);
    assert_eq!(lane.mesh.triangle_count(), 2);

    let size = lane.mesh.bounding_box().size();
    assert_relative_eq!(size.x, 10.0, epsilon = 1e-9);
    assert_relative_eq!(size.z, 3.0, epsilon = 1e-9);
    assert_relative_eq!(lane.mesh.area(), 30.0, epsilon = 1e-9);

    for triangle in &lane.mesh.triangles {
        assert!(lane.mesh.face_normal(triangle).y > 0.0);
    }
    for vertex in &lane.mesh.vertices {
        assert_relative_eq!(vertex.uv.x, vertex.position.x / 4.0, epsilon = 1e-12);
        assert_relative_eq!(vertex.uv.y, vertex.position.z / 4.0, epsilon = 1e-12);
        assert_relative_eq!(vertex.normal.y, 1.0, epsilon = 1e-9);
    }
    Ok(())
}

#[test]
fn test_lane_mesh_is_local_to_the_lane() -> Result<()> {
    let mut map = straight_lane(10.0, 3.0, LineType::Curb);
    map.lanes[0].transform = Transform::from_translation(5.0, 0.0, 0.0);
    map.lanes[0].points = vec![[-5.0, 0.0, 0.0], [5.0, 0.0, 0.0]];

    let (meshes, _) = build(&map, exact_settings())?;
    let lane = find(&meshes, "lane_0_mesh");
    let bounds = lane.mesh.bounding_box();

    assert_eq!(lane.transform.position, [5.0, 0.0, 0.0]);
    assert_relative_eq!(bounds.min.x, -5.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.x, 5.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_push_widens_road_edges() -> Result<()> {
    let map = straight_lane(10.0, 3.0, LineType::Curb);
    let settings = MeshSettings {
        snap_lane_ends: false,
        push_distance: 0.25,
        ..Default::default()
    };
    let (meshes, report) = build(&map, settings)?;
    assert_eq!(report.outward_lines, 2);

    let size = find(&meshes, "lane_0_mesh").mesh.bounding_box().size();
    assert_relative_eq!(size.x, 10.0, epsilon = 1e-9);
    assert_relative_eq!(size.z, 3.5, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_connected_lanes_share_welded_edge() -> Result<()> {
    let settings = MeshSettings {
        push_outer_verts: false,
        ..Default::default()
    };
    let (meshes, report) = build(&lane_chain(0.1), settings.clone())?;
    // Both junction corners, seen once from each lane
    assert_eq!(report.welded_groups, 4);

    let first = find(&meshes, "lane_0_mesh").mesh.bounding_box();
    let second = find(&meshes, "lane_1_mesh").mesh.bounding_box();
    assert_relative_eq!(first.max.x, 10.05, epsilon = 1e-9);
    assert_relative_eq!(second.min.x, 10.05, epsilon = 1e-9);

    // Past the threshold nothing moves
    let (meshes, report) = build(&lane_chain(0.3), settings)?;
    assert_eq!(report.welded_groups, 0);
    assert_relative_eq!(find(&meshes, "lane_0_mesh").mesh.bounding_box().max.x, 10.0);
    assert_relative_eq!(find(&meshes, "lane_1_mesh").mesh.bounding_box().min.x, 10.3);
    Ok(())
}

#[test]
fn test_intersection_union_of_crossing_lanes() -> Result<()> {
    let (meshes, report) = build(&crossing(), exact_settings())?;

    // Intersection lanes are merged, never meshed on their own
    assert_eq!(report.lanes, 0);
    assert_eq!(report.intersections, 1);
    assert!(report.is_clean());

    let surface = find(&meshes, "crossing_mesh");
    assert_eq!(surface.kind, MeshKind::Intersection);
    assert_relative_eq!(surface.mesh.area(), 111.0, epsilon = 1e-6);
    for triangle in &surface.mesh.triangles {
        assert!(surface.mesh.face_normal(triangle).y > 0.0);
    }

    // The stop line belongs to the intersection and is painted
    let stop = find(&meshes, "line_104_mesh");
    assert_eq!(stop.kind, MeshKind::Line);
    assert!(stop.renderer);
    assert!(!stop.collider);
    assert_eq!(report.lines, 1);
    Ok(())
}

#[test]
fn test_intersection_ring_keeps_its_hole() -> Result<()> {
    let ring = [
        (200, [[-10.0, 0.0, -10.0], [10.0, 0.0, -10.0]], [0.0, 0.0, 1.5]),
        (201, [[10.0, 0.0, -10.0], [10.0, 0.0, 10.0]], [-1.5, 0.0, 0.0]),
        (202, [[10.0, 0.0, 10.0], [-10.0, 0.0, 10.0]], [0.0, 0.0, -1.5]),
        (203, [[-10.0, 0.0, 10.0], [-10.0, 0.0, -10.0]], [1.5, 0.0, 0.0]),
    ];

    let mut lanes = Vec::new();
    let mut lines = Vec::new();
    for (id, [a, b], left) in ring {
        let offset = |p: [f64; 3], sign: f64| [p[0] + left[0] * sign, 0.0, p[2] + left[2] * sign];
        let (left_id, right_id) = (id * 10, id * 10 + 1);
        lines.push(line(left_id, vec![offset(a, 1.0), offset(b, 1.0)], LineType::Virtual));
        lines.push(line(right_id, vec![offset(a, -1.0), offset(b, -1.0)], LineType::Virtual));
        lanes.push(lane(id, vec![a, b], left_id, right_id));
    }
    let map = MapData::new(
        lanes,
        lines,
        vec![MapIntersection {
            id: roadmesh::map::IntersectionId(7),
            name: "roundabout".into(),
            transform: Transform::identity(),
            lanes: (200..204).map(LaneId).collect(),
            lines: Vec::new(),
        }],
    );

    let (meshes, report) = build(&map, exact_settings())?;
    assert!(report.is_clean());
    assert_eq!(meshes.len(), 1);

    // Four 20x3 strips minus the four overlapping corners
    let surface = &meshes[0].mesh;
    assert_relative_eq!(surface.area(), 231.0, epsilon = 1e-6);
    let bounds = surface.bounding_box();
    assert_relative_eq!(bounds.min.x, -11.5, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.z, 11.5, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_intersection_mesh_is_local_to_the_intersection() -> Result<()> {
    let mut map = crossing();
    map.intersections[0].transform = Transform::from_translation(0.0, 0.0, 20.0);

    let (meshes, _) = build(&map, exact_settings())?;
    let bounds = find(&meshes, "crossing_mesh").mesh.bounding_box();
    assert_relative_eq!(bounds.min.z, -30.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.max.z, -10.0, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_line_ribbons() -> Result<()> {
    let settings = exact_settings();
    let (meshes, _) = build(&straight_lane(10.0, 3.0, LineType::DoubleYellow), settings.clone())?;

    let double = find(&meshes, "line_1_mesh");
    let bounds = double.mesh.bounding_box();
    assert_relative_eq!(bounds.size().z, settings.line_width * 3.0, epsilon = 1e-9);
    assert_relative_eq!(bounds.min.y, settings.line_bump, epsilon = 1e-12);
    assert_relative_eq!(bounds.center().z, 1.5, epsilon = 1e-9);
    assert_eq!(double.mesh.triangle_count(), 2);

    let (meshes, _) = build(&straight_lane(10.0, 3.0, LineType::DottedWhite), settings.clone())?;
    let dotted = find(&meshes, "line_2_mesh");
    assert_relative_eq!(dotted.mesh.bounding_box().size().z, settings.line_width, epsilon = 1e-9);

    // V runs along the line in line UV units
    let max_v = dotted.mesh.vertices.iter().map(|v| v.uv.y).fold(f64::MIN, f64::max);
    assert_relative_eq!(max_v, 10.0 / settings.line_uv_unit, epsilon = 1e-9);
    Ok(())
}

#[test]
fn test_unrecognized_line_type_aborts() {
    let mut map = straight_lane(10.0, 3.0, LineType::SolidWhite);
    map.lines[1].line_type = RawLineType::Code(42);

    let err = MapMeshBuilder::new(MeshSettings::default())
        .unwrap()
        .build_all(&map)
        .unwrap_err();
    assert!(matches!(err, MeshError::UnrecognizedLineType { .. }));
}

#[test]
fn test_missing_boundary_aborts() {
    let mut map = straight_lane(10.0, 3.0, LineType::SolidWhite);
    map.lanes[0].right_boundary = LineId(99);
    let map = MapData::new(map.lanes, map.lines, map.intersections);

    let err = MapMeshBuilder::new(MeshSettings::default())
        .unwrap()
        .build_all(&map)
        .unwrap_err();
    match err {
        MeshError::MissingLine { owner, line } => {
            assert_eq!(owner, "lane_0");
            assert_eq!(line, LineId(99));
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_twisted_lane_is_skipped_and_reported() -> Result<()> {
    let mut map = straight_lane(10.0, 3.0, LineType::SolidWhite);
    map.lines.push(line(11, vec![[0.0, 0.0, 21.5], [10.0, 0.0, 18.5]], LineType::SolidWhite));
    map.lines.push(line(12, vec![[0.0, 0.0, 18.5], [10.0, 0.0, 21.5]], LineType::SolidWhite));
    map.lanes.push(lane(1, vec![[0.0, 0.0, 20.0], [10.0, 0.0, 20.0]], 11, 12));
    let map = MapData::new(map.lanes, map.lines, map.intersections);

    let (meshes, report) = build(&map, exact_settings())?;
    assert_eq!(report.lanes, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].entity, "lane_1");
    assert_eq!(report.failures[0].kind, MeshKind::Lane);
    assert!(report.failures[0].error.contains("self-intersecting"));

    // Its boundary lines are still painted
    assert!(meshes.iter().any(|m| m.name == "line_11_mesh"));
    assert!(!meshes.iter().any(|m| m.name == "lane_1_mesh"));
    Ok(())
}

#[derive(Default)]
struct StopAfterLanes {
    limit: usize,
    seen: usize,
    stages: Vec<(Stage, usize)>,
    finished: usize,
}

impl ProgressObserver for StopAfterLanes {
    fn begin(&mut self, stage: Stage, total: usize) {
        self.stages.push((stage, total));
    }

    fn progress(&mut self, stage: Stage, _current: usize, _total: usize) {
        if stage == Stage::Lanes {
            self.seen += 1;
        }
    }

    fn is_cancelled(&self) -> bool {
        self.seen >= self.limit
    }

    fn finish(&mut self) {
        self.finished += 1;
    }
}

#[test]
fn test_cancellation_keeps_delivered_meshes() {
    let map = corridor(1, 3);
    let mut observer = StopAfterLanes {
        limit: 2,
        ..Default::default()
    };
    let mut meshes: Vec<BuiltMesh> = Vec::new();

    let result = MapMeshBuilder::new(MeshSettings::default())
        .unwrap()
        .build(&map, &mut meshes, &mut observer);

    assert!(matches!(result, Err(MeshError::Cancelled)));
    assert_eq!(meshes.len(), 2);
    assert_eq!(observer.finished, 1);
    // Single-pass stages report no step count
    assert_eq!(
        observer.stages,
        vec![
            (Stage::Preprocess, 0),
            (Stage::Weld, 0),
            (Stage::Outward, 0),
            (Stage::Lanes, 3),
        ]
    );
}

#[test]
fn test_closure_sink_receives_every_mesh() -> Result<()> {
    let map = corridor(2, 3);
    let mut names = Vec::new();
    let mut sink = |built: BuiltMesh| names.push(built.name);

    let report = MapMeshBuilder::new(MeshSettings::default())?.build(
        &map,
        &mut sink,
        &mut roadmesh::builder::NoProgress,
    )?;

    assert_eq!(report.lanes, 6);
    // Three boundary rows, three segments each; curbs and dotted lines are painted
    assert_eq!(report.lines, 9);
    assert_eq!(names.len(), report.meshes());
    assert!(report.is_clean());
    println!("corridor: {} vertices, {} triangles", report.vertices, report.triangles);
    Ok(())
}
