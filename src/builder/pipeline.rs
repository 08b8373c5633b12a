// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Full map mesh build
//!
//! Preprocessing, welding and the outward pass run sequentially against one
//! [`LineCache`]. Mesh construction afterwards only reads the cache.

use super::lane_polygon::{PolygonBuilder, Space};
use super::lanes::{LaneTopology, PreparedLane};
use super::line_cache::{BoundaryLine, LineCache, LineShape};
use super::merge::PolygonMerger;
use super::outward::OutwardVectorSolver;
use super::output::{BuildReport, BuiltMesh, EntityFailure, MeshKind, MeshSink, MeshStyle};
use super::progress::{NoProgress, ProgressObserver, ProgressScope, Stage};
use super::ribbon::RibbonMeshBuilder;
use super::triangulate::Triangulator;
use super::welder::VertexWelder;
use crate::config::MeshSettings;
use crate::error::Result;
use crate::geometry::{Mesh, MultiPolygon, COLLINEAR_TOLERANCE_DEG};
use crate::map::{MapIntersection, MapSource, Transform};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Double lines are drawn as one strip this many times wider
const DOUBLE_LINE_WIDTH_FACTOR: f64 = 3.0;

/// Identity of a mesh about to be delivered
struct Target<'a> {
    source: &'a str,
    kind: MeshKind,
    style: MeshStyle,
    transform: Transform,
}

/// Builds lane, intersection and line meshes for a whole map
#[derive(Debug, Clone)]
pub struct MapMeshBuilder {
    settings: MeshSettings,
}

impl MapMeshBuilder {
    pub fn new(settings: MeshSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Build everything and collect the meshes
    pub fn build_all<S: MapSource + ?Sized>(&self, source: &S) -> Result<(Vec<BuiltMesh>, BuildReport)> {
        let mut meshes = Vec::new();
        let report = self.build(source, &mut meshes, &mut NoProgress)?;
        Ok((meshes, report))
    }

    /// Build every mesh of `source` into `sink`
    ///
    /// Geometric failures skip the entity and are listed in the report. Data
    /// errors and cancellation abort the build; meshes already delivered stay
    /// with the sink.
    pub fn build<S, K>(&self, source: &S, sink: &mut K, observer: &mut dyn ProgressObserver) -> Result<BuildReport>
    where
        S: MapSource + ?Sized,
        K: MeshSink,
    {
        let started = Instant::now();
        let mut scope = ProgressScope::new(observer);
        let mut report = BuildReport::default();

        scope.begin(Stage::Preprocess, 0)?;
        let mut cache = LineCache::new();
        let topology = LaneTopology::prepare(source, &mut cache)?;
        report.cached_lines = cache.len();
        info!(
            lanes = topology.len(),
            lines = cache.len(),
            "Preprocessed map"
        );

        if self.settings.snap_lane_ends {
            scope.begin(Stage::Weld, 0)?;
            let stats = VertexWelder::new(self.settings.snap_threshold).weld(&topology, &mut cache);
            report.welded_groups = stats.groups;
        }

        if self.settings.push_outer_verts {
            scope.begin(Stage::Outward, 0)?;
            report.outward_lines = OutwardVectorSolver::new().compute(&topology, &mut cache);
        }

        self.build_lanes(&topology, &cache, &mut scope, sink, &mut report)?;
        self.build_intersections(source, &topology, &cache, &mut scope, sink, &mut report)?;
        if self.settings.create_renderers {
            self.build_lines(&cache, &mut scope, sink, &mut report)?;
        }

        report.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            meshes = report.meshes(),
            vertices = report.vertices,
            triangles = report.triangles,
            skipped = report.failures.len(),
            duration_ms = report.duration_ms,
            "Map mesh build finished"
        );
        Ok(report)
    }

    fn build_lanes<K: MeshSink>(
        &self,
        topology: &LaneTopology,
        cache: &LineCache,
        scope: &mut ProgressScope<'_>,
        sink: &mut K,
        report: &mut BuildReport,
    ) -> Result<()> {
        let lanes = topology.traffic();
        scope.begin(Stage::Lanes, lanes.len())?;
        info!(count = lanes.len(), parallel = self.settings.parallel, "Creating lanes");

        if self.settings.parallel {
            let built: Vec<Result<Mesh>> = lanes.par_iter().map(|lane| self.lane_mesh(lane, cache)).collect();
            for (i, (lane, result)) in lanes.iter().zip(built).enumerate() {
                scope.step(Stage::Lanes, i, lanes.len())?;
                self.emit(lane_target(lane), result, sink, report)?;
            }
        } else {
            for (i, lane) in lanes.iter().enumerate() {
                scope.step(Stage::Lanes, i, lanes.len())?;
                self.emit(lane_target(lane), self.lane_mesh(lane, cache), sink, report)?;
            }
        }
        Ok(())
    }

    fn build_intersections<S, K>(
        &self,
        source: &S,
        topology: &LaneTopology,
        cache: &LineCache,
        scope: &mut ProgressScope<'_>,
        sink: &mut K,
        report: &mut BuildReport,
    ) -> Result<()>
    where
        S: MapSource + ?Sized,
        K: MeshSink,
    {
        let intersections = source.intersections();
        scope.begin(Stage::Intersections, intersections.len())?;
        info!(count = intersections.len(), "Creating intersections");

        for (i, intersection) in intersections.iter().enumerate() {
            scope.step(Stage::Intersections, i, intersections.len())?;
            let target = Target {
                source: &intersection.name,
                kind: MeshKind::Intersection,
                style: MeshStyle::Road,
                transform: intersection.transform,
            };
            let result = self.intersection_mesh(intersection, topology, cache);
            self.emit(target, result, sink, report)?;
        }
        Ok(())
    }

    fn build_lines<K: MeshSink>(
        &self,
        cache: &LineCache,
        scope: &mut ProgressScope<'_>,
        sink: &mut K,
        report: &mut BuildReport,
    ) -> Result<()> {
        let lines = cache.lines();
        scope.begin(Stage::Lines, lines.len())?;
        info!(count = lines.len(), "Creating lane lines");

        for (i, line) in lines.iter().enumerate() {
            scope.step(Stage::Lines, i, lines.len())?;
            if !line.style.is_painted() {
                continue;
            }
            let target = Target {
                source: &line.name,
                kind: MeshKind::Line,
                style: MeshStyle::Line(line.style),
                transform: line.transform,
            };
            self.emit(target, self.line_mesh(line, cache), sink, report)?;
        }
        Ok(())
    }

    /// Lane outline triangulated in world space, re-based onto the lane
    pub fn lane_mesh(&self, lane: &PreparedLane, cache: &LineCache) -> Result<Mesh> {
        let polygon = self.polygon_builder().build(lane, cache, Space::World);
        let mut shape = MultiPolygon::from(polygon);
        shape.optimize(COLLINEAR_TOLERANCE_DEG);

        let mut mesh = Triangulator::new().triangulate(&shape, &lane.name)?;
        self.finish_road(&mut mesh, &lane.transform);
        Ok(mesh)
    }

    /// Union of the intersection's lane outlines, re-based onto the intersection
    pub fn intersection_mesh(
        &self,
        intersection: &MapIntersection,
        topology: &LaneTopology,
        cache: &LineCache,
    ) -> Result<Mesh> {
        let builder = self.polygon_builder();
        let polygons: Vec<_> = topology
            .owned_by(intersection.id)
            .map(|lane| builder.build(lane, cache, Space::World))
            .collect();

        let merged = PolygonMerger::new(COLLINEAR_TOLERANCE_DEG).merge(&polygons);
        debug!(
            intersection = %intersection.name,
            lanes = polygons.len(),
            polygons = merged.polygons.len(),
            holes = merged.hole_count(),
            "Merged intersection"
        );

        let mut mesh = Triangulator::new().triangulate(&merged, &intersection.name)?;
        self.finish_road(&mut mesh, &intersection.transform);
        Ok(mesh)
    }

    /// Ribbon along the line's welded positions
    pub fn line_mesh(&self, line: &BoundaryLine, cache: &LineCache) -> Result<Mesh> {
        let width = match line.style.shape {
            LineShape::Double => self.settings.line_width * DOUBLE_LINE_WIDTH_FACTOR,
            _ => self.settings.line_width,
        };
        RibbonMeshBuilder::new(self.settings.line_uv_unit, self.settings.line_bump).build(
            &cache.positions(line),
            width,
            &line.transform,
            &line.name,
        )
    }

    fn polygon_builder(&self) -> PolygonBuilder {
        PolygonBuilder::new(self.settings.effective_push_distance())
    }

    fn finish_road(&self, mesh: &mut Mesh, frame: &Transform) {
        mesh.apply_planar_uv(self.settings.road_uv_unit);
        mesh.to_local_space(frame);
        mesh.finalize();
    }

    fn emit<K: MeshSink>(
        &self,
        target: Target<'_>,
        result: Result<Mesh>,
        sink: &mut K,
        report: &mut BuildReport,
    ) -> Result<()> {
        match result {
            Ok(mesh) => {
                let (renderer, collider) = match target.kind {
                    MeshKind::Line => (true, false),
                    _ => (self.settings.create_renderers, self.settings.create_collider),
                };
                let built = BuiltMesh {
                    name: BuiltMesh::mesh_name(target.source),
                    kind: target.kind,
                    style: target.style,
                    transform: target.transform,
                    mesh,
                    renderer,
                    collider,
                };
                report.record(&built);
                sink.accept(built);
                Ok(())
            }
            Err(err) if !err.is_fatal() => {
                warn!(entity = target.source, kind = %target.kind, error = %err, "Skipping entity");
                report.failures.push(EntityFailure::new(target.source, target.kind, &err));
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

fn lane_target(lane: &PreparedLane) -> Target<'_> {
    Target {
        source: &lane.name,
        kind: MeshKind::Lane,
        style: MeshStyle::Road,
        transform: lane.transform,
    }
}
