// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Road mesh builder
//!
//! Stages, in pipeline order:
//! - [`LineCache`]: world-space boundary lines, shared vertex arena, usage counts
//! - [`VertexWelder`]: snaps lane ends across connected lanes
//! - [`OutwardVectorSolver`]: push directions along road edges
//! - [`PolygonBuilder`]: one closed outline per lane
//! - [`PolygonMerger`]: union of an intersection's outlines
//! - [`Triangulator`]: outlines to upward-facing triangles
//! - [`RibbonMeshBuilder`]: painted line strips
//!
//! [`MapMeshBuilder`] runs all of them over a [`MapSource`](crate::map::MapSource).

mod lane_polygon;
mod lanes;
mod line_cache;
mod merge;
mod outward;
mod output;
mod pipeline;
mod progress;
mod ribbon;
mod triangulate;
mod welder;

pub use lane_polygon::{PolygonBuilder, Space};
pub use lanes::{LaneTopology, Orientation, PreparedLane, Side};
pub use line_cache::{
    BoundaryLine, BoundaryVertex, LineCache, LineColor, LineShape, LineSlot, LineStyle, VertexArena,
    VertexId,
};
pub use merge::PolygonMerger;
pub use outward::OutwardVectorSolver;
pub use output::{BuildReport, BuiltMesh, EntityFailure, MeshKind, MeshSink, MeshStyle};
pub use pipeline::MapMeshBuilder;
pub use progress::{NoProgress, ProgressObserver, Stage};
pub use ribbon::RibbonMeshBuilder;
pub use triangulate::Triangulator;
pub use welder::{VertexWelder, WeldStats};
