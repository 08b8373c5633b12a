// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Roadmesh
//!
//! Builds drivable road surfaces, intersection surfaces and painted lane
//! markings from an HD map graph of lanes and boundary lines.
//! Y is up; all planar work happens on the XZ plane.

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod map;
pub mod utils;

pub use builder::{
    BuildReport, BuiltMesh, MapMeshBuilder, MeshKind, MeshSink, MeshStyle, ProgressObserver, Stage,
};
pub use config::MeshSettings;
pub use error::MeshError;
pub use geometry::Mesh;
pub use io::{export_gltf, write_report};
pub use map::{MapData, MapSource};

/// Build every mesh of `source` with `settings`
pub fn build_map_meshes<S: MapSource + ?Sized>(
    source: &S,
    settings: MeshSettings,
) -> error::Result<(Vec<BuiltMesh>, BuildReport)> {
    MapMeshBuilder::new(settings)?.build_all(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_map_builds_nothing() {
        let (meshes, report) = build_map_meshes(&MapData::default(), MeshSettings::default()).unwrap();
        assert!(meshes.is_empty());
        assert!(report.is_clean());
    }
}
