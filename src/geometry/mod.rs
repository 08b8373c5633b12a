// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - mesh and polygon representations

mod bbox;
mod mesh;
mod polygon;

pub use bbox::BoundingBox;
pub use mesh::{Mesh, Triangle, Vertex};
pub use polygon::{
    MultiPolygon, Polygon, PolygonWithHoles, COLLINEAR_TOLERANCE_DEG, DUPLICATE_EPSILON,
};
