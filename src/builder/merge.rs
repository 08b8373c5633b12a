// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Union of an intersection's lane polygons

use crate::geometry::{MultiPolygon, Polygon, PolygonWithHoles, COLLINEAR_TOLERANCE_DEG};
use crate::utils::math::distance_squared_xz;
use geo::{BooleanOps, Coord, LineString};
use nalgebra::Point3;
use tracing::trace;

type GeoPolygon = geo::Polygon<f64>;
type GeoMultiPolygon = geo::MultiPolygon<f64>;

/// Unions lane polygons on the XZ plane
#[derive(Debug, Clone, Copy)]
pub struct PolygonMerger {
    tolerance_deg: f64,
}

impl Default for PolygonMerger {
    fn default() -> Self {
        Self::new(COLLINEAR_TOLERANCE_DEG)
    }
}

impl PolygonMerger {
    pub fn new(tolerance_deg: f64) -> Self {
        Self { tolerance_deg }
    }

    pub fn merge(&self, polygons: &[Polygon]) -> MultiPolygon {
        let sources: Vec<&Polygon> = polygons.iter().filter(|p| p.len() >= 3).collect();

        let union = sources
            .iter()
            .map(|p| GeoMultiPolygon::new(vec![to_geo(p)]))
            .reduce(|acc, next| acc.union(&next));

        let Some(union) = union else {
            return MultiPolygon::default();
        };

        let mut merged = MultiPolygon::new(
            union
                .0
                .iter()
                .map(|polygon| {
                    PolygonWithHoles::new(
                        from_ring(polygon.exterior(), &sources),
                        polygon.interiors().iter().map(|ring| from_ring(ring, &sources)).collect(),
                    )
                })
                .filter(|polygon| polygon.outer.len() >= 3)
                .collect(),
        );

        let removed = merged.optimize(self.tolerance_deg);
        trace!(
            inputs = sources.len(),
            polygons = merged.polygons.len(),
            holes = merged.hole_count(),
            removed,
            "Merged polygons"
        );
        merged
    }
}

fn to_geo(polygon: &Polygon) -> GeoPolygon {
    let ring: Vec<Coord<f64>> = polygon.points.iter().map(|p| Coord { x: p.x, y: p.z }).collect();
    GeoPolygon::new(LineString::from(ring), Vec::new())
}

/// Convert a closed geo ring back to a polygon, taking each height from the
/// nearest source vertex
fn from_ring(ring: &LineString<f64>, sources: &[&Polygon]) -> Polygon {
    let mut coords = ring.0.as_slice();
    if coords.len() > 1 && coords.first() == coords.last() {
        coords = &coords[..coords.len() - 1];
    }

    Polygon::new(
        coords
            .iter()
            .map(|c| {
                let flat = Point3::new(c.x, 0.0, c.y);
                Point3::new(c.x, nearest_height(&flat, sources), c.y)
            })
            .collect(),
    )
}

fn nearest_height(point: &Point3<f64>, sources: &[&Polygon]) -> f64 {
    sources
        .iter()
        .flat_map(|polygon| polygon.points.iter())
        .map(|source| (distance_squared_xz(point, source), source.y))
        .fold((f64::INFINITY, 0.0), |best, candidate| {
            if candidate.0 < best.0 {
                candidate
            } else {
                best
            }
        })
        .1
}
