// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon and multi-polygon working types
//!
//! Polygons are closed implicitly: the last point connects back to the first.

use crate::utils::math::{orient_xz, segments_cross_xz};
use nalgebra::Point3;

/// Consecutive points closer than this are merged
pub const DUPLICATE_EPSILON: f64 = 1e-4;

/// Vertices turning by less than this many degrees are dropped by `optimize`
pub const COLLINEAR_TOLERANCE_DEG: f64 = 0.25;

/// A simple closed loop
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point3<f64>>,
}

impl Polygon {
    pub fn new(points: Vec<Point3<f64>>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Remove consecutive points within `epsilon`, including the closing pair
    /// Returns the number of points removed
    pub fn remove_duplicates(&mut self, epsilon: f64) -> usize {
        let original = self.points.len();
        let mut kept: Vec<Point3<f64>> = Vec::with_capacity(original);

        for point in self.points.drain(..) {
            match kept.last() {
                Some(last) if (point - last).norm() < epsilon => {}
                _ => kept.push(point),
            }
        }
        while kept.len() > 1 && (kept[kept.len() - 1] - kept[0]).norm() < epsilon {
            kept.pop();
        }

        self.points = kept;
        original - self.points.len()
    }

    /// Signed area on XZ; the sign gives the winding
    pub fn signed_area_xz(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let origin = self.points[0];
        (1..n - 1)
            .map(|i| orient_xz(&origin, &self.points[i], &self.points[i + 1]))
            .sum::<f64>()
            * 0.5
    }

    /// First pair of edges that cross each other, if any
    ///
    /// Edge `i` runs from point `i` to point `i + 1` (wrapping).
    pub fn find_self_intersection(&self) -> Option<(usize, usize)> {
        let n = self.points.len();
        if n < 4 {
            return None;
        }
        let eps = 1e-12;
        for i in 0..n {
            let (a0, a1) = (&self.points[i], &self.points[(i + 1) % n]);
            for j in (i + 1)..n {
                let (b0, b1) = (&self.points[j], &self.points[(j + 1) % n]);
                if segments_cross_xz(a0, a1, b0, b1, eps) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Drop near-collinear vertices and zero-length edges without changing the outline
    /// Returns the number of points removed
    pub fn optimize(&mut self, tolerance_deg: f64) -> usize {
        let original = self.points.len();
        let cos_tolerance = tolerance_deg.to_radians().cos();

        let mut changed = true;
        while changed && self.points.len() > 3 {
            changed = false;
            let mut i = 0;
            while i < self.points.len() && self.points.len() > 3 {
                let n = self.points.len();
                let prev = self.points[(i + n - 1) % n];
                let cur = self.points[i];
                let next = self.points[(i + 1) % n];

                let removable = match ((cur - prev).try_normalize(DUPLICATE_EPSILON), (next - cur).try_normalize(DUPLICATE_EPSILON)) {
                    (Some(incoming), Some(outgoing)) => incoming.dot(&outgoing) >= cos_tolerance,
                    _ => true,
                };

                if removable {
                    self.points.remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
        }

        original - self.points.len()
    }

    pub fn reverse(&mut self) {
        self.points.reverse();
    }
}

/// An outer contour plus hole contours
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonWithHoles {
    pub outer: Polygon,
    pub holes: Vec<Polygon>,
}

impl PolygonWithHoles {
    pub fn new(outer: Polygon, holes: Vec<Polygon>) -> Self {
        Self { outer, holes }
    }

    pub fn contours(&self) -> impl Iterator<Item = &Polygon> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    pub fn point_count(&self) -> usize {
        self.contours().map(Polygon::len).sum()
    }
}

/// One or more polygons, possibly with holes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolygon {
    pub polygons: Vec<PolygonWithHoles>,
}

impl MultiPolygon {
    pub fn new(polygons: Vec<PolygonWithHoles>) -> Self {
        Self { polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn contours(&self) -> impl Iterator<Item = &Polygon> {
        self.polygons.iter().flat_map(PolygonWithHoles::contours)
    }

    pub fn hole_count(&self) -> usize {
        self.polygons.iter().map(|p| p.holes.len()).sum()
    }

    /// Optimize every contour; returns the number of points removed
    pub fn optimize(&mut self, tolerance_deg: f64) -> usize {
        self.polygons
            .iter_mut()
            .flat_map(|p| std::iter::once(&mut p.outer).chain(p.holes.iter_mut()))
            .map(|contour| contour.optimize(tolerance_deg))
            .sum()
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self::new(vec![PolygonWithHoles::new(polygon, Vec::new())])
    }
}
