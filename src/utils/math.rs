// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Math utilities for the XZ (ground) plane

use nalgebra::{Point3, Vector3};

/// 2D cross product of two vectors projected onto XZ
pub fn cross_xz(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.x * b.z - a.z * b.x
}

/// Twice the signed area of triangle (a, b, c) on XZ
pub fn orient_xz(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> f64 {
    cross_xz(&(b - a), &(c - a))
}

/// Squared distance between two points projected onto XZ
pub fn distance_squared_xz(a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Perpendicular of `v` in the horizontal plane, rotated a quarter turn
pub fn horizontal_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.z, 0.0, -v.x)
}

/// Intersection of the infinite lines through (a0, a1) and (b0, b1) on XZ
///
/// Returns `None` when the lines are parallel. The height of the result is
/// taken from `a1`.
pub fn line_intersection_xz(
    a0: &Point3<f64>,
    a1: &Point3<f64>,
    b0: &Point3<f64>,
    b1: &Point3<f64>,
) -> Option<Point3<f64>> {
    let da = a1 - a0;
    let db = b1 - b0;
    let denom = cross_xz(&da, &db);
    let scale = da.xz().norm() * db.xz().norm();
    if scale == 0.0 || denom.abs() <= 1e-9 * scale {
        return None;
    }

    let t = cross_xz(&(b0 - a0), &db) / denom;
    Some(Point3::new(a0.x + da.x * t, a1.y, a0.z + da.z * t))
}

/// Check if two segments cross on XZ
///
/// Touching at an endpoint does not count; collinear overlap does.
pub fn segments_cross_xz(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    q0: &Point3<f64>,
    q1: &Point3<f64>,
    epsilon: f64,
) -> bool {
    let d1 = orient_xz(q0, q1, p0);
    let d2 = orient_xz(q0, q1, p1);
    let d3 = orient_xz(p0, p1, q0);
    let d4 = orient_xz(p0, p1, q1);

    // Strictly on opposite sides of each other
    if ((d1 > epsilon && d2 < -epsilon) || (d1 < -epsilon && d2 > epsilon))
        && ((d3 > epsilon && d4 < -epsilon) || (d3 < -epsilon && d4 > epsilon))
    {
        return true;
    }

    // Collinear: overlap of positive length
    if d1.abs() <= epsilon && d2.abs() <= epsilon && d3.abs() <= epsilon && d4.abs() <= epsilon {
        let dir = p1 - p0;
        let len_sq = dir.xz().norm_squared();
        if len_sq <= epsilon {
            return false;
        }
        let t0 = (q0 - p0).xz().dot(&dir.xz()) / len_sq;
        let t1 = (q1 - p0).xz().dot(&dir.xz()) / len_sq;
        let (t_min, t_max) = (t0.min(t1), t0.max(t1));
        let overlap = t_max.min(1.0) - t_min.max(0.0);
        return overlap * len_sq.sqrt() > epsilon;
    }

    false
}
