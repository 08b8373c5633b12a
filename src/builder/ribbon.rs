// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Painted line strips as mitered ribbon meshes

use crate::error::{MeshError, Result};
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::map::Transform;
use crate::utils::math::line_intersection_xz;
use nalgebra::{Point3, Vector2, Vector3};

/// Builds ribbons two vertices wide along a polyline
#[derive(Debug, Clone, Copy)]
pub struct RibbonMeshBuilder {
    uv_unit: f64,
    bump: f64,
}

impl RibbonMeshBuilder {
    /// `uv_unit` is the length covered by one V unit, `bump` the height added
    /// above the source line
    pub fn new(uv_unit: f64, bump: f64) -> Self {
        Self { uv_unit, bump }
    }

    /// Build a ribbon from world-space `points`, returned in `frame`'s local space
    pub fn build(&self, points: &[Point3<f64>], width: f64, frame: &Transform, line: &str) -> Result<Mesh> {
        if points.len() < 2 {
            return Err(MeshError::DegenerateLine {
                line: line.to_string(),
                points: points.len(),
            });
        }

        let half = width * 0.5;
        let n = points.len();
        let mut mesh = Mesh::with_capacity(n * 2, (n - 1) * 2);

        let first = left_offset(&points[0], &points[1], half);
        mesh.add_vertex(Vertex::with_uv(points[0] + first, Vector2::new(0.0, 0.0)));
        mesh.add_vertex(Vertex::with_uv(points[0] - first, Vector2::new(1.0, 0.0)));

        let mut v = 0.0;
        for i in 1..n {
            let (left, right) = if i == n - 1 {
                let offset = left_offset(&points[i - 1], &points[i], half);
                (points[i] + offset, points[i] - offset)
            } else {
                let (a, b, c) = (&points[i - 1], &points[i], &points[i + 1]);
                let incoming = left_offset(a, b, half);
                let outgoing = left_offset(b, c, half);
                (
                    miter(a, b, c, &incoming, &outgoing),
                    miter(a, b, c, &-incoming, &-outgoing),
                )
            };

            v += (points[i] - points[i - 1]).norm() / self.uv_unit;
            mesh.add_vertex(Vertex::with_uv(left, Vector2::new(0.0, v)));
            mesh.add_vertex(Vertex::with_uv(right, Vector2::new(1.0, v)));

            let (prev_left, prev_right) = (2 * i - 2, 2 * i - 1);
            let (cur_left, cur_right) = (2 * i, 2 * i + 1);
            mesh.add_triangle(Triangle::new([prev_left, cur_left, cur_right]));
            mesh.add_triangle(Triangle::new([prev_left, cur_right, prev_right]));
        }

        mesh.to_local_space(frame);
        mesh.offset_height(self.bump);
        mesh.finalize();
        Ok(mesh)
    }
}

/// Horizontal offset to the left of segment `a -> b`, `half` long
fn left_offset(a: &Point3<f64>, b: &Point3<f64>, half: f64) -> Vector3<f64> {
    let dir = b - a;
    Vector3::new(dir.x, 0.0, dir.z)
        .try_normalize(f64::EPSILON)
        .map(|h| Vector3::new(-h.z, 0.0, h.x) * half)
        .unwrap_or_else(Vector3::zeros)
}

/// Corner where the offset edges of `a -> b` and `b -> c` meet; parallel
/// edges fall back to the end of the incoming one
fn miter(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    incoming: &Vector3<f64>,
    outgoing: &Vector3<f64>,
) -> Point3<f64> {
    let (a0, a1) = (a + incoming, b + incoming);
    let (b0, b1) = (b + outgoing, c + outgoing);
    line_intersection_xz(&a0, &a1, &b0, &b1).unwrap_or(a1)
}
