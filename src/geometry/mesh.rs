// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mesh representation and utilities

use super::BoundingBox;
use crate::map::Transform;
use nalgebra::{Point3, Vector2, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Vertex with position, shading frame and texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
    /// Tangent direction with handedness in `w`
    pub tangent: Vector4<f64>,
    pub uv: Vector2<f64>,
}

impl Vertex {
    pub fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            normal: Vector3::y(),
            tangent: Vector4::new(1.0, 0.0, 0.0, 1.0),
            uv: Vector2::zeros(),
        }
    }

    pub fn with_uv(position: Point3<f64>, uv: Vector2<f64>) -> Self {
        Self {
            uv,
            ..Self::new(position)
        }
    }
}

/// Triangle defined by three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(indices: [usize; 3]) -> Self {
        Self { indices }
    }
}

/// Triangular mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Add a vertex and return its index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle
    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Compute bounding box
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_vertices(&self.vertices)
    }

    /// Get vertex count
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get triangle count
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Geometric normal of a triangle, unnormalized
    pub fn face_normal(&self, triangle: &Triangle) -> Vector3<f64> {
        let [a, b, c] = triangle.indices.map(|i| self.vertices[i].position);
        (b - a).cross(&(c - a))
    }

    /// Flip triangles whose geometric normal points down
    pub fn orient_up(&mut self) {
        for i in 0..self.triangles.len() {
            if self.face_normal(&self.triangles[i]).y < 0.0 {
                self.triangles[i].indices.swap(1, 2);
            }
        }
    }

    /// Planar UVs from world XZ coordinates
    pub fn apply_planar_uv(&mut self, unit: f64) {
        for vertex in &mut self.vertices {
            vertex.uv = Vector2::new(vertex.position.x / unit, vertex.position.z / unit);
        }
    }

    /// Re-base world-space positions into `transform`'s local frame
    pub fn to_local_space(&mut self, transform: &Transform) {
        let isometry = transform.isometry();
        for vertex in &mut self.vertices {
            vertex.position = isometry.inverse_transform_point(&vertex.position);
        }
    }

    /// Raise every vertex by `offset`
    pub fn offset_height(&mut self, offset: f64) {
        for vertex in &mut self.vertices {
            vertex.position.y += offset;
        }
    }

    /// Recompute normals and tangents after positions or UVs changed
    pub fn finalize(&mut self) {
        self.recompute_normals();
        self.recompute_tangents();
    }

    /// Recompute vertex normals from triangle geometry
    /// This calculates face normals and averages them at shared vertices
    pub fn recompute_normals(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut normal_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];
        let mut normal_counts: Vec<u32> = vec![0; self.vertices.len()];

        for triangle in &self.triangles {
            let face_normal = self.face_normal(triangle);

            // Area weighted; skip slivers
            let area = face_normal.norm();
            if area > 1e-10 {
                for &idx in &triangle.indices {
                    normal_sums[idx] += face_normal;
                    normal_counts[idx] += 1;
                }
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.normal = if normal_counts[i] > 0 {
                normal_sums[i].normalize()
            } else {
                Vector3::y()
            };
        }
    }

    /// Recompute per-vertex tangents from UV gradients
    pub fn recompute_tangents(&mut self) {
        if self.vertices.is_empty() || self.triangles.is_empty() {
            return;
        }

        let mut tangent_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];
        let mut bitangent_sums: Vec<Vector3<f64>> = vec![Vector3::zeros(); self.vertices.len()];

        for triangle in &self.triangles {
            let [v0, v1, v2] = triangle.indices.map(|i| self.vertices[i]);
            let edge1 = v1.position - v0.position;
            let edge2 = v2.position - v0.position;
            let duv1 = v1.uv - v0.uv;
            let duv2 = v2.uv - v0.uv;

            let det = duv1.x * duv2.y - duv2.x * duv1.y;
            if det.abs() < 1e-12 {
                continue;
            }
            let r = 1.0 / det;
            let tangent = (edge1 * duv2.y - edge2 * duv1.y) * r;
            let bitangent = (edge2 * duv1.x - edge1 * duv2.x) * r;

            for &idx in &triangle.indices {
                tangent_sums[idx] += tangent;
                bitangent_sums[idx] += bitangent;
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let n = vertex.normal;
            // Gram-Schmidt against the normal
            let t = tangent_sums[i] - n * n.dot(&tangent_sums[i]);
            let t = t.try_normalize(1e-12).unwrap_or_else(|| fallback_tangent(&n));
            let w = if n.cross(&t).dot(&bitangent_sums[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            vertex.tangent = Vector4::new(t.x, t.y, t.z, w);
        }
    }

    /// Flat triangle index list
    pub fn indices(&self) -> Vec<u32> {
        self.triangles
            .iter()
            .flat_map(|t| t.indices.map(|i| i as u32))
            .collect()
    }

    /// Total surface area
    pub fn area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|t| self.face_normal(t).norm() * 0.5)
            .sum()
    }
}

fn fallback_tangent(normal: &Vector3<f64>) -> Vector3<f64> {
    let axis = if normal.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::z()
    };
    (axis - normal * normal.dot(&axis)).normalize()
}
