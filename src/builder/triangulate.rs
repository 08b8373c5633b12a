// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ear-clipping triangulation of road outlines

use crate::error::{MeshError, Result};
use crate::geometry::{Mesh, MultiPolygon, Polygon, PolygonWithHoles, Triangle, Vertex};

/// Triangulates multi-polygons on the XZ plane into upward-facing meshes
#[derive(Debug, Clone, Copy, Default)]
pub struct Triangulator;

impl Triangulator {
    pub fn new() -> Self {
        Self
    }

    /// Vertices keep contour order: outer ring, then holes, per polygon
    pub fn triangulate(&self, shape: &MultiPolygon, entity: &str) -> Result<Mesh> {
        if shape.is_empty() {
            return Err(MeshError::DegenerateContour {
                entity: entity.to_string(),
                points: 0,
            });
        }

        let mut mesh = Mesh::new();
        for polygon in &shape.polygons {
            for contour in polygon.contours() {
                validate(contour, entity)?;
            }
            append(&mut mesh, polygon, entity)?;
        }

        mesh.orient_up();
        Ok(mesh)
    }
}

fn validate(contour: &Polygon, entity: &str) -> Result<()> {
    if contour.len() < 3 {
        return Err(MeshError::DegenerateContour {
            entity: entity.to_string(),
            points: contour.len(),
        });
    }
    if let Some((first, second)) = contour.find_self_intersection() {
        return Err(MeshError::SelfIntersecting {
            entity: entity.to_string(),
            first,
            second,
        });
    }
    Ok(())
}

fn append(mesh: &mut Mesh, polygon: &PolygonWithHoles, entity: &str) -> Result<()> {
    let mut coords = Vec::with_capacity(polygon.point_count() * 2);
    let mut hole_starts = Vec::with_capacity(polygon.holes.len());

    for (i, contour) in polygon.contours().enumerate() {
        if i > 0 {
            hole_starts.push(coords.len() / 2);
        }
        for point in &contour.points {
            coords.push(point.x);
            coords.push(point.z);
        }
    }

    let indices = earcutr::earcut(&coords, &hole_starts, 2).map_err(|e| MeshError::Triangulation {
        entity: entity.to_string(),
        reason: format!("{:?}", e),
    })?;
    if indices.is_empty() {
        return Err(MeshError::Triangulation {
            entity: entity.to_string(),
            reason: "no triangles produced".to_string(),
        });
    }

    let base = mesh.vertex_count();
    for contour in polygon.contours() {
        for point in &contour.points {
            mesh.add_vertex(Vertex::new(*point));
        }
    }
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(Triangle::new([base + tri[0], base + tri[1], base + tri[2]]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn contour(points: &[(f64, f64)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, z)| Point3::new(x, 0.0, z)).collect())
    }

    #[test]
    fn test_convex_ngon() {
        let n = 12;
        let ring: Vec<(f64, f64)> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                (a.cos() * 5.0, a.sin() * 5.0)
            })
            .collect();
        let mesh = Triangulator::new()
            .triangulate(&contour(&ring).into(), "ngon")
            .unwrap();

        assert_eq!(mesh.vertex_count(), n);
        assert_eq!(mesh.triangle_count(), n - 2);
        assert!(mesh.triangles.iter().all(|t| mesh.face_normal(t).y > 0.0));
    }

    #[test]
    fn test_either_winding_faces_up() {
        let mut square = contour(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]);
        for _ in 0..2 {
            let mesh = Triangulator::new().triangulate(&square.clone().into(), "square").unwrap();
            assert_eq!(mesh.triangle_count(), 2);
            assert!(mesh.triangles.iter().all(|t| mesh.face_normal(t).y > 0.0));
            assert_relative_eq!(mesh.area(), 16.0, epsilon = 1e-9);
            square.reverse();
        }
    }

    #[test]
    fn test_hole_is_left_open() {
        let outer = contour(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let hole = contour(&[(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0)]);
        let shape = MultiPolygon::new(vec![PolygonWithHoles::new(outer, vec![hole])]);

        let mesh = Triangulator::new().triangulate(&shape, "ring").unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 8);
        assert_relative_eq!(mesh.area(), 84.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rejects_bad_contours() {
        let err = Triangulator::new()
            .triangulate(&contour(&[(0.0, 0.0), (1.0, 0.0)]).into(), "sliver")
            .unwrap_err();
        assert_eq!(
            err,
            MeshError::DegenerateContour {
                entity: "sliver".into(),
                points: 2
            }
        );

        let err = Triangulator::new()
            .triangulate(&contour(&[(0.0, 0.0), (2.0, 2.0), (2.0, 0.0), (0.0, 2.0)]).into(), "bowtie")
            .unwrap_err();
        assert!(matches!(err, MeshError::SelfIntersecting { .. }));
        assert!(!err.is_fatal());
    }
}
