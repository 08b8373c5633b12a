// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Rigid transforms attached to map entities

use nalgebra::{Isometry3, Point3, Quaternion, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Translation plus rotation of a map entity
///
/// `rotation` is a unit quaternion stored as `[x, y, z, w]`. A zero quaternion
/// is treated as the identity rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 4],
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }

    pub fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: [x, y, z],
            ..Self::identity()
        }
    }

    /// Rotate about the vertical axis by `radians`
    pub fn with_yaw(mut self, radians: f64) -> Self {
        let q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), radians);
        self.rotation = [q.i, q.j, q.k, q.w];
        self
    }

    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.position[0], self.position[1], self.position[2])
    }

    pub fn unit_rotation(&self) -> UnitQuaternion<f64> {
        let [x, y, z, w] = self.rotation;
        let q = Quaternion::new(w, x, y, z);
        if q.norm_squared() < 1e-12 {
            UnitQuaternion::identity()
        } else {
            UnitQuaternion::from_quaternion(q)
        }
    }

    pub fn isometry(&self) -> Isometry3<f64> {
        let [x, y, z] = self.position;
        Isometry3::from_parts(Translation3::new(x, y, z), self.unit_rotation())
    }

    /// Local → world
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.isometry().transform_point(point)
    }

    /// World → local
    pub fn inverse_transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.isometry().inverse_transform_point(point)
    }
}
