// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Affine placement transforms for groups and instances

use nalgebra::{Matrix4, Point3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Affine transform (rotation + translation + scale) stored as a 4x4 matrix
///
/// A transform only ever describes the local placement of one group or
/// instance. Nothing in this crate composes a parent's transform into its
/// children; consumers of the flattened output do that if they need it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transform {
    matrix: Matrix4<f64>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_matrix(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    /// Euler rotation in degrees, applied X then Y then Z
    pub fn rotation(x_deg: f64, y_deg: f64, z_deg: f64) -> Self {
        let rx = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), x_deg.to_radians());
        let ry = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), y_deg.to_radians());
        let rz = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), z_deg.to_radians());
        Self::from_matrix((rz * ry * rx).to_homogeneous())
    }

    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::from_matrix(Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)))
    }

    /// `self` followed by `next`
    pub fn then(&self, next: &Transform) -> Transform {
        Transform::from_matrix(next.matrix * self.matrix)
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn apply_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.matrix.transform_point(point)
    }

    pub fn origin(&self) -> Point3<f64> {
        self.apply_point(&Point3::origin())
    }

    pub fn is_identity(&self) -> bool {
        self.matrix == Matrix4::identity()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
