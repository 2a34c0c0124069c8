// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Leaf geometry carried by definitions and groups
//!
//! Payloads are opaque to the graph transformation: they are copied into
//! and out of the model as whole values.

use super::Material;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Straight edge between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: Point3<f64>,
    pub end: Point3<f64>,
}

impl Edge {
    pub fn new(start: Point3<f64>, end: Point3<f64>) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }
}

/// Chain of edges, optionally flagged as an arc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub is_arc: bool,
}

/// Triangulated tessellation of a surface
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SurfaceMesh {
    pub vertices: Vec<Point3<f64>>,
    pub triangles: Vec<[usize; 3]>,
}

/// Planar face bounded by an outer loop with optional holes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub outer_loop: Vec<Point3<f64>>,
    #[serde(default)]
    pub inner_loops: Vec<Vec<Point3<f64>>>,
    #[serde(default)]
    pub material: Material,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<SurfaceMesh>,
}

impl Surface {
    pub fn new(outer_loop: Vec<Point3<f64>>) -> Self {
        Self {
            outer_loop,
            inner_loops: Vec::new(),
            material: Material::none(),
            mesh: None,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// Surfaces, curves and edges owned by one container
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryPayload {
    pub surfaces: Vec<Surface>,
    pub curves: Vec<Curve>,
    pub edges: Vec<Edge>,
}

impl GeometryPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty() && self.curves.is_empty() && self.edges.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.surfaces.len() + self.curves.len() + self.edges.len()
    }

    /// Drop tessellation meshes from every surface
    pub fn strip_meshes(&mut self) {
        for surface in &mut self.surfaces {
            surface.mesh = None;
        }
    }
}
