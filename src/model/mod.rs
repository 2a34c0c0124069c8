// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene graph model
//!
//! Component definitions, the groups and instances they contain, and the
//! leaf payloads and materials those carry.

mod definition;
mod material;
mod payload;
mod scene;
mod transform;

pub use definition::{Body, ComponentDefinition, Group, Instance};
pub use material::{Material, MaterialTable};
pub use payload::{Curve, Edge, GeometryPayload, Surface, SurfaceMesh};
pub use scene::{DanglingReference, Scene};
pub use transform::Transform;
