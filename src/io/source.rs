// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Entity-collection reader seam used by import

use crate::error::Result;
use crate::model::{GeometryPayload, Material, MaterialTable, Transform};

/// Own attributes of an external component definition
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionInfo {
    pub name: String,
    pub description: String,
    pub guid: String,
}

/// Own attributes of an external group
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GroupInfo {
    pub name: Option<String>,
    pub guid: Option<String>,
    pub transform: Transform,
}

/// Own attributes of an external instance
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceInfo {
    pub guid: String,
    pub name: String,
    /// Identifier of the definition this instance places
    pub definition: String,
    pub transform: Transform,
    pub material: Material,
}

/// External entity collection an import walks
///
/// Handles are opaque and cheap to copy. Each entity is visited once per
/// import; extraction methods return an error for entities that cannot
/// yield the requested attributes.
pub trait EntitySource {
    type Handle: Copy;

    /// Material table for the session
    fn materials(&self) -> MaterialTable;

    /// Top-level component definitions, in collection order
    fn definitions(&self) -> Vec<Self::Handle>;

    fn definition_info(&self, definition: Self::Handle) -> Result<DefinitionInfo>;

    /// Leaf geometry of a definition or group. Surfaces carry no mesh
    /// unless `include_meshes` is set.
    fn payload(
        &self,
        container: Self::Handle,
        materials: &MaterialTable,
        include_meshes: bool,
    ) -> Result<GeometryPayload>;

    /// Groups directly inside a definition or group
    fn groups(&self, container: Self::Handle) -> Vec<Self::Handle>;

    fn group_info(&self, group: Self::Handle) -> Result<GroupInfo>;

    /// Instances directly inside a definition or group
    fn instances(&self, container: Self::Handle) -> Vec<Self::Handle>;

    fn instance_info(
        &self,
        instance: Self::Handle,
        materials: &MaterialTable,
    ) -> Result<InstanceInfo>;
}
