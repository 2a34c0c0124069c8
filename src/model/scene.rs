// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Definition arena for one session

use super::{Body, ComponentDefinition, MaterialTable};
use crate::error::{Result, SceneError};
use ahash::AHashMap;

/// In-memory scene graph
///
/// Definitions live in an ordered arena indexed by identifier. Instances
/// refer to definitions through that identifier, so a definition placed
/// many times is stored once.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    definitions: Vec<ComponentDefinition>,
    index: AHashMap<String, usize>,
    materials: MaterialTable,
}

/// A reference that does not point at any definition in the scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    /// Definition that contains the instance
    pub owner: String,
    pub instance: String,
    pub definition: String,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_materials(materials: MaterialTable) -> Self {
        Self {
            materials,
            ..Self::default()
        }
    }

    /// Append a definition; its identifier must be new to the scene
    pub fn add_definition(&mut self, definition: ComponentDefinition) -> Result<usize> {
        if self.index.contains_key(&definition.guid) {
            return Err(SceneError::DuplicateIdentifier(definition.guid));
        }
        let position = self.definitions.len();
        self.index.insert(definition.guid.clone(), position);
        self.definitions.push(definition);
        Ok(position)
    }

    pub fn get(&self, guid: &str) -> Option<&ComponentDefinition> {
        self.index.get(guid).map(|&i| &self.definitions[i])
    }

    /// Arena position of a definition
    pub fn position(&self, guid: &str) -> Option<usize> {
        self.index.get(guid).copied()
    }

    pub fn contains(&self, guid: &str) -> bool {
        self.index.contains_key(guid)
    }

    /// Definitions in insertion order
    pub fn definitions(&self) -> &[ComponentDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut MaterialTable {
        &mut self.materials
    }

    /// Total instances across all definitions and nested groups
    pub fn instance_count(&self) -> usize {
        self.definitions
            .iter()
            .map(|d| d.body().all_instances().len())
            .sum()
    }

    /// Total groups across all definitions at every nesting level
    pub fn group_count(&self) -> usize {
        self.definitions.iter().map(|d| d.body().group_count()).sum()
    }

    /// List instances whose definition is not in the scene
    pub fn validate(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        for definition in &self.definitions {
            self.collect_dangling(&definition.guid, definition.body(), &mut dangling);
        }
        dangling
    }

    fn collect_dangling(&self, owner: &str, body: Body<'_>, out: &mut Vec<DanglingReference>) {
        for instance in body.all_instances() {
            if !self.contains(&instance.definition) {
                out.push(DanglingReference {
                    owner: owner.to_string(),
                    instance: instance.guid.clone(),
                    definition: instance.definition.clone(),
                });
            }
        }
    }
}
