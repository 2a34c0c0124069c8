// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Export registry and definition handle resolution

use crate::error::{Result, SceneError};
use crate::model::{ComponentDefinition, Instance, Scene};
use ahash::{AHashMap, AHashSet};

/// De-duplicated, dependency-ordered list of the definitions in a scene
///
/// Built by a depth-first post-order walk over the scene's definitions in
/// arena order: a definition is appended only after every definition its
/// body places has been appended. Each definition appears once no matter
/// how many instances reference it, and the order is fully determined by
/// the scene.
#[derive(Debug, Clone)]
pub struct DefinitionRegistry<'s> {
    order: Vec<&'s ComponentDefinition>,
    positions: AHashMap<&'s str, usize>,
}

impl<'s> DefinitionRegistry<'s> {
    pub fn build(scene: &'s Scene) -> Self {
        let mut registry = Self {
            order: Vec::with_capacity(scene.len()),
            positions: AHashMap::with_capacity(scene.len()),
        };
        let mut visited = AHashSet::with_capacity(scene.len());
        for definition in scene.definitions() {
            registry.visit(scene, definition, &mut visited);
        }
        registry
    }

    /// Post-order walk from `root` with an explicit stack, so chain depth is
    /// bounded by the heap rather than the call stack
    fn visit(
        &mut self,
        scene: &'s Scene,
        root: &'s ComponentDefinition,
        visited: &mut AHashSet<&'s str>,
    ) {
        // Also stops at definitions still on the stack, which breaks cycles.
        if !visited.insert(root.guid.as_str()) {
            return;
        }

        let mut stack = vec![(root, root.body().all_instances(), 0usize)];
        while let Some((definition, instances, next)) = stack.last_mut() {
            let definition: &'s ComponentDefinition = *definition;
            match instances.get(*next).copied() {
                Some(instance) => {
                    *next += 1;
                    // Unknown identifiers are reported when the instance is emitted.
                    if let Some(target) = scene.get(&instance.definition) {
                        if visited.insert(target.guid.as_str()) {
                            stack.push((target, target.body().all_instances(), 0));
                        }
                    }
                }
                None => {
                    stack.pop();
                    self.positions.insert(definition.guid.as_str(), self.order.len());
                    self.order.push(definition);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&'s ComponentDefinition> {
        self.order.get(position).copied()
    }

    /// Registry position of a definition identifier
    pub fn position(&self, guid: &str) -> Option<usize> {
        self.positions.get(guid).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'s ComponentDefinition> + '_ {
        self.order.iter().copied()
    }

    pub fn guids(&self) -> Vec<&'s str> {
        self.order.iter().map(|d| d.guid.as_str()).collect()
    }
}

/// Maps registry positions to the external handles created for them
///
/// Lives for one export pass. Instances are resolved by locating their
/// definition's registry position and returning the handle bound there.
#[derive(Debug)]
pub struct ReferenceResolver<'s, H> {
    registry: DefinitionRegistry<'s>,
    handles: Vec<Option<H>>,
}

impl<'s, H> ReferenceResolver<'s, H> {
    pub fn new(registry: DefinitionRegistry<'s>) -> Self {
        let handles = std::iter::repeat_with(|| None)
            .take(registry.len())
            .collect();
        Self { registry, handles }
    }

    pub fn registry(&self) -> &DefinitionRegistry<'s> {
        &self.registry
    }

    /// Record the handle created for the definition at `position`
    pub fn bind(&mut self, position: usize, handle: H) {
        if let Some(slot) = self.handles.get_mut(position) {
            *slot = Some(handle);
        }
    }

    pub fn is_bound(&self, guid: &str) -> bool {
        self.handle_for(guid).is_some()
    }

    pub fn handle_for(&self, guid: &str) -> Option<&H> {
        self.registry
            .position(guid)
            .and_then(|position| self.handles[position].as_ref())
    }

    /// Handle of the definition an instance places
    ///
    /// Fails with [`SceneError::UnresolvedReference`] when the definition is
    /// not in the registry, and with [`SceneError::CyclicReference`] when it
    /// is registered but its handle has not been created yet.
    pub fn resolve(&self, instance: &Instance) -> Result<&H> {
        let position = self.registry.position(&instance.definition).ok_or_else(|| {
            SceneError::UnresolvedReference {
                instance: instance.guid.clone(),
                definition: instance.definition.clone(),
            }
        })?;

        self.handles[position]
            .as_ref()
            .ok_or_else(|| SceneError::CyclicReference {
                instance: instance.guid.clone(),
                definition: instance.definition.clone(),
            })
    }

    /// Bound handles keyed by definition identifier, in registry order
    pub fn into_handles(self) -> Vec<(String, H)> {
        self.registry
            .order
            .iter()
            .zip(self.handles)
            .filter_map(|(definition, handle)| handle.map(|h| (definition.guid.clone(), h)))
            .collect()
    }
}
