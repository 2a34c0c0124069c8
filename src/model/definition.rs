// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene graph nodes: component definitions, groups and instances

use super::{GeometryPayload, Material, Transform};
use serde::{Deserialize, Serialize};

/// Placement of a component definition inside a definition or group
///
/// The placed definition is referenced by identifier only. Many instances
/// may share one definition; none of them owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub guid: String,
    #[serde(default)]
    pub name: String,
    /// Identifier of the definition being placed
    pub definition: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub material: Material,
}

impl Instance {
    pub fn new(
        guid: impl Into<String>,
        definition: impl Into<String>,
        transform: Transform,
    ) -> Self {
        Self {
            guid: guid.into(),
            name: String::new(),
            definition: definition.into(),
            transform,
            material: Material::none(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

/// Anonymous positioned container; not separately instantiable
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub guid: Option<String>,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub payload: GeometryPayload,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl Group {
    pub fn new(transform: Transform) -> Self {
        Self {
            transform,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_payload(mut self, payload: GeometryPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn body(&self) -> Body<'_> {
        Body {
            payload: &self.payload,
            groups: &self.groups,
            instances: &self.instances,
        }
    }
}

/// Named, reusable piece of geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Session-unique identifier
    pub guid: String,
    #[serde(default)]
    pub payload: GeometryPayload,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub instances: Vec<Instance>,
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            guid: guid.into(),
            payload: GeometryPayload::default(),
            groups: Vec::new(),
            instances: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_payload(mut self, payload: GeometryPayload) -> Self {
        self.payload = payload;
        self
    }

    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn body(&self) -> Body<'_> {
        Body {
            payload: &self.payload,
            groups: &self.groups,
            instances: &self.instances,
        }
    }
}

/// Borrowed view over the contents shared by definitions and groups
#[derive(Debug, Clone, Copy)]
pub struct Body<'a> {
    pub payload: &'a GeometryPayload,
    pub groups: &'a [Group],
    pub instances: &'a [Instance],
}

impl<'a> Body<'a> {
    /// Every instance in this body and its nested groups, depth-first pre-order
    pub fn all_instances(&self) -> Vec<&'a Instance> {
        let mut out = Vec::new();
        self.collect_instances(&mut out);
        out
    }

    fn collect_instances(&self, out: &mut Vec<&'a Instance>) {
        for group in self.groups {
            group.body().collect_instances(out);
        }
        out.extend(self.instances.iter());
    }

    /// Number of groups at every nesting level
    pub fn group_count(&self) -> usize {
        self.groups
            .iter()
            .map(|g| 1 + g.body().group_count())
            .sum()
    }
}
