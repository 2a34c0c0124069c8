// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! JSON entity document
//!
//! A serializable stand-in for an external model: it can be imported
//! through [`DocumentSource`] and produced by exporting a scene into a
//! [`DocumentBuilder`].

use super::source::{DefinitionInfo, EntitySource, GroupInfo, InstanceInfo};
use super::writer::SceneSink;
use crate::error::{Result, SceneError};
use crate::model::{
    ComponentDefinition, Curve, Edge, GeometryPayload, Group, Instance, Material, MaterialTable,
    Surface, SurfaceMesh, Transform,
};
use ahash::AHashSet;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Root of an entity document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDocument {
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub definitions: Vec<DefinitionEntity>,
}

/// Contents shared by definition and group entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerEntity {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub surfaces: Vec<SurfaceEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub curves: Vec<Curve>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub instances: Vec<InstanceEntity>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DefinitionEntity {
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub guid: Option<String>,
    #[serde(flatten)]
    pub contents: ContainerEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    #[serde(flatten)]
    pub contents: ContainerEntity,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceEntity {
    pub guid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Identifier of the placed definition
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<Transform>,
    /// Material identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceEntity {
    pub outer_loop: Vec<Point3<f64>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inner_loops: Vec<Vec<Point3<f64>>>,
    /// Material identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<SurfaceMesh>,
}

impl EntityDocument {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn source(&self) -> DocumentSource<'_> {
        DocumentSource { document: self }
    }
}

/// Handle to one entity inside an [`EntityDocument`]
#[derive(Debug, Clone, Copy)]
pub enum EntityRef<'a> {
    Definition(&'a DefinitionEntity),
    Group(&'a GroupEntity),
    Instance(&'a InstanceEntity),
}

impl<'a> EntityRef<'a> {
    fn contents(&self) -> Option<&'a ContainerEntity> {
        match *self {
            EntityRef::Definition(d) => Some(&d.contents),
            EntityRef::Group(g) => Some(&g.contents),
            EntityRef::Instance(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            EntityRef::Definition(_) => "definition",
            EntityRef::Group(_) => "group",
            EntityRef::Instance(_) => "instance",
        }
    }
}

/// [`EntitySource`] view over a borrowed document
#[derive(Debug, Clone, Copy)]
pub struct DocumentSource<'a> {
    document: &'a EntityDocument,
}

impl<'a> DocumentSource<'a> {
    fn not_a(&self, expected: &str, entity: EntityRef<'a>) -> SceneError {
        SceneError::malformed(entity.kind(), format!("expected a {}", expected))
    }
}

impl<'a> EntitySource for DocumentSource<'a> {
    type Handle = EntityRef<'a>;

    fn materials(&self) -> MaterialTable {
        MaterialTable::from_materials(self.document.materials.iter().cloned())
    }

    fn definitions(&self) -> Vec<EntityRef<'a>> {
        self.document
            .definitions
            .iter()
            .map(EntityRef::Definition)
            .collect()
    }

    fn definition_info(&self, definition: EntityRef<'a>) -> Result<DefinitionInfo> {
        let EntityRef::Definition(d) = definition else {
            return Err(self.not_a("definition", definition));
        };
        let name = d
            .name
            .clone()
            .ok_or_else(|| SceneError::malformed("definition", "missing name"))?;
        let guid = d
            .guid
            .clone()
            .ok_or_else(|| {
                SceneError::malformed(format!("definition '{}'", name), "missing guid")
            })?;

        Ok(DefinitionInfo {
            name,
            description: d.description.clone().unwrap_or_default(),
            guid,
        })
    }

    fn payload(
        &self,
        container: EntityRef<'a>,
        materials: &MaterialTable,
        include_meshes: bool,
    ) -> Result<GeometryPayload> {
        let contents = container
            .contents()
            .ok_or_else(|| self.not_a("definition or group", container))?;

        let mut surfaces = Vec::with_capacity(contents.surfaces.len());
        for (i, entity) in contents.surfaces.iter().enumerate() {
            if entity.outer_loop.len() < 3 {
                return Err(SceneError::malformed(
                    format!("{} surface[{}]", container.kind(), i),
                    format!("outer loop has {} vertices", entity.outer_loop.len()),
                ));
            }
            surfaces.push(Surface {
                outer_loop: entity.outer_loop.clone(),
                inner_loops: entity.inner_loops.clone(),
                material: materials
                    .get(entity.material.as_deref().unwrap_or_default())
                    .clone(),
                mesh: entity.mesh.clone(),
            });
        }

        let mut payload = GeometryPayload {
            surfaces,
            curves: contents.curves.clone(),
            edges: contents.edges.clone(),
        };
        if !include_meshes {
            payload.strip_meshes();
        }
        Ok(payload)
    }

    fn groups(&self, container: EntityRef<'a>) -> Vec<EntityRef<'a>> {
        container
            .contents()
            .map(|c| c.groups.iter().map(EntityRef::Group).collect())
            .unwrap_or_default()
    }

    fn group_info(&self, group: EntityRef<'a>) -> Result<GroupInfo> {
        let EntityRef::Group(g) = group else {
            return Err(self.not_a("group", group));
        };
        Ok(GroupInfo {
            name: g.name.clone(),
            guid: g.guid.clone(),
            transform: g.transform.unwrap_or_default(),
        })
    }

    fn instances(&self, container: EntityRef<'a>) -> Vec<EntityRef<'a>> {
        container
            .contents()
            .map(|c| c.instances.iter().map(EntityRef::Instance).collect())
            .unwrap_or_default()
    }

    fn instance_info(
        &self,
        instance: EntityRef<'a>,
        materials: &MaterialTable,
    ) -> Result<InstanceInfo> {
        let EntityRef::Instance(i) = instance else {
            return Err(self.not_a("instance", instance));
        };
        let guid = i
            .guid
            .clone()
            .filter(|g| !g.is_empty())
            .ok_or_else(|| SceneError::malformed("instance", "missing guid"))?;
        let definition = i.definition.clone().ok_or_else(|| {
            SceneError::malformed(format!("instance '{}'", guid), "missing definition")
        })?;

        Ok(InstanceInfo {
            name: i.name.clone().unwrap_or_default(),
            definition,
            transform: i.transform.unwrap_or_default(),
            material: materials
                .get(i.material.as_deref().unwrap_or_default())
                .clone(),
            guid,
        })
    }
}

/// Handle produced by a [`DocumentBuilder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentHandle {
    /// Definition (empty path) or group reached by following `path`
    Container { definition: usize, path: Vec<usize> },
    Instance {
        definition: usize,
        path: Vec<usize>,
        index: usize,
    },
}

/// [`SceneSink`] that writes an [`EntityDocument`]
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: EntityDocument,
    material_names: AHashSet<String>,
}

impl DocumentBuilder {
    /// Start a document carrying every material of the session table
    pub fn new(materials: &MaterialTable) -> Self {
        let mut builder = Self::default();
        for material in materials.iter() {
            builder.register_material(material);
        }
        builder
    }

    pub fn finish(self) -> EntityDocument {
        self.document
    }

    /// Material identifier to store, registering unseen materials
    fn register_material(&mut self, material: &Material) -> Option<String> {
        if material.is_none() {
            return None;
        }
        if self.material_names.insert(material.name.clone()) {
            self.document.materials.push(material.clone());
        }
        Some(material.name.clone())
    }

    fn container_mut(&mut self, handle: &DocumentHandle) -> Result<&mut ContainerEntity> {
        let DocumentHandle::Container { definition, path } = handle else {
            return Err(SceneError::AllocationFailure(
                "instance handle used as a container".into(),
            ));
        };
        let mut contents = &mut self
            .document
            .definitions
            .get_mut(*definition)
            .ok_or_else(|| stale(handle))?
            .contents;
        for &index in path {
            contents = &mut contents
                .groups
                .get_mut(index)
                .ok_or_else(|| stale(handle))?
                .contents;
        }
        Ok(contents)
    }
}

fn stale(handle: &DocumentHandle) -> SceneError {
    SceneError::AllocationFailure(format!("stale document handle {:?}", handle))
}

impl SceneSink for DocumentBuilder {
    type Handle = DocumentHandle;

    fn create_definition(&mut self, definition: &ComponentDefinition) -> Result<DocumentHandle> {
        let index = self.document.definitions.len();
        self.document.definitions.push(DefinitionEntity {
            name: Some(definition.name.clone()),
            description: Some(definition.description.clone()).filter(|d| !d.is_empty()),
            guid: Some(definition.guid.clone()),
            contents: ContainerEntity::default(),
        });
        Ok(DocumentHandle::Container {
            definition: index,
            path: Vec::new(),
        })
    }

    fn create_group(&mut self, parent: &DocumentHandle, group: &Group) -> Result<DocumentHandle> {
        let contents = self.container_mut(parent)?;
        let index = contents.groups.len();
        contents.groups.push(GroupEntity {
            name: group.name.clone(),
            guid: group.guid.clone(),
            transform: Some(group.transform),
            contents: ContainerEntity::default(),
        });

        let DocumentHandle::Container { definition, path } = parent else {
            return Err(stale(parent));
        };
        let mut path = path.clone();
        path.push(index);
        Ok(DocumentHandle::Container {
            definition: *definition,
            path,
        })
    }

    fn add_geometry(
        &mut self,
        container: &DocumentHandle,
        payload: &GeometryPayload,
    ) -> Result<()> {
        let surfaces: Vec<SurfaceEntity> = payload
            .surfaces
            .iter()
            .map(|surface| SurfaceEntity {
                outer_loop: surface.outer_loop.clone(),
                inner_loops: surface.inner_loops.clone(),
                material: self.register_material(&surface.material),
                mesh: surface.mesh.clone(),
            })
            .collect();

        let contents = self.container_mut(container)?;
        contents.surfaces.extend(surfaces);
        contents.curves.extend(payload.curves.iter().cloned());
        contents.edges.extend(payload.edges.iter().copied());
        Ok(())
    }

    fn create_instance(
        &mut self,
        container: &DocumentHandle,
        instance: &Instance,
        definition: &DocumentHandle,
    ) -> Result<DocumentHandle> {
        let definition_guid = match definition {
            DocumentHandle::Container { definition, path } if path.is_empty() => self
                .document
                .definitions
                .get(*definition)
                .and_then(|d| d.guid.clone())
                .ok_or_else(|| stale(container))?,
            other => return Err(stale(other)),
        };
        let material = self.register_material(&instance.material);

        let contents = self.container_mut(container)?;
        let index = contents.instances.len();
        contents.instances.push(InstanceEntity {
            guid: Some(instance.guid.clone()),
            name: Some(instance.name.clone()).filter(|n| !n.is_empty()),
            definition: Some(definition_guid),
            transform: Some(instance.transform),
            material,
        });

        let DocumentHandle::Container { definition, path } = container else {
            return Err(stale(container));
        };
        Ok(DocumentHandle::Instance {
            definition: *definition,
            path: path.clone(),
            index,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "materials": [{ "name": "Oak", "color": [120, 80, 40, 255] }],
        "definitions": [
            {
                "name": "Leg",
                "guid": "leg",
                "surfaces": [{
                    "outer_loop": [[0, 0, 0], [1, 0, 0], [1, 1, 0]],
                    "material": "Oak"
                }]
            },
            { "guid": "nameless" }
        ]
    }"#;

    #[test]
    fn test_parse_and_extract() -> Result<()> {
        let doc = EntityDocument::from_json(DOC)?;
        let source = doc.source();
        let materials = source.materials();
        let defs = source.definitions();
        assert_eq!(defs.len(), 2);

        let info = source.definition_info(defs[0])?;
        assert_eq!(info.guid, "leg");
        let payload = source.payload(defs[0], &materials, false)?;
        assert_eq!(payload.surfaces[0].material.name, "Oak");

        assert!(matches!(
            source.definition_info(defs[1]),
            Err(SceneError::MalformedEntity { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_unknown_material_is_none() -> Result<()> {
        let doc = EntityDocument::from_json(
            r#"{ "definitions": [{ "name": "A", "guid": "a", "surfaces": [{
                "outer_loop": [[0, 0, 0], [1, 0, 0], [1, 1, 0]], "material": "Glass" }] }] }"#,
        )?;
        let source = doc.source();
        let payload = source.payload(source.definitions()[0], &source.materials(), false)?;
        assert!(payload.surfaces[0].material.is_none());
        Ok(())
    }

    #[test]
    fn test_payload_filters_meshes() -> Result<()> {
        let doc = EntityDocument::from_json(
            r#"{ "definitions": [{ "name": "A", "guid": "a", "surfaces": [{
                "outer_loop": [[0, 0, 0], [1, 0, 0], [1, 1, 0]],
                "mesh": { "vertices": [[0, 0, 0], [1, 0, 0], [1, 1, 0]],
                          "triangles": [[0, 1, 2]] } }] }] }"#,
        )?;
        let source = doc.source();
        let def = source.definitions()[0];
        let materials = source.materials();

        assert!(source.payload(def, &materials, false)?.surfaces[0].mesh.is_none());
        let kept = source.payload(def, &materials, true)?;
        assert_eq!(kept.surfaces[0].mesh.as_ref().unwrap().triangles.len(), 1);
        Ok(())
    }

    #[test]
    fn test_builder_nests_groups() -> Result<()> {
        let mut builder = DocumentBuilder::new(&MaterialTable::new());
        let def = builder.create_definition(&ComponentDefinition::new("A", "a"))?;
        let outer = builder.create_group(&def, &Group::default().with_name("outer"))?;
        let inner = builder.create_group(&outer, &Group::default().with_name("inner"))?;
        builder.create_instance(&inner, &Instance::new("i", "a", Transform::identity()), &def)?;

        assert_eq!(
            inner,
            DocumentHandle::Container {
                definition: 0,
                path: vec![0, 0]
            }
        );
        let doc = builder.finish();
        let inner = &doc.definitions[0].contents.groups[0].contents.groups[0];
        let placed = &inner.contents.instances[0];
        assert_eq!(placed.definition.as_deref(), Some("a"));
        Ok(())
    }
}
