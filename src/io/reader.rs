// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene importer: external entities to an in-memory graph

use super::report::Report;
use super::source::EntitySource;
use crate::config::SessionConfig;
use crate::error::{Result, SceneError};
use crate::model::{ComponentDefinition, Group, Instance, MaterialTable, Scene};
use ahash::AHashSet;
use tracing::{debug, info};

/// Result of a successful import
#[derive(Debug)]
pub struct ImportOutput {
    pub scene: Scene,
    pub report: Report,
}

/// Builds a [`Scene`] from an [`EntitySource`]
///
/// Import runs in two passes. The first materializes every definition
/// shell (name, description, identifier, payload) exactly once; the second
/// fills in nested groups and instances, resolving each instance against
/// the identifiers collected by the first pass.
pub struct GraphReader<'a> {
    materials: &'a MaterialTable,
    config: &'a SessionConfig,
}

impl<'a> GraphReader<'a> {
    pub fn new(materials: &'a MaterialTable, config: &'a SessionConfig) -> Self {
        Self { materials, config }
    }

    pub fn read<S: EntitySource>(&self, source: &S) -> Result<ImportOutput> {
        let mut report = Report::new(self.config.log_issues);
        let mut known = AHashSet::new();
        let mut shells = Vec::new();

        for (i, handle) in source.definitions().into_iter().enumerate() {
            let location = format!("definition[{}]", i);
            match self.read_shell(source, handle) {
                Ok(shell) => {
                    if known.insert(shell.guid.clone()) {
                        shells.push((handle, shell));
                    } else {
                        report.record(location, SceneError::DuplicateIdentifier(shell.guid));
                    }
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => report.record(location, e),
            }
        }

        let mut scene = Scene::with_materials(self.materials.clone());
        for (handle, mut definition) in shells {
            let location = definition.guid.clone();
            definition.groups = self.read_groups(source, handle, &known, &location, &mut report)?;
            definition.instances =
                self.read_instances(source, handle, &known, &location, &mut report)?;
            debug!(
                "Imported definition '{}' ({}): {} groups, {} instances",
                definition.name,
                definition.guid,
                definition.groups.len(),
                definition.instances.len()
            );
            scene.add_definition(definition)?;
        }

        info!(
            "Import complete: {} definitions, {} instances, {} issues",
            scene.len(),
            scene.instance_count(),
            report.len()
        );

        Ok(ImportOutput { scene, report })
    }

    fn read_shell<S: EntitySource>(
        &self,
        source: &S,
        handle: S::Handle,
    ) -> Result<ComponentDefinition> {
        let info = source.definition_info(handle)?;
        if info.guid.is_empty() {
            return Err(SceneError::malformed(
                format!("definition '{}'", info.name),
                "empty identifier",
            ));
        }

        let payload = source.payload(handle, self.materials, self.config.include_meshes)?;

        Ok(ComponentDefinition::new(info.name, info.guid)
            .with_description(info.description)
            .with_payload(payload))
    }

    fn read_groups<S: EntitySource>(
        &self,
        source: &S,
        container: S::Handle,
        known: &AHashSet<String>,
        location: &str,
        report: &mut Report,
    ) -> Result<Vec<Group>> {
        let mut groups = Vec::new();
        for (i, handle) in source.groups(container).into_iter().enumerate() {
            let location = format!("{}/group[{}]", location, i);
            match self.read_group(source, handle, known, &location, report) {
                Ok(group) => groups.push(group),
                Err(e) => report.absorb(location, e, self.config.reference_policy)?,
            }
        }
        Ok(groups)
    }

    fn read_group<S: EntitySource>(
        &self,
        source: &S,
        handle: S::Handle,
        known: &AHashSet<String>,
        location: &str,
        report: &mut Report,
    ) -> Result<Group> {
        let info = source.group_info(handle)?;
        let payload = source.payload(handle, self.materials, self.config.include_meshes)?;

        Ok(Group {
            name: info.name,
            guid: info.guid,
            transform: info.transform,
            payload,
            groups: self.read_groups(source, handle, known, location, report)?,
            instances: self.read_instances(source, handle, known, location, report)?,
        })
    }

    fn read_instances<S: EntitySource>(
        &self,
        source: &S,
        container: S::Handle,
        known: &AHashSet<String>,
        location: &str,
        report: &mut Report,
    ) -> Result<Vec<Instance>> {
        let mut instances = Vec::new();
        for (i, handle) in source.instances(container).into_iter().enumerate() {
            let location = format!("{}/instance[{}]", location, i);
            let info = match source.instance_info(handle, self.materials) {
                Ok(info) => info,
                Err(e) => {
                    report.absorb(location, e, self.config.reference_policy)?;
                    continue;
                }
            };

            if !known.contains(&info.definition) {
                let error = SceneError::UnresolvedReference {
                    instance: info.guid,
                    definition: info.definition,
                };
                report.absorb(location, error, self.config.reference_policy)?;
                continue;
            }

            instances.push(
                Instance::new(info.guid, info.definition, info.transform)
                    .with_name(info.name)
                    .with_material(info.material),
            );
        }
        Ok(instances)
    }
}
