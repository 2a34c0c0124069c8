// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Scene exporter: in-memory graph to ordered creation calls

use super::registry::{DefinitionRegistry, ReferenceResolver};
use super::report::Report;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::model::{Body, ComponentDefinition, GeometryPayload, Group, Instance, Scene};
use tracing::{debug, info};

/// Geometry creation seam used by export
///
/// Every error returned by a sink aborts the export. Handles created
/// before the failure are left to the caller.
pub trait SceneSink {
    type Handle: Clone;

    /// Create a definition shell carrying name, description and identifier
    fn create_definition(&mut self, definition: &ComponentDefinition) -> Result<Self::Handle>;

    /// Create a group shell inside a definition or group
    fn create_group(&mut self, parent: &Self::Handle, group: &Group) -> Result<Self::Handle>;

    fn add_geometry(&mut self, container: &Self::Handle, payload: &GeometryPayload) -> Result<()>;

    /// Place an already-created definition inside a definition or group
    fn create_instance(
        &mut self,
        container: &Self::Handle,
        instance: &Instance,
        definition: &Self::Handle,
    ) -> Result<Self::Handle>;
}

/// Result of a completed export
#[derive(Debug)]
pub struct ExportOutput<H> {
    /// Definition handles keyed by identifier, in registry order
    pub definitions: Vec<(String, H)>,
    pub groups: usize,
    pub instances: usize,
    pub report: Report,
}

impl<H> ExportOutput<H> {
    pub fn handle(&self, guid: &str) -> Option<&H> {
        self.definitions
            .iter()
            .find(|(g, _)| g == guid)
            .map(|(_, h)| h)
    }
}

#[derive(Default)]
struct Counts {
    groups: usize,
    instances: usize,
}

/// Flattens a [`Scene`] into creation calls on a [`SceneSink`]
///
/// Pass one builds the [`DefinitionRegistry`]. Pass two walks it in order,
/// creating each definition shell and then its body: payload, nested groups
/// depth-first, and finally the definition's own instances. Holds no state
/// between calls.
pub struct GraphWriter<'a> {
    config: &'a SessionConfig,
}

impl<'a> GraphWriter<'a> {
    pub fn new(config: &'a SessionConfig) -> Self {
        Self { config }
    }

    pub fn write<S: SceneSink>(
        &self,
        scene: &Scene,
        sink: &mut S,
    ) -> Result<ExportOutput<S::Handle>> {
        let mut resolver = ReferenceResolver::new(DefinitionRegistry::build(scene));
        let mut report = Report::new(self.config.log_issues);
        let mut counts = Counts::default();

        for position in 0..resolver.registry().len() {
            let Some(definition) = resolver.registry().get(position) else {
                continue;
            };

            let handle = sink.create_definition(definition)?;
            debug!("Created definition '{}' ({})", definition.name, definition.guid);

            self.emit_body(
                sink,
                &resolver,
                &handle,
                definition.body(),
                &definition.guid,
                &mut report,
                &mut counts,
            )?;
            resolver.bind(position, handle);
        }

        info!(
            "Export complete: {} definitions, {} groups, {} instances, {} issues",
            resolver.registry().len(),
            counts.groups,
            counts.instances,
            report.len()
        );

        Ok(ExportOutput {
            definitions: resolver.into_handles(),
            groups: counts.groups,
            instances: counts.instances,
            report,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_body<S: SceneSink>(
        &self,
        sink: &mut S,
        resolver: &ReferenceResolver<'_, S::Handle>,
        container: &S::Handle,
        body: Body<'_>,
        location: &str,
        report: &mut Report,
        counts: &mut Counts,
    ) -> Result<()> {
        if !body.payload.is_empty() {
            sink.add_geometry(container, body.payload)?;
        }

        for (i, group) in body.groups.iter().enumerate() {
            let location = format!("{}/group[{}]", location, i);
            let group_handle = sink.create_group(container, group)?;
            counts.groups += 1;
            self.emit_body(sink, resolver, &group_handle, group.body(), &location, report, counts)?;
        }

        for (i, instance) in body.instances.iter().enumerate() {
            match resolver.resolve(instance) {
                Ok(definition) => {
                    sink.create_instance(container, instance, definition)?;
                    counts.instances += 1;
                }
                Err(e) => {
                    let location = format!("{}/instance[{}]", location, i);
                    report.absorb(location, e, self.config.reference_policy)?;
                }
            }
        }

        Ok(())
    }
}
