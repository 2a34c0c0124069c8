// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Sink that records the creation sequence instead of building geometry

use super::writer::SceneSink;
use crate::error::{Result, SceneError};
use crate::model::{ComponentDefinition, GeometryPayload, Group, Instance};
use serde::{Deserialize, Serialize};

/// One call made against a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum CreationCall {
    Definition {
        handle: usize,
        guid: String,
    },
    Group {
        handle: usize,
        parent: usize,
    },
    Geometry {
        container: usize,
        elements: usize,
    },
    Instance {
        handle: usize,
        container: usize,
        definition: usize,
        guid: String,
    },
}

/// Records every creation call with sequential integer handles
///
/// Useful as a dry run of an export. An allocation limit makes the sink
/// fail once that many handles have been handed out.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<CreationCall>,
    next_handle: usize,
    limit: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every allocation after the first `limit`
    pub fn with_allocation_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> &[CreationCall] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<CreationCall> {
        self.calls
    }

    /// Identifier of the definition created under `handle`
    pub fn definition_guid(&self, handle: usize) -> Option<&str> {
        self.calls.iter().find_map(|call| match call {
            CreationCall::Definition { handle: h, guid } if *h == handle => Some(guid.as_str()),
            _ => None,
        })
    }

    /// Index into [`calls`](Self::calls) of the call that created `handle`
    pub fn creation_index(&self, handle: usize) -> Option<usize> {
        self.calls.iter().position(|call| match call {
            CreationCall::Definition { handle: h, .. }
            | CreationCall::Group { handle: h, .. }
            | CreationCall::Instance { handle: h, .. } => *h == handle,
            CreationCall::Geometry { .. } => false,
        })
    }

    pub fn definition_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, CreationCall::Definition { .. }))
            .count()
    }

    pub fn instance_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, CreationCall::Instance { .. }))
            .count()
    }

    fn allocate(&mut self, what: &str) -> Result<usize> {
        if let Some(limit) = self.limit {
            if self.next_handle >= limit {
                return Err(SceneError::AllocationFailure(format!(
                    "cannot allocate {} handle: limit of {} reached",
                    what, limit
                )));
            }
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        Ok(handle)
    }
}

impl SceneSink for RecordingSink {
    type Handle = usize;

    fn create_definition(&mut self, definition: &ComponentDefinition) -> Result<usize> {
        let handle = self.allocate("definition")?;
        self.calls.push(CreationCall::Definition {
            handle,
            guid: definition.guid.clone(),
        });
        Ok(handle)
    }

    fn create_group(&mut self, parent: &usize, _group: &Group) -> Result<usize> {
        let handle = self.allocate("group")?;
        self.calls.push(CreationCall::Group {
            handle,
            parent: *parent,
        });
        Ok(handle)
    }

    fn add_geometry(&mut self, container: &usize, payload: &GeometryPayload) -> Result<()> {
        self.calls.push(CreationCall::Geometry {
            container: *container,
            elements: payload.element_count(),
        });
        Ok(())
    }

    fn create_instance(
        &mut self,
        container: &usize,
        instance: &Instance,
        definition: &usize,
    ) -> Result<usize> {
        let handle = self.allocate("instance")?;
        self.calls.push(CreationCall::Instance {
            handle,
            container: *container,
            definition: *definition,
            guid: instance.guid.clone(),
        });
        Ok(handle)
    }
}
