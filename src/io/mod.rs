// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - importing entity collections and exporting scene graphs

mod document;
mod reader;
mod recording;
mod registry;
mod report;
mod source;
mod writer;

pub use document::{
    ContainerEntity, DefinitionEntity, DocumentBuilder, DocumentHandle, DocumentSource,
    EntityDocument, EntityRef, GroupEntity, InstanceEntity, SurfaceEntity,
};
pub use reader::{GraphReader, ImportOutput};
pub use recording::{CreationCall, RecordingSink};
pub use registry::{DefinitionRegistry, ReferenceResolver};
pub use report::{Issue, Report};
pub use source::{DefinitionInfo, EntitySource, GroupInfo, InstanceInfo};
pub use writer::{ExportOutput, GraphWriter, SceneSink};
