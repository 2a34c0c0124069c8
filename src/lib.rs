// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyframe Scene
//!
//! Component-based scene graphs: definitions placed by instances inside
//! definitions and nested groups. Imports an external entity collection
//! into a graph with resolved definition references, and exports a graph
//! as a creation sequence in which every definition exists before any
//! instance that places it.

pub mod config;
pub mod error;
pub mod io;
pub mod model;

pub use config::{ReferencePolicy, SessionConfig};
pub use error::{Result, SceneError};
pub use io::{
    DocumentBuilder, EntityDocument, EntitySource, ExportOutput, GraphReader, GraphWriter,
    ImportOutput, Report, SceneSink,
};
pub use model::{ComponentDefinition, Group, Instance, Material, MaterialTable, Scene, Transform};

/// Import an entity collection using its own material table
pub fn import_scene<S: EntitySource>(source: &S, config: &SessionConfig) -> Result<ImportOutput> {
    let materials = source.materials();
    GraphReader::new(&materials, config).read(source)
}

/// Export a scene into a creation sink
pub fn export_scene<S: SceneSink>(
    scene: &Scene,
    sink: &mut S,
    config: &SessionConfig,
) -> Result<ExportOutput<S::Handle>> {
    GraphWriter::new(config).write(scene, sink)
}

/// Import a scene from a JSON entity document
pub fn import_json(json: &str, config: &SessionConfig) -> Result<ImportOutput> {
    let document = EntityDocument::from_json(json)?;
    import_scene(&document.source(), config)
}

/// Export a scene to a JSON entity document, returning the export report
pub fn export_json(scene: &Scene, config: &SessionConfig) -> Result<(String, Report)> {
    let mut builder = DocumentBuilder::new(scene.materials());
    let output = export_scene(scene, &mut builder, config)?;
    Ok((builder.finish().to_json()?, output.report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_import() {
        let result = import_json(
            r#"{ "definitions": [{ "name": "Cube", "guid": "cube" }] }"#,
            &SessionConfig::default(),
        );
        assert!(result.is_ok());
    }
}
