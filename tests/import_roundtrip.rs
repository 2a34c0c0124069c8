// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Import and export/import round-trip tests

use anyhow::Result;
use polyframe_scene::io::{EntityDocument, RecordingSink};
use polyframe_scene::{
    export_json, export_scene, import_json, ReferencePolicy, SceneError, SessionConfig,
};

const FURNITURE: &str = r#"{
    "materials": [
        { "name": "Oak", "color": [120, 80, 40, 255] },
        { "name": "Steel", "color": [160, 160, 170, 255], "use_opacity": true, "opacity": 0.8 }
    ],
    "definitions": [
        {
            "name": "Table",
            "description": "Four-legged table",
            "guid": "table",
            "surfaces": [{
                "outer_loop": [[0, 0, 70], [120, 0, 70], [120, 80, 70], [0, 80, 70]],
                "material": "Oak",
                "mesh": { "vertices": [[0, 0, 70], [120, 0, 70], [120, 80, 70], [0, 80, 70]],
                          "triangles": [[0, 1, 2], [0, 2, 3]] }
            }],
            "instances": [
                { "guid": "leg-1", "definition": "leg" },
                { "guid": "leg-2", "definition": "leg",
                  "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 120,0,0,1] }
            ],
            "groups": [{
                "name": "Back legs",
                "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,80,0,1],
                "instances": [
                    { "guid": "leg-3", "definition": "leg", "material": "Steel" },
                    { "guid": "leg-4", "definition": "leg",
                      "transform": [1,0,0,0, 0,1,0,0, 0,0,1,0, 120,0,0,1] }
                ],
                "groups": [{
                    "name": "Brace",
                    "edges": [{ "start": [0, 0, 10], "end": [120, 0, 10] }],
                    "instances": [{ "guid": "phantom", "definition": "missing-part" }]
                }]
            }]
        },
        {
            "name": "Leg",
            "guid": "leg",
            "curves": [{ "edges": [{ "start": [0, 0, 0], "end": [0, 0, 70] }] }]
        }
    ]
}"#;

fn quiet() -> SessionConfig {
    SessionConfig {
        log_issues: false,
        ..SessionConfig::default()
    }
}

#[test]
fn test_import_resolves_forward_references() -> Result<()> {
    let output = import_json(FURNITURE, &quiet())?;
    let scene = &output.scene;

    assert_eq!(scene.len(), 2);
    // leg-1..4 resolve even though Leg appears after Table.
    assert_eq!(scene.instance_count(), 4);
    assert_eq!(scene.group_count(), 2);
    assert!(scene.validate().is_empty());

    let table = scene.get("table").unwrap();
    assert_eq!(table.description, "Four-legged table");
    assert_eq!(table.payload.surfaces[0].material.name, "Oak");
    assert!(table.payload.surfaces[0].mesh.is_none());

    let back = &table.groups[0];
    assert_eq!(back.name.as_deref(), Some("Back legs"));
    assert_eq!(back.instances[0].material.name, "Steel");
    assert!(back.groups[0].instances.is_empty());
    assert_eq!(back.groups[0].payload.edges.len(), 1);

    assert_eq!(output.report.len(), 1);
    assert_eq!(output.report.unresolved_count(), 1);
    assert_eq!(
        output.report.issues()[0].location,
        "table/group[0]/group[0]/instance[0]"
    );
    Ok(())
}

#[test]
fn test_include_meshes_keeps_tessellation() -> Result<()> {
    let config = SessionConfig {
        include_meshes: true,
        ..quiet()
    };
    let output = import_json(FURNITURE, &config)?;
    let table = output.scene.get("table").unwrap();
    let mesh = table.payload.surfaces[0].mesh.as_ref().unwrap();
    assert_eq!(mesh.triangles.len(), 2);
    Ok(())
}

#[test]
fn test_strict_import_fails_on_unresolved() {
    let config = SessionConfig {
        reference_policy: ReferencePolicy::Fail,
        ..quiet()
    };
    let result = import_json(FURNITURE, &config);
    assert!(matches!(
        result,
        Err(SceneError::UnresolvedReference { ref instance, .. }) if instance == "phantom"
    ));
}

#[test]
fn test_malformed_entities_are_skipped() -> Result<()> {
    let json = r#"{
        "definitions": [
            { "name": "Good", "guid": "good" },
            { "name": "No guid" },
            { "name": "Duplicate", "guid": "good" },
            {
                "name": "Bad face",
                "guid": "bad-face",
                "surfaces": [{ "outer_loop": [[0,0,0],[1,0,0]] }]
            },
            {
                "name": "User",
                "guid": "user",
                "groups": [{
                    "surfaces": [{ "outer_loop": [] }],
                    "instances": [{ "guid": "lost", "definition": "good" }]
                }],
                "instances": [
                    { "guid": "ok", "definition": "good" },
                    { "guid": "no-target" },
                    { "guid": "to-bad-face", "definition": "bad-face" },
                    { "definition": "good" },
                    { "guid": "", "definition": "good" }
                ]
            }
        ]
    }"#;

    let output = import_json(json, &quiet())?;
    let scene = &output.scene;

    let guids: Vec<&str> = scene.definitions().iter().map(|d| d.guid.as_str()).collect();
    assert_eq!(guids, vec!["good", "user"]);

    let user = scene.get("user").unwrap();
    assert!(user.groups.is_empty());
    assert_eq!(user.instances.len(), 1);
    assert_eq!(user.instances[0].guid, "ok");

    // No guid, duplicate, bad face, malformed group, instance without target,
    // two instances without an identifier
    assert_eq!(output.report.malformed_count(), 7);
    // Instance of the definition that failed to import
    assert_eq!(output.report.unresolved_count(), 1);
    Ok(())
}

#[test]
fn test_json_roundtrip_preserves_graph() -> Result<()> {
    let first = import_json(FURNITURE, &quiet())?;
    let (json, report) = export_json(&first.scene, &quiet())?;
    assert!(report.is_empty());

    let document = EntityDocument::from_json(&json)?;
    // Registry order: Leg before the Table that places it.
    let order: Vec<&str> = document
        .definitions
        .iter()
        .filter_map(|d| d.guid.as_deref())
        .collect();
    assert_eq!(order, vec!["leg", "table"]);
    assert_eq!(document.materials.len(), 2);

    let second = import_json(&json, &quiet())?;
    assert!(second.report.is_empty());
    assert_eq!(second.scene.len(), first.scene.len());
    assert_eq!(second.scene.instance_count(), first.scene.instance_count());
    for definition in first.scene.definitions() {
        let copy = second.scene.get(&definition.guid).unwrap();
        assert_eq!(copy, definition);
    }

    println!("Round-trip document: {} bytes", json.len());
    Ok(())
}

#[test]
fn test_imported_scene_exports_in_dependency_order() -> Result<()> {
    let output = import_json(FURNITURE, &quiet())?;
    let mut sink = RecordingSink::new();
    let exported = export_scene(&output.scene, &mut sink, &quiet())?;

    assert_eq!(exported.definitions.len(), 2);
    assert_eq!(exported.instances, 4);
    assert_eq!(sink.definition_guid(exported.definitions[0].1), Some("leg"));
    Ok(())
}
