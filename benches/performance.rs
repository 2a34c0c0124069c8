// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use polyframe_scene::io::{DefinitionRegistry, RecordingSink};
use polyframe_scene::{
    export_json, export_scene, import_json, ComponentDefinition, Group, Instance, Scene,
    SessionConfig, Transform,
};

/// Chain of definitions where each places the previous one `fan_out` times,
/// half of them inside a group
fn chain_scene(depth: usize, fan_out: usize) -> Scene {
    let mut scene = Scene::new();
    scene
        .add_definition(ComponentDefinition::new("D0", "d0"))
        .unwrap();
    for level in 1..depth {
        let target = format!("d{}", level - 1);
        let mut definition = ComponentDefinition::new(format!("D{}", level), format!("d{}", level));
        let mut group = Group::new(Transform::translation(0.0, level as f64, 0.0));
        for i in 0..fan_out {
            let instance = Instance::new(
                format!("d{}-i{}", level, i),
                target.clone(),
                Transform::translation(i as f64, 0.0, 0.0),
            );
            if i % 2 == 0 {
                definition.instances.push(instance);
            } else {
                group.instances.push(instance);
            }
        }
        definition.groups.push(group);
        scene.add_definition(definition).unwrap();
    }
    scene
}

fn quiet() -> SessionConfig {
    SessionConfig {
        log_issues: false,
        ..SessionConfig::default()
    }
}

fn bench_registry(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry");

    for depth in [10, 100, 500] {
        let scene = chain_scene(depth, 8);
        group.bench_with_input(BenchmarkId::new("build", depth), &scene, |b, scene| {
            b.iter(|| DefinitionRegistry::build(black_box(scene)).len());
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let config = quiet();

    for depth in [10, 100, 500] {
        let scene = chain_scene(depth, 8);
        group.bench_with_input(BenchmarkId::new("recording", depth), &scene, |b, scene| {
            b.iter(|| {
                let mut sink = RecordingSink::new();
                export_scene(black_box(scene), &mut sink, &config).unwrap();
                sink.calls().len()
            });
        });
    }

    group.finish();
}

fn bench_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("roundtrip");
    let config = quiet();

    let scene = chain_scene(100, 8);
    let (json, _) = export_json(&scene, &config).unwrap();

    group.bench_function("import_json", |b| {
        b.iter(|| import_json(black_box(&json), &config).unwrap().scene.len());
    });

    group.bench_function("export_json", |b| {
        b.iter(|| export_json(black_box(&scene), &config).unwrap().0.len());
    });

    group.finish();
}

criterion_group!(benches, bench_registry, bench_export, bench_roundtrip);
criterion_main!(benches);
