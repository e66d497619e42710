use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pbc_core::config::{AliasConfig, ConfigFormat};
use pbc_core::{expand_flags, plan_package};
use std::path::Path;

const CONFIG: &str = r#"{
    "packages": {
        "dc": { "name": "dynamicons", "suffix": "core" },
        "gw": { "name": "ghost-writer", "suffix": "ext", "full": true },
    },
    "targets": { "b": "build", "tc": "test --coverage", "l": "lint" },
    "expandables": { "f": "fix", "s": "skip-nx-cache", "stream": "output-style=stream" },
}"#;

fn bench_expand(c: &mut Criterion) {
    let cfg = AliasConfig::parse(CONFIG, ConfigFormat::JsonWithComments, Path::new("bench.json"))
        .unwrap();
    let flags: Vec<String> = ["-fs", "-stream", "--verbose", "-xf"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    c.bench_function("expand_flags", |b| {
        b.iter(|| expand_flags(black_box(&flags), &cfg.expandables))
    });

    let args: Vec<String> = ["tc", "-fs"].iter().map(|s| s.to_string()).collect();
    let value = cfg.packages.get("gw").unwrap();
    c.bench_function("plan_package", |b| {
        b.iter(|| plan_package(value, black_box(&args), &cfg).unwrap())
    });
}

criterion_group!(benches, bench_expand);
criterion_main!(benches);
