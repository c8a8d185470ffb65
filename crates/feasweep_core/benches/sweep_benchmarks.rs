//! Criterion benchmarks for the sweep engine
//!
//! Run with: cargo bench -p feasweep_core

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use feasweep_core::backend::SolveOutput;
use feasweep_core::backend::mock::MockBackend;
use feasweep_core::config::{OutputSpec, ParameterSpec, SweepBuilder, SweepConfig, ValueSpec};
use feasweep_core::sweep::run_sweep;

fn grid_config(per_axis: usize) -> SweepConfig {
    SweepBuilder::new("bench.FCStd")
        .parameter(ParameterSpec::new(
            "Sketch",
            "Spacing",
            ValueSpec::linspace(1.0, 50.0, per_axis),
        ))
        .parameter(ParameterSpec::new(
            "Sketch",
            "Depth",
            ValueSpec::linspace(0.5, 5.0, per_axis),
        ))
        .output(OutputSpec::new("vonMises"))
        .build()
}

fn bench_backend() -> MockBackend {
    MockBackend::new("SolverCcxTools", "CCX_Results")
        .constraint("Sketch", "Spacing", 1.0)
        .constraint("Sketch", "Depth", 0.5)
        .with_synthesizer(|model| {
            let s = model.datum_sum();
            let mut out = SolveOutput::new();
            out.insert_field("vonMises", (0..64).map(|i| s * i as f64).collect());
            out
        })
}

fn bench_value_expansion(c: &mut Criterion) {
    c.bench_function("linspace_expand_1000", |b| {
        let spec = ValueSpec::linspace(0.0, 100.0, 1000);
        b.iter(|| black_box(&spec).expand().unwrap())
    });

    c.bench_function("range_expand_1000", |b| {
        let spec = ValueSpec::range(0.0, 100.0, 0.1);
        b.iter(|| black_box(&spec).expand().unwrap())
    });
}

fn bench_sweep_over_mock(c: &mut Criterion) {
    let mut group = c.benchmark_group("mock_sweep");
    for per_axis in [4usize, 8, 16] {
        group.bench_with_input(
            BenchmarkId::from_parameter(per_axis),
            &per_axis,
            |b, &per_axis| {
                let config = grid_config(per_axis);
                b.iter(|| {
                    let mut backend = bench_backend();
                    run_sweep(&mut backend, black_box(&config), None).unwrap()
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_value_expansion, bench_sweep_over_mock);
criterion_main!(benches);
