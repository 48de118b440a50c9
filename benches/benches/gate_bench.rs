//! # Clock Gate Benchmarks
//!
//! Run: `cargo bench --bench gate_bench`

use apm_core::ClockGate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_gate_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_tick");

    for phase_width in [1u32, 8, 64] {
        let mut gate = ClockGate::new(phase_width);
        let mut enable = false;
        group.bench_function(BenchmarkId::from_parameter(phase_width), |b| {
            b.iter(|| {
                enable = !enable;
                black_box(gate.tick(black_box(enable)))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gate_tick);
criterion_main!(benches);
