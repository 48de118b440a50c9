//! # Tick Benchmarks
//!
//! Measures the cost of one synchronous system tick across slot counts.
//!
//! Run: `cargo bench --bench tick_bench`

use apm_core::{PowerSystem, SystemConfig, TickInputs};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Benchmark one tick with a mix of pulses, wakes and disables
fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    for slots in [1usize, 4, 16, 32] {
        let mut system = PowerSystem::new(SystemConfig::new(slots, 16, 8, 32)).unwrap();
        let mut inputs = TickInputs::new(slots).with_thresholds(12).with_alpha(2);
        for i in (0..slots).step_by(3) {
            inputs.activity_pulse[i] = true;
        }
        for i in (1..slots).step_by(5) {
            inputs.enabled[i] = false;
        }

        group.bench_with_input(BenchmarkId::from_parameter(slots), &inputs, |b, inputs| {
            b.iter(|| black_box(system.tick(black_box(inputs)).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark snapshot capture and JSON encoding
fn bench_snapshot(c: &mut Criterion) {
    let mut system = PowerSystem::new(SystemConfig::new(32, 16, 8, 32)).unwrap();
    let inputs = TickInputs::new(32).with_thresholds(4);
    for _ in 0..64 {
        system.tick(&inputs).unwrap();
    }

    c.bench_function("snapshot_32_slots", |b| {
        b.iter(|| black_box(system.snapshot()))
    });

    c.bench_function("snapshot_json_32_slots", |b| {
        b.iter(|| black_box(system.snapshot().to_json().unwrap()))
    });
}

criterion_group!(benches, bench_tick, bench_snapshot);
criterion_main!(benches);
