//! Criterion benchmarks for the crunch processor
//!
//! Run with: cargo bench -p crunch-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use crunch_core::{DistortionVariant, Oversampler, ParamId, SignalProcessor};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_processor(c: &mut Criterion, variant: DistortionVariant, oversample: bool) {
    let name = if oversample {
        format!("{variant}/2x")
    } else {
        format!("{variant}/1x")
    };
    let mut group = c.benchmark_group(name);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        let mut processor = SignalProcessor::new(2);
        processor.initialize(SAMPLE_RATE, block_size).unwrap();
        processor.set_variant(variant);
        processor.set_param(ParamId::Drive, 0.7);
        processor.set_oversampling(oversample);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut left = input.clone();
                let mut right = input.clone();
                b.iter(|| {
                    left.copy_from_slice(&input);
                    right.copy_from_slice(&input);
                    processor
                        .process(black_box(&mut [&mut left[..], &mut right[..]]))
                        .unwrap();
                    black_box(left[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_variants(c: &mut Criterion) {
    for variant in DistortionVariant::ALL {
        bench_processor(c, variant, false);
        bench_processor(c, variant, true);
    }
}

fn bench_oversampler(c: &mut Criterion) {
    let mut group = c.benchmark_group("Oversampler");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        let mut oversampler = Oversampler::new(SAMPLE_RATE);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut up = vec![0.0; block_size * 2];
                let mut down = vec![0.0; block_size];
                b.iter(|| {
                    oversampler.upsample(black_box(&input), &mut up);
                    oversampler.downsample(&up, &mut down);
                    black_box(down[0])
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_variants, bench_oversampler);
criterion_main!(benches);
