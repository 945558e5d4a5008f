//! Performance benchmarks for loop search and seam synthesis

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use loopseam::features::phase::align::best_circular_align;
use loopseam::features::spectral::SpectralDistance;
use loopseam::{CrossfadeCurve, LoopStitcher, StitchConfig};

fn tone(len: usize, sample_rate: f32, freq: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = i as f32 * freq * 2.0 * std::f32::consts::PI / sample_rate;
            0.5 * phase.sin() + 0.2 * (2.0 * phase).sin()
        })
        .collect()
}

fn bench_stitch_loop(c: &mut Criterion) {
    // Quarter second at 48 kHz, L = 256
    let samples = tone(12000, 48000.0, 220.0);
    let stitcher = LoopStitcher::new(StitchConfig {
        fft_size: 256,
        ..StitchConfig::with_overlap(256)
    })
    .unwrap();

    c.bench_function("stitch_loop_12k_l256", |b| {
        b.iter(|| {
            let mut buffer = samples.clone();
            let _ = stitcher.stitch_loop_in_place(
                black_box(&mut buffer),
                black_box(500),
                black_box(11500),
                CrossfadeCurve::EqualPower,
            );
        });
    });
}

fn bench_spectral_distance(c: &mut Criterion) {
    let samples = tone(4096, 48000.0, 220.0);
    let engine = SpectralDistance::new(1024, -60.0).unwrap();

    c.bench_function("spectral_distance_1024", |b| {
        b.iter(|| engine.distance(black_box(&samples[..1024]), black_box(&samples[2000..3024])));
    });
}

fn bench_phase_align(c: &mut Criterion) {
    let samples = tone(4096, 48000.0, 220.0);

    c.bench_function("circular_align_1024_shift8", |b| {
        b.iter(|| best_circular_align(black_box(&samples[..1024]), black_box(&samples[3..1027]), 8));
    });
}

criterion_group!(benches, bench_stitch_loop, bench_spectral_distance, bench_phase_align);
criterion_main!(benches);
