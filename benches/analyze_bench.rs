//! Benchmarks for the imagesense analysis pipeline
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use imagesense::{
    analyze_composition, analyze_harmony, analyze_texture, analyze_tone, classify_scene,
    extract_dominant_colors, AnalyzeOptions, ColorExtractOptions, ProfileAnalyzer,
};

/// Gradient fixture with enough structure to exercise every analyzer
fn fixture(size: u32) -> RgbImage {
    let mut img = RgbImage::new(size, size);
    for y in 0..size {
        for x in 0..size {
            img.put_pixel(
                x,
                y,
                Rgb([
                    ((x * 255) / size) as u8,
                    ((y * 255) / size) as u8,
                    (((x + y) * 128) / size) as u8,
                ]),
            );
        }
    }
    img
}

fn bench_analyzers(c: &mut Criterion) {
    let img = fixture(256);
    let mut group = c.benchmark_group("analyzers");

    group.bench_function("color_extraction", |b| {
        let options = ColorExtractOptions::default();
        b.iter(|| black_box(extract_dominant_colors(&img, &options).unwrap()))
    });

    group.bench_function("tone", |b| b.iter(|| black_box(analyze_tone(&img))));

    group.bench_function("composition", |b| {
        b.iter(|| black_box(analyze_composition(&img)))
    });

    group.bench_function("texture", |b| b.iter(|| black_box(analyze_texture(&img))));

    group.bench_function("scene", |b| b.iter(|| black_box(classify_scene(&img))));

    group.bench_function("harmony", |b| {
        let colors = vec![
            "#3366cc".to_string(),
            "#cc6633".to_string(),
            "#33cc66".to_string(),
        ];
        b.iter(|| black_box(analyze_harmony(&colors)))
    });

    group.finish();
}

fn bench_full_profile(c: &mut Criterion) {
    let img = fixture(256);
    let analyzer = ProfileAnalyzer::default();

    c.bench_function("full_profile_256", |b| {
        b.iter(|| black_box(analyzer.analyze_image(&img, None).unwrap()))
    });
}

fn bench_option_builders(c: &mut Criterion) {
    let mut group = c.benchmark_group("option_builders");

    group.bench_function("ColorExtractOptions::builder", |b| {
        b.iter(|| {
            black_box(
                ColorExtractOptions::builder()
                    .color_count(5)
                    .sample_step(2)
                    .build(),
            )
        })
    });

    group.bench_function("AnalyzeOptions::builder", |b| {
        b.iter(|| black_box(AnalyzeOptions::builder().color_count(5).build()))
    });

    group.finish();
}

criterion_group!(benches, bench_analyzers, bench_full_profile, bench_option_builders);
criterion_main!(benches);
