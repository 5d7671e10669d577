use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use img_budget::budget::BudgetSpec;
use img_budget::catalog::build_catalog;
use img_budget::paths::ScratchDir;
use img_budget::planner::{plan_resize, scaled_dimensions};
use img_budget::CompressionRatio;
use indicatif::ProgressBar;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tempfile::TempDir;

fn create_test_images(count: u32, width: u32, height: u32) -> (Vec<PathBuf>, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let paths = (0..count)
        .map(|i| {
            let path = temp_dir.path().join(format!("img_{}.png", i));
            let img = RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x * 7 + i) as u8, (y * 13) as u8, ((x ^ y) + i) as u8])
            });
            DynamicImage::ImageRgb8(img)
                .save_with_format(&path, ImageFormat::Png)
                .unwrap();
            path
        })
        .collect();
    (paths, temp_dir)
}

fn bench_budget_resolution(c: &mut Criterion) {
    let spec = BudgetSpec::new(50_000, 0).unwrap();
    let files = NonZeroUsize::new(137).unwrap();

    c.bench_function("budget_resolution", |b| {
        b.iter(|| black_box(spec).resolve(black_box(files)))
    });
}

fn bench_plan_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_resize");

    for (width, height) in [(640u32, 480u32), (1920, 1080), (4000, 3000), (8000, 6000)] {
        let pixels = u64::from(width) * u64::from(height);
        let normalized = pixels * 3;
        let ratio = CompressionRatio::new(normalized, pixels);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| plan_resize(black_box(w), black_box(h), normalized, ratio, black_box(500_000)))
            },
        );
    }

    group.finish();
}

fn bench_scaled_dimensions(c: &mut Criterion) {
    c.bench_function("scaled_dimensions", |b| {
        b.iter(|| scaled_dimensions(black_box(4000), black_box(3000), black_box(1_666_666.0)))
    });
}

fn bench_build_catalog(c: &mut Criterion) {
    let (paths, _input_dir) = create_test_images(8, 128, 96);
    let output_dir = TempDir::new().unwrap();
    let scratch = ScratchDir::create(output_dir.path()).unwrap();
    let progress = ProgressBar::hidden();

    c.bench_function("build_catalog", |b| {
        b.iter(|| build_catalog(black_box(&paths), &scratch, &progress))
    });
}

criterion_group!(
    benches,
    bench_budget_resolution,
    bench_plan_resize,
    bench_scaled_dimensions,
    bench_build_catalog
);
criterion_main!(benches);
