use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use scene_features::detection::{canny_edges, grayscale, ProbabilisticHough};
use scene_features::{FeatureAssembler, ImagePreprocessor};

fn synthetic_photo() -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(1024, 768, |x, y| {
        if y < 300 {
            Rgb([90, 150, (200 + x % 40) as u8])
        } else if (x / 64 + y / 64) % 2 == 0 {
            Rgb([40, (120 + y % 60) as u8, 50])
        } else {
            Rgb([180, 140, 90])
        }
    }))
}

fn benchmark_feature_extraction(c: &mut Criterion) {
    let image = synthetic_photo();
    let preprocessor = ImagePreprocessor::default();
    let assembler = FeatureAssembler::default();

    c.bench_function("prepare_image", |b| {
        b.iter(|| preprocessor.prepare_image(black_box(&image)))
    });

    let prepared = match preprocessor.prepare_image(&image) {
        Ok(prepared) => prepared,
        Err(error) => panic!("benchmark image failed to prepare: {}", error),
    };

    c.bench_function("analyze_prepared", |b| {
        b.iter(|| assembler.analyze_prepared(black_box(&prepared)).features())
    });

    let gray = grayscale(&prepared);
    let edges = match canny_edges(&gray, 2.0, 0.1, 0.2) {
        Ok(edges) => edges,
        Err(error) => panic!("canny failed: {}", error),
    };
    let hough = ProbabilisticHough::default();
    c.bench_function("probabilistic_hough", |b| {
        b.iter(|| hough.detect(black_box(&edges)).len())
    });
}

criterion_group!(benches, benchmark_feature_extraction);
criterion_main!(benches);
