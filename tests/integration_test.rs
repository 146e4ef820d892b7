//! Integration tests for the complete feature extraction pipeline
//!
//! These tests validate the end-to-end workflow on synthetic images written
//! to a temporary directory:
//! - Decoding and canonical preprocessing
//! - Color statistics and white balance labels
//! - Spatial tile ratios
//! - Schema stability and idempotence
//! - Fail-soft handling of corrupt files

use image::{Rgb, RgbImage};
use scene_features::batch::analyze_folder;
use scene_features::features::feature_keys;
use scene_features::spatial::grid_tiles;
use scene_features::{
    extract_features, AnalysisError, ColorName, ColorStatistics, FailureKind, FeatureAssembler,
    FeatureVector, ImagePreprocessor, PipelineConfig, ReportBuilder, SpatialDistribution,
    WhiteBalanceTone,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_png(dir: &TempDir, name: &str, image: &RgbImage) -> PathBuf {
    let path = dir.path().join(name);
    image.save(&path).unwrap();
    path
}

fn checkerboard() -> RgbImage {
    RgbImage::from_fn(150, 150, |x, y| {
        if (x / 10 + y / 10) % 2 == 0 {
            Rgb([0, 255, 0])
        } else {
            Rgb([0, 0, 255])
        }
    })
}

fn outlined_square() -> RgbImage {
    RgbImage::from_fn(150, 150, |x, y| {
        let on_edge = |v: u32| (25..28).contains(&v) || (122..125).contains(&v);
        let inside = |v: u32| (25..125).contains(&v);
        if (on_edge(x) && inside(y)) || (on_edge(y) && inside(x)) {
            Rgb([255, 255, 255])
        } else {
            Rgb([20, 20, 20])
        }
    })
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_uniform_red_image() {
    let dir = TempDir::new().unwrap();
    let path = write_png(&dir, "red.png", &RgbImage::from_pixel(150, 150, Rgb([255, 0, 0])));
    let stats = ColorStatistics::default();

    let avg = *stats.average_hsv(path.as_path()).value();
    assert!(avg.hue.abs() < 1e-9);
    assert!((avg.saturation - 100.0).abs() < 1e-9);
    assert!((avg.value - 100.0).abs() < 1e-9);

    let colors = stats.dominant_colors(path.as_path()).into_value();
    assert_eq!(colors[0].name, Some(ColorName::Red));
    assert_eq!(colors[0].percentage, 100.0);
    assert_eq!(colors[0].mean_hue, 0.0);

    let wb = *stats.white_balance(path.as_path()).value();
    assert!((wb.red - 3.0).abs() < 1e-9);
    assert_eq!(wb.green, 0.0);
    assert_eq!(wb.blue, 0.0);
    assert_eq!(wb.tone, Some(WhiteBalanceTone::Warm));
}

#[test]
fn test_uniform_gray_image() {
    let dir = TempDir::new().unwrap();
    let path = write_png(&dir, "gray.png", &RgbImage::from_pixel(150, 150, Rgb([128, 128, 128])));

    let extraction = extract_features(&path);
    assert!(extraction.is_complete(), "{:?}", extraction.diagnostics);
    assert_eq!(extraction.features.get_f64("avg_sat"), Some(0.0));

    let wb = *ColorStatistics::default().white_balance(path.as_path()).value();
    assert_eq!(wb.tone, Some(WhiteBalanceTone::Neutral));

    let tiles = SpatialDistribution::default().distribution(path.as_path()).into_value();
    assert_eq!(tiles.len(), 9);
    assert!(tiles.iter().all(|t| t.ratios.gray == 1.0));
}

#[test]
fn test_green_blue_checkerboard() {
    let dir = TempDir::new().unwrap();
    let path = write_png(&dir, "checker.png", &checkerboard());

    let colors = ColorStatistics::default().dominant_colors(path.as_path()).into_value();
    let allowed = [ColorName::Green, ColorName::Cyan, ColorName::Blue];
    assert!(colors
        .iter()
        .filter_map(|c| c.name)
        .all(|name| allowed.contains(&name)));

    let tiles = SpatialDistribution::default().distribution(path.as_path()).into_value();
    for tile in &tiles {
        let sum = tile.ratios.green + tile.ratios.blue;
        assert!((sum - 1.0).abs() < 1e-6, "tile {} sums to {}", tile.tile.label(), sum);
        assert_eq!(tile.ratios.warm, 0.0);
    }
}

#[test]
fn test_corrupt_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("corrupt.jpg");
    std::fs::write(&path, b"\xFF\xD8 definitely not a jpeg").unwrap();

    let extraction = extract_features(&path);
    assert_eq!(extraction.features, FeatureVector::with_schema_defaults());
    assert_eq!(extraction.diagnostics.len(), 10);
    assert!(extraction
        .diagnostics
        .iter()
        .all(|d| d.kind == FailureKind::Decode));

    let report = ReportBuilder::new(&PipelineConfig::default()).unwrap().build(&path);
    assert_eq!(report.dynamic_range.range, 0.0);
    assert!(report.white_balance_label.starts_with("Error"));
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"hello").unwrap();

    let result = ImagePreprocessor::default().prepare(&path);
    assert!(matches!(result, Err(AnalysisError::UnsupportedFormat { .. })));
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_schema_stability_across_images() {
    let dir = TempDir::new().unwrap();
    let red = write_png(&dir, "red.png", &RgbImage::from_pixel(80, 40, Rgb([255, 0, 0])));
    let checker = write_png(&dir, "checker.png", &checkerboard());

    let a = extract_features(&red).features;
    let b = extract_features(&checker).features;
    assert!(a.keys().eq(b.keys()));
    assert!(a.keys().eq(feature_keys().iter().map(String::as_str)));
}

#[test]
fn test_pipeline_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = write_png(&dir, "square.png", &outlined_square());
    let assembler = FeatureAssembler::default();

    let first = assembler.extract(&path);
    let second = assembler.extract(&path);
    assert_eq!(first.features, second.features);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[test]
fn test_square_outline_has_structure() {
    let dir = TempDir::new().unwrap();
    let path = write_png(&dir, "square.png", &outlined_square());

    let features = extract_features(&path).features;
    assert!(features.get_f64("line_count").unwrap() > 0.0);
    assert!(features.get_f64("edge_density").unwrap() > 0.0);
}

#[test]
fn test_dynamic_range_ordering() {
    let dir = TempDir::new().unwrap();
    let path = write_png(
        &dir,
        "gradient.png",
        &RgbImage::from_fn(256, 64, |x, _| Rgb([x as u8, x as u8, x as u8])),
    );

    let dr = *ColorStatistics::default().dynamic_range(path.as_path()).value();
    assert!(dr.min <= dr.max);
    assert!((dr.range - (dr.max - dr.min)).abs() < 0.11);
    assert!(dr.range > 0.0);
}

#[test]
fn test_tiles_cover_canonical_raster() {
    for (w, h) in [(150, 150), (100, 77), (3, 3), (200, 151)] {
        let tiles = grid_tiles(w, h);
        let total: usize = tiles.iter().map(|t| t.pixel_count()).sum();
        assert_eq!(total, (w * h) as usize, "{}x{}", w, h);
        for y in 0..h {
            for x in 0..w {
                assert_eq!(tiles.iter().filter(|t| t.contains(x, y)).count(), 1);
            }
        }
    }
}

#[test]
fn test_spatial_ratios_in_unit_range() {
    let dir = TempDir::new().unwrap();
    let image = RgbImage::from_fn(150, 150, |x, y| Rgb([(x * 7 % 256) as u8, (y * 3) as u8, 90]));
    let path = write_png(&dir, "noise.png", &image);

    let tiles = SpatialDistribution::default().distribution(path.as_path()).into_value();
    for tile in tiles {
        for value in [tile.ratios.green, tile.ratios.blue, tile.ratios.warm, tile.ratios.gray] {
            assert!((0.0..=1.0).contains(&value));
        }
    }
}

// ============================================================================
// Configuration and batch
// ============================================================================

#[test]
fn test_config_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let mut config = PipelineConfig::default();
    config.color.top_colors = 5;

    config.to_json_file(&path).unwrap();
    let loaded = PipelineConfig::from_json_file(&path).unwrap();
    assert_eq!(loaded, config);

    let report = ReportBuilder::new(&loaded)
        .unwrap()
        .build(Path::new("missing.png"));
    assert_eq!(report.top_colors.len(), 5);
}

#[test]
fn test_batch_reports_in_path_order() {
    let dir = TempDir::new().unwrap();
    write_png(&dir, "b_checker.png", &checkerboard());
    write_png(&dir, "a_red.png", &RgbImage::from_pixel(40, 40, Rgb([255, 0, 0])));
    std::fs::write(dir.path().join("c_broken.jpg"), b"nope").unwrap();

    let reports = analyze_folder(dir.path(), &PipelineConfig::default(), None).unwrap();
    let names: Vec<&str> = reports.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(names, vec!["a_red.png", "b_checker.png", "c_broken.jpg"]);
    assert!(reports[2].camera_error.is_some() || !reports[2].diagnostics.is_empty());
}
