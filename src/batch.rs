//! Folder-level processing
//!
//! Images are independent, so a folder is processed with a rayon parallel
//! iterator; each worker prepares its own image. A failing image still
//! produces a report (with defaults and diagnostics) and never aborts the
//! batch.

use crate::config::PipelineConfig;
use crate::error::{AnalysisError, Result};
use crate::features::{ImageReport, ReportBuilder, SceneClassifier};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Extensions picked up when scanning a folder
pub const BATCH_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Image files directly inside `dir`, sorted by path
///
/// # Errors
///
/// Returns `AnalysisError::ImageLoadError` if the directory cannot be read.
pub fn find_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        AnalysisError::image_load(format!("Failed to read directory: {}", dir.display()), e)
    })?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| {
                AnalysisError::image_load(format!("Failed to list directory: {}", dir.display()), e)
            })?
            .path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| BATCH_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if supported && path.is_file() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Reports for every image of a folder, in path order
///
/// # Errors
///
/// Fails only on an invalid configuration or an unreadable directory.
pub fn analyze_folder(
    dir: &Path,
    config: &PipelineConfig,
    classifier: Option<Arc<dyn SceneClassifier>>,
) -> Result<Vec<ImageReport>> {
    let mut builder = ReportBuilder::new(config)?;
    if let Some(classifier) = classifier {
        builder = builder.with_classifier(classifier);
    }

    let images = find_images(dir)?;
    info!(folder = %dir.display(), count = images.len(), "analyzing folder");

    let reports: Vec<ImageReport> = images
        .par_iter()
        .map(|path| {
            debug!(path = %path.display(), "analyzing image");
            builder.build(path)
        })
        .collect();

    let failed = reports.iter().filter(|r| !r.diagnostics.is_empty()).count();
    info!(analyzed = reports.len(), with_diagnostics = failed, "folder analysis finished");
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_find_images_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.JPG", "c.jpeg", "notes.txt", "d.gif"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let names: Vec<String> = find_images(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png", "c.jpeg"]);
    }

    #[test]
    fn test_find_images_missing_dir() {
        let result = find_images(Path::new("no/such/folder"));
        assert!(matches!(result, Err(AnalysisError::ImageLoadError { .. })));
    }

    #[test]
    fn test_analyze_folder_survives_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(60, 60, Rgb([0, 200, 0]))
            .save(dir.path().join("green.png"))
            .unwrap();
        fs::write(dir.path().join("broken.png"), b"garbage").unwrap();

        let reports = analyze_folder(dir.path(), &PipelineConfig::default(), None).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].file_name, "broken.png");
        assert!(!reports[0].diagnostics.is_empty());
        assert_eq!(reports[1].file_name, "green.png");
        assert!(reports[1].diagnostics.is_empty());
        assert_eq!(reports[1].top_colors[0].label(), "Green");
    }

    #[test]
    fn test_analyze_folder_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.preprocessing.canonical_width = 0;
        assert!(analyze_folder(dir.path(), &config, None).is_err());
    }
}
