//! Edge maps of the grayscale canonical raster
//!
//! Intensities are treated on a [0, 1] scale so densities and thresholds
//! do not depend on the 8-bit encoding.

use crate::constants::canonical::CHANNEL_MAX;
use crate::constants::structural::{IMAGEPROC_CANNY_SIGMA, SOBEL_NORMALISATION};
use crate::error::{AnalysisError, Result};
use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

/// Mean Sobel gradient magnitude, in [0, 1]
///
/// Each pixel contributes `sqrt((gx² + gy²) / 2)` with the Sobel taps
/// normalised to unit weight.
pub fn edge_density(gray: &GrayImage) -> Result<f64> {
    let pixels = gray.width() as usize * gray.height() as usize;
    if pixels == 0 {
        return Err(AnalysisError::degenerate("grayscale raster is empty"));
    }

    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let scale = SOBEL_NORMALISATION * CHANNEL_MAX as f64;

    let total: f64 = gx
        .as_raw()
        .iter()
        .zip(gy.as_raw())
        .map(|(&x, &y)| {
            let (x, y) = (x as f64 / scale, y as f64 / scale);
            ((x * x + y * y) / 2.0).sqrt()
        })
        .sum();

    Ok(total / pixels as f64)
}

/// Binary Canny edge map (255 = edge)
///
/// `sigma` is the total Gaussian smoothing; the detector's own smoothing
/// is topped up with a pre-blur when `sigma` exceeds it. Thresholds are
/// fractions of full scale.
pub fn canny_edges(gray: &GrayImage, sigma: f32, low: f32, high: f32) -> Result<GrayImage> {
    if !(low >= 0.0 && low <= high) {
        return Err(AnalysisError::invalid_parameter(
            "canny_thresholds",
            format!("{}..{}", low, high),
        ));
    }
    if gray.width() == 0 || gray.height() == 0 {
        return Err(AnalysisError::degenerate("grayscale raster is empty"));
    }

    let extra = sigma * sigma - IMAGEPROC_CANNY_SIGMA * IMAGEPROC_CANNY_SIGMA;
    let smoothed;
    let input = if extra > 0.0 {
        smoothed = gaussian_blur_f32(gray, extra.sqrt());
        &smoothed
    } else {
        gray
    };

    Ok(canny(input, low * CHANNEL_MAX, high * CHANNEL_MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_flat_image_has_no_edges() {
        let flat = GrayImage::from_pixel(40, 40, Luma([90]));
        assert_eq!(edge_density(&flat).unwrap(), 0.0);
        let edges = canny_edges(&flat, 2.0, 0.1, 0.2).unwrap();
        assert!(edges.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_step_edge_density() {
        let step = GrayImage::from_fn(40, 40, |x, _| Luma([if x < 20 { 0 } else { 255 }]));
        let density = edge_density(&step).unwrap();
        assert!(density > 0.0 && density <= 1.0);

        let finer = GrayImage::from_fn(40, 40, |x, _| Luma([if x % 4 < 2 { 0 } else { 255 }]));
        assert!(edge_density(&finer).unwrap() > density);
    }

    #[test]
    fn test_canny_finds_vertical_step() {
        let step = GrayImage::from_fn(60, 60, |x, _| Luma([if x < 30 { 20 } else { 230 }]));
        let edges = canny_edges(&step, 2.0, 0.1, 0.2).unwrap();
        let on_edge = (10..50).filter(|&y| (27..33).any(|x| edges.get_pixel(x, y).0[0] > 0)).count();
        assert_eq!(on_edge, 40);
        assert!(edges.get_pixel(5, 30).0[0] == 0);
    }

    #[test]
    fn test_canny_rejects_inverted_thresholds() {
        let flat = GrayImage::new(10, 10);
        assert!(canny_edges(&flat, 2.0, 0.3, 0.2).is_err());
    }

    #[test]
    fn test_empty_raster() {
        assert!(edge_density(&GrayImage::new(0, 0)).is_err());
    }
}
