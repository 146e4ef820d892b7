//! Progressive probabilistic Hough transform
//!
//! Edge points are visited in a shuffled order. Each point votes in a
//! (rho, theta) accumulator; once a cell reaches the vote threshold the
//! corresponding line is walked in both directions from the point,
//! bridging gaps of at most `max_line_gap` pixels. Segments at least
//! `min_line_length` long are kept and their points withdraw their votes.
//! Every walked point is removed from further consideration.
//!
//! The visiting order comes from a seeded RNG, so the same edge map always
//! yields the same segments.

use crate::config::StructuralConfig;
use crate::constants::structural::{HOUGH_ANGLES, WALK_SHIFT};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::f64::consts::PI;

/// A detected segment between two pixel positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub start: (i64, i64),
    pub end: (i64, i64),
}

impl LineSegment {
    /// Larger of the horizontal and vertical extent
    pub fn extent(&self) -> i64 {
        (self.end.0 - self.start.0)
            .abs()
            .max((self.end.1 - self.start.1).abs())
    }
}

/// Line segment detector over binary edge maps
#[derive(Debug, Clone)]
pub struct ProbabilisticHough {
    threshold: u32,
    min_line_length: u32,
    max_line_gap: u32,
    seed: u64,
    cos: Vec<f64>,
    sin: Vec<f64>,
}

impl ProbabilisticHough {
    pub fn new(threshold: u32, min_line_length: u32, max_line_gap: u32, seed: u64) -> Self {
        // HOUGH_ANGLES angles over [-90°, 90°)
        let thetas: Vec<f64> = (0..HOUGH_ANGLES)
            .map(|j| -PI / 2.0 + j as f64 * PI / HOUGH_ANGLES as f64)
            .collect();
        Self {
            threshold,
            min_line_length,
            max_line_gap,
            seed,
            cos: thetas.iter().map(|t| t.cos()).collect(),
            sin: thetas.iter().map(|t| t.sin()).collect(),
        }
    }

    pub fn from_config(config: &StructuralConfig) -> Self {
        Self::new(
            config.hough_threshold,
            config.min_line_length,
            config.max_line_gap,
            config.line_seed,
        )
    }

    /// Detect segments in an edge map (non-zero = edge)
    pub fn detect(&self, edges: &GrayImage) -> Vec<LineSegment> {
        let width = edges.width() as i64;
        let height = edges.height() as i64;
        let mut segments = Vec::new();
        if width == 0 || height == 0 {
            return segments;
        }

        let angles = self.cos.len();
        let offset = ((width * width + height * height) as f64).sqrt().ceil() as i64;
        let mut accumulator = vec![0i32; (2 * offset + 1) as usize * angles];
        let mut mask: Vec<bool> = edges.as_raw().iter().map(|&v| v > 0).collect();
        let at = |x: i64, y: i64| (y * width + x) as usize;
        let cell = |rho: i64, j: usize| (rho + offset) as usize * angles + j;

        let mut points: Vec<(i64, i64)> = edges
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0[0] > 0)
            .map(|(x, y, _)| (x as i64, y as i64))
            .collect();
        points.shuffle(&mut StdRng::seed_from_u64(self.seed));

        let threshold = self.threshold as i32;
        let max_gap = self.max_line_gap as i64;
        let min_length = self.min_line_length as i64;
        let one = 1i64 << WALK_SHIFT;
        let half = 1i64 << (WALK_SHIFT - 1);

        for (x, y) in points {
            if !mask[at(x, y)] {
                continue;
            }

            let mut best = threshold - 1;
            let mut best_theta = None;
            for j in 0..angles {
                let slot = cell(self.rho(j, x, y), j);
                accumulator[slot] += 1;
                if accumulator[slot] > best {
                    best = accumulator[slot];
                    best_theta = Some(j);
                }
            }
            let Some(theta) = best_theta else {
                continue;
            };

            // walk along the line direction in fixed point on the minor axis
            let a = -self.sin[theta];
            let b = self.cos[theta];
            let x_major = a.abs() > b.abs();
            let (x0, y0, dx0, dy0) = if x_major {
                let dx0 = if a > 0.0 { 1 } else { -1 };
                let dy0 = (b * one as f64 / a.abs()).round() as i64;
                (x, (y << WALK_SHIFT) + half, dx0, dy0)
            } else {
                let dy0 = if b > 0.0 { 1 } else { -1 };
                let dx0 = (a * one as f64 / b.abs()).round() as i64;
                ((x << WALK_SHIFT) + half, y, dx0, dy0)
            };
            let locate = |px: i64, py: i64| {
                if x_major {
                    (px, py >> WALK_SHIFT)
                } else {
                    (px >> WALK_SHIFT, py)
                }
            };
            let inside = |(px, py): (i64, i64)| px >= 0 && px < width && py >= 0 && py < height;

            let mut line_end = [(x, y); 2];
            for (k, end) in line_end.iter_mut().enumerate() {
                let sign = if k == 0 { 1 } else { -1 };
                let (mut px, mut py) = (x0, y0);
                let mut gap = 0;
                loop {
                    let point = locate(px, py);
                    if !inside(point) {
                        break;
                    }
                    gap += 1;
                    if mask[at(point.0, point.1)] {
                        gap = 0;
                        *end = point;
                    } else if gap > max_gap {
                        break;
                    }
                    px += dx0 * sign;
                    py += dy0 * sign;
                }
            }

            let good_line = (line_end[1].1 - line_end[0].1).abs() >= min_length
                || (line_end[1].0 - line_end[0].0).abs() >= min_length;

            for (k, end) in line_end.iter().enumerate() {
                let sign = if k == 0 { 1 } else { -1 };
                let (mut px, mut py) = (x0, y0);
                loop {
                    let point = locate(px, py);
                    if !inside(point) {
                        break;
                    }
                    let index = at(point.0, point.1);
                    if mask[index] {
                        if good_line {
                            for j in 0..angles {
                                accumulator[cell(self.rho(j, point.0, point.1), j)] -= 1;
                            }
                        }
                        mask[index] = false;
                    }
                    if point == *end {
                        break;
                    }
                    px += dx0 * sign;
                    py += dy0 * sign;
                }
            }

            if good_line {
                segments.push(LineSegment {
                    start: line_end[0],
                    end: line_end[1],
                });
            }
        }

        segments
    }

    fn rho(&self, j: usize, x: i64, y: i64) -> i64 {
        (self.cos[j] * x as f64 + self.sin[j] * y as f64).round() as i64
    }
}

impl Default for ProbabilisticHough {
    fn default() -> Self {
        Self::from_config(&StructuralConfig::default())
    }
}
