// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image quality gate: cheap statistics that tell us whether an ID photo is
// worth sending to the OCR engine at all.

use image::{DynamicImage, GrayImage};
use inkform_core::config::QualityThresholds;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Measurements taken from one photo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub width: u32,
    pub height: u32,
    /// Mean luminance, 0–255.
    pub mean_luma: f32,
    /// Standard deviation of luminance.
    pub contrast: f32,
    /// Variance of the 4-neighbour Laplacian. Sharp edges push this up.
    pub sharpness: f32,
}

/// The first threshold a photo failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityIssue {
    TooSmall,
    TooDark,
    TooBright,
    LowContrast,
    Blurry,
}

impl QualityIssue {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::TooSmall => "Image resolution is too low",
            Self::TooDark => "Image is too dark",
            Self::TooBright => "Image is overexposed",
            Self::LowContrast => "Image has too little contrast",
            Self::Blurry => "Image is blurry",
        }
    }
}

impl QualityReport {
    /// Measure `image`.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn measure(image: &DynamicImage) -> Self {
        let gray = image.to_luma8();
        let (mean_luma, contrast) = luma_stats(&gray);
        let sharpness = laplacian_variance(&gray);

        let report = Self {
            width: gray.width(),
            height: gray.height(),
            mean_luma,
            contrast,
            sharpness,
        };
        debug!(?report, "image quality measured");
        report
    }

    /// Check the report against `limits`, returning the first failure.
    pub fn check(&self, limits: &QualityThresholds) -> Result<(), QualityIssue> {
        if self.width < limits.min_width || self.height < limits.min_height {
            return Err(QualityIssue::TooSmall);
        }
        if self.mean_luma < limits.min_mean_luma {
            return Err(QualityIssue::TooDark);
        }
        if self.mean_luma > limits.max_mean_luma {
            return Err(QualityIssue::TooBright);
        }
        if self.contrast < limits.min_contrast {
            return Err(QualityIssue::LowContrast);
        }
        if self.sharpness < limits.min_sharpness {
            return Err(QualityIssue::Blurry);
        }
        Ok(())
    }
}

fn luma_stats(gray: &GrayImage) -> (f32, f32) {
    let n = gray.as_raw().len();
    if n == 0 {
        return (0.0, 0.0);
    }
    let (sum, sum_sq) = gray.as_raw().iter().fold((0f64, 0f64), |(s, sq), &p| {
        let v = p as f64;
        (s + v, sq + v * v)
    });
    let mean = sum / n as f64;
    let variance = (sum_sq / n as f64 - mean * mean).max(0.0);
    (mean as f32, variance.sqrt() as f32)
}

fn laplacian_variance(gray: &GrayImage) -> f32 {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 {
        return 0.0;
    }

    let px = |x: u32, y: u32| gray.get_pixel(x, y).0[0] as f64;
    let mut sum = 0f64;
    let mut sum_sq = 0f64;
    let mut count = 0f64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let lap = px(x - 1, y) + px(x + 1, y) + px(x, y - 1) + px(x, y + 1) - 4.0 * px(x, y);
            sum += lap;
            sum_sq += lap * lap;
            count += 1.0;
        }
    }

    let mean = sum / count;
    (sum_sq / count - mean * mean).max(0.0) as f32
}
