// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Studio name printed at the top of every consent form.
    pub studio_name: String,
    /// Paper size for generated consent forms.
    pub default_paper_size: crate::PaperSize,
    /// Enable audit trail logging.
    pub audit_enabled: bool,
    /// Encrypt ID images and signed forms at rest (needs a passphrase).
    pub encryption_enabled: bool,
    /// Scans whose mean OCR line confidence falls below this are rejected.
    pub min_ocr_confidence: f32,
    /// Binarize the ID image before handing it to the OCR engine.
    pub binarize_before_ocr: bool,
    /// Image quality gate applied before OCR.
    pub quality: QualityThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            studio_name: "Inkform Studio".into(),
            default_paper_size: crate::PaperSize::Letter,
            audit_enabled: true,
            encryption_enabled: true,
            min_ocr_confidence: 0.5,
            binarize_before_ocr: false,
            quality: QualityThresholds::default(),
        }
    }
}

/// Limits an ID photo must meet before OCR is attempted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub min_width: u32,
    pub min_height: u32,
    /// Mean luminance (0–255) below which the photo is too dark.
    pub min_mean_luma: f32,
    /// Mean luminance (0–255) above which the photo is washed out.
    pub max_mean_luma: f32,
    /// Minimum standard deviation of luminance.
    pub min_contrast: f32,
    /// Minimum variance of the Laplacian; lower means blurry.
    pub min_sharpness: f32,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_width: 320,
            min_height: 200,
            min_mean_luma: 40.0,
            max_mean_luma: 235.0,
            min_contrast: 18.0,
            min_sharpness: 30.0,
        }
    }
}
