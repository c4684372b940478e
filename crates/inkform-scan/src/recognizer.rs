// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition seam. The scan pipeline only ever talks to a
// `TextRecognizer`; the bundled `ocrs` engine, a platform OCR service on the
// host device, and test fakes all plug in here.

use image::DynamicImage;
use inkform_core::error::Result;

/// One line of recognised text, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedLine {
    pub text: String,
    /// Engine confidence in `0.0..=1.0`, when the engine reports one.
    pub confidence: Option<f32>,
}

impl RecognizedLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence: None,
        }
    }

    /// A scored line. Scores are clamped to `0.0..=1.0`; a NaN score counts
    /// as zero so it can never slip past the confidence gate.
    pub fn with_confidence(text: impl Into<String>, confidence: f32) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            text: text.into(),
            confidence: Some(confidence),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognizedText {
    pub lines: Vec<RecognizedLine>,
}

impl RecognizedText {
    pub fn from_lines(lines: Vec<RecognizedLine>) -> Self {
        Self { lines }
    }

    /// True when no line carries any non-whitespace text.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.text.trim().is_empty())
    }

    /// Mean confidence over the lines that report one. `None` when no line
    /// does, in which case the confidence gate is skipped.
    pub fn mean_confidence(&self) -> Option<f32> {
        let scores: Vec<f32> = self.lines.iter().filter_map(|l| l.confidence).collect();
        if scores.is_empty() {
            return None;
        }
        Some(scores.iter().sum::<f32>() / scores.len() as f32)
    }
}

/// Something that can read the text off an image.
///
/// Errors map onto scan failures: [`inkform_core::InkformError::OcrUnavailable`]
/// means the engine could not be reached at all, anything else means
/// recognition itself failed.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &DynamicImage) -> Result<RecognizedText>;

    /// Short engine name for logs.
    fn name(&self) -> &str {
        "unnamed"
    }
}

/// Stand-in for hosts without an on-device engine. Every image fails with
/// [`inkform_core::InkformError::OcrUnavailable`]; text recognised elsewhere
/// can still go through [`crate::IdScanner::scan_lines`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRecognizer;

impl TextRecognizer for NoRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<RecognizedText> {
        Err(inkform_core::InkformError::OcrUnavailable(
            "no OCR engine is configured".into(),
        ))
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_ignores_lines_without_scores() {
        let text = RecognizedText::from_lines(vec![
            RecognizedLine::with_confidence("NAME: A", 0.9),
            RecognizedLine::new("NOISE"),
            RecognizedLine::with_confidence("DOB: 1/1/1990", 0.5),
        ]);
        let mean = text.mean_confidence().unwrap();
        assert!((mean - 0.7).abs() < 1e-6);
    }

    #[test]
    fn no_scores_means_no_mean() {
        let text = RecognizedText::from_lines(vec![RecognizedLine::new("X")]);
        assert_eq!(text.mean_confidence(), None);
    }

    #[test]
    fn whitespace_lines_are_blank() {
        let text = RecognizedText::from_lines(vec![RecognizedLine::new("  "), RecognizedLine::new("")]);
        assert!(text.is_blank());
        assert!(RecognizedText::default().is_blank());
    }

    #[test]
    fn no_recognizer_is_unavailable() {
        let img = DynamicImage::new_luma8(4, 4);
        assert!(matches!(
            NoRecognizer.recognize(&img),
            Err(inkform_core::InkformError::OcrUnavailable(_))
        ));
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(RecognizedLine::with_confidence("x", 1.7).confidence, Some(1.0));
        assert_eq!(RecognizedLine::with_confidence("x", f32::NEG_INFINITY).confidence, Some(0.0));
    }

    #[test]
    fn nan_confidence_counts_as_zero() {
        let text = RecognizedText::from_lines(vec![
            RecognizedLine::with_confidence("NAME: A", f32::NAN),
            RecognizedLine::with_confidence("ID NO: 1", 0.8),
        ]);
        let mean = text.mean_confidence().unwrap();
        assert!((mean - 0.4).abs() < 1e-6);
        assert!(mean < 0.5);
    }
}
