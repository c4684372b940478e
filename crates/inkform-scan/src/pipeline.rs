// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end ID scan: bytes in, `ScanOutcome` out.

use std::sync::Arc;

use image::{DynamicImage, ImageFormat};
use inkform_core::config::{AppConfig, QualityThresholds};
use inkform_core::error::InkformError;
use inkform_core::types::ScanErrorKind;
use tracing::{info, instrument, warn};

use crate::outcome::ScanOutcome;
use crate::parser::{normalize_line, parse_lines};
use crate::preprocess::prepare_for_ocr;
use crate::quality::QualityReport;
use crate::recognizer::TextRecognizer;
use crate::validator::{is_valid, missing_fields_message, missing_requirements};

/// The subset of [`AppConfig`] the scanner reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub quality: QualityThresholds,
    pub min_ocr_confidence: f32,
    pub binarize: bool,
}

impl From<&AppConfig> for ScanSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            quality: config.quality.clone(),
            min_ocr_confidence: config.min_ocr_confidence,
            binarize: config.binarize_before_ocr,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

/// A scan outcome plus the image measurements taken on the way, when the
/// image got far enough to be measured.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    pub quality: Option<QualityReport>,
}

impl ScanReport {
    fn early(outcome: ScanOutcome) -> Self {
        Self {
            outcome,
            quality: None,
        }
    }
}

/// Runs photos of ID documents through quality gate, OCR, parsing and
/// validation. Cheap to clone; the recognizer is shared.
#[derive(Clone)]
pub struct IdScanner {
    settings: ScanSettings,
    recognizer: Arc<dyn TextRecognizer>,
}

impl IdScanner {
    pub fn new(settings: ScanSettings, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self {
            settings,
            recognizer,
        }
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Scan an encoded photo (PNG, JPEG, ...).
    pub fn scan(&self, image_bytes: &[u8]) -> ScanOutcome {
        self.scan_detailed(image_bytes).outcome
    }

    #[instrument(skip_all, fields(bytes = image_bytes.len(), engine = self.recognizer.name()))]
    pub fn scan_detailed(&self, image_bytes: &[u8]) -> ScanReport {
        let format = match image::guess_format(image_bytes) {
            Ok(format) => format,
            Err(err) => {
                warn!(%err, "unrecognised image format");
                return ScanReport::early(ScanOutcome::failure(
                    ScanErrorKind::InvalidFormat,
                    "The file is not a supported image format",
                ));
            }
        };

        let image = match image::load_from_memory_with_format(image_bytes, format) {
            Ok(image) => image,
            Err(err) => {
                warn!(%err, ?format, "image decode failed");
                return ScanReport::early(ScanOutcome::failure(
                    ScanErrorKind::ImageConversion,
                    format!("The image could not be read: {err}"),
                ));
            }
        };

        self.scan_image(&image, format)
    }

    fn scan_image(&self, image: &DynamicImage, format: ImageFormat) -> ScanReport {
        let quality = QualityReport::measure(image);
        if let Err(issue) = quality.check(&self.settings.quality) {
            info!(?issue, ?format, "photo rejected by quality gate");
            return ScanReport {
                outcome: ScanOutcome::failure(ScanErrorKind::PoorQuality, issue.describe()),
                quality: Some(quality),
            };
        }

        let prepared = prepare_for_ocr(image, self.settings.binarize);
        let outcome = match self.recognizer.recognize(&prepared) {
            Ok(text) => {
                if text.is_blank() {
                    ScanOutcome::failure(
                        ScanErrorKind::NoTextFound,
                        "No text was found on the document",
                    )
                } else if let Some(mean) = text
                    .mean_confidence()
                    .filter(|&mean| mean < self.settings.min_ocr_confidence)
                {
                    info!(mean, min = self.settings.min_ocr_confidence, "OCR confidence too low");
                    ScanOutcome::failure(
                        ScanErrorKind::LowConfidence,
                        format!("The text could not be read reliably ({:.0}% confidence)", mean * 100.0),
                    )
                } else {
                    let lines: Vec<String> = text.lines.into_iter().map(|l| l.text).collect();
                    self.scan_lines(&lines)
                }
            }
            Err(InkformError::OcrUnavailable(reason)) => {
                warn!(%reason, "OCR engine unavailable");
                ScanOutcome::failure(
                    ScanErrorKind::RequestFailed,
                    format!("Text recognition is unavailable: {reason}"),
                )
            }
            Err(err) => {
                warn!(%err, "OCR failed");
                ScanOutcome::failure(
                    ScanErrorKind::RecognitionFailed,
                    format!("Text recognition failed: {err}"),
                )
            }
        };

        ScanReport {
            outcome,
            quality: Some(quality),
        }
    }

    /// Parse and validate text that was recognised elsewhere, e.g. by a
    /// platform OCR service on the host device.
    #[instrument(skip_all, fields(lines = lines.len()))]
    pub fn scan_lines(&self, lines: &[String]) -> ScanOutcome {
        let normalized: Vec<String> = lines
            .iter()
            .map(|l| normalize_line(l))
            .filter(|l| !l.is_empty())
            .collect();
        if normalized.is_empty() {
            return ScanOutcome::failure(
                ScanErrorKind::NoTextFound,
                "No text was found on the document",
            );
        }

        let fields = parse_lines(&normalized);
        if !is_valid(&fields) {
            let missing = missing_requirements(&fields);
            info!(found = fields.len(), missing = missing.len(), "ID scan incomplete");
            return ScanOutcome::failure(
                ScanErrorKind::MissingRequiredFields,
                missing_fields_message(&missing),
            );
        }

        info!(fields = fields.len(), "ID scan succeeded");
        ScanOutcome::success(fields)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{GrayImage, Luma};
    use inkform_core::error::Result;
    use inkform_core::types::IdField;

    use super::*;
    use crate::recognizer::{RecognizedLine, RecognizedText};

    struct FakeRecognizer(Result<RecognizedText>);

    impl TextRecognizer for FakeRecognizer {
        fn recognize(&self, _image: &DynamicImage) -> Result<RecognizedText> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(InkformError::OcrUnavailable(m)) => Err(InkformError::OcrUnavailable(m.clone())),
                Err(other) => Err(InkformError::OcrError(other.to_string())),
            }
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    fn scanner_reading(lines: &[&str]) -> IdScanner {
        let text = RecognizedText::from_lines(lines.iter().map(|l| RecognizedLine::new(*l)).collect());
        IdScanner::new(ScanSettings::default(), Arc::new(FakeRecognizer(Ok(text))))
    }

    fn scanner_failing(err: InkformError) -> IdScanner {
        IdScanner::new(ScanSettings::default(), Arc::new(FakeRecognizer(Err(err))))
    }

    fn png(image: GrayImage) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageLuma8(image)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn card_photo() -> Vec<u8> {
        png(GrayImage::from_fn(400, 260, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 { Luma([20]) } else { Luma([230]) }
        }))
    }

    #[test]
    fn valid_licence_scans_successfully() {
        let scanner = scanner_reading(&["name:  john smith", "ID NO: ab123456", "USA"]);
        let outcome = scanner.scan(&card_photo());
        assert!(outcome.is_success(), "{:?}", outcome.error_message());
        assert_eq!(outcome.extracted_info().get(IdField::Name), Some("JOHN SMITH"));
        assert_eq!(outcome.extracted_info().get(IdField::IdNumber), Some("AB123456"));
    }

    #[test]
    fn detailed_scan_keeps_quality_report() {
        let report = scanner_reading(&["NAME: A B", "ID NO: 1"]).scan_detailed(&card_photo());
        let quality = report.quality.unwrap();
        assert_eq!((quality.width, quality.height), (400, 260));
    }

    #[test]
    fn garbage_bytes_are_invalid_format() {
        let outcome = scanner_reading(&[]).scan(b"definitely not an image");
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::InvalidFormat));
    }

    #[test]
    fn truncated_png_is_conversion_failure() {
        let bytes = card_photo();
        let outcome = scanner_reading(&[]).scan(&bytes[..64]);
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::ImageConversion));
    }

    #[test]
    fn dark_photo_is_poor_quality() {
        let report = scanner_reading(&["NAME: A"]).scan_detailed(&png(GrayImage::from_pixel(400, 260, Luma([3]))));
        assert_eq!(report.outcome.error_kind(), Some(ScanErrorKind::PoorQuality));
        assert_eq!(report.outcome.error_message(), Some("Image is too dark"));
        assert!(report.quality.is_some());
    }

    #[test]
    fn blank_recognition_is_no_text_found() {
        let outcome = scanner_reading(&["   ", ""]).scan(&card_photo());
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::NoTextFound));
    }

    #[test]
    fn unavailable_engine_is_request_failed() {
        let outcome = scanner_failing(InkformError::OcrUnavailable("offline".into())).scan(&card_photo());
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::RequestFailed));
    }

    #[test]
    fn engine_error_is_recognition_failed() {
        let outcome = scanner_failing(InkformError::OcrError("model crashed".into())).scan(&card_photo());
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::RecognitionFailed));
    }

    #[test]
    fn low_confidence_is_rejected() {
        let text = RecognizedText::from_lines(vec![
            RecognizedLine::with_confidence("NAME: JOHN SMITH", 0.3),
            RecognizedLine::with_confidence("ID NO: AB123456", 0.2),
        ]);
        let scanner = IdScanner::new(ScanSettings::default(), Arc::new(FakeRecognizer(Ok(text))));
        let outcome = scanner.scan(&card_photo());
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::LowConfidence));
    }

    #[test]
    fn nan_scores_do_not_bypass_confidence_gate() {
        let text = RecognizedText::from_lines(vec![
            RecognizedLine::with_confidence("NAME: JOHN SMITH", f32::NAN),
            RecognizedLine::with_confidence("ID NO: AB123456", f32::NAN),
        ]);
        let scanner = IdScanner::new(ScanSettings::default(), Arc::new(FakeRecognizer(Ok(text))));
        let outcome = scanner.scan(&card_photo());
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::LowConfidence));
    }

    #[test]
    fn incomplete_text_reports_missing_fields() {
        let outcome = scanner_reading(&[]).scan_lines(&["NAME: JOHN".to_string()]);
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::MissingRequiredFields));
        assert_eq!(
            outcome.error_message(),
            Some("Missing required fields: idNumber, dob, address")
        );
    }

    #[test]
    fn scan_lines_without_text_is_no_text_found() {
        let outcome = scanner_reading(&[]).scan_lines(&[" ".to_string()]);
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::NoTextFound));
    }

    #[test]
    fn dob_and_address_route_succeeds() {
        let outcome = scanner_reading(&[]).scan_lines(&[
            "Name: Jane Doe".to_string(),
            "Address: 42 Wallaby Way".to_string(),
            "Sydney, CA 90001".to_string(),
            "DOB: 01/01/1990".to_string(),
        ]);
        let fields = outcome.into_result().unwrap();
        assert_eq!(fields.get(IdField::Address), Some("42 WALLABY WAY, SYDNEY, CA 90001"));
    }
}
