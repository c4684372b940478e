// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// On-device OCR backed by `ocrs` and `rten`. Only built with the `ocr` feature.
//
// The engine needs two model files, `text-detection.rten` and
// `text-recognition.rten`. Running `ocrs-cli` once downloads them into
// `$XDG_CACHE_HOME/ocrs` (usually `~/.cache/ocrs`), which is where
// `OcrConfig::default()` looks.

use std::path::{Path, PathBuf};

use image::DynamicImage;
use inkform_core::error::{InkformError, Result};
use ocrs::{ImageSource, OcrEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use crate::recognizer::{RecognizedLine, RecognizedText, TextRecognizer};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Where to find the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Both model files exist. Missing models are an availability problem,
    /// not a recognition failure.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(InkformError::OcrUnavailable(format!(
                    "model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// [`TextRecognizer`] running the `ocrs` neural OCR engine locally.
///
/// Model loading is the slow part, so build one and share it. `ocrs` does not
/// report per-line confidence, so every line comes back unscored.
pub struct OcrsRecognizer {
    engine: OcrEngine,
}

impl OcrsRecognizer {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        let load = |path: &Path| {
            Model::load_file(path).map_err(|err| {
                InkformError::OcrUnavailable(format!(
                    "failed to load model from {}: {err}",
                    path.display()
                ))
            })
        };

        info!("Loading OCR models");
        let detection_model = load(&config.detection_model_path)?;
        let recognition_model = load(&config.recognition_model_path)?;

        let engine = OcrEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| InkformError::OcrUnavailable(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(OcrConfig::default())
    }
}

impl TextRecognizer for OcrsRecognizer {
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn recognize(&self, image: &DynamicImage) -> Result<RecognizedText> {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            InkformError::OcrError(format!("failed to create image source ({width}x{height}): {err}"))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| InkformError::OcrError(format!("OCR preprocessing failed: {err}")))?;

        let words = self
            .engine
            .detect_words(&input)
            .map_err(|err| InkformError::OcrError(format!("word detection failed: {err}")))?;
        let line_rects = self.engine.find_text_lines(&input, &words);
        let texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| InkformError::OcrError(format!("line recognition failed: {err}")))?;

        let lines: Vec<RecognizedLine> = texts
            .iter()
            .flatten()
            .map(|line| line.to_string())
            .filter(|text| !text.trim().is_empty())
            .map(RecognizedLine::new)
            .collect();

        debug!(words = words.len(), lines = lines.len(), "OCR complete");
        Ok(RecognizedText::from_lines(lines))
    }

    fn name(&self) -> &str {
        "ocrs"
    }
}

/// Whether both models are present in the default cache directory.
pub fn models_available() -> bool {
    OcrConfig::default().validate().is_ok()
}
