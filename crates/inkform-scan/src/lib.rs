// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkform-scan: Reading identity documents.
//
// A photo of a driver's licence or ID card goes through a quality gate,
// OCR preprocessing, a pluggable text recognizer, a line-oriented field
// parser, and a completeness check, and comes out as a `ScanOutcome`.

pub mod outcome;
pub mod parser;
pub mod pipeline;
pub mod preprocess;
pub mod quality;
pub mod recognizer;
pub mod validator;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use outcome::{ScanFailure, ScanOutcome};
pub use parser::{normalize_line, parse_lines};
pub use pipeline::{IdScanner, ScanReport, ScanSettings};
pub use quality::{QualityIssue, QualityReport};
pub use recognizer::{NoRecognizer, RecognizedLine, RecognizedText, TextRecognizer};
pub use validator::{is_valid, missing_requirements};

#[cfg(feature = "ocr")]
pub use ocr::{OcrConfig, OcrsRecognizer};
