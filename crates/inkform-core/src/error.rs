// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Inkform.

use thiserror::Error;

/// Top-level error type for all Inkform operations.
///
/// Scan failures are *not* errors: the scan pipeline reports them as a
/// `ScanOutcome` carrying a [`crate::ScanErrorKind`]. The variants below cover
/// everything that can go wrong around that pipeline.
#[derive(Debug, Error)]
pub enum InkformError {
    // -- Scanning --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("OCR failed: {0}")]
    OcrError(String),

    #[error("OCR engine unavailable: {0}")]
    OcrUnavailable(String),

    #[error("ID scan did not identify a client: {0}")]
    ScanRejected(String),

    // -- Consent forms --
    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("consent form {0} has already been generated and cannot be changed")]
    FormFrozen(String),

    #[error("consent form is not ready to generate: {0}")]
    FormNotReady(String),

    #[error("unknown consent form type: {0}")]
    UnknownFormType(String),

    #[error("signature is blank")]
    BlankSignature,

    // -- Records --
    #[error("record not found: {0}")]
    NotFound(String),

    // -- Security errors --
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("integrity check failed: expected {expected}, got {actual}")]
    IntegrityMismatch { expected: String, actual: String },

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("background task failed: {0}")]
    Task(String),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, InkformError>;
