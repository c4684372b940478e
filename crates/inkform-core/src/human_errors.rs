// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for studio staff at the front desk.
//
// Every technical error and every scan failure category is mapped to plain
// English with a clear suggestion. Severity drives UI presentation.

use crate::error::InkformError;
use crate::types::ScanErrorKind;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Try again, probably with a better photo.
    Transient,
    /// Staff must do something (fill in a field, get a signature).
    ActionRequired,
    /// Cannot be fixed by retrying.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether simply retrying can help.
    pub retriable: bool,
    /// Severity level (drives icon/colour in UI).
    pub severity: Severity,
}

/// Explain a failed ID scan in plain language.
pub fn humanize_scan_failure(kind: ScanErrorKind) -> HumanError {
    match kind {
        ScanErrorKind::ImageConversion | ScanErrorKind::InvalidFormat => HumanError {
            message: "We couldn't read that photo.".into(),
            suggestion: "Take a new photo of the ID with the camera.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        ScanErrorKind::PoorQuality => HumanError {
            message: "The photo isn't clear enough.".into(),
            suggestion: "Lay the ID flat in good light, hold the phone steady, and fill the frame with the card.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        ScanErrorKind::NoTextFound => HumanError {
            message: "We couldn't find any text on the ID.".into(),
            suggestion: "Make sure the front of the card is facing the camera, then retake the photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        ScanErrorKind::LowConfidence => HumanError {
            message: "The text on the ID was hard to read.".into(),
            suggestion: "Avoid glare on the card and retake the photo.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        ScanErrorKind::RecognitionFailed | ScanErrorKind::RequestFailed => HumanError {
            message: "Text recognition didn't work this time.".into(),
            suggestion: "Try the scan again. If it keeps failing, enter the details by hand.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
        ScanErrorKind::MissingRequiredFields => HumanError {
            message: "Some details couldn't be read from the ID.".into(),
            suggestion: "Check the client's ID and type in the missing details.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}

/// Convert an `InkformError` into a `HumanError` anyone at the desk can act on.
pub fn humanize_error(err: &InkformError) -> HumanError {
    match err {
        InkformError::ImageError(_) => humanize_scan_failure(ScanErrorKind::ImageConversion),

        InkformError::OcrError(_) => humanize_scan_failure(ScanErrorKind::RecognitionFailed),

        InkformError::OcrUnavailable(_) => HumanError {
            message: "ID scanning isn't set up on this device.".into(),
            suggestion: "Enter the client's details by hand for now.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkformError::ScanRejected(_) => HumanError {
            message: "The scan didn't identify the client.".into(),
            suggestion: "Retake the photo, or enter the client's details by hand.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        InkformError::PdfError(_) => HumanError {
            message: "The consent form couldn't be created.".into(),
            suggestion: "Try generating the form again. Nothing the client entered has been lost.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkformError::FormFrozen(_) => HumanError {
            message: "This consent form has already been signed.".into(),
            suggestion: "Start a new consent form if something needs to change.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkformError::FormNotReady(_) => HumanError {
            message: "The consent form isn't complete yet.".into(),
            suggestion: "Fill in every highlighted field, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkformError::UnknownFormType(detail) => HumanError {
            message: "That type of consent form isn't available.".into(),
            suggestion: format!("Choose a tattoo, piercing, or guardian consent form. (Requested: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkformError::BlankSignature => HumanError {
            message: "The signature box is empty.".into(),
            suggestion: "Ask the client to sign in the box, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        InkformError::NotFound(_) => HumanError {
            message: "That record couldn't be found.".into(),
            suggestion: "It may have been deleted. Search for the client again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkformError::Encryption(_) | InkformError::Decryption(_) => HumanError {
            message: "There was a security problem.".into(),
            suggestion: "Check the storage passphrase in Settings and try again.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkformError::IntegrityMismatch { .. } => HumanError {
            message: "This stored document has been changed.".into(),
            suggestion: "The saved copy no longer matches the original. Re-scan the ID or create a new form.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        InkformError::Database(_) => HumanError {
            message: "The app's data storage had a problem.".into(),
            suggestion: "Try closing and reopening the app. Your client records should still be there.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkformError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A stored file couldn't be found.".into(),
                    suggestion: "It may have been removed. Re-scan the ID or regenerate the form.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        InkformError::Task(_) => HumanError {
            message: "Something was interrupted.".into(),
            suggestion: "Try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        InkformError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
