// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result of one ID scan attempt.

use inkform_core::types::{ExtractedFields, ScanErrorKind};
use serde::Serialize;

static NO_FIELDS: ExtractedFields = ExtractedFields::new();

/// Why a scan failed, in a form the UI can branch on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    pub kind: ScanErrorKind,
    pub message: String,
}

impl std::fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum Outcome {
    Success { fields: ExtractedFields },
    Failure(ScanFailure),
}

/// Either the fields extracted from an ID, or the reason there are none.
///
/// The two cases are mutually exclusive by construction: a success always
/// carries at least one field and no message, a failure always carries a
/// message and no fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ScanOutcome(Outcome);

impl ScanOutcome {
    /// Wrap extracted fields. An empty map is reported as
    /// [`ScanErrorKind::NoTextFound`] rather than as an empty success.
    pub fn success(fields: ExtractedFields) -> Self {
        if fields.is_empty() {
            return Self::failure(
                ScanErrorKind::NoTextFound,
                "No identity details were found on the document",
            );
        }
        Self(Outcome::Success { fields })
    }

    pub fn failure(kind: ScanErrorKind, message: impl Into<String>) -> Self {
        Self(Outcome::Failure(ScanFailure {
            kind,
            message: message.into(),
        }))
    }

    pub fn is_success(&self) -> bool {
        matches!(self.0, Outcome::Success { .. })
    }

    /// The extracted fields; an empty map for failures.
    pub fn extracted_info(&self) -> &ExtractedFields {
        match &self.0 {
            Outcome::Success { fields } => fields,
            Outcome::Failure(_) => &NO_FIELDS,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.0 {
            Outcome::Success { .. } => None,
            Outcome::Failure(failure) => Some(&failure.message),
        }
    }

    pub fn error_kind(&self) -> Option<ScanErrorKind> {
        match &self.0 {
            Outcome::Success { .. } => None,
            Outcome::Failure(failure) => Some(failure.kind),
        }
    }

    pub fn into_result(self) -> Result<ExtractedFields, ScanFailure> {
        match self.0 {
            Outcome::Success { fields } => Ok(fields),
            Outcome::Failure(failure) => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkform_core::types::IdField;

    fn one_field() -> ExtractedFields {
        [(IdField::Name, "JOHN SMITH".to_string())].into_iter().collect()
    }

    fn holds_exactly_one_payload(outcome: &ScanOutcome) -> bool {
        let success_shape = !outcome.extracted_info().is_empty()
            && outcome.error_message().is_none()
            && outcome.error_kind().is_none();
        let failure_shape = outcome.extracted_info().is_empty()
            && outcome.error_message().is_some()
            && outcome.error_kind().is_some();
        (success_shape ^ failure_shape) && (outcome.is_success() == success_shape)
    }

    #[test]
    fn success_carries_fields_only() {
        let outcome = ScanOutcome::success(one_field());
        assert!(outcome.is_success());
        assert_eq!(outcome.extracted_info().get(IdField::Name), Some("JOHN SMITH"));
        assert!(holds_exactly_one_payload(&outcome));
    }

    #[test]
    fn failure_carries_message_only() {
        let outcome = ScanOutcome::failure(ScanErrorKind::PoorQuality, "Image is blurry");
        assert!(!outcome.is_success());
        assert!(outcome.extracted_info().is_empty());
        assert_eq!(outcome.error_message(), Some("Image is blurry"));
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::PoorQuality));
        assert!(holds_exactly_one_payload(&outcome));
    }

    #[test]
    fn empty_success_becomes_no_text_found() {
        let outcome = ScanOutcome::success(ExtractedFields::new());
        assert!(!outcome.is_success());
        assert_eq!(outcome.error_kind(), Some(ScanErrorKind::NoTextFound));
        assert!(holds_exactly_one_payload(&outcome));
    }

    #[test]
    fn every_failure_kind_keeps_the_invariant() {
        for kind in [
            ScanErrorKind::ImageConversion,
            ScanErrorKind::PoorQuality,
            ScanErrorKind::NoTextFound,
            ScanErrorKind::RecognitionFailed,
            ScanErrorKind::InvalidFormat,
            ScanErrorKind::RequestFailed,
            ScanErrorKind::LowConfidence,
            ScanErrorKind::MissingRequiredFields,
        ] {
            assert!(holds_exactly_one_payload(&ScanOutcome::failure(kind, kind.as_str())));
        }
    }

    #[test]
    fn into_result_splits_cases() {
        assert!(ScanOutcome::success(one_field()).into_result().is_ok());
        let err = ScanOutcome::failure(ScanErrorKind::LowConfidence, "blurry text")
            .into_result()
            .unwrap_err();
        assert_eq!(err.kind, ScanErrorKind::LowConfidence);
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(ScanOutcome::failure(
            ScanErrorKind::NoTextFound,
            "nothing",
        ))
        .unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "no-text-found");
    }
}
