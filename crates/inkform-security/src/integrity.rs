// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document integrity: SHA-256 fingerprints for ID images, signatures, and
// signed consent forms.

use inkform_core::error::InkformError;
use sha2::{Digest, Sha256};

/// SHA-256 of `data` as a lowercase hex string.
///
/// The digest doubles as the storage key of a blob in the document vault.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Check `data` against a previously recorded digest.
pub fn verify_hash(data: &[u8], expected_hex: &str) -> Result<(), InkformError> {
    let actual = hash_bytes(data);
    if actual.eq_ignore_ascii_case(expected_hex) {
        Ok(())
    } else {
        Err(InkformError::IntegrityMismatch {
            expected: expected_hex.to_owned(),
            actual,
        })
    }
}

/// Whether `candidate` looks like a digest produced by [`hash_bytes`].
///
/// Used to refuse vault keys that could escape the documents directory.
pub fn is_hex_digest(candidate: &str) -> bool {
    candidate.len() == 64 && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(hash_bytes(b""), EMPTY_SHA256);
    }

    #[test]
    fn verify_accepts_uppercase_digest() {
        let data = b"signed consent";
        let upper = hash_bytes(data).to_ascii_uppercase();
        assert!(verify_hash(data, &upper).is_ok());
    }

    #[test]
    fn verify_reports_both_digests_on_mismatch() {
        match verify_hash(b"id-front.jpg", "0000") {
            Err(InkformError::IntegrityMismatch { expected, actual }) => {
                assert_eq!(expected, "0000");
                assert_eq!(actual, hash_bytes(b"id-front.jpg"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn digest_shape() {
        assert!(is_hex_digest(EMPTY_SHA256));
        assert!(!is_hex_digest("../../etc/passwd"));
        assert!(!is_hex_digest("abc"));
    }
}
