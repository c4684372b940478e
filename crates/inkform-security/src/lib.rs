// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkform-security: Protection for client identity data at rest.
//
// ID photos, signatures, and signed consent forms are fingerprinted with
// SHA-256, optionally encrypted with a studio passphrase, and every access is
// written to an append-only audit trail.

pub mod audit;
pub mod integrity;
pub mod storage;

pub use audit::{AuditAction, AuditEntry, AuditLog};
pub use integrity::{hash_bytes, verify_hash};
pub use storage::EncryptedStorage;
