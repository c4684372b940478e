// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkform-store: Local persistence for client records, ID scans, and
// consent forms in a single SQLite database.
//
// Only metadata lives in the database. ID photos, signatures, and generated
// PDFs are kept as blobs on disk and referenced by their SHA-256 digest.

mod rows;

pub mod clients;
pub mod forms;
pub mod scans;

pub use clients::ClientStore;
pub use scans::ScanRecord;
