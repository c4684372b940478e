// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkform-app: Service layer for studio front ends, plus the `inkform` CLI.

pub mod logging;
pub mod services;

pub use services::{DocumentVault, ScanResult, StudioServices};
