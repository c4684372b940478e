// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer: the one object a host app (mobile shell, desktop UI, CLI)
// constructs and talks to.

pub mod data_dir;
pub mod studio_services;
pub mod vault;

pub use studio_services::{ScanResult, StudioServices};
pub use vault::DocumentVault;
