// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Data directory layout and `config.json` persistence.

use std::path::{Path, PathBuf};

use inkform_core::AppConfig;
use inkform_core::error::Result;
use tracing::warn;

pub const DATABASE_FILE: &str = "studio.db";
pub const AUDIT_FILE: &str = "audit.db";
pub const CONFIG_FILE: &str = "config.json";
pub const DOCUMENTS_DIR: &str = "documents";

/// Default data directory on desktop: `$XDG_DATA_HOME/inkform`, else
/// `~/.local/share/inkform`. Mobile hosts pass their sandbox directory to
/// [`crate::StudioServices::open`] instead.
pub fn default_data_dir() -> PathBuf {
    let base = if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg)
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".local").join("share")
    } else {
        PathBuf::from(".")
    };
    base.join("inkform")
}

/// Read `config.json`, falling back to defaults when it is missing or
/// unreadable.
pub fn load_config(dir: &Path) -> AppConfig {
    let path = dir.join(CONFIG_FILE);
    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(_) => return AppConfig::default(),
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), %err, "config unreadable, using defaults");
        AppConfig::default()
    })
}

pub fn persist_config(dir: &Path, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(dir.join(CONFIG_FILE), json)?;
    Ok(())
}
