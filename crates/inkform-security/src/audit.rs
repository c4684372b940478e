// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Audit trail: append-only SQLite log of every access to client identity
// data.
//
// Schema:
//   audit_log(
//     id        INTEGER PRIMARY KEY AUTOINCREMENT,
//     timestamp TEXT    NOT NULL,   -- RFC 3339
//     action    TEXT    NOT NULL,   -- AuditAction tag
//     subject   TEXT    NOT NULL,   -- client id, form id, or blob digest
//     success   INTEGER NOT NULL,   -- 0 = failure, 1 = success
//     details   TEXT
//   )

use std::path::Path;

use chrono::Utc;
use inkform_core::error::InkformError;
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS audit_log (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp TEXT    NOT NULL,
    action    TEXT    NOT NULL,
    subject   TEXT    NOT NULL,
    success   INTEGER NOT NULL,
    details   TEXT
);
CREATE INDEX IF NOT EXISTS audit_log_subject ON audit_log(subject);";

fn db_err(e: rusqlite::Error) -> InkformError {
    InkformError::Database(e.to_string())
}

/// Operations that leave a trace in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    IdScan,
    ClientCreated,
    ClientUpdated,
    ClientDeleted,
    FormGenerated,
    DocumentRead,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IdScan => "id_scan",
            Self::ClientCreated => "client_created",
            Self::ClientUpdated => "client_updated",
            Self::ClientDeleted => "client_deleted",
            Self::FormGenerated => "form_generated",
            Self::DocumentRead => "document_read",
        }
    }
}

/// A single row of the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: i64,
    pub timestamp: String,
    pub action: String,
    pub subject: String,
    pub success: bool,
    pub details: Option<String>,
}

impl AuditEntry {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            timestamp: row.get(1)?,
            action: row.get(2)?,
            subject: row.get(3)?,
            success: row.get::<_, i32>(4)? != 0,
            details: row.get(5)?,
        })
    }
}

/// Append-only audit log backed by SQLite.
///
/// Rows are only ever inserted; there is deliberately no update or delete.
pub struct AuditLog {
    conn: Connection,
}

impl AuditLog {
    /// Open (or create) the audit database at `path` in WAL mode.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InkformError> {
        let conn = Connection::open(path).map_err(db_err)?;
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;

        debug!(journal_mode = %mode, "audit log opened");
        Ok(Self { conn })
    }

    /// Open an in-memory audit database (useful for tests).
    pub fn open_in_memory() -> Result<Self, InkformError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        conn.execute_batch(CREATE_TABLE_SQL).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// Append an entry.
    #[instrument(skip_all, fields(action = action.as_str(), %subject, success = success))]
    pub fn record(
        &self,
        action: AuditAction,
        subject: &str,
        success: bool,
        details: Option<&str>,
    ) -> Result<(), InkformError> {
        self.conn
            .execute(
                "INSERT INTO audit_log (timestamp, action, subject, success, details)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    Utc::now().to_rfc3339(),
                    action.as_str(),
                    subject,
                    success as i32,
                    details
                ],
            )
            .map_err(db_err)?;

        debug!("audit entry recorded");
        Ok(())
    }

    /// All entries about one subject, oldest first.
    pub fn entries_for_subject(&self, subject: &str) -> Result<Vec<AuditEntry>, InkformError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, action, subject, success, details
                 FROM audit_log
                 WHERE subject = ?1
                 ORDER BY id ASC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![subject], AuditEntry::from_row)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    /// The most recent `limit` entries, newest first.
    pub fn recent_entries(&self, limit: u32) -> Result<Vec<AuditEntry>, InkformError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, action, subject, success, details
                 FROM audit_log
                 ORDER BY id DESC
                 LIMIT ?1",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![limit], AuditEntry::from_row)
            .map_err(db_err)?;
        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(db_err)
    }

    pub fn count(&self) -> Result<u64, InkformError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
            .map_err(db_err)
    }
}
