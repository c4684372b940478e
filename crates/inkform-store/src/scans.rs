// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ID scan history.

use chrono::{DateTime, Utc};
use inkform_core::error::{InkformError, Result};
use inkform_core::types::{ClientId, ExtractedFields, ScanErrorKind, ScanId};
use inkform_scan::{QualityReport, ScanReport};
use rusqlite::{OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::clients::ClientStore;
use crate::rows::{conversion_failure, db_err, parse_json, parse_timestamp, parse_uuid};

const SCAN_COLUMNS: &str = "id, client_id, image_hash, fields, error_kind, quality, scanned_at";

/// One scan attempt as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: ScanId,
    /// Set once the scan has been attached to a client.
    pub client_id: Option<ClientId>,
    /// SHA-256 of the source photo; the photo itself lives in the document
    /// vault under this digest.
    pub image_hash: String,
    /// Empty for failed attempts.
    pub fields: ExtractedFields,
    pub error_kind: Option<ScanErrorKind>,
    pub quality: Option<QualityReport>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanRecord {
    pub fn from_report(report: &ScanReport, image_hash: impl Into<String>) -> Self {
        Self {
            id: ScanId::new(),
            client_id: None,
            image_hash: image_hash.into(),
            fields: report.outcome.extracted_info().clone(),
            error_kind: report.outcome.error_kind(),
            quality: report.quality.clone(),
            scanned_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_kind.is_none()
    }
}

impl ClientStore {
    #[instrument(skip(self, scan), fields(scan_id = %scan.id))]
    pub fn insert_scan(&self, scan: &ScanRecord) -> Result<()> {
        let fields = serde_json::to_string(&scan.fields)?;
        let quality = scan.quality.as_ref().map(serde_json::to_string).transpose()?;

        self.conn
            .execute(
                "INSERT INTO id_scans (id, client_id, image_hash, fields, error_kind, quality, scanned_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    scan.id.to_string(),
                    scan.client_id.map(|c| c.to_string()),
                    scan.image_hash,
                    fields,
                    scan.error_kind.map(|k| k.as_str()),
                    quality,
                    scan.scanned_at.to_rfc3339(),
                ],
            )
            .map_err(db_err("insert scan"))?;

        debug!(success = scan.is_success(), "scan recorded");
        Ok(())
    }

    /// Attach an earlier scan to the client it identified.
    #[instrument(skip(self), fields(scan_id = %scan_id, client_id = %client_id))]
    pub fn link_scan(&self, scan_id: &ScanId, client_id: &ClientId) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE id_scans SET client_id = ?1 WHERE id = ?2",
                params![client_id.to_string(), scan_id.to_string()],
            )
            .map_err(db_err("link scan"))?;
        if rows == 0 {
            return Err(InkformError::NotFound(format!("scan {scan_id}")));
        }
        Ok(())
    }

    pub fn get_scan(&self, id: &ScanId) -> Result<Option<ScanRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {SCAN_COLUMNS} FROM id_scans WHERE id = ?1"),
                params![id.to_string()],
                row_to_scan,
            )
            .optional()
            .map_err(db_err("get scan"))
    }

    /// A client's scans, newest first.
    pub fn scans_for_client(&self, client_id: &ClientId) -> Result<Vec<ScanRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {SCAN_COLUMNS} FROM id_scans WHERE client_id = ?1 ORDER BY scanned_at DESC"
            ))
            .map_err(db_err("prepare scans"))?;

        stmt.query_map(params![client_id.to_string()], row_to_scan)
            .map_err(db_err("query scans"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err("collect scans"))
    }
}

/// Stored via `as_str`, which is also the serde tag. An unknown tag is a
/// conversion error, never a success.
fn parse_kind(idx: usize, raw: &str) -> rusqlite::Result<ScanErrorKind> {
    serde_json::from_value(serde_json::Value::String(raw.to_owned()))
        .map_err(|e| conversion_failure(idx, e))
}

fn row_to_scan(row: &Row<'_>) -> rusqlite::Result<ScanRecord> {
    let id: String = row.get(0)?;
    let client_id: Option<String> = row.get(1)?;
    let fields: String = row.get(3)?;
    let error_kind: Option<String> = row.get(4)?;
    let quality: Option<String> = row.get(5)?;
    let scanned_at: String = row.get(6)?;

    Ok(ScanRecord {
        id: ScanId(parse_uuid(0, &id)?),
        client_id: client_id.map(|c| parse_uuid(1, &c).map(ClientId)).transpose()?,
        image_hash: row.get(2)?,
        fields: parse_json(3, &fields)?,
        error_kind: error_kind.as_deref().map(|k| parse_kind(4, k)).transpose()?,
        quality: quality.map(|q| parse_json(5, &q)).transpose()?,
        scanned_at: parse_timestamp(6, &scanned_at)?,
    })
}
