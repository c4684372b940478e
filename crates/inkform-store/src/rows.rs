// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Column conversion helpers shared by the row mappers.

use chrono::{DateTime, Utc};
use inkform_core::error::InkformError;
use rusqlite::types::Type;

pub(crate) fn db_err(context: &str) -> impl Fn(rusqlite::Error) -> InkformError + '_ {
    move |e| InkformError::Database(format!("{context}: {e}"))
}

pub(crate) fn conversion_failure<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn parse_uuid(idx: usize, raw: &str) -> rusqlite::Result<uuid::Uuid> {
    uuid::Uuid::parse_str(raw).map_err(|e| conversion_failure(idx, e))
}

pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|e| conversion_failure(idx, e))
}
