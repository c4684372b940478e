// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client records and the database handle.

use std::path::Path;

use chrono::Utc;
use inkform_core::error::{InkformError, Result};
use inkform_core::types::{ClientId, ClientRecord};
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info, instrument};

use crate::rows::{db_err, parse_timestamp, parse_uuid};

const SCHEMA_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS clients (
        id TEXT PRIMARY KEY,
        full_name TEXT NOT NULL,
        date_of_birth TEXT,
        id_number TEXT,
        id_expiry TEXT,
        address TEXT,
        email TEXT,
        phone TEXT,
        notes TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS id_scans (
        id TEXT PRIMARY KEY,
        client_id TEXT REFERENCES clients(id) ON DELETE CASCADE,
        image_hash TEXT NOT NULL,
        fields TEXT NOT NULL,
        error_kind TEXT,
        quality TEXT,
        scanned_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS id_scans_client ON id_scans(client_id);

    CREATE TABLE IF NOT EXISTS consent_forms (
        id TEXT PRIMARY KEY,
        client_id TEXT REFERENCES clients(id) ON DELETE CASCADE,
        form_type TEXT NOT NULL,
        state TEXT NOT NULL,
        data TEXT NOT NULL,
        document_hash TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS consent_forms_client ON consent_forms(client_id);
"#;

const CLIENT_COLUMNS: &str = "id, full_name, date_of_birth, id_number, id_expiry, address,
     email, phone, notes, created_at, updated_at";

/// The studio database: clients, the ID scans that identified them, and
/// their consent forms.
///
/// All methods are synchronous because `rusqlite` is. In an async context,
/// wrap calls in `tokio::task::spawn_blocking`.
pub struct ClientStore {
    pub(crate) conn: Connection,
}

impl ClientStore {
    /// Open (or create) the database at `path` in WAL mode.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(db_err("open"))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(db_err("WAL pragma"))?;
        let store = Self::init(conn)?;
        info!("studio database opened");
        Ok(store)
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(db_err("open in-memory"))?;
        let store = Self::init(conn)?;
        debug!("in-memory studio database opened");
        Ok(store)
    }

    fn init(conn: Connection) -> Result<Self> {
        // Cascading deletes need foreign keys, which SQLite leaves off by
        // default on every connection.
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(db_err("foreign_keys pragma"))?;
        register_fold_case(&conn)?;
        conn.execute_batch(SCHEMA_SQL).map_err(db_err("create tables"))?;
        Ok(Self { conn })
    }

    /// Insert a new client. A duplicate id is a database error.
    #[instrument(skip(self, client), fields(client_id = %client.id))]
    pub fn insert_client(&self, client: &ClientRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO clients (id, full_name, date_of_birth, id_number, id_expiry,
                 address, email, phone, notes, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    client.id.to_string(),
                    client.full_name,
                    client.date_of_birth,
                    client.id_number,
                    client.id_expiry,
                    client.address,
                    client.email,
                    client.phone,
                    client.notes,
                    client.created_at.to_rfc3339(),
                    client.updated_at.to_rfc3339(),
                ],
            )
            .map_err(db_err("insert client"))?;

        info!("client inserted");
        Ok(())
    }

    /// Overwrite a client's details and bump `updated_at`. The stored
    /// `created_at` is kept.
    #[instrument(skip(self, client), fields(client_id = %client.id))]
    pub fn update_client(&self, client: &ClientRecord) -> Result<()> {
        let rows = self
            .conn
            .execute(
                "UPDATE clients SET full_name = ?1, date_of_birth = ?2, id_number = ?3,
                 id_expiry = ?4, address = ?5, email = ?6, phone = ?7, notes = ?8,
                 updated_at = ?9
                 WHERE id = ?10",
                params![
                    client.full_name,
                    client.date_of_birth,
                    client.id_number,
                    client.id_expiry,
                    client.address,
                    client.email,
                    client.phone,
                    client.notes,
                    Utc::now().to_rfc3339(),
                    client.id.to_string(),
                ],
            )
            .map_err(db_err("update client"))?;

        if rows == 0 {
            return Err(InkformError::NotFound(format!("client {}", client.id)));
        }
        debug!("client updated");
        Ok(())
    }

    /// Look up one client. `Ok(None)` when there is no such client.
    pub fn get_client(&self, id: &ClientId) -> Result<Option<ClientRecord>> {
        self.conn
            .query_row(
                &format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?1"),
                params![id.to_string()],
                row_to_client,
            )
            .optional()
            .map_err(db_err("get client"))
    }

    /// Every client, alphabetically by name.
    pub fn all_clients(&self) -> Result<Vec<ClientRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients ORDER BY fold_case(full_name), created_at"
            ))
            .map_err(db_err("prepare all clients"))?;

        let clients = stmt
            .query_map([], row_to_client)
            .map_err(db_err("query all clients"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err("collect clients"))?;

        debug!(count = clients.len(), "retrieved all clients");
        Ok(clients)
    }

    /// Case-insensitive substring search over name, email, phone, and ID
    /// number. A blank query returns every client.
    ///
    /// Both sides are folded with Rust's Unicode lowercasing, so accented
    /// names match regardless of case.
    #[instrument(skip(self))]
    pub fn search_clients(&self, query: &str) -> Result<Vec<ClientRecord>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.all_clients();
        }

        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {CLIENT_COLUMNS} FROM clients
                 WHERE instr(fold_case(full_name), ?1) > 0
                    OR instr(fold_case(email), ?1) > 0
                    OR instr(fold_case(phone), ?1) > 0
                    OR instr(fold_case(id_number), ?1) > 0
                 ORDER BY fold_case(full_name), created_at"
            ))
            .map_err(db_err("prepare search"))?;

        let clients = stmt
            .query_map(params![needle], row_to_client)
            .map_err(db_err("query search"))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(db_err("collect search"))?;

        debug!(hits = clients.len(), "client search");
        Ok(clients)
    }

    /// Delete a client together with their scans and forms. Deleting a client
    /// that does not exist is not an error.
    #[instrument(skip(self), fields(client_id = %id))]
    pub fn delete_client(&self, id: &ClientId) -> Result<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM clients WHERE id = ?1", params![id.to_string()])
            .map_err(db_err("delete client"))?;

        info!(deleted = rows > 0, "client delete");
        Ok(rows > 0)
    }

    /// Whether any scan or consent form still points at the vault document
    /// `hash`.
    pub fn document_in_use(&self, hash: &str) -> Result<bool> {
        self.conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM id_scans WHERE image_hash = ?1)
                     OR EXISTS(SELECT 1 FROM consent_forms WHERE document_hash = ?1)",
                params![hash],
                |row| row.get(0),
            )
            .map_err(db_err("document references"))
    }

    /// Number of stored clients.
    pub fn client_count(&self) -> Result<u64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM clients", [], |row| row.get(0))
            .map_err(db_err("count clients"))
    }
}

/// `fold_case(text)`: Unicode lowercase. SQLite's own `lower()` only folds
/// ASCII.
fn register_fold_case(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )
    .map_err(db_err("register fold_case"))
}

/// Column order matches [`CLIENT_COLUMNS`].
fn row_to_client(row: &Row<'_>) -> rusqlite::Result<ClientRecord> {
    let id: String = row.get(0)?;
    let created_at: String = row.get(9)?;
    let updated_at: String = row.get(10)?;

    Ok(ClientRecord {
        id: ClientId(parse_uuid(0, &id)?),
        full_name: row.get(1)?,
        date_of_birth: row.get(2)?,
        id_number: row.get(3)?,
        id_expiry: row.get(4)?,
        address: row.get(5)?,
        email: row.get(6)?,
        phone: row.get(7)?,
        notes: row.get(8)?,
        created_at: parse_timestamp(9, &created_at)?,
        updated_at: parse_timestamp(10, &updated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ClientStore {
        ClientStore::open_in_memory().expect("open in-memory db")
    }

    fn client(name: &str) -> ClientRecord {
        let mut c = ClientRecord::new(name);
        c.email = Some(format!("{}@example.com", name.to_lowercase().replace(' ', ".")));
        c
    }

    #[test]
    fn insert_and_get() {
        let store = store();
        let mut c = client("Jane Doe");
        c.id_number = Some("D1234567".into());
        store.insert_client(&c).unwrap();

        let back = store.get_client(&c.id).unwrap().expect("found");
        assert_eq!(back.full_name, "Jane Doe");
        assert_eq!(back.id_number.as_deref(), Some("D1234567"));
        assert_eq!(back.created_at, c.created_at);
    }

    #[test]
    fn missing_client_is_none() {
        assert!(store().get_client(&ClientId::new()).unwrap().is_none());
    }

    #[test]
    fn duplicate_insert_fails() {
        let store = store();
        let c = client("Jane Doe");
        store.insert_client(&c).unwrap();
        assert!(matches!(store.insert_client(&c), Err(InkformError::Database(_))));
    }

    #[test]
    fn update_changes_fields() {
        let store = store();
        let mut c = client("Jane Doe");
        store.insert_client(&c).unwrap();

        c.phone = Some("555-123-4567".into());
        store.update_client(&c).unwrap();
        let back = store.get_client(&c.id).unwrap().unwrap();
        assert_eq!(back.phone.as_deref(), Some("555-123-4567"));
        assert!(back.updated_at >= c.updated_at);
    }

    #[test]
    fn update_unknown_client_is_not_found() {
        let result = store().update_client(&client("Nobody"));
        assert!(matches!(result, Err(InkformError::NotFound(_))));
    }

    #[test]
    fn all_clients_sorted_by_name() {
        let store = store();
        for name in ["zoe quinn", "Adam Ant", "mia wong"] {
            store.insert_client(&client(name)).unwrap();
        }
        let names: Vec<String> = store.all_clients().unwrap().into_iter().map(|c| c.full_name).collect();
        assert_eq!(names, vec!["Adam Ant", "mia wong", "zoe quinn"]);
    }

    #[test]
    fn search_matches_any_column_ignoring_case() {
        let store = store();
        let mut jane = client("Jane Doe");
        jane.id_number = Some("D1234567".into());
        store.insert_client(&jane).unwrap();
        store.insert_client(&client("Bob Stone")).unwrap();

        assert_eq!(store.search_clients("jane").unwrap().len(), 1);
        assert_eq!(store.search_clients("d123").unwrap()[0].id, jane.id);
        assert_eq!(store.search_clients("EXAMPLE.COM").unwrap().len(), 2);
        assert!(store.search_clients("zzz").unwrap().is_empty());
        assert_eq!(store.search_clients("  ").unwrap().len(), 2);
    }

    #[test]
    fn search_folds_accented_letters() {
        let store = store();
        let elodie = ClientRecord::new("ÉLODIE MÜLLER");
        store.insert_client(&elodie).unwrap();
        store.insert_client(&client("Bob Stone")).unwrap();

        for query in ["élodie", "MÜLLER", "müller", "Élodie Mü"] {
            let hits = store.search_clients(query).unwrap();
            assert_eq!(hits.len(), 1, "{query}");
            assert_eq!(hits[0].id, elodie.id);
        }
    }

    #[test]
    fn document_references_cover_scans_and_forms() {
        let store = store();
        let hash = "ab".repeat(32);
        assert!(!store.document_in_use(&hash).unwrap());

        store
            .conn
            .execute(
                "INSERT INTO id_scans (id, image_hash, fields, scanned_at)
                 VALUES ('s1', ?1, '{}', '2026-01-01T00:00:00Z')",
                params![hash],
            )
            .unwrap();
        assert!(store.document_in_use(&hash).unwrap());
        assert!(!store.document_in_use(&"cd".repeat(32)).unwrap());
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let store = store();
        store.insert_client(&client("Jane Doe")).unwrap();
        assert!(store.search_clients("%").unwrap().is_empty());
    }

    #[test]
    fn delete_is_idempotent() {
        let store = store();
        let c = client("Jane Doe");
        store.insert_client(&c).unwrap();
        assert!(store.delete_client(&c.id).unwrap());
        assert!(!store.delete_client(&c.id).unwrap());
        assert_eq!(store.client_count().unwrap(), 0);
    }

    #[test]
    fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("studio.db");
        let c = client("Jane Doe");
        {
            let store = ClientStore::open(&path).unwrap();
            store.insert_client(&c).unwrap();
        }
        let store = ClientStore::open(&path).unwrap();
        assert_eq!(store.get_client(&c.id).unwrap().unwrap().full_name, "Jane Doe");
    }
}
