// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consent form persistence.
//
// The whole form is stored as JSON in `data`; the remaining columns duplicate
// what queries filter on.

use inkform_consent::ConsentForm;
use inkform_core::error::{InkformError, Result};
use inkform_core::types::{ClientId, FormId, FormState};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info, instrument};

use crate::clients::ClientStore;
use crate::rows::{db_err, parse_json};

impl ClientStore {
    /// Insert or update a form.
    ///
    /// A form that is already stored as generated is never overwritten; the
    /// attempt fails with [`InkformError::FormFrozen`].
    #[instrument(skip(self, form), fields(form_id = %form.id, state = %form.state()))]
    pub fn save_form(&self, form: &ConsentForm) -> Result<()> {
        let data = serde_json::to_string(form)?;
        let rows = self
            .conn
            .execute(
                "INSERT INTO consent_forms (id, client_id, form_type, state, data, document_hash,
                 created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(id) DO UPDATE SET
                    client_id = excluded.client_id,
                    form_type = excluded.form_type,
                    state = excluded.state,
                    data = excluded.data,
                    document_hash = excluded.document_hash,
                    updated_at = excluded.updated_at
                 WHERE consent_forms.state != ?9",
                params![
                    form.id.to_string(),
                    form.client_id.map(|c| c.to_string()),
                    form.form_type.as_str(),
                    form.state().as_str(),
                    data,
                    form.document_hash,
                    form.created_at.to_rfc3339(),
                    form.updated_at.to_rfc3339(),
                    FormState::Generated.as_str(),
                ],
            )
            .map_err(db_err("save form"))?;

        if rows == 0 {
            return Err(InkformError::FormFrozen(form.id.to_string()));
        }
        info!("consent form saved");
        Ok(())
    }

    pub fn get_form(&self, id: &FormId) -> Result<Option<ConsentForm>> {
        self.conn
            .query_row(
                "SELECT data FROM consent_forms WHERE id = ?1",
                params![id.to_string()],
                |row| parse_json(0, &row.get::<_, String>(0)?),
            )
            .optional()
            .map_err(db_err("get form"))
    }

    /// A client's forms, most recently changed first.
    pub fn forms_for_client(&self, client_id: &ClientId) -> Result<Vec<ConsentForm>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT data FROM consent_forms WHERE client_id = ?1
                 ORDER BY updated_at DESC",
            )
            .map_err(db_err("prepare forms"))?;

        let forms = stmt
            .query_map(params![client_id.to_string()], |row| {
                parse_json(0, &row.get::<_, String>(0)?)
            })
            .map_err(db_err("query forms"))?
            .collect::<rusqlite::Result<Vec<ConsentForm>>>()
            .map_err(db_err("collect forms"))?;

        debug!(count = forms.len(), "retrieved client forms");
        Ok(forms)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use inkform_core::types::{ClientRecord, FormType};

    use super::*;

    fn ready_form(client: &ClientRecord) -> ConsentForm {
        let mut form = ConsentForm::for_client(FormType::Piercing, client);
        form.edit(|d| {
            d.date_of_birth = "01/01/1990".into();
            d.id_number = "D1234567".into();
            d.artist_name = "Lee".into();
            d.procedure_description = "Helix".into();
            d.body_location = "Left ear".into();
            d.jewelry_material = "Implant-grade titanium".into();
            d.procedure_date = "2026-03-14".into();
        })
        .unwrap();
        assert!(form.validate().unwrap().is_empty());
        form
    }

    fn store_with_client() -> (ClientStore, ClientRecord) {
        let store = ClientStore::open_in_memory().unwrap();
        let client = ClientRecord::new("Jane Doe");
        store.insert_client(&client).unwrap();
        (store, client)
    }

    #[test]
    fn save_and_load() {
        let (store, client) = store_with_client();
        let form = ready_form(&client);
        store.save_form(&form).unwrap();

        let back = store.get_form(&form.id).unwrap().expect("found");
        assert_eq!(back, form);
        assert_eq!(back.state(), FormState::ReadyToGenerate);
    }

    #[test]
    fn save_is_an_upsert() {
        let (store, client) = store_with_client();
        let mut form = ready_form(&client);
        store.save_form(&form).unwrap();

        form.set_field("bodyLocation", "Right ear").unwrap();
        store.save_form(&form).unwrap();

        let forms = store.forms_for_client(&client.id).unwrap();
        assert_eq!(forms.len(), 1);
        assert_eq!(forms[0].details().body_location, "Right ear");
        assert_eq!(forms[0].state(), FormState::Editing);
    }

    #[test]
    fn generated_form_cannot_be_overwritten() {
        let (store, client) = store_with_client();
        let mut form = ready_form(&client);
        let draft = form.clone();
        form.mark_generated("Jane Doe", Utc::now(), "ef".repeat(32)).unwrap();
        store.save_form(&form).unwrap();

        assert!(matches!(store.save_form(&draft), Err(InkformError::FormFrozen(_))));
        assert!(store.get_form(&form.id).unwrap().unwrap().is_frozen());
    }

    #[test]
    fn deleting_client_removes_forms() {
        let (store, client) = store_with_client();
        let form = ready_form(&client);
        store.save_form(&form).unwrap();

        store.delete_client(&client.id).unwrap();
        assert!(store.get_form(&form.id).unwrap().is_none());
    }

    #[test]
    fn unknown_form_is_none() {
        let store = ClientStore::open_in_memory().unwrap();
        assert!(store.get_form(&FormId::new()).unwrap().is_none());
    }
}
