// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consent form records and their lifecycle.

use chrono::{DateTime, Utc};
use inkform_core::error::{InkformError, Result};
use inkform_core::types::{ClientId, ClientRecord, FormId, FormState, FormType};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::template::{ConsentTemplate, FormFieldSet};

/// Printed in place of medical notes the client left blank.
pub const NO_MEDICAL_NOTES: &str = "None declared";

/// Everything a consent form asks for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentDetails {
    pub client_name: String,
    pub date_of_birth: String,
    pub id_number: String,
    pub artist_name: String,
    pub procedure_description: String,
    pub body_location: String,
    pub jewelry_material: String,
    pub procedure_date: String,
    pub medical_notes: String,
    pub guardian_name: String,
    pub guardian_id_number: String,
    pub guardian_relationship: String,
}

impl ConsentDetails {
    /// Pre-fill the client half of the form.
    pub fn from_client(client: &ClientRecord) -> Self {
        Self {
            client_name: client.full_name.clone(),
            date_of_birth: client.date_of_birth.clone().unwrap_or_default(),
            id_number: client.id_number.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Template field names and their values. Blank entries are left out so
    /// the template sees them as missing.
    pub fn to_field_set(&self) -> FormFieldSet {
        let medical_notes = if self.medical_notes.trim().is_empty() {
            NO_MEDICAL_NOTES
        } else {
            self.medical_notes.as_str()
        };

        [
            ("clientName", self.client_name.as_str()),
            ("dateOfBirth", self.date_of_birth.as_str()),
            ("idNumber", self.id_number.as_str()),
            ("artistName", self.artist_name.as_str()),
            ("procedureDescription", self.procedure_description.as_str()),
            ("bodyLocation", self.body_location.as_str()),
            ("jewelryMaterial", self.jewelry_material.as_str()),
            ("procedureDate", self.procedure_date.as_str()),
            ("medicalNotes", medical_notes),
            ("guardianName", self.guardian_name.as_str()),
            ("guardianIdNumber", self.guardian_id_number.as_str()),
            ("guardianRelationship", self.guardian_relationship.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect()
    }

    /// Set a field by its template name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> bool {
        let slot = match name {
            "clientName" => &mut self.client_name,
            "dateOfBirth" => &mut self.date_of_birth,
            "idNumber" => &mut self.id_number,
            "artistName" => &mut self.artist_name,
            "procedureDescription" => &mut self.procedure_description,
            "bodyLocation" => &mut self.body_location,
            "jewelryMaterial" => &mut self.jewelry_material,
            "procedureDate" => &mut self.procedure_date,
            "medicalNotes" => &mut self.medical_notes,
            "guardianName" => &mut self.guardian_name,
            "guardianIdNumber" => &mut self.guardian_id_number,
            "guardianRelationship" => &mut self.guardian_relationship,
            _ => return false,
        };
        *slot = value.into();
        true
    }
}

/// One consent form, from first keystroke to signed PDF.
///
/// ```text
/// Empty ──edit──▶ Editing ──validate ok──▶ ReadyToGenerate ──generate──▶ Generated
///                    ▲                            │
///                    └────────────edit────────────┘
/// ```
///
/// A generated form is frozen: any further edit, validation, or generation is
/// refused with [`InkformError::FormFrozen`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsentForm {
    pub id: FormId,
    pub client_id: Option<ClientId>,
    pub form_type: FormType,
    details: ConsentDetails,
    state: FormState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub signer_name: Option<String>,
    pub signed_at: Option<DateTime<Utc>>,
    /// SHA-256 of the generated PDF.
    pub document_hash: Option<String>,
}

impl ConsentForm {
    /// A blank form in the `Empty` state.
    pub fn new(form_type: FormType, client_id: Option<ClientId>) -> Self {
        let now = Utc::now();
        Self {
            id: FormId::new(),
            client_id,
            form_type,
            details: ConsentDetails::default(),
            state: FormState::Empty,
            created_at: now,
            updated_at: now,
            signer_name: None,
            signed_at: None,
            document_hash: None,
        }
    }

    /// A form for `client` with the client's details already entered.
    pub fn for_client(form_type: FormType, client: &ClientRecord) -> Self {
        let mut form = Self::new(form_type, Some(client.id));
        form.details = ConsentDetails::from_client(client);
        form.state = FormState::Editing;
        form
    }

    /// Where the form is in its lifecycle.
    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn details(&self) -> &ConsentDetails {
        &self.details
    }

    /// True once the form has been generated.
    pub fn is_frozen(&self) -> bool {
        self.state == FormState::Generated
    }

    /// The template this form fills.
    pub fn template(&self) -> &'static ConsentTemplate {
        ConsentTemplate::for_form(self.form_type)
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_frozen() {
            return Err(InkformError::FormFrozen(self.id.to_string()));
        }
        Ok(())
    }

    /// Change the details. Moves the form (back) to `Editing`.
    pub fn edit(&mut self, change: impl FnOnce(&mut ConsentDetails)) -> Result<()> {
        self.ensure_editable()?;
        change(&mut self.details);
        self.touch(FormState::Editing);
        Ok(())
    }

    /// Set one field by template name. Unknown names are ignored and reported
    /// with `Ok(false)`.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<bool> {
        self.ensure_editable()?;
        if !self.details.set(name, value) {
            return Ok(false);
        }
        self.touch(FormState::Editing);
        Ok(true)
    }

    /// Check the required fields. With nothing missing the form becomes
    /// `ReadyToGenerate`; otherwise it stays in (or returns to) `Editing`.
    /// Returns the missing field names.
    pub fn validate(&mut self) -> Result<Vec<&'static str>> {
        self.ensure_editable()?;
        let missing = self.missing_fields();
        let next = if missing.is_empty() {
            FormState::ReadyToGenerate
        } else if self.state == FormState::Empty {
            FormState::Empty
        } else {
            FormState::Editing
        };
        if next != self.state {
            debug!(form = %self.id, from = %self.state, to = %next, "consent form state change");
            self.state = next;
        }
        Ok(missing)
    }

    /// Required fields still blank, in template order. Does not change state.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.template().missing_fields(&self.details.to_field_set())
    }

    pub fn field_set(&self) -> FormFieldSet {
        self.details.to_field_set()
    }

    /// The template body with this form's values filled in.
    pub fn filled_text(&self) -> String {
        self.template().fill(&self.field_set())
    }

    /// Record a successful generation and freeze the form.
    pub fn mark_generated(
        &mut self,
        signer_name: impl Into<String>,
        signed_at: DateTime<Utc>,
        document_hash: impl Into<String>,
    ) -> Result<()> {
        self.ensure_generatable()?;
        self.signer_name = Some(signer_name.into());
        self.signed_at = Some(signed_at);
        self.document_hash = Some(document_hash.into());
        self.touch(FormState::Generated);
        Ok(())
    }

    /// `Ok` only in `ReadyToGenerate`.
    pub fn ensure_generatable(&self) -> Result<()> {
        self.ensure_editable()?;
        if self.state != FormState::ReadyToGenerate {
            return Err(InkformError::FormNotReady(format!("form is {}", self.state)));
        }
        Ok(())
    }

    fn touch(&mut self, next: FormState) {
        if next != self.state {
            debug!(form = %self.id, from = %self.state, to = %next, "consent form state change");
        }
        self.state = next;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_tattoo() -> ConsentForm {
        let mut client = ClientRecord::new("Jane Doe");
        client.date_of_birth = Some("01/01/1990".into());
        client.id_number = Some("D1234567".into());

        let mut form = ConsentForm::for_client(FormType::Tattoo, &client);
        form.edit(|d| {
            d.artist_name = "Sam Reyes".into();
            d.procedure_description = "Fine-line swallow".into();
            d.body_location = "Left forearm".into();
            d.procedure_date = "2026-03-14".into();
        })
        .unwrap();
        assert!(form.validate().unwrap().is_empty());
        form
    }

    #[test]
    fn new_form_is_empty_until_edited() {
        let mut form = ConsentForm::new(FormType::Piercing, None);
        assert_eq!(form.state(), FormState::Empty);
        assert_eq!(form.validate().unwrap().len(), 8);
        assert_eq!(form.state(), FormState::Empty);

        form.set_field("clientName", "Kai").unwrap();
        assert_eq!(form.state(), FormState::Editing);
    }

    #[test]
    fn client_prefill() {
        let form = ready_tattoo();
        assert_eq!(form.details().client_name, "Jane Doe");
        assert_eq!(form.state(), FormState::ReadyToGenerate);
    }

    #[test]
    fn editing_a_ready_form_returns_to_editing() {
        let mut form = ready_tattoo();
        form.set_field("bodyLocation", "Right calf").unwrap();
        assert_eq!(form.state(), FormState::Editing);
        assert!(form.ensure_generatable().is_err());
    }

    #[test]
    fn incomplete_form_cannot_generate() {
        let mut form = ConsentForm::new(FormType::Tattoo, None);
        form.set_field("clientName", "Jane").unwrap();
        let missing = form.validate().unwrap();
        assert!(missing.contains(&"idNumber"));
        let err = form.mark_generated("Jane", Utc::now(), "00").unwrap_err();
        assert!(matches!(err, InkformError::FormNotReady(_)));
    }

    #[test]
    fn generated_form_is_frozen() {
        let mut form = ready_tattoo();
        form.mark_generated("Jane Doe", Utc::now(), "ab".repeat(32)).unwrap();
        assert!(form.is_frozen());
        assert!(matches!(
            form.set_field("bodyLocation", "Back"),
            Err(InkformError::FormFrozen(_))
        ));
        assert!(matches!(form.validate(), Err(InkformError::FormFrozen(_))));
        assert!(matches!(
            form.mark_generated("Jane Doe", Utc::now(), "cd"),
            Err(InkformError::FormFrozen(_))
        ));
    }

    #[test]
    fn unknown_field_name_is_reported() {
        let mut form = ConsentForm::new(FormType::Tattoo, None);
        assert!(!form.set_field("favouriteColour", "teal").unwrap());
        assert_eq!(form.state(), FormState::Empty);
    }

    #[test]
    fn blank_medical_notes_are_declared_none() {
        let form = ready_tattoo();
        assert_eq!(form.field_set().get("medicalNotes"), Some(NO_MEDICAL_NOTES));
        assert!(form.filled_text().contains("medications: None declared."));
    }

    #[test]
    fn field_set_leaves_out_blanks() {
        let details = ConsentDetails {
            client_name: "Jo".into(),
            id_number: "  ".into(),
            ..ConsentDetails::default()
        };
        let set = details.to_field_set();
        assert_eq!(set.get("clientName"), Some("Jo"));
        assert_eq!(set.get("idNumber"), None);
    }

    #[test]
    fn form_survives_json() {
        let form = ready_tattoo();
        let json = serde_json::to_string(&form).unwrap();
        let back: ConsentForm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, form);
    }
}
