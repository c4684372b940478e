// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consent form templates.
//
// Each form type has a fixed body of text with `{fieldName}` placeholders and
// a declared list of fields that must be filled before the form may be
// generated. Templates are static and never change at runtime.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use inkform_core::types::FormType;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z][A-Za-z0-9_]*)\}").expect("placeholder pattern")
});

/// Field name to value, the input to [`ConsentTemplate::fill`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormFieldSet {
    values: BTreeMap<String, String>,
}

impl FormFieldSet {
    /// An empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` to `value`, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// The value for `name`, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Present and not just whitespace.
    pub fn is_filled(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.trim().is_empty())
    }

    /// Number of fields set, blank ones included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when no field has been set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFieldSet {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (k, v) in iter {
            set.set(k, v);
        }
        set
    }
}

#[derive(Debug)]
pub struct ConsentTemplate {
    pub form_type: FormType,
    pub title: &'static str,
    pub body: &'static str,
    pub required_fields: &'static [&'static str],
}

impl ConsentTemplate {
    /// The built-in template for `form_type`.
    pub fn for_form(form_type: FormType) -> &'static ConsentTemplate {
        match form_type {
            FormType::Tattoo => &TATTOO,
            FormType::Piercing => &PIERCING,
            FormType::MinorGuardian => &MINOR_GUARDIAN,
        }
    }

    /// Every required field is present with a non-blank value.
    pub fn validate(&self, fields: &FormFieldSet) -> bool {
        self.required_fields.iter().all(|name| fields.is_filled(name))
    }

    /// Required fields that are absent or blank, in declared order.
    pub fn missing_fields(&self, fields: &FormFieldSet) -> Vec<&'static str> {
        self.required_fields
            .iter()
            .copied()
            .filter(|name| !fields.is_filled(name))
            .collect()
    }

    /// Substitute `{name}` placeholders with values from `fields`.
    ///
    /// One left-to-right pass over the template body. A placeholder with no
    /// value in `fields` is left as written, and substituted values are never
    /// themselves searched for placeholders.
    pub fn fill(&self, fields: &FormFieldSet) -> String {
        fill_text(self.body, fields).into_owned()
    }

    /// Distinct placeholder names in the body, in order of first appearance.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(self.body) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }
}

fn fill_text<'a>(text: &'a str, fields: &FormFieldSet) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| match fields.get(&caps[1]) {
        Some(value) => value.to_owned(),
        None => caps[0].to_owned(),
    })
}

/// Placeholder names still present in already-filled text.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_owned());
        }
    }
    names
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

static TATTOO: ConsentTemplate = ConsentTemplate {
    form_type: FormType::Tattoo,
    title: "Tattoo Consent and Release",
    body: "\
I, {clientName}, born {dateOfBirth}, identified by ID number {idNumber}, \
request and consent to be tattooed by {artistName} on {procedureDate}.

Design: {procedureDescription}
Placement: {bodyLocation}

I confirm that I am at least 18 years of age and not under the influence of \
alcohol or drugs. I have disclosed the following medical conditions, \
allergies, and medications: {medicalNotes}.

I understand that a tattoo is a permanent change to my appearance, that \
variations in colour and design may occur, and that infection is possible if \
aftercare instructions are not followed. I have received written aftercare \
instructions and agree to follow them.

I release the artist and the studio from all liability arising from the \
procedure, except in the case of negligence.",
    required_fields: &[
        "clientName",
        "dateOfBirth",
        "idNumber",
        "artistName",
        "procedureDescription",
        "bodyLocation",
        "procedureDate",
    ],
};

static PIERCING: ConsentTemplate = ConsentTemplate {
    form_type: FormType::Piercing,
    title: "Body Piercing Consent and Release",
    body: "\
I, {clientName}, born {dateOfBirth}, identified by ID number {idNumber}, \
consent to a piercing performed by {artistName} on {procedureDate}.

Piercing: {procedureDescription}
Location: {bodyLocation}
Jewellery: {jewelryMaterial}

I have disclosed the following medical conditions, metal allergies, and \
medications: {medicalNotes}.

I understand that healing times vary, that swelling, bleeding, or infection \
may occur, and that the jewellery may be rejected by my body. I have received \
written aftercare instructions and agree to follow them.

I release the piercer and the studio from all liability arising from the \
procedure, except in the case of negligence.",
    required_fields: &[
        "clientName",
        "dateOfBirth",
        "idNumber",
        "artistName",
        "procedureDescription",
        "bodyLocation",
        "jewelryMaterial",
        "procedureDate",
    ],
};

static MINOR_GUARDIAN: ConsentTemplate = ConsentTemplate {
    form_type: FormType::MinorGuardian,
    title: "Parent or Guardian Consent for a Minor",
    body: "\
I, {guardianName}, identified by ID number {guardianIdNumber}, am the \
{guardianRelationship} of {clientName}, born {dateOfBirth}.

I give my consent for {clientName} to receive the following procedure from \
{artistName} on {procedureDate}:

Procedure: {procedureDescription}
Location: {bodyLocation}

I have disclosed the following medical conditions, allergies, and \
medications of the minor: {medicalNotes}.

I confirm that I am present for the procedure, that I have legal authority to \
consent on the minor's behalf, and that I have read and understood the \
aftercare instructions. I release the artist and the studio from all \
liability arising from the procedure, except in the case of negligence.",
    required_fields: &[
        "guardianName",
        "guardianIdNumber",
        "guardianRelationship",
        "clientName",
        "dateOfBirth",
        "artistName",
        "procedureDescription",
        "procedureDate",
    ],
};
