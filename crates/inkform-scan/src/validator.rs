// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Completeness rule for an ID scan.
//
// A scan identifies a client when it has a name and one of two proofs: an
// official ID number, or a date of birth together with an address.

use inkform_core::types::{ExtractedFields, IdField};

/// Prefix of the failure message for an incomplete scan.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";

fn has(fields: &ExtractedFields, field: IdField) -> bool {
    fields.get(field).is_some_and(|v| !v.trim().is_empty())
}

/// `name` AND (`idNumber` OR (`dob` AND `address`)).
pub fn is_valid(fields: &ExtractedFields) -> bool {
    has(fields, IdField::Name)
        && (has(fields, IdField::IdNumber)
            || (has(fields, IdField::Dob) && has(fields, IdField::Address)))
}

/// The fields whose addition would make `fields` valid, in canonical order.
///
/// When neither identity proof is complete, both routes are reported: the ID
/// number, plus whichever of date of birth and address is missing. Empty when
/// the map is already valid.
pub fn missing_requirements(fields: &ExtractedFields) -> Vec<IdField> {
    let mut missing = Vec::new();
    if !has(fields, IdField::Name) {
        missing.push(IdField::Name);
    }

    let id_path = has(fields, IdField::IdNumber);
    let bio_path = has(fields, IdField::Dob) && has(fields, IdField::Address);
    if !id_path && !bio_path {
        missing.push(IdField::IdNumber);
        for field in [IdField::Dob, IdField::Address] {
            if !has(fields, field) {
                missing.push(field);
            }
        }
    }
    missing
}

/// "Missing required fields: name, idNumber" style diagnostic.
pub fn missing_fields_message(missing: &[IdField]) -> String {
    if missing.is_empty() {
        return MISSING_FIELDS_MESSAGE.to_owned();
    }
    let keys: Vec<&str> = missing.iter().map(IdField::key).collect();
    format!("{MISSING_FIELDS_MESSAGE}: {}", keys.join(", "))
}
