// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field parser: turns the ordered text lines recognised on an ID card into
// an `ExtractedFields` map.
//
// Each line is tested against a fixed, ordered list of recognisers. The first
// recogniser that matches claims the line, a line fills at most one field,
// and a field keeps the first value it was given. The address is the only
// field that may span two lines: a following "CITY, ST 12345" line is
// absorbed and joined with ", ".

use std::sync::LazyLock;

use inkform_core::types::{ExtractedFields, IdField};
use regex::Regex;
use tracing::{debug, trace};

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("field parser pattern")
}

// -- Labelled lines -----------------------------------------------------------

static NAME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^(?:FULL\s+)?NAME\s*:\s*(.*)$"));
static DOB_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)^(?:DOB|DATE\s+OF\s+BIRTH|BIRTH\s*DATE)\b\s*[:.]?\s*(.*)$")
});
static ID_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)^(?:ID\s*(?:NO\b\.?|NUMBER\b|#)|DL\s*NO\b\.?|LIC(?:ENSE)?\s*NO\b\.?)\s*:?\s*(.*)$")
});
static ADDRESS_LABEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^(?:ADDRESS|ADDR)\s*:\s*(.*)$"));
/// The colon is optional on date labels: many cards print `EXP 08/31/2028`.
static EXPIRY_LABEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^EXP(?:IRES|IRY|\s+DATE)?\b\s*[:.]?\s*(.*)$"));

/// Issue-date lines carry a date that must not be mistaken for the birth date.
static ISSUED_LABEL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)^(?:ISS(?:UED)?|ISSUE\s+DATE)\b\s*[:.]?"));

// -- Free-standing tokens -----------------------------------------------------

static EMAIL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b"));
static PHONE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?:\+?1[\s.-]?)?(?:\(\d{3}\)|\b\d{3})[\s.-]?\d{3}[\s.-]?\d{4}\b")
});
static DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\b(?:\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2}|\d{1,2}\.\d{1,2}\.\d{4})\b")
});

/// "ANYTOWN, CA 12345" or "SPRINGFIELD IL 62704-1234".
static CITY_STATE_ZIP: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"(?i)^[A-Z][A-Z .'-]*,?\s+[A-Z]{2}\s+\d{5}(?:-\d{4})?$")
});

static LABELLED: [(IdField, &LazyLock<Regex>); 5] = [
    (IdField::Name, &NAME_LABEL),
    (IdField::Dob, &DOB_LABEL),
    (IdField::IdNumber, &ID_LABEL),
    (IdField::Address, &ADDRESS_LABEL),
    (IdField::Expiry, &EXPIRY_LABEL),
];

static TOKENS: [(IdField, &LazyLock<Regex>); 3] = [
    (IdField::Email, &EMAIL_TOKEN),
    (IdField::Phone, &PHONE_TOKEN),
    (IdField::Dob, &DATE_TOKEN),
];

/// What a single line turned out to be.
#[derive(Debug, PartialEq, Eq)]
enum LineMatch<'a> {
    /// The line fills `field` with `value`.
    Field(IdField, &'a str),
    /// The line was claimed by a recogniser but carries nothing usable
    /// (a bare label, or an issue date).
    Claimed,
    Unrecognised,
}

fn recognise(line: &str) -> LineMatch<'_> {
    for &(field, re) in LABELLED.iter() {
        if let Some(caps) = re.captures(line) {
            let value = caps.get(1).map_or("", |m| m.as_str().trim());
            return if value.is_empty() {
                LineMatch::Claimed
            } else {
                LineMatch::Field(field, value)
            };
        }
    }

    if ISSUED_LABEL.is_match(line) {
        return LineMatch::Claimed;
    }

    for &(field, re) in TOKENS.iter() {
        if let Some(m) = re.find(line) {
            return LineMatch::Field(field, m.as_str().trim());
        }
    }

    LineMatch::Unrecognised
}

/// Whether `line` reads like the city/state/ZIP half of a street address.
pub fn is_address_continuation(line: &str) -> bool {
    CITY_STATE_ZIP.is_match(line.trim())
}

/// Prepare a raw OCR line for parsing: trim, collapse runs of whitespace, and
/// uppercase.
pub fn normalize_line(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Extract identity fields from recognised text lines, top to bottom.
///
/// Lines are expected to be normalised already (see [`normalize_line`]);
/// values are copied verbatim. Lines that match nothing are ignored and an
/// empty input yields an empty map.
pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> ExtractedFields {
    let mut fields = ExtractedFields::new();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx].as_ref().trim();
        idx += 1;

        let (field, value) = match recognise(line) {
            LineMatch::Field(field, value) => (field, value),
            LineMatch::Claimed | LineMatch::Unrecognised => continue,
        };

        let mut value = value.to_owned();
        if field == IdField::Address {
            if let Some(next) = lines.get(idx).map(|l| l.as_ref().trim()) {
                if is_address_continuation(next) {
                    value = format!("{value}, {next}");
                    idx += 1;
                }
            }
        }

        if !fields.insert_if_absent(field, value) {
            trace!(field = field.key(), line = idx, "field already set, line ignored");
        }
    }

    debug!(
        lines = lines.len(),
        fields = fields.len(),
        "ID text parsed"
    );
    fields
}
