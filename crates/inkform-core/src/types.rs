// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Inkform studio engine.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// A fresh random (v4) identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a client record.
    ClientId
);
uuid_id!(
    /// Unique identifier for a stored ID scan.
    ScanId
);
uuid_id!(
    /// Unique identifier for a consent form.
    FormId
);

// ---------------------------------------------------------------------------
// Identity fields
// ---------------------------------------------------------------------------

/// The fixed set of fields the ID parser knows how to extract.
///
/// Declaration order is the canonical order used for display and for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdField {
    Name,
    Dob,
    IdNumber,
    Address,
    Expiry,
    Email,
    Phone,
}

impl IdField {
    /// Every field, in canonical order. Diagnostics list missing fields in
    /// this order.
    pub const ALL: [IdField; 7] = [
        Self::Name,
        Self::Dob,
        Self::IdNumber,
        Self::Address,
        Self::Expiry,
        Self::Email,
        Self::Phone,
    ];

    /// Stable key used in persisted maps and user-facing diagnostics.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Dob => "dob",
            Self::IdNumber => "idNumber",
            Self::Address => "address",
            Self::Expiry => "expiry",
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }

    /// Inverse of [`IdField::key`]. `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for IdField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Sparse map of identity fields extracted from one scan.
///
/// A key that is absent means the field was not found. Values are never
/// empty: [`ExtractedFields::insert_if_absent`] refuses blank values, and an
/// existing value is never overwritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields {
    entries: BTreeMap<IdField, String>,
}

impl ExtractedFields {
    /// An empty map.
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Store `value` under `field` unless the field is already set or the
    /// value is blank. Returns whether the value was stored.
    pub fn insert_if_absent(&mut self, field: IdField, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.entries.contains_key(&field) {
            return false;
        }
        self.entries.insert(field, value);
        true
    }

    /// The value extracted for `field`, if any.
    pub fn get(&self, field: IdField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    /// Whether `field` has a value.
    pub fn contains(&self, field: IdField) -> bool {
        self.entries.contains_key(&field)
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of fields with a value.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (IdField, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl FromIterator<(IdField, String)> for ExtractedFields {
    fn from_iter<T: IntoIterator<Item = (IdField, String)>>(iter: T) -> Self {
        let mut fields = Self::new();
        for (field, value) in iter {
            fields.insert_if_absent(field, value);
        }
        fields
    }
}

// ---------------------------------------------------------------------------
// Scan failures
// ---------------------------------------------------------------------------

/// Why an ID scan could not produce a usable field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanErrorKind {
    /// The image bytes could not be decoded.
    ImageConversion,
    /// The image decoded but is too small, dark, bright, flat, or blurry.
    PoorQuality,
    /// Recognition ran but produced no text.
    NoTextFound,
    /// The OCR engine failed while recognising.
    RecognitionFailed,
    /// The bytes are not an image format we understand.
    InvalidFormat,
    /// The OCR engine could not be reached or initialised.
    RequestFailed,
    /// Text was found but the engine was not confident in it.
    LowConfidence,
    /// Text was parsed but does not identify the client.
    MissingRequiredFields,
}

/// What the host app should ask the user to do after a failed scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Remedy {
    RetakePhoto,
    TryAgain,
    ManualEntry,
}

impl ScanErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ImageConversion => "image-conversion",
            Self::PoorQuality => "poor-quality",
            Self::NoTextFound => "no-text-found",
            Self::RecognitionFailed => "recognition-failed",
            Self::InvalidFormat => "invalid-format",
            Self::RequestFailed => "request-failed",
            Self::LowConfidence => "low-confidence",
            Self::MissingRequiredFields => "missing-required-fields",
        }
    }

    /// What the operator should do next after this failure.
    pub fn remedy(&self) -> Remedy {
        match self {
            Self::ImageConversion
            | Self::InvalidFormat
            | Self::PoorQuality
            | Self::NoTextFound
            | Self::LowConfidence => Remedy::RetakePhoto,
            Self::RecognitionFailed | Self::RequestFailed => Remedy::TryAgain,
            Self::MissingRequiredFields => Remedy::ManualEntry,
        }
    }
}

impl std::fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Consent forms
// ---------------------------------------------------------------------------

/// Kinds of consent form the studio issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormType {
    Tattoo,
    Piercing,
    /// Guardian consent for a client under the age of majority.
    MinorGuardian,
}

impl FormType {
    /// Every form type, in the order the form picker shows them.
    pub const ALL: [FormType; 3] = [Self::Tattoo, Self::Piercing, Self::MinorGuardian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tattoo => "tattoo",
            Self::Piercing => "piercing",
            Self::MinorGuardian => "minor-guardian",
        }
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FormType {
    type Err = crate::InkformError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::InkformError::UnknownFormType(s.to_owned()))
    }
}

/// Lifecycle of a consent form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormState {
    /// Created, nothing entered yet.
    Empty,
    /// Fields are being entered or changed.
    Editing,
    /// Validated; every required field is present.
    ReadyToGenerate,
    /// PDF produced and signed. Frozen.
    Generated,
}

impl FormState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Editing => "editing",
            Self::ReadyToGenerate => "ready-to-generate",
            Self::Generated => "generated",
        }
    }
}

impl std::fmt::Display for FormState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

/// A studio client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub full_name: String,
    pub date_of_birth: Option<String>,
    pub id_number: Option<String>,
    pub id_expiry: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRecord {
    /// A new client with only a name, timestamped now.
    pub fn new(full_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            full_name: full_name.into(),
            date_of_birth: None,
            id_number: None,
            id_expiry: None,
            address: None,
            email: None,
            phone: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Pre-fill a client from the fields of a successful ID scan.
    ///
    /// Returns `None` when the scan carries no name.
    pub fn from_scan(fields: &ExtractedFields) -> Option<Self> {
        let name = fields.get(IdField::Name)?;
        let owned = |field| fields.get(field).map(str::to_owned);
        Some(Self {
            date_of_birth: owned(IdField::Dob),
            id_number: owned(IdField::IdNumber),
            id_expiry: owned(IdField::Expiry),
            address: owned(IdField::Address),
            email: owned(IdField::Email),
            phone: owned(IdField::Phone),
            ..Self::new(name)
        })
    }
}

// ---------------------------------------------------------------------------
// Paper
// ---------------------------------------------------------------------------

/// Paper sizes for generated consent forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}
