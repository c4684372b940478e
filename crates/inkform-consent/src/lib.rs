// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// inkform-consent: Consent forms for Inkform.
//
// Static per-form-type templates with `{field}` placeholders, the consent
// form lifecycle, handwritten signature capture, and signed PDF output.

pub mod form;
pub mod pdf;
pub mod signature;
pub mod template;

pub use form::{ConsentDetails, ConsentForm};
pub use pdf::{ConsentPdfRenderer, RenderRequest};
pub use signature::{SignatureStrokes, StrokePoint};
pub use template::{ConsentTemplate, FormFieldSet, unresolved_placeholders};
