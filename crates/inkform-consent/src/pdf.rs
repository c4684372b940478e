// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Consent form PDF rendering with `printpdf` 0.8.
//
// Layout: studio name and form title at the top of the first page, the filled
// form body word-wrapped and paginated beneath, and a signature block (image,
// signer name, signing date) at the end of the last page. Every page carries a
// footer with the form ID and page number.

use std::path::Path;

use chrono::{DateTime, Utc};
use inkform_core::PaperSize;
use inkform_core::error::{InkformError, Result};
use inkform_core::types::FormId;
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectId, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::form::ConsentForm;
use crate::template::unresolved_placeholders;

const MARGIN_MM: f32 = 20.0;
const BODY_SIZE: f32 = 11.0;
const BODY_LEADING: f32 = 14.0;
const STUDIO_SIZE: f32 = 18.0;
const TITLE_SIZE: f32 = 14.0;
const FOOTER_SIZE: f32 = 8.0;
/// Printed resolution of the signature image.
const SIGNATURE_DPI: f32 = 150.0;
const SIGNATURE_MAX_W: f32 = 220.0;
const SIGNATURE_MAX_H: f32 = 70.0;
/// Vertical room the signature block needs: caption, image, name, date.
const SIGNATURE_BLOCK: f32 = BODY_LEADING * 2.0 + SIGNATURE_MAX_H + BODY_LEADING * 2.0;
/// Studio name and form title at the top of the first page.
const HEADER_BLOCK: f32 = STUDIO_SIZE + 6.0 + TITLE_SIZE + BODY_LEADING;

/// Everything that ends up on a signed consent form.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub form_id: FormId,
    pub studio_name: String,
    pub title: String,
    /// Filled form text. Paragraphs are separated by newlines.
    pub body: String,
    /// PNG of the client's signature.
    pub signature_png: Vec<u8>,
    pub signer_name: String,
    pub signed_at: DateTime<Utc>,
}

impl RenderRequest {
    pub fn from_form(
        form: &ConsentForm,
        studio_name: impl Into<String>,
        signature_png: Vec<u8>,
        signer_name: impl Into<String>,
        signed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            form_id: form.id,
            studio_name: studio_name.into(),
            title: form.template().title.to_owned(),
            body: form.filled_text(),
            signature_png,
            signer_name: signer_name.into(),
            signed_at,
        }
    }
}

/// Lays out signed consent forms as PDF.
pub struct ConsentPdfRenderer {
    paper_size: PaperSize,
}

impl ConsentPdfRenderer {
    pub fn new(paper_size: PaperSize) -> Self {
        Self { paper_size }
    }

    pub fn paper_size(&self) -> PaperSize {
        self.paper_size
    }

    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    #[instrument(skip_all, fields(form = %request.form_id, body_len = request.body.len()))]
    pub fn render(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let unresolved = unresolved_placeholders(&request.body);
        if !unresolved.is_empty() {
            warn!(?unresolved, "consent form rendered with unfilled placeholders");
        }

        let (page_w, page_h) = self.page_dimensions();
        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;
        let margin = Mm(MARGIN_MM).into_pt().0;
        let top = page_h_pt - margin;
        // Footer sits inside the bottom margin.
        let bottom = margin + BODY_LEADING;

        // The header and signature block must fit on one page.
        if page_w_pt - 2.0 * margin < SIGNATURE_MAX_W || top - bottom < HEADER_BLOCK + SIGNATURE_BLOCK {
            let (w_mm, h_mm) = self.paper_size.dimensions_mm();
            return Err(InkformError::PdfError(format!(
                "{w_mm}x{h_mm} mm paper is too small for a consent form"
            )));
        }

        // Helvetica averages about half an em per glyph.
        let avg_char_pt = 0.5 * BODY_SIZE;
        let max_chars = ((page_w_pt - 2.0 * margin) / avg_char_pt) as usize;
        let lines = wrap_text(&request.body, max_chars.max(20));

        let mut doc = PdfDocument::new(&request.title);
        let signature = self.signature_xobject(&mut doc, &request.signature_png)?;

        let mut pages: Vec<Vec<Op>> = Vec::new();
        let mut ops: Vec<Op> = Vec::new();
        let mut y = top;

        text_line(&mut ops, margin, y, STUDIO_SIZE, BuiltinFont::HelveticaBold, &request.studio_name);
        y -= STUDIO_SIZE + 6.0;
        text_line(&mut ops, margin, y, TITLE_SIZE, BuiltinFont::HelveticaBold, &request.title);
        y -= TITLE_SIZE + BODY_LEADING;

        for line in &lines {
            if y < bottom {
                pages.push(std::mem::take(&mut ops));
                y = top;
            }
            if !line.is_empty() {
                text_line(&mut ops, margin, y, BODY_SIZE, BuiltinFont::Helvetica, line);
            }
            y -= BODY_LEADING;
        }

        if y - SIGNATURE_BLOCK < bottom {
            pages.push(std::mem::take(&mut ops));
            y = top;
        }
        y -= BODY_LEADING;
        text_line(&mut ops, margin, y, BODY_SIZE, BuiltinFont::HelveticaBold, "Client signature:");
        y -= BODY_LEADING;

        let (sig_id, sig_w, sig_h) = signature;
        let scale = (SIGNATURE_MAX_W / sig_w).min(SIGNATURE_MAX_H / sig_h).min(1.0);
        ops.push(Op::UseXobject {
            id: sig_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(margin)),
                translate_y: Some(Pt(y - sig_h * scale)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(SIGNATURE_DPI),
                rotate: None,
            },
        });
        y -= SIGNATURE_MAX_H + BODY_LEADING;

        text_line(&mut ops, margin, y, BODY_SIZE, BuiltinFont::Helvetica, &format!("Signed by: {}", request.signer_name));
        y -= BODY_LEADING;
        let date = request.signed_at.format("%Y-%m-%d %H:%M UTC").to_string();
        text_line(&mut ops, margin, y, BODY_SIZE, BuiltinFont::Helvetica, &format!("Date: {date}"));
        pages.push(ops);

        let total = pages.len();
        let pages: Vec<PdfPage> = pages
            .into_iter()
            .enumerate()
            .map(|(idx, mut ops)| {
                let footer = format!("Form {} | Page {} of {}", request.form_id, idx + 1, total);
                text_line(&mut ops, margin, margin, FOOTER_SIZE, BuiltinFont::Helvetica, &footer);
                PdfPage::new(page_w, page_h, ops)
            })
            .collect();
        doc.with_pages(pages);

        debug!(lines = lines.len(), pages = total, "consent layout complete");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(count = warnings.len(), "printpdf reported warnings");
        }

        info!(bytes = output.len(), pages = total, "consent form rendered");
        Ok(output)
    }

    /// Decode the signature PNG and register it with the document. Returns
    /// the XObject and its natural size in points at [`SIGNATURE_DPI`].
    fn signature_xobject(&self, doc: &mut PdfDocument, png: &[u8]) -> Result<(XObjectId, f32, f32)> {
        let decoded = ::image::load_from_memory(png).map_err(|err| {
            InkformError::ImageError(format!("failed to decode signature image: {err}"))
        })?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb.into_raw()),
            width: width as usize,
            height: height as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };
        let id = doc.add_image(&raw);
        let to_pt = |px: u32| px as f32 / SIGNATURE_DPI * 72.0;
        Ok((id, to_pt(width), to_pt(height)))
    }

    pub fn write_to_file(&self, request: &RenderRequest, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render(request)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote consent PDF to {}", path.as_ref().display());
        Ok(())
    }
}

impl Default for ConsentPdfRenderer {
    fn default() -> Self {
        Self::new(PaperSize::Letter)
    }
}

fn text_line(ops: &mut Vec<Op>, x: f32, y: f32, size: f32, font: BuiltinFont, text: &str) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point { x: Pt(x), y: Pt(y) },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_owned())],
        font,
    });
    ops.push(Op::EndTextSection);
}

/// Greedy word wrap at `max_chars` characters per line. Newlines start new
/// paragraphs and blank lines are kept; a word longer than a whole line is
/// split.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut out = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_chars = 0usize;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if line_chars > 0 {
                    out.push(std::mem::take(&mut line));
                    line_chars = 0;
                }
                out.push(word.drain(..max_chars).collect());
            }
            if word.is_empty() {
                continue;
            }

            let needed = if line_chars == 0 { word.len() } else { line_chars + 1 + word.len() };
            if needed > max_chars {
                out.push(std::mem::take(&mut line));
                line_chars = 0;
            }
            if line_chars > 0 {
                line.push(' ');
                line_chars += 1;
            }
            line.extend(word.iter());
            line_chars += word.len();
        }

        // Empty paragraphs come through as blank lines.
        out.push(line);
    }

    out
}
