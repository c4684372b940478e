// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Handwritten signatures captured as pen strokes.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use inkform_core::error::{InkformError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const INK: Rgb<u8> = Rgb([0, 0, 0]);
const PAPER: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned box around every point of a signature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl StrokeBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// A signature as drawn on the host's canvas, one `Vec` per pen-down.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignatureStrokes {
    pub strokes: Vec<Vec<StrokePoint>>,
}

impl SignatureStrokes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stroke at `(x, y)`.
    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.strokes.push(vec![StrokePoint { x, y }]);
    }

    /// Extend the current stroke, starting one if there is none.
    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        match self.strokes.last_mut() {
            Some(stroke) => stroke.push(StrokePoint { x, y }),
            None => self.begin_stroke(x, y),
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    pub fn is_blank(&self) -> bool {
        self.strokes.iter().all(Vec::is_empty)
    }

    pub fn bounds(&self) -> Option<StrokeBounds> {
        let mut points = self.strokes.iter().flatten();
        let first = points.next()?;
        let init = StrokeBounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(points.fold(init, |b, p| StrokeBounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    /// Draw the strokes black on white, scaled to fit and centred in a
    /// `width` × `height` canvas, and encode the result as PNG.
    #[instrument(skip(self), fields(strokes = self.strokes.len()))]
    pub fn render_png(&self, width: u32, height: u32) -> Result<Vec<u8>> {
        let bounds = self.bounds().ok_or(InkformError::BlankSignature)?;
        if width == 0 || height == 0 {
            return Err(InkformError::ImageError(format!(
                "signature canvas must not be empty ({width}x{height})"
            )));
        }

        let pen = (width.min(height) as f32 / 60.0).max(1.5);
        let pad = pen * 2.0;
        let avail_w = (width as f32 - 2.0 * pad).max(1.0);
        let avail_h = (height as f32 - 2.0 * pad).max(1.0);
        let scale = (avail_w / bounds.width().max(1.0)).min(avail_h / bounds.height().max(1.0));
        let off_x = (width as f32 - bounds.width() * scale) / 2.0;
        let off_y = (height as f32 - bounds.height() * scale) / 2.0;
        let map = |p: &StrokePoint| {
            (
                off_x + (p.x - bounds.min_x) * scale,
                off_y + (p.y - bounds.min_y) * scale,
            )
        };

        let mut canvas = RgbImage::from_pixel(width, height, PAPER);
        let radius = (pen / 2.0).round().max(1.0) as i32;
        for stroke in &self.strokes {
            let mapped: Vec<(f32, f32)> = stroke.iter().map(&map).collect();
            for &(x, y) in &mapped {
                draw_filled_circle_mut(&mut canvas, (x.round() as i32, y.round() as i32), radius, INK);
            }
            for pair in mapped.windows(2) {
                draw_thick_segment(&mut canvas, pair[0], pair[1], radius);
            }
        }

        let mut png = Vec::new();
        DynamicImage::ImageRgb8(canvas)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|err| InkformError::ImageError(format!("failed to encode signature: {err}")))?;

        debug!(width, height, scale, bytes = png.len(), "signature rendered");
        Ok(png)
    }
}

/// Lay parallel one-pixel segments across the pen width.
fn draw_thick_segment(canvas: &mut RgbImage, from: (f32, f32), to: (f32, f32), radius: i32) {
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len < f32::EPSILON {
        return;
    }
    let (nx, ny) = (-dy / len, dx / len);
    for step in -radius..=radius {
        let o = step as f32;
        draw_line_segment_mut(
            canvas,
            (from.0 + nx * o, from.1 + ny * o),
            (to.0 + nx * o, to.1 + ny * o),
            INK,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scribble() -> SignatureStrokes {
        let mut sig = SignatureStrokes::new();
        sig.begin_stroke(10.0, 50.0);
        sig.extend_stroke(60.0, 20.0);
        sig.extend_stroke(110.0, 55.0);
        sig.begin_stroke(130.0, 30.0);
        sig.extend_stroke(170.0, 30.0);
        sig
    }

    #[test]
    fn blank_until_drawn() {
        let mut sig = SignatureStrokes::new();
        assert!(sig.is_blank());
        assert!(sig.bounds().is_none());
        sig.extend_stroke(1.0, 2.0);
        assert!(!sig.is_blank());
        sig.clear();
        assert!(sig.is_blank());
    }

    #[test]
    fn bounds_cover_every_point() {
        let b = scribble().bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (10.0, 20.0, 170.0, 55.0));
        assert_eq!(b.width(), 160.0);
    }

    #[test]
    fn blank_signature_cannot_render() {
        assert!(matches!(
            SignatureStrokes::new().render_png(300, 100),
            Err(InkformError::BlankSignature)
        ));
    }

    #[test]
    fn renders_ink_on_white_png() {
        let png = scribble().render_png(300, 100).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (300, 100));
        assert_eq!(*img.get_pixel(0, 0), PAPER);
        assert!(img.pixels().any(|p| *p == INK));
    }

    #[test]
    fn single_dot_still_renders() {
        let mut sig = SignatureStrokes::new();
        sig.begin_stroke(5.0, 5.0);
        let png = sig.render_png(60, 30).unwrap();
        let img = image::load_from_memory(&png).unwrap().to_rgb8();
        assert!(img.pixels().any(|p| *p == INK));
    }
}
