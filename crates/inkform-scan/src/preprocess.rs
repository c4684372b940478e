// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing: grayscale, light denoise, contrast stretch, and optional
// Otsu binarization of an ID photo before text recognition.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::otsu_level;
use imageproc::filter::gaussian_blur_f32;
use tracing::{debug, instrument};

/// Builder-style preprocessing steps, consuming `self` so calls chain.
pub struct OcrPreprocessor {
    image: GrayImage,
}

impl OcrPreprocessor {
    pub fn new(image: &DynamicImage) -> Self {
        Self {
            image: image.to_luma8(),
        }
    }

    /// Gaussian blur to knock down sensor noise and card-texture speckle.
    pub fn denoise(self, sigma: f32) -> Self {
        if sigma <= 0.0 {
            return self;
        }
        Self {
            image: gaussian_blur_f32(&self.image, sigma),
        }
    }

    /// Linearly stretch luminance so the darkest pixel maps to 0 and the
    /// brightest to 255.
    pub fn stretch_contrast(mut self) -> Self {
        let (lo, hi) = self
            .image
            .as_raw()
            .iter()
            .fold((u8::MAX, u8::MIN), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        if hi <= lo {
            return self;
        }
        let span = (hi - lo) as f32;
        for pixel in self.image.pixels_mut() {
            let v = (pixel.0[0] - lo) as f32 * 255.0 / span;
            pixel.0[0] = v.round().clamp(0.0, 255.0) as u8;
        }
        self
    }

    /// Global Otsu threshold: ink becomes black, card stock white.
    pub fn binarize(mut self) -> Self {
        let level = otsu_level(&self.image);
        debug!(level, "Otsu level computed");
        for pixel in self.image.pixels_mut() {
            *pixel = if pixel.0[0] <= level {
                Luma([0])
            } else {
                Luma([255])
            };
        }
        self
    }

    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageLuma8(self.image)
    }
}

/// Default preparation used by the scan pipeline.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn prepare_for_ocr(image: &DynamicImage, binarize: bool) -> DynamicImage {
    let prepared = OcrPreprocessor::new(image).denoise(0.8).stretch_contrast();
    let prepared = if binarize { prepared.binarize() } else { prepared };
    prepared.into_dynamic()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tone(dark: u8, light: u8) -> DynamicImage {
        let img = GrayImage::from_fn(40, 20, |x, _| {
            if x < 20 { Luma([dark]) } else { Luma([light]) }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn stretch_uses_full_range() {
        let out = OcrPreprocessor::new(&two_tone(100, 150))
            .stretch_contrast()
            .into_dynamic()
            .to_luma8();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(39, 0).0[0], 255);
    }

    #[test]
    fn flat_image_is_left_alone() {
        let out = OcrPreprocessor::new(&two_tone(90, 90))
            .stretch_contrast()
            .into_dynamic()
            .to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 90));
    }

    #[test]
    fn binarize_produces_two_levels() {
        let out = OcrPreprocessor::new(&two_tone(60, 200))
            .binarize()
            .into_dynamic()
            .to_luma8();
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(39, 0).0[0], 255);
        assert!(out.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn prepare_keeps_dimensions() {
        let out = prepare_for_ocr(&two_tone(10, 240), true);
        assert_eq!((out.width(), out.height()), (40, 20));
    }
}
