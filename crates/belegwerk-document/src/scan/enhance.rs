// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Legibility enhancement for rectified receipts — optional non-local-means
// denoising, brightness/contrast remapping, and a fixed sharpening filter.

use belegwerk_core::config::DenoiseConfig;
use belegwerk_core::EnhancementParams;
use image::RgbImage;
use imageproc::filter::filter3x3;
use tracing::{debug, info, instrument};

use crate::scan::denoise::denoise_colored;

/// 3x3 sharpening kernel (identity plus a Laplacian), row-major.
pub const SHARPEN_KERNEL: [[i32; 3]; 3] = [[-1, -1, -1], [-1, 9, -1], [-1, -1, -1]];

/// Run the enhancement chain in its fixed order:
///
/// 1. Denoise, when `params.denoise()` is set
/// 2. Brightness/contrast, unless both are neutral
/// 3. Sharpen, always
#[instrument(skip(image, denoise), fields(width = image.width(), height = image.height()))]
pub fn enhance(image: RgbImage, params: &EnhancementParams, denoise: &DenoiseConfig) -> RgbImage {
    let mut image = if params.denoise() {
        info!(
            pixels = image.width() as u64 * image.height() as u64,
            "Denoising (dominant cost for large receipts)"
        );
        denoise_colored(&image, denoise)
    } else {
        image
    };

    if params.is_neutral_tone() {
        debug!("Brightness and contrast neutral; skipping tone adjustment");
    } else {
        adjust_tone(&mut image, params.brightness(), params.contrast());
    }

    sharpen(&image)
}

/// Per-channel value mapping for the given brightness and contrast.
///
/// Brightness maps `[0, 255]` linearly onto `[shadow, highlight]`:
/// a positive value lifts the shadows to `brightness`, a negative value
/// pulls the highlights down to `255 + brightness`. Contrast then scales the
/// result by `contrast`. Both steps round and saturate to `[0, 255]`.
pub fn tone_curve(brightness: i32, contrast: f32) -> [u8; 256] {
    let (shadow, highlight) = if brightness > 0 {
        (brightness as f64, 255.0)
    } else {
        (0.0, 255.0 + brightness as f64)
    };
    let alpha = (highlight - shadow) / 255.0;

    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        let mut value = v as u8;
        if brightness != 0 {
            value = saturate(alpha * v as f64 + shadow);
        }
        if contrast != 1.0 {
            value = saturate(contrast as f64 * value as f64);
        }
        *out = value;
    }
    lut
}

/// Apply [`tone_curve`] to every channel in place.
#[instrument(skip(image))]
pub fn adjust_tone(image: &mut RgbImage, brightness: i32, contrast: f32) {
    let lut = tone_curve(brightness, contrast);
    for pixel in image.pixels_mut() {
        for channel in pixel.0.iter_mut() {
            *channel = lut[*channel as usize];
        }
    }
}

/// Convolve with [`SHARPEN_KERNEL`], replicating edge pixels at the border
/// and saturating each channel.
#[instrument(skip_all)]
pub fn sharpen(image: &RgbImage) -> RgbImage {
    if image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    filter3x3::<_, i32, u8>(image, SHARPEN_KERNEL.as_flattened())
}

fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
