// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Byte codec — decode uploaded image bytes to RGB and encode results as JPEG.

use belegwerk_core::error::{BelegwerkError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;
use tracing::{debug, instrument};

/// Conversion between encoded image bytes and 8-bit RGB rasters.
pub trait Rasterizer: Send + Sync {
    /// Decode any supported format (JPEG, PNG, ...) into RGB.
    fn decode(&self, data: &[u8]) -> Result<RgbImage>;

    /// Encode as baseline JPEG with the given quality (1-100).
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>>;
}

/// [`Rasterizer`] backed by the `image` crate's codecs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRasterizer;

impl Rasterizer for ImageRasterizer {
    #[instrument(skip_all, fields(data_len = data.len()))]
    fn decode(&self, data: &[u8]) -> Result<RgbImage> {
        if data.is_empty() {
            return Err(BelegwerkError::Decode("input is empty".into()));
        }
        let img = image::load_from_memory(data)
            .map_err(|err| BelegwerkError::Decode(err.to_string()))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(img.to_rgb8())
    }

    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn encode(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        image
            .write_with_encoder(encoder)
            .map_err(|err| BelegwerkError::Encode(format!("JPEG encoding failed: {err}")))?;
        debug!(bytes = buffer.len(), "Image encoded as JPEG");
        Ok(buffer)
    }
}
