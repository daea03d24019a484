// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receipt scanning pipeline — the two entry points used by callers:
// `detect` (find the receipt outline and draw a preview) and `process`
// (rectify the receipt along a contour and enhance it).

use belegwerk_core::error::Result;
use belegwerk_core::{Contour, EnhancementParams, ScanConfig};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::raster::codec::{ImageRasterizer, Rasterizer};
use crate::raster::data_url::{JPEG_MIME, to_data_url};
use crate::raster::ops::{ImageprocOps, RasterOps};
use crate::scan::{contour, corners, enhance, preprocess, rectify};

/// Outcome of receipt detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Ordered receipt outline in source pixel coordinates.
    pub contour: Contour,
    /// The source image with the outline drawn on top.
    pub preview: RgbImage,
}

impl DetectionResult {
    /// Encode the preview as JPEG.
    pub fn preview_jpeg(&self, rasterizer: &dyn Rasterizer, quality: u8) -> Result<Vec<u8>> {
        rasterizer.encode(&self.preview, quality)
    }
}

/// Outcome of receipt processing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedResult {
    /// Rectified, enhanced receipt.
    pub image: RgbImage,
}

impl ProcessedResult {
    /// Encode the processed receipt as JPEG.
    pub fn to_jpeg(&self, rasterizer: &dyn Rasterizer, quality: u8) -> Result<Vec<u8>> {
        rasterizer.encode(&self.image, quality)
    }
}

/// JSON shape of an encoded detection: contour pairs plus a JPEG data URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRecord {
    pub contour: Contour,
    pub preview: String,
}

/// JSON shape of a processing request before validation.
///
/// Missing tone fields take their neutral values; a missing contour is an
/// empty one and fails validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessRequest {
    pub contour: Vec<[f64; 2]>,
    pub brightness: i32,
    pub contrast: f32,
    pub denoise: bool,
}

impl Default for ProcessRequest {
    fn default() -> Self {
        let params = EnhancementParams::default();
        Self {
            contour: Vec::new(),
            brightness: params.brightness(),
            contrast: params.contrast(),
            denoise: params.denoise(),
        }
    }
}

impl ProcessRequest {
    /// Check the contour point count and the tone ranges.
    pub fn validate(&self) -> Result<(Contour, EnhancementParams)> {
        let contour = Contour::from_pairs(&self.contour)?;
        let params = EnhancementParams::new(self.brightness, self.contrast, self.denoise)?;
        Ok((contour, params))
    }
}

/// JSON shape of an encoded processing result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub processed_image: String,
}

/// Receipt scanner holding its configuration and imaging backends.
///
/// The scanner keeps no mutable state, so a single instance can serve any
/// number of threads.
pub struct ReceiptScanner {
    config: ScanConfig,
    ops: Box<dyn RasterOps>,
    rasterizer: Box<dyn Rasterizer>,
}

impl ReceiptScanner {
    // -- Construction ---------------------------------------------------------

    /// Scanner with the default `image`/`imageproc` backends.
    pub fn new(config: ScanConfig) -> Result<Self> {
        Self::with_backends(config, Box::new(ImageprocOps), Box::new(ImageRasterizer))
    }

    /// Scanner with caller-supplied backends.
    pub fn with_backends(
        config: ScanConfig,
        ops: Box<dyn RasterOps>,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ops,
            rasterizer,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn rasterizer(&self) -> &dyn Rasterizer {
        self.rasterizer.as_ref()
    }

    // -- Entry points ---------------------------------------------------------

    /// Decode `data`, locate the receipt and draw its outline on a preview.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn detect(&self, data: &[u8]) -> Result<DetectionResult> {
        let image = self.rasterizer.decode(data)?;
        self.detect_image(&image)
    }

    /// Locate the receipt in an already decoded image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect_image(&self, image: &RgbImage) -> Result<DetectionResult> {
        let mask = preprocess::edge_mask(self.ops.as_ref(), image, &self.config);
        let contour = contour::extract_contour(self.ops.as_ref(), &mask, &self.config)?;

        let mut preview = image.clone();
        self.ops.draw_closed_polyline(
            &mut preview,
            contour.corners(),
            Rgb(self.config.preview_color),
            self.config.preview_line_width,
        );
        info!(corners = ?contour.to_pairs(), "Detection complete");
        Ok(DetectionResult { contour, preview })
    }

    /// Decode `data`, rectify the receipt along `contour` and enhance it.
    ///
    /// The contour corners may arrive in any order; they are re-ordered
    /// before rectification.
    #[instrument(skip_all, fields(data_len = data.len()))]
    pub fn process(
        &self,
        data: &[u8],
        contour: &Contour,
        params: &EnhancementParams,
    ) -> Result<ProcessedResult> {
        let image = self.rasterizer.decode(data)?;
        self.process_image(&image, contour, params)
    }

    /// Rectify and enhance an already decoded image.
    #[instrument(skip_all, fields(
        brightness = params.brightness(),
        contrast = params.contrast(),
        denoise = params.denoise()
    ))]
    pub fn process_image(
        &self,
        image: &RgbImage,
        contour: &Contour,
        params: &EnhancementParams,
    ) -> Result<ProcessedResult> {
        let ordered = corners::order_corners(*contour.corners());
        let rectified = rectify::rectify(
            self.ops.as_ref(),
            image,
            &ordered,
            self.config.max_output_pixels,
        )?;
        let enhanced = enhance::enhance(rectified, params, &self.config.denoise);
        info!(
            width = enhanced.width(),
            height = enhanced.height(),
            "Receipt processed"
        );
        Ok(ProcessedResult { image: enhanced })
    }

    // -- Encoded variants -----------------------------------------------------

    /// [`detect`](Self::detect) with the preview encoded as a JPEG data URL.
    pub fn detect_encoded(&self, data: &[u8]) -> Result<DetectionRecord> {
        let result = self.detect(data)?;
        let jpeg = result.preview_jpeg(self.rasterizer(), self.config.preview_quality)?;
        Ok(DetectionRecord {
            contour: result.contour,
            preview: to_data_url(&jpeg, JPEG_MIME),
        })
    }

    /// [`process`](Self::process) with the result encoded as a JPEG data URL.
    pub fn process_encoded(
        &self,
        data: &[u8],
        contour: &Contour,
        params: &EnhancementParams,
    ) -> Result<ProcessedRecord> {
        let result = self.process(data, contour, params)?;
        let jpeg = result.to_jpeg(self.rasterizer(), self.config.output_quality)?;
        Ok(ProcessedRecord {
            processed_image: to_data_url(&jpeg, JPEG_MIME),
        })
    }

    /// Validate a raw [`ProcessRequest`] and run
    /// [`process_encoded`](Self::process_encoded) on it.
    pub fn process_request(&self, data: &[u8], request: &ProcessRequest) -> Result<ProcessedRecord> {
        let (contour, params) = request.validate()?;
        self.process_encoded(data, &contour, &params)
    }
}

impl Default for ReceiptScanner {
    fn default() -> Self {
        Self {
            config: ScanConfig::default(),
            ops: Box::new(ImageprocOps),
            rasterizer: Box::new(ImageRasterizer),
        }
    }
}

impl std::fmt::Debug for ReceiptScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiptScanner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
