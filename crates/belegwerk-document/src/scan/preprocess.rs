// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge-mask preprocessing: luminance, Gaussian blur, hysteresis edges, and
// dilation to bridge broken edge segments.

use belegwerk_core::ScanConfig;
use image::{GrayImage, RgbImage};
use tracing::{debug, instrument};

use crate::raster::ops::RasterOps;

/// Produce the binary edge mask (0 / 255) used for boundary extraction.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn edge_mask(ops: &dyn RasterOps, image: &RgbImage, config: &ScanConfig) -> GrayImage {
    let gray = ops.luminance(image);
    let blurred = ops.gaussian_blur(&gray, config.blur_kernel_size);
    debug!(kernel = config.blur_kernel_size, "Applied Gaussian blur");

    let edges = ops.detect_edges(&blurred, config.canny_low, config.canny_high);
    debug!(
        low = config.canny_low,
        high = config.canny_high,
        edge_pixels = count_set(&edges),
        "Edge detection complete"
    );

    let dilated = ops.dilate(&edges, config.dilate_kernel_size, config.dilate_iterations);
    debug!(
        kernel = config.dilate_kernel_size,
        iterations = config.dilate_iterations,
        mask_pixels = count_set(&dilated),
        "Dilated edge mask"
    );
    dilated
}

fn count_set(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p.0[0] > 0).count()
}
