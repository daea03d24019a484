// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// belegwerk-document — Receipt scanning for Belegwerk.
//
// Provides the raster seams (byte codec, imaging primitives, data URLs) and the
// scanning pipeline (edge mask, contour detection, corner ordering,
// perspective rectification, denoising, tone adjustment, sharpening).

pub mod pipeline;
pub mod raster;
pub mod scan;

// Re-export the primary types so callers can use `belegwerk_document::ReceiptScanner` etc.
pub use pipeline::{
    DetectionRecord, DetectionResult, ProcessRequest, ProcessedRecord, ProcessedResult, ReceiptScanner,
};
pub use raster::data_url::{from_data_url, to_data_url};
pub use raster::{ImageRasterizer, ImageprocOps, RasterOps, Rasterizer};
