// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster seams — the primitive image operations and the byte codec the
// scanning pipeline is written against.

pub mod codec;
pub mod data_url;
pub mod ops;
pub mod polygon;

pub use codec::{ImageRasterizer, Rasterizer};
pub use ops::{ImageprocOps, RasterOps};
pub use polygon::{PixelBounds, RawPolygon};
