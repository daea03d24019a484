// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receipt scanning stages — edge mask, boundary extraction, corner ordering,
// perspective rectification, and legibility enhancement.

pub mod contour;
pub mod corners;
pub mod denoise;
pub mod enhance;
pub mod preprocess;
pub mod rectify;

pub use contour::extract_contour;
pub use corners::order_corners;
pub use enhance::enhance;
pub use preprocess::edge_mask;
pub use rectify::rectify;
