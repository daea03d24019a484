// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Receipt boundary extraction: pick the largest closed boundary in the edge
// mask and normalise it to a four-corner contour.

use belegwerk_core::error::{BelegwerkError, Result};
use belegwerk_core::{Contour, Point2D, ScanConfig};
use image::GrayImage;
use tracing::{debug, info, instrument, warn};

use crate::raster::ops::RasterOps;
use crate::raster::polygon::RawPolygon;
use crate::scan::corners::order_corners;

/// Find the receipt outline in `mask` and return it as an ordered contour.
///
/// ## Steps
///
/// 1. Trace the outermost boundaries of the mask
/// 2. Drop boundaries enclosing less than `config.min_contour_area`
/// 3. Keep the largest survivor (the first one traced wins a tie)
/// 4. Simplify it with a tolerance of `approx_epsilon_ratio` x perimeter
/// 5. Normalise to four corners, falling back to the bounding box
/// 6. Order the corners
#[instrument(skip_all, fields(width = mask.width(), height = mask.height()))]
pub fn extract_contour(ops: &dyn RasterOps, mask: &GrayImage, config: &ScanConfig) -> Result<Contour> {
    let boundaries = ops.external_boundaries(mask);
    debug!(count = boundaries.len(), "External boundaries traced");
    if boundaries.is_empty() {
        return Err(BelegwerkError::NoContourFound(
            "edge mask contains no closed boundary".into(),
        ));
    }

    let largest = largest_boundary(&boundaries, config.min_contour_area).ok_or_else(|| {
        BelegwerkError::NoContourFound(format!(
            "all {} boundaries enclose less than {} px²",
            boundaries.len(),
            config.min_contour_area
        ))
    })?;

    let epsilon = config.approx_epsilon_ratio * largest.perimeter();
    let simplified = ops.simplify_polygon(largest, epsilon);
    debug!(
        area = largest.area(),
        epsilon,
        vertices = simplified.len(),
        "Boundary simplified"
    );

    let corners = normalize_quadrilateral(&simplified, largest)?;
    let contour = order_corners(corners);
    info!(corners = ?contour.to_pairs(), "Receipt contour detected");
    Ok(contour)
}

/// Largest boundary whose area reaches `min_area`; earlier boundaries win
/// ties.
pub fn largest_boundary(boundaries: &[RawPolygon], min_area: f64) -> Option<&RawPolygon> {
    let mut best: Option<(&RawPolygon, f64)> = None;
    for boundary in boundaries {
        let area = boundary.area();
        if area < min_area {
            continue;
        }
        match best {
            Some((_, best_area)) if area <= best_area => {}
            _ => best = Some((boundary, area)),
        }
    }
    best.map(|(boundary, _)| boundary)
}

/// Turn a simplified polygon into four raw corners.
///
/// A four-vertex polygon is used as is. Any other vertex count falls back to
/// the axis-aligned bounding rectangle of the unsimplified boundary.
pub fn normalize_quadrilateral(simplified: &RawPolygon, original: &RawPolygon) -> Result<[Point2D; 4]> {
    if let Ok(quad) = <[Point2D; 4]>::try_from(simplified.to_points2d()) {
        return Ok(quad);
    }

    warn!(
        vertices = simplified.len(),
        "Simplified boundary is not a quadrilateral; using bounding rectangle"
    );
    let bounds = original.pixel_bounds().ok_or_else(|| {
        BelegwerkError::NoContourFound("selected boundary has no points".into())
    })?;
    Ok(bounds.corners())
}
