// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Four-point perspective rectification: size the output rectangle from the
// receipt's edge lengths, solve the homography, and resample bilinearly.

use belegwerk_core::error::{BelegwerkError, Result};
use belegwerk_core::{Contour, Point2D};
use image::RgbImage;
use tracing::{debug, info, instrument};

use crate::raster::ops::RasterOps;

/// Output size for a rectified contour: the longer of each pair of opposite
/// edges, rounded down. Rectangles above `max_pixels` are rejected.
pub fn target_size(contour: &Contour, max_pixels: u64) -> Result<(u32, u32)> {
    if !contour.corners().iter().all(Point2D::is_finite) {
        return Err(BelegwerkError::DegenerateGeometry(
            "contour has non-finite coordinates".into(),
        ));
    }

    let (tl, tr, br, bl) = (
        contour.top_left(),
        contour.top_right(),
        contour.bottom_right(),
        contour.bottom_left(),
    );
    let width = br.distance(&bl).max(tr.distance(&tl)).floor();
    let height = tr.distance(&br).max(tl.distance(&bl)).floor();

    if width <= 0.0 || height <= 0.0 {
        return Err(BelegwerkError::DegenerateGeometry(format!(
            "target rectangle is {width}x{height}"
        )));
    }
    let too_large = width > u32::MAX as f64 || height > u32::MAX as f64;
    if too_large || width * height > max_pixels as f64 {
        return Err(BelegwerkError::DegenerateGeometry(format!(
            "target rectangle {width}x{height} exceeds {max_pixels} pixels"
        )));
    }
    Ok((width as u32, height as u32))
}

/// Warp the quadrilateral described by `contour` (already in canonical
/// order) into an axis-aligned rectangle of at most `max_pixels` pixels.
#[instrument(skip(ops, image), fields(src_w = image.width(), src_h = image.height()))]
pub fn rectify(
    ops: &dyn RasterOps,
    image: &RgbImage,
    contour: &Contour,
    max_pixels: u64,
) -> Result<RgbImage> {
    let (width, height) = target_size(contour, max_pixels)?;

    let (w, h) = ((width - 1) as f64, (height - 1) as f64);
    let dest = [
        Point2D::new(0.0, 0.0),
        Point2D::new(w, 0.0),
        Point2D::new(w, h),
        Point2D::new(0.0, h),
    ];

    let projection = ops.solve_homography(contour.corners(), &dest).ok_or_else(|| {
        BelegwerkError::DegenerateGeometry("contour corners admit no projective transform".into())
    })?;
    debug!(?projection, "Homography solved");

    let warped = ops.warp_perspective(image, &projection, width, height);
    info!(width, height, "Perspective rectification applied");
    Ok(warped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ops::ImageprocOps;
    use image::Rgb;

    const BUDGET: u64 = 100_000_000;

    fn contour(points: [(f64, f64); 4]) -> Contour {
        Contour::from_ordered(points.map(|(x, y)| Point2D::new(x, y)))
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width) as u8,
                (y * 255 / height) as u8,
                ((x + y) * 255 / (width + height)) as u8,
            ])
        })
    }

    #[test]
    fn target_size_uses_longest_opposite_edges() {
        let c = contour([(0.0, 0.0), (100.0, 0.0), (110.0, 50.5), (5.0, 40.0)]);
        let (w, h) = target_size(&c, BUDGET).unwrap();
        assert_eq!(w, 105);
        assert_eq!(h, 51);
    }

    #[test]
    fn collapsed_contour_is_degenerate() {
        let c = contour([(5.0, 5.0); 4]);
        assert!(matches!(
            target_size(&c, BUDGET),
            Err(BelegwerkError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn non_finite_contour_is_degenerate() {
        let c = contour([(f64::NAN, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!(target_size(&c, BUDGET).is_err());
    }

    #[test]
    fn collinear_contour_is_degenerate() {
        let c = contour([(0.0, 0.0), (50.0, 0.0), (100.0, 0.0), (150.0, 0.0)]);
        let image = gradient(200, 20);
        assert!(matches!(
            rectify(&ImageprocOps, &image, &c, BUDGET),
            Err(BelegwerkError::DegenerateGeometry(_))
        ));
    }

    #[test]
    fn rectifying_own_corners_is_near_identity() {
        let (w, h) = (120u32, 80u32);
        let image = gradient(w, h);
        let (fw, fh) = ((w - 1) as f64, (h - 1) as f64);
        let c = contour([(0.0, 0.0), (fw, 0.0), (fw, fh), (0.0, fh)]);

        let out = rectify(&ImageprocOps, &image, &c, BUDGET).unwrap();
        assert!(out.width().abs_diff(w) <= 1);
        assert!(out.height().abs_diff(h) <= 1);

        let mut total = 0u64;
        let mut count = 0u64;
        for (x, y, p) in out.enumerate_pixels() {
            let q = image.get_pixel(x, y);
            for c in 0..3 {
                total += (p.0[c] as i32 - q.0[c] as i32).unsigned_abs() as u64;
                count += 1;
            }
        }
        let mad = total as f64 / count as f64;
        assert!(mad < 3.0, "mean absolute difference {mad}");
    }

    fn close(actual: &Rgb<u8>, expected: &Rgb<u8>) -> bool {
        actual
            .0
            .iter()
            .zip(expected.0)
            .all(|(a, e)| (*a as i32 - e as i32).abs() <= 2)
    }

    #[test]
    fn crop_of_axis_aligned_region_matches_source() {
        let image = gradient(100, 100);
        let c = contour([(20.0, 30.0), (60.0, 30.0), (60.0, 70.0), (20.0, 70.0)]);
        let out = rectify(&ImageprocOps, &image, &c, BUDGET).unwrap();
        assert_eq!(out.dimensions(), (40, 40));
        // Corners map onto the source corners.
        assert!(close(out.get_pixel(0, 0), image.get_pixel(20, 30)));
        assert!(close(out.get_pixel(39, 39), image.get_pixel(60, 70)));
    }

    #[test]
    fn contour_beyond_the_image_replicates_edges() {
        let image = gradient(20, 20);
        let c = contour([(-10.0, -10.0), (30.0, -10.0), (30.0, 30.0), (-10.0, 30.0)]);
        let out = rectify(&ImageprocOps, &image, &c, BUDGET).unwrap();
        assert_eq!(out.dimensions(), (40, 40));
        assert!(close(out.get_pixel(0, 0), image.get_pixel(0, 0)));
        assert!(close(out.get_pixel(39, 0), image.get_pixel(19, 0)));
        assert!(close(out.get_pixel(39, 39), image.get_pixel(19, 19)));
        assert!(close(out.get_pixel(0, 39), image.get_pixel(0, 19)));
    }

    #[test]
    fn oversized_contour_is_rejected_before_allocation() {
        let image = gradient(50, 50);
        let c = contour([(0.0, 0.0), (200_000.0, 0.0), (200_000.0, 200_000.0), (0.0, 200_000.0)]);
        let err = rectify(&ImageprocOps, &image, &c, BUDGET).unwrap_err();
        assert!(matches!(err, BelegwerkError::DegenerateGeometry(_)));
        assert!(target_size(&c, u64::MAX).is_ok());
    }

    #[test]
    fn budget_is_inclusive() {
        let c = contour([(0.0, 0.0), (40.0, 0.0), (40.0, 25.0), (0.0, 25.0)]);
        assert_eq!(target_size(&c, 1000).unwrap(), (40, 25));
        assert!(target_size(&c, 999).is_err());
    }
}
