// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster primitives the scan pipeline is written against, and the default
// backend built on the `image` and `imageproc` crates.

use belegwerk_core::Point2D;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_line_segment_mut;
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into_with};
use imageproc::morphology::dilate;

use crate::raster::polygon::RawPolygon;

/// Largest distance, in pixels, a solved projection may move one of its own
/// control points before it is treated as degenerate.
pub const PROJECTION_TOLERANCE: f32 = 0.5;

/// Image primitives used by the detection and rectification stages.
///
/// The pipeline only talks to this trait, so a different imaging backend can
/// be swapped in without touching the stage logic.
pub trait RasterOps: Send + Sync {
    /// Single-channel luminance of a colour image.
    fn luminance(&self, image: &RgbImage) -> GrayImage;

    /// Gaussian blur with a square `kernel_size` kernel (odd). The sigma is
    /// derived from the kernel size.
    fn gaussian_blur(&self, image: &GrayImage, kernel_size: u32) -> GrayImage;

    /// Hysteresis edge detection. Edge pixels are 255, everything else 0.
    fn detect_edges(&self, image: &GrayImage, low: f32, high: f32) -> GrayImage;

    /// Binary dilation with a `kernel_size` square structuring element.
    fn dilate(&self, mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage;

    /// Outermost closed boundaries of the non-zero regions of `mask`, in the
    /// order a raster scan meets them.
    fn external_boundaries(&self, mask: &GrayImage) -> Vec<RawPolygon>;

    /// Douglas–Peucker simplification of a closed boundary.
    fn simplify_polygon(&self, polygon: &RawPolygon, epsilon: f64) -> RawPolygon;

    /// Exact projective transform taking `src[i]` to `dst[i]`, or `None` when
    /// the correspondences do not define one.
    fn solve_homography(&self, src: &[Point2D; 4], dst: &[Point2D; 4]) -> Option<Projection>;

    /// Resample `image` into a `width` x `height` buffer. `projection` maps
    /// source coordinates onto destination coordinates. Samples falling
    /// outside the source repeat its nearest edge pixel.
    fn warp_perspective(
        &self,
        image: &RgbImage,
        projection: &Projection,
        width: u32,
        height: u32,
    ) -> RgbImage;

    /// Draw a closed polyline through `points` onto `canvas`.
    fn draw_closed_polyline(
        &self,
        canvas: &mut RgbImage,
        points: &[Point2D],
        color: Rgb<u8>,
        line_width: u32,
    );
}

/// Default [`RasterOps`] backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocOps;

impl RasterOps for ImageprocOps {
    fn luminance(&self, image: &RgbImage) -> GrayImage {
        image::imageops::grayscale(image)
    }

    fn gaussian_blur(&self, image: &GrayImage, kernel_size: u32) -> GrayImage {
        let kernel = gaussian_kernel(kernel_size);
        separable_filter_equal(image, &kernel[..])
    }

    fn detect_edges(&self, image: &GrayImage, low: f32, high: f32) -> GrayImage {
        canny(image, low, high)
    }

    fn dilate(&self, mask: &GrayImage, kernel_size: u32, iterations: u32) -> GrayImage {
        // A chessboard-distance ball of radius k is a (2k + 1) square.
        let radius = (kernel_size / 2).min(u8::MAX as u32) as u8;
        let mut out = mask.clone();
        for _ in 0..iterations {
            out = dilate(&out, Norm::LInf, radius);
        }
        out
    }

    fn external_boundaries(&self, mask: &GrayImage) -> Vec<RawPolygon> {
        find_contours::<i32>(mask)
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| RawPolygon::new(c.points))
            .collect()
    }

    fn simplify_polygon(&self, polygon: &RawPolygon, epsilon: f64) -> RawPolygon {
        polygon.simplified(epsilon)
    }

    fn solve_homography(&self, src: &[Point2D; 4], dst: &[Point2D; 4]) -> Option<Projection> {
        if !src.iter().chain(dst).all(Point2D::is_finite) {
            return None;
        }
        let from = src.map(|p| (p.x as f32, p.y as f32));
        let to = dst.map(|p| (p.x as f32, p.y as f32));
        let projection = Projection::from_control_points(from, to)?;

        // A singular system still yields a pseudo-inverse solution.
        let exact = from.iter().zip(&to).all(|(&f, &(tx, ty))| {
            let (x, y) = projection * f;
            (x - tx).hypot(y - ty) <= PROJECTION_TOLERANCE
        });
        exact.then_some(projection)
    }

    fn warp_perspective(
        &self,
        image: &RgbImage,
        projection: &Projection,
        width: u32,
        height: u32,
    ) -> RgbImage {
        let mut out = RgbImage::new(width, height);
        let (src_w, src_h) = image.dimensions();
        if width == 0 || height == 0 || src_w == 0 || src_h == 0 {
            return out;
        }

        // Bilinear sampling needs a right and a bottom neighbour.
        let interpolation = if src_w < 2 || src_h < 2 {
            Interpolation::Nearest
        } else {
            Interpolation::Bilinear
        };
        let (max_x, max_y) = (last_sample(src_w), last_sample(src_h));
        let inverse = projection.invert();
        warp_into_with(
            image,
            move |x, y| {
                let (sx, sy) = inverse * (x, y);
                (clamp_sample(sx, max_x), clamp_sample(sy, max_y))
            },
            interpolation,
            Rgb([0, 0, 0]),
            &mut out,
        );
        out
    }

    fn draw_closed_polyline(
        &self,
        canvas: &mut RgbImage,
        points: &[Point2D],
        color: Rgb<u8>,
        line_width: u32,
    ) {
        if points.len() < 2 || line_width == 0 {
            return;
        }
        let lo = -(((line_width - 1) / 2) as i32);
        let hi = (line_width / 2) as i32;
        for (i, start) in points.iter().enumerate() {
            let end = points[(i + 1) % points.len()];
            for dy in lo..=hi {
                for dx in lo..=hi {
                    let (ox, oy) = (dx as f32, dy as f32);
                    draw_line_segment_mut(
                        canvas,
                        (start.x as f32 + ox, start.y as f32 + oy),
                        (end.x as f32 + ox, end.y as f32 + oy),
                        color,
                    );
                }
            }
        }
    }
}

/// Largest coordinate along an axis of `len` pixels that still has a
/// neighbour to blend with.
fn last_sample(len: u32) -> f32 {
    let last = len.saturating_sub(1) as f32;
    if last > 0.0 {
        f32::from_bits(last.to_bits() - 1)
    } else {
        0.0
    }
}

fn clamp_sample(v: f32, max: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, max) }
}

/// Normalised 1-D Gaussian kernel of odd length `size`.
///
/// Small kernels use the fixed binomial-style tables common to imaging
/// libraries; larger ones are sampled with
/// `sigma = 0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    match size {
        0 | 1 => vec![1.0],
        3 => vec![0.25, 0.5, 0.25],
        5 => vec![0.0625, 0.25, 0.375, 0.25, 0.0625],
        7 => vec![
            0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
        ],
        _ => {
            let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
            let half = (size / 2) as i64;
            let raw: Vec<f64> = (-half..=half)
                .map(|i| (-((i * i) as f64) / (2.0 * sigma * sigma)).exp())
                .collect();
            let sum: f64 = raw.iter().sum();
            raw.into_iter().map(|v| (v / sum) as f32).collect()
        }
    }
}
