// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Traced boundaries before they are normalised into a four-corner contour.

use belegwerk_core::Point2D;
use imageproc::geometry::{approximate_polygon_dp, arc_length, contour_area};
use imageproc::point::Point;

/// Axis-aligned bounding box with inclusive integer pixel extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl PixelBounds {
    /// Width in pixels, counting both edge columns.
    pub fn width(&self) -> i64 {
        self.max_x as i64 - self.min_x as i64 + 1
    }

    /// Height in pixels, counting both edge rows.
    pub fn height(&self) -> i64 {
        self.max_y as i64 - self.min_y as i64 + 1
    }

    /// The four rectangle corners `(x, y)`, `(x + w, y)`, `(x + w, y + h)`,
    /// `(x, y + h)`.
    pub fn corners(&self) -> [Point2D; 4] {
        let x = self.min_x as f64;
        let y = self.min_y as f64;
        let w = self.width() as f64;
        let h = self.height() as f64;
        [
            Point2D::new(x, y),
            Point2D::new(x + w, y),
            Point2D::new(x + w, y + h),
            Point2D::new(x, y + h),
        ]
    }
}

/// A closed polygon with any number of vertices, as traced from an edge mask
/// or produced by simplification. Never crosses the public boundary: it is
/// normalised into a [`Contour`](belegwerk_core::Contour) first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawPolygon {
    points: Vec<Point<i32>>,
}

impl RawPolygon {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed area (absolute shoelace value).
    pub fn area(&self) -> f64 {
        contour_area(&self.points)
    }

    /// Length of the closed boundary, including the closing segment.
    pub fn perimeter(&self) -> f64 {
        arc_length(&self.points, true)
    }

    /// Douglas–Peucker simplification of the closed boundary.
    ///
    /// The polygon is expected to be densely traced: the last point is the
    /// pixel neighbour of the first and is dropped from the result.
    ///
    /// Polygons with fewer than three vertices, and non-positive or non-finite
    /// tolerances, come back unchanged.
    pub fn simplified(&self, epsilon: f64) -> RawPolygon {
        if self.points.len() < 3 || !(epsilon.is_finite() && epsilon > 0.0) {
            return self.clone();
        }
        Self::new(approximate_polygon_dp(&self.points, epsilon, true))
    }

    /// Vertices as floating-point pixel coordinates.
    pub fn to_points2d(&self) -> Vec<Point2D> {
        self.points
            .iter()
            .map(|p| Point2D::new(p.x as f64, p.y as f64))
            .collect()
    }

    /// Integer bounding box of the vertices, or `None` for an empty polygon.
    pub fn pixel_bounds(&self) -> Option<PixelBounds> {
        let first = self.points.first()?;
        let init = PixelBounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(self.points[1..].iter().fold(init, |b, p| PixelBounds {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }
}

impl From<&[(i32, i32)]> for RawPolygon {
    fn from(coords: &[(i32, i32)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i32) -> RawPolygon {
        RawPolygon::from(&[(0, 0), (side, 0), (side, side), (0, side)][..])
    }

    /// Every pixel on the border of the `[x0, x1] x [y0, y1]` rectangle,
    /// clockwise from the top-left corner.
    fn traced_rectangle(x0: i32, y0: i32, x1: i32, y1: i32) -> RawPolygon {
        let mut pts = Vec::new();
        pts.extend((x0..x1).map(|x| Point::new(x, y0)));
        pts.extend((y0..y1).map(|y| Point::new(x1, y)));
        pts.extend((x0 + 1..=x1).rev().map(|x| Point::new(x, y1)));
        pts.extend((y0 + 1..=y1).rev().map(|y| Point::new(x0, y)));
        RawPolygon::new(pts)
    }

    #[test]
    fn shoelace_area_of_square() {
        assert!((square(10).area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn area_ignores_winding_direction() {
        let mut points = square(10).points().to_vec();
        points.reverse();
        assert!((RawPolygon::new(points).area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn perimeter_includes_closing_segment() {
        assert!((square(10).perimeter() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_bounds_follow_inclusive_convention() {
        let bounds = square(10).pixel_bounds().unwrap();
        assert_eq!(bounds.width(), 11);
        assert_eq!(bounds.height(), 11);
        assert_eq!(bounds.corners()[2], Point2D::new(11.0, 11.0));
    }

    #[test]
    fn empty_polygon_has_no_bounds() {
        assert!(RawPolygon::default().pixel_bounds().is_none());
        assert_eq!(RawPolygon::default().area(), 0.0);
    }

    #[test]
    fn traced_rectangle_simplifies_to_its_corners() {
        let poly = traced_rectangle(10, 5, 60, 45);
        let simplified = poly.simplified(0.02 * poly.perimeter());
        assert_eq!(simplified.len(), 4);
        for corner in [(10, 5), (60, 5), (60, 45), (10, 45)] {
            assert!(
                simplified.points().contains(&Point::new(corner.0, corner.1)),
                "missing {corner:?} in {:?}",
                simplified.points()
            );
        }
    }

    #[test]
    fn strongly_bent_vertices_survive() {
        let vertices: [(i32, i32); 5] = [(50, 0), (100, 40), (80, 100), (20, 100), (0, 40)];
        let mut pts = Vec::new();
        for (i, &(x0, y0)) in vertices.iter().enumerate() {
            let (x1, y1) = vertices[(i + 1) % vertices.len()];
            let steps = (x1 - x0).abs().max((y1 - y0).abs());
            pts.extend((0..steps).map(|s| {
                let t = s as f64 / steps as f64;
                Point::new(
                    (x0 as f64 + t * (x1 - x0) as f64).round() as i32,
                    (y0 as f64 + t * (y1 - y0) as f64).round() as i32,
                )
            }));
        }
        let pentagon = RawPolygon::new(pts);
        assert_eq!(pentagon.simplified(0.02 * pentagon.perimeter()).len(), 5);
    }

    #[test]
    fn degenerate_input_is_returned_unchanged() {
        let pair = RawPolygon::from(&[(1, 1), (2, 2)][..]);
        assert_eq!(pair.simplified(5.0), pair);
        assert_eq!(square(10).simplified(0.0), square(10));
        assert_eq!(square(10).simplified(f64::NAN), square(10));
        assert!(RawPolygon::default().simplified(1.0).is_empty());
    }
}
