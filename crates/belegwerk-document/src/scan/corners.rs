// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonical corner ordering for receipt quadrilaterals.

use belegwerk_core::{Contour, Point2D};

/// Assign top-left, top-right, bottom-right and bottom-left roles to four
/// unordered points.
///
/// - top-left minimises `x + y`, bottom-right maximises it
/// - top-right minimises `y - x`, bottom-left maximises it
///
/// Ties go to the earliest point in `points`. For a convex, non-degenerate
/// quadrilateral the result does not depend on input order and ordering an
/// already ordered contour returns it unchanged. Degenerate input (repeated
/// or collinear points) still yields four points, possibly with one point in
/// several roles.
pub fn order_corners(points: [Point2D; 4]) -> Contour {
    let sum = |p: &Point2D| p.x + p.y;
    let diff = |p: &Point2D| p.y - p.x;

    let top_left = points[arg_extreme(&points, sum, Extreme::Min)];
    let bottom_right = points[arg_extreme(&points, sum, Extreme::Max)];
    let top_right = points[arg_extreme(&points, diff, Extreme::Min)];
    let bottom_left = points[arg_extreme(&points, diff, Extreme::Max)];

    Contour::from_ordered([top_left, top_right, bottom_right, bottom_left])
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

/// Index of the first point with the smallest/largest key.
fn arg_extreme(points: &[Point2D; 4], key: impl Fn(&Point2D) -> f64, extreme: Extreme) -> usize {
    let mut best = 0;
    let mut best_key = key(&points[0]);
    for (i, p) in points.iter().enumerate().skip(1) {
        let k = key(p);
        let better = match extreme {
            Extreme::Min => k < best_key,
            Extreme::Max => k > best_key,
        };
        if better {
            best = i;
            best_key = k;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> [Point2D; 4] {
        // A perspective-skewed receipt outline.
        [
            Point2D::new(32.0, 18.0),
            Point2D::new(410.0, 45.0),
            Point2D::new(385.0, 602.0),
            Point2D::new(15.0, 570.0),
        ]
    }

    fn permutations(items: [Point2D; 4]) -> Vec<[Point2D; 4]> {
        let mut out = Vec::new();
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    for d in 0..4 {
                        let idx = [a, b, c, d];
                        let mut seen = [false; 4];
                        if idx.iter().all(|&i| !std::mem::replace(&mut seen[i], true)) {
                            out.push(idx.map(|i| items[i]));
                        }
                    }
                }
            }
        }
        out
    }

    #[test]
    fn assigns_expected_roles() {
        let ordered = order_corners([quad()[2], quad()[0], quad()[3], quad()[1]]);
        assert_eq!(ordered.top_left(), Point2D::new(32.0, 18.0));
        assert_eq!(ordered.top_right(), Point2D::new(410.0, 45.0));
        assert_eq!(ordered.bottom_right(), Point2D::new(385.0, 602.0));
        assert_eq!(ordered.bottom_left(), Point2D::new(15.0, 570.0));
    }

    #[test]
    fn all_permutations_agree() {
        let all = permutations(quad());
        assert_eq!(all.len(), 24);
        let expected = order_corners(quad());
        for perm in all {
            assert_eq!(order_corners(perm), expected, "permutation {perm:?}");
        }
    }

    #[test]
    fn ordering_is_idempotent() {
        let once = order_corners([quad()[3], quad()[1], quad()[0], quad()[2]]);
        let twice = order_corners(*once.corners());
        assert_eq!(once, twice);
    }

    #[test]
    fn axis_aligned_rectangle() {
        let ordered = order_corners([
            Point2D::new(190.0, 90.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(10.0, 90.0),
            Point2D::new(190.0, 10.0),
        ]);
        assert_eq!(
            ordered.to_pairs(),
            [[10.0, 10.0], [190.0, 10.0], [190.0, 90.0], [10.0, 90.0]]
        );
    }

    #[test]
    fn degenerate_input_does_not_panic() {
        let same = order_corners([Point2D::new(3.0, 3.0); 4]);
        assert!(same.corners().iter().all(|p| *p == Point2D::new(3.0, 3.0)));

        let line = order_corners([
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(2.0, 2.0),
            Point2D::new(3.0, 3.0),
        ]);
        assert_eq!(line.corners().len(), 4);
    }
}
