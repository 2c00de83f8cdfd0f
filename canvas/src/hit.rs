//! Geometric hit-testing primitives shared by every shape variant.
//!
//! All inputs are integer pixel coordinates; distances are computed in `f64`
//! so that sub-pixel projections onto a segment are exact enough for the
//! fixed [`HIT_TOLERANCE_PX`](crate::consts::HIT_TOLERANCE_PX) slop.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::HIT_TOLERANCE_PX;
use crate::shape::{Corners, Point};

/// Euclidean distance from `p` to the closed segment `a`–`b`.
///
/// A zero-length segment degrades to the distance between `p` and `a`.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (px, py) = (f64::from(p.x), f64::from(p.y));
    let (ax, ay) = (f64::from(a.x), f64::from(a.y));
    let (bx, by) = (f64::from(b.x), f64::from(b.y));

    let (vx, vy) = (bx - ax, by - ay);
    let len_sq = vx * vx + vy * vy;
    if len_sq == 0.0 {
        return (px - ax).hypot(py - ay);
    }

    // Project onto the segment and clamp to its endpoints.
    let t = (((px - ax) * vx + (py - ay) * vy) / len_sq).clamp(0.0, 1.0);
    let (cx, cy) = (ax + t * vx, ay + t * vy);
    (px - cx).hypot(py - cy)
}

/// Whether `p` lies inside the ellipse inscribed in `corners`.
///
/// Uses `(dx/a)² + (dy/b)² ≤ 1` around the box center. A box with zero width
/// or height has no interior.
#[must_use]
pub fn ellipse_contains(corners: &Corners, p: Point) -> bool {
    if corners.is_degenerate() {
        return false;
    }
    let a = (f64::from(corners.x2) - f64::from(corners.x1)) / 2.0;
    let b = (f64::from(corners.y2) - f64::from(corners.y1)) / 2.0;
    let dx = f64::from(p.x) - (f64::from(corners.x1) + a);
    let dy = f64::from(p.y) - (f64::from(corners.y1) + b);
    (dx / a).powi(2) + (dy / b).powi(2) <= 1.0
}

/// Whether `p` lies inside the box (edges inclusive).
#[must_use]
pub fn box_contains(corners: &Corners, p: Point) -> bool {
    if corners.is_degenerate() {
        return false;
    }
    (corners.x1..=corners.x2).contains(&p.x) && (corners.y1..=corners.y2).contains(&p.y)
}

/// Whether `p` is within tolerance of the segment `a`–`b`.
#[must_use]
pub fn near_segment(p: Point, a: Point, b: Point) -> bool {
    point_to_segment_distance(p, a, b) <= HIT_TOLERANCE_PX
}

/// Whether `p` is within tolerance of any consecutive pair of `points`.
///
/// Fewer than two points means no strokes, so nothing is hit.
#[must_use]
pub fn near_polyline(points: &[Point], p: Point) -> bool {
    points.windows(2).any(|pair| near_segment(p, pair[0], pair[1]))
}
