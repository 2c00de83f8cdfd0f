#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

// =============================================================
// point_to_segment_distance
// =============================================================

#[test]
fn distance_to_horizontal_segment_interior() {
    let d = point_to_segment_distance(Point::new(5, 4), Point::new(0, 0), Point::new(10, 0));
    assert!(approx_eq(d, 4.0));
}

#[test]
fn distance_clamps_past_the_end() {
    let d = point_to_segment_distance(Point::new(13, 4), Point::new(0, 0), Point::new(10, 0));
    assert!(approx_eq(d, 5.0));
}

#[test]
fn distance_clamps_before_the_start() {
    let d = point_to_segment_distance(Point::new(-3, -4), Point::new(0, 0), Point::new(10, 0));
    assert!(approx_eq(d, 5.0));
}

#[test]
fn distance_to_zero_length_segment_is_point_distance() {
    let d = point_to_segment_distance(Point::new(3, 4), Point::new(0, 0), Point::new(0, 0));
    assert!(approx_eq(d, 5.0));
}

#[test]
fn distance_to_diagonal_segment() {
    let d = point_to_segment_distance(Point::new(0, 10), Point::new(0, 0), Point::new(10, 10));
    assert!(approx_eq(d, 50.0_f64.sqrt()));
}

// =============================================================
// ellipse_contains
// =============================================================

#[test]
fn ellipse_contains_center() {
    let c = Corners::new(0, 0, 20, 10);
    assert!(ellipse_contains(&c, Point::new(10, 5)));
}

#[test]
fn ellipse_contains_axis_extremes() {
    let c = Corners::new(0, 0, 20, 10);
    assert!(ellipse_contains(&c, Point::new(0, 5)));
    assert!(ellipse_contains(&c, Point::new(20, 5)));
    assert!(ellipse_contains(&c, Point::new(10, 0)));
}

#[test]
fn ellipse_excludes_box_corner() {
    let c = Corners::new(0, 0, 20, 10);
    assert!(!ellipse_contains(&c, Point::new(0, 0)));
    assert!(!ellipse_contains(&c, Point::new(20, 10)));
}

#[test]
fn degenerate_ellipse_contains_nothing() {
    let c = Corners::anchored(Point::new(5, 5));
    assert!(!ellipse_contains(&c, Point::new(5, 5)));
}

// =============================================================
// box_contains
// =============================================================

#[test]
fn box_contains_edges_inclusive() {
    let c = Corners::new(10, 10, 20, 30);
    assert!(box_contains(&c, Point::new(10, 10)));
    assert!(box_contains(&c, Point::new(20, 30)));
    assert!(box_contains(&c, Point::new(15, 20)));
}

#[test]
fn box_excludes_outside_points() {
    let c = Corners::new(10, 10, 20, 30);
    assert!(!box_contains(&c, Point::new(9, 15)));
    assert!(!box_contains(&c, Point::new(15, 31)));
}

#[test]
fn degenerate_box_contains_nothing() {
    let c = Corners::new(10, 10, 10, 30);
    assert!(!box_contains(&c, Point::new(10, 20)));
}

// =============================================================
// near_segment / near_polyline
// =============================================================

#[test]
fn near_segment_within_tolerance() {
    assert!(near_segment(Point::new(5, 3), Point::new(0, 0), Point::new(10, 0)));
    assert!(!near_segment(Point::new(5, 4), Point::new(0, 0), Point::new(10, 0)));
}

#[test]
fn near_polyline_checks_every_sub_segment() {
    let pts = [Point::new(0, 0), Point::new(10, 0), Point::new(10, 10)];
    assert!(near_polyline(&pts, Point::new(12, 8)));
    assert!(near_polyline(&pts, Point::new(2, 1)));
    assert!(!near_polyline(&pts, Point::new(3, 8)));
}

#[test]
fn near_polyline_single_point_has_no_strokes() {
    let pts = [Point::new(0, 0)];
    assert!(!near_polyline(&pts, Point::new(0, 0)));
}
