// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Contour tracing and closed-polygon simplification.

use docscan_core::{Contour, Point2D};
use image::GrayImage;
use imageproc::geometry;
use imageproc::point::Point;

/// Trace every border in a binary edge map.
///
/// Uses Suzuki-Abe border following via `imageproc::contours::find_contours`.
/// Outer borders and hole borders are both returned; no hierarchy is applied.
/// Borders with fewer than three points enclose nothing and are dropped.
pub fn find_closed_contours(edges: &GrayImage) -> Vec<Contour> {
    let traced: Vec<imageproc::contours::Contour<u32>> =
        imageproc::contours::find_contours(edges);

    traced
        .into_iter()
        .filter(|c| c.points.len() >= 3)
        .map(|c| {
            Contour::new(
                c.points
                    .into_iter()
                    .map(|p| Point2D::new(f64::from(p.x), f64::from(p.y)))
                    .collect(),
            )
        })
        .collect()
}

/// Enclosed area of a traced contour.
pub fn contour_area(contour: &Contour) -> f64 {
    geometry::contour_area(&to_points(contour.points()))
}

/// Length of the closed boundary, including the closing segment.
pub fn contour_perimeter(contour: &Contour) -> f64 {
    geometry::arc_length(&to_points(contour.points()), true)
}

/// Simplify a closed polygon with the Douglas-Peucker algorithm.
///
/// The loop is split at two far-apart anchors: the point farthest from
/// point 0, and the point farthest from that one. Each half is simplified as
/// an open chain, so the trace's arbitrary starting pixel only survives if
/// it is a real vertex. Vertices come back in input winding order, starting
/// at the anchor with the lower index. `epsilon` is the largest allowed
/// deviation in pixels.
pub fn approximate_closed(points: &[Point2D], epsilon: f64) -> Vec<Point2D> {
    let n = points.len();
    if n <= 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let a = farthest_from(points, &points[0]);
    let b = farthest_from(points, &points[a]);
    if points[a].distance(&points[b]) < f64::EPSILON {
        return vec![points[0]];
    }
    let (lo, hi) = (a.min(b), a.max(b));

    let curve = to_points(points);
    let first = &curve[lo..=hi];
    let second: Vec<Point<f64>> = curve[hi..].iter().chain(&curve[..=lo]).copied().collect();

    let mut simplified = geometry::approximate_polygon_dp(first, epsilon, false);
    simplified.pop();
    let mut rest = geometry::approximate_polygon_dp(&second, epsilon, false);
    rest.pop();
    simplified.extend(rest);

    simplified.into_iter().map(|p| Point2D::new(p.x, p.y)).collect()
}

/// Index of the point farthest from `origin`. Ties go to the earliest index.
fn farthest_from(points: &[Point2D], origin: &Point2D) -> usize {
    let mut best = 0;
    let mut best_dist = 0.0;
    for (i, p) in points.iter().enumerate() {
        let dist = origin.distance(p);
        if dist > best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

fn to_points(points: &[Point2D]) -> Vec<Point<f64>> {
    points.iter().map(|p| Point::new(p.x, p.y)).collect()
}
