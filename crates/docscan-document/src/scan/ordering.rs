// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Corner ordering strategies — label four unordered points as
// top-left / top-right / bottom-right / bottom-left.

use docscan_core::{OrderedRectangle, Point2D, Quadrilateral, polygon_area};

/// Labels the corners of a quadrilateral.
///
/// Returns `None` when the strategy cannot assign four distinct labels.
pub trait CornerOrdering: Send + Sync {
    fn order(&self, quad: &Quadrilateral) -> Option<OrderedRectangle>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Sum/difference heuristic.
///
/// Top-left has the smallest `x + y`, bottom-right the largest. Top-right
/// has the smallest `y - x`, bottom-left the largest. Cheap and exact for
/// near-upright rectangles; heavily skewed shapes can map two labels onto
/// one point, in which case ordering fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumDiffOrdering;

impl CornerOrdering for SumDiffOrdering {
    fn order(&self, quad: &Quadrilateral) -> Option<OrderedRectangle> {
        let pts = quad.points();
        let tl = arg_by(pts, |p| p.x + p.y, Extreme::Min);
        let br = arg_by(pts, |p| p.x + p.y, Extreme::Max);
        let tr = arg_by(pts, |p| p.y - p.x, Extreme::Min);
        let bl = arg_by(pts, |p| p.y - p.x, Extreme::Max);

        let labels = [tl, tr, br, bl];
        let all_distinct = (0..4).all(|i| ((i + 1)..4).all(|j| labels[i] != labels[j]));
        if !all_distinct {
            return None;
        }
        Some(OrderedRectangle::new(pts[tl], pts[tr], pts[br], pts[bl]))
    }

    fn name(&self) -> &'static str {
        "sum-diff"
    }
}

/// Angular sort around the centroid.
///
/// Walks the corners clockwise (in image coordinates, y down) and starts the
/// walk at the point with the smallest `x + y`. Labels are always distinct,
/// so this also handles strongly rotated or skewed outlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct CentroidAngleOrdering;

impl CornerOrdering for CentroidAngleOrdering {
    fn order(&self, quad: &Quadrilateral) -> Option<OrderedRectangle> {
        let pts = quad.points();
        let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
        let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;

        let mut sorted = *pts;
        sorted.sort_by(|a, b| {
            let angle_a = (a.y - cy).atan2(a.x - cx);
            let angle_b = (b.y - cy).atan2(b.x - cx);
            angle_a.total_cmp(&angle_b)
        });
        if polygon_area(&sorted) <= f64::EPSILON {
            return None;
        }

        let start = arg_by(&sorted, |p| p.x + p.y, Extreme::Min);
        sorted.rotate_left(start);
        let [tl, tr, br, bl] = sorted;
        Some(OrderedRectangle::new(tl, tr, br, bl))
    }

    fn name(&self) -> &'static str {
        "centroid-angle"
    }
}

#[derive(Clone, Copy)]
enum Extreme {
    Min,
    Max,
}

/// Index of the point minimising or maximising `key`. Ties go to the
/// earliest index.
fn arg_by(pts: &[Point2D; 4], key: impl Fn(&Point2D) -> f64, extreme: Extreme) -> usize {
    let mut best = 0;
    for i in 1..4 {
        let better = match extreme {
            Extreme::Min => key(&pts[i]) < key(&pts[best]),
            Extreme::Max => key(&pts[i]) > key(&pts[best]),
        };
        if better {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(points: [(f64, f64); 4]) -> Quadrilateral {
        Quadrilateral::new(points.map(Point2D::from)).unwrap()
    }

    fn tilted() -> Quadrilateral {
        // Shuffled corners of a slightly rotated page.
        quad([(410.0, 590.0), (95.0, 40.0), (30.0, 560.0), (480.0, 70.0)])
    }

    #[test]
    fn sum_diff_labels_a_tilted_page() {
        let ordered = SumDiffOrdering.order(&tilted()).unwrap();
        assert_eq!(ordered.top_left(), Point2D::new(95.0, 40.0));
        assert_eq!(ordered.top_right(), Point2D::new(480.0, 70.0));
        assert_eq!(ordered.bottom_right(), Point2D::new(410.0, 590.0));
        assert_eq!(ordered.bottom_left(), Point2D::new(30.0, 560.0));
    }

    #[test]
    fn ordering_is_idempotent() {
        for strategy in [&SumDiffOrdering as &dyn CornerOrdering, &CentroidAngleOrdering] {
            let once = strategy.order(&tilted()).unwrap();
            let again = strategy
                .order(&Quadrilateral::new(once.corners()).unwrap())
                .unwrap();
            assert_eq!(once, again, "{} is not idempotent", strategy.name());
        }
    }

    #[test]
    fn strategies_agree_on_near_upright_input() {
        let a = SumDiffOrdering.order(&tilted()).unwrap();
        let b = CentroidAngleOrdering.order(&tilted()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn sum_diff_fails_on_a_diamond() {
        // A square rotated 45 degrees. Every key ties between two vertices
        // and the top vertex wins both the x + y and the y - x minimum.
        let diamond = quad([(100.0, 0.0), (200.0, 100.0), (100.0, 200.0), (0.0, 100.0)]);
        assert!(SumDiffOrdering.order(&diamond).is_none());
    }

    #[test]
    fn centroid_angle_handles_a_diamond() {
        let diamond = quad([(100.0, 0.0), (200.0, 100.0), (100.0, 200.0), (0.0, 100.0)]);
        let ordered = CentroidAngleOrdering.order(&diamond).unwrap();
        let corners = ordered.corners();
        for i in 0..4 {
            for j in (i + 1)..4 {
                assert_ne!(corners[i], corners[j]);
            }
        }
        // Clockwise walk: each next corner is a quarter turn further.
        assert_eq!(ordered.top_left(), Point2D::new(100.0, 0.0));
        assert_eq!(ordered.top_right(), Point2D::new(200.0, 100.0));
    }

    #[test]
    fn centroid_angle_rejects_collinear_points() {
        let flat = quad([(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (30.0, 0.0)]);
        assert!(CentroidAngleOrdering.order(&flat).is_none());
    }
}
