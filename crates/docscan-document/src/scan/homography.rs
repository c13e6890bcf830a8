// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Planar homography from four point correspondences.

use docscan_core::Point2D;
use imageproc::geometric_transformations::Projection;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

/// 3x3 projective transform, normalised so that `h[(2, 2)] == 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    h: Matrix3<f64>,
}

impl Homography {
    /// Solve for `H` with `dst ~ H * src` from exactly four correspondences.
    ///
    /// Both point sets are Hartley-normalised before the 8x8 linear solve.
    /// Returns `None` when the system is singular, e.g. three collinear
    /// source points.
    pub fn from_corners(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Option<Self> {
        let (src_n, t_src) = normalize_points(src);
        let (dst_n, t_dst) = normalize_points(dst);

        // Unknowns h11..h32 with h33 = 1. For (x, y) -> (u, v):
        //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
        //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
        let mut a = SMatrix::<f64, 8, 8>::zeros();
        let mut b = SVector::<f64, 8>::zeros();
        for k in 0..4 {
            let (x, y) = (src_n[k].x, src_n[k].y);
            let (u, v) = (dst_n[k].x, dst_n[k].y);

            let r0 = 2 * k;
            a[(r0, 0)] = x;
            a[(r0, 1)] = y;
            a[(r0, 2)] = 1.0;
            a[(r0, 6)] = -u * x;
            a[(r0, 7)] = -u * y;
            b[r0] = u;

            let r1 = r0 + 1;
            a[(r1, 3)] = x;
            a[(r1, 4)] = y;
            a[(r1, 5)] = 1.0;
            a[(r1, 6)] = -v * x;
            a[(r1, 7)] = -v * y;
            b[r1] = v;
        }

        let x = a.lu().solve(&b)?;
        let hn = Matrix3::new(x[0], x[1], x[2], x[3], x[4], x[5], x[6], x[7], 1.0);

        let h = t_dst.try_inverse()? * hn * t_src;
        let s = h[(2, 2)];
        if s.abs() < 1e-12 || !h.iter().all(|v| v.is_finite()) {
            return None;
        }
        Some(Self { h: h / s })
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.h
    }

    /// Map a point through the transform.
    pub fn apply(&self, p: Point2D) -> Point2D {
        let v = self.h * Vector3::new(p.x, p.y, 1.0);
        Point2D::new(v[0] / v[2], v[1] / v[2])
    }

    pub fn inverse(&self) -> Option<Self> {
        let inv = self.h.try_inverse()?;
        let s = inv[(2, 2)];
        if s.abs() < 1e-12 {
            return None;
        }
        Some(Self { h: inv / s })
    }

    /// Convert to an `imageproc` projection for warping.
    pub fn to_projection(&self) -> Option<Projection> {
        let mut m = [0f32; 9];
        for row in 0..3 {
            for col in 0..3 {
                m[row * 3 + col] = self.h[(row, col)] as f32;
            }
        }
        Projection::from_matrix(m)
    }
}

/// Translate to the centroid and scale so the mean distance is sqrt(2).
fn normalize_points(pts: &[Point2D; 4]) -> ([Point2D; 4], Matrix3<f64>) {
    let cx = pts.iter().map(|p| p.x).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p.y).sum::<f64>() / 4.0;
    let mean_dist = pts
        .iter()
        .map(|p| (p.x - cx).hypot(p.y - cy))
        .sum::<f64>()
        / 4.0;

    let s = if mean_dist > 1e-12 {
        std::f64::consts::SQRT_2 / mean_dist
    } else {
        1.0
    };
    let t = Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0);

    let out = pts.map(|p| Point2D::new(s * (p.x - cx), s * (p.y - cy)));
    (out, t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(side: f64) -> [Point2D; 4] {
        [
            Point2D::new(0.0, 0.0),
            Point2D::new(side, 0.0),
            Point2D::new(side, side),
            Point2D::new(0.0, side),
        ]
    }

    #[test]
    fn identity_correspondences_give_identity() {
        let pts = square(100.0);
        let h = Homography::from_corners(&pts, &pts).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                let expected = if r == c { 1.0 } else { 0.0 };
                assert_relative_eq!(h.matrix()[(r, c)], expected, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn maps_each_source_corner_to_its_destination() {
        let src = [
            Point2D::new(95.0, 40.0),
            Point2D::new(480.0, 70.0),
            Point2D::new(410.0, 590.0),
            Point2D::new(30.0, 560.0),
        ];
        let dst = square(400.0);
        let h = Homography::from_corners(&src, &dst).unwrap();
        for (s, d) in src.iter().zip(dst.iter()) {
            let mapped = h.apply(*s);
            assert_relative_eq!(mapped.x, d.x, epsilon = 1e-6);
            assert_relative_eq!(mapped.y, d.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn inverse_round_trips_points() {
        let src = [
            Point2D::new(10.0, 20.0),
            Point2D::new(300.0, 5.0),
            Point2D::new(320.0, 410.0),
            Point2D::new(0.0, 380.0),
        ];
        let h = Homography::from_corners(&src, &square(250.0)).unwrap();
        let inv = h.inverse().unwrap();
        let p = Point2D::new(123.0, 234.0);
        let back = inv.apply(h.apply(p));
        assert_relative_eq!(back.x, p.x, epsilon = 1e-6);
        assert_relative_eq!(back.y, p.y, epsilon = 1e-6);
    }

    #[test]
    fn collinear_source_is_rejected() {
        let src = [
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(20.0, 0.0),
            Point2D::new(30.0, 0.0),
        ];
        assert!(Homography::from_corners(&src, &square(10.0)).is_none());
    }

    #[test]
    fn converts_to_projection() {
        let h = Homography::from_corners(&square(10.0), &square(20.0)).unwrap();
        assert!(h.to_projection().is_some());
    }
}
