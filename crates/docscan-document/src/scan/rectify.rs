// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective rectification — warp the document quadrilateral of the
// full-resolution photo onto an upright rectangle.

use docscan_core::error::DocscanError;
use docscan_core::{OrderedRectangle, Point2D, Quadrilateral};
use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, warp_into};
use tracing::{debug, info, instrument, warn};

use super::homography::Homography;
use super::ordering::{CentroidAngleOrdering, CornerOrdering, SumDiffOrdering};

/// Maps a quadrilateral in the original photo to a top-down rectangle.
pub struct PerspectiveRectifier {
    ordering: Box<dyn CornerOrdering>,
}

impl Default for PerspectiveRectifier {
    fn default() -> Self {
        Self::new(Box::new(SumDiffOrdering))
    }
}

impl PerspectiveRectifier {
    pub fn new(ordering: Box<dyn CornerOrdering>) -> Self {
        Self { ordering }
    }

    /// Label the corners of `quad` with the configured strategy, retrying
    /// with the centroid-angle sort when it cannot assign distinct labels.
    /// Fails only for outlines that enclose no area.
    pub fn order(&self, quad: &Quadrilateral) -> Result<OrderedRectangle, DocscanError> {
        if let Some(ordered) = self.ordering.order(quad) {
            return Ok(ordered);
        }
        warn!(
            strategy = self.ordering.name(),
            "Corner labels collided, retrying with centroid-angle ordering"
        );
        CentroidAngleOrdering.order(quad).ok_or_else(|| {
            DocscanError::DegenerateCorners(format!(
                "{} ordering could not label corners {:?}",
                self.ordering.name(),
                quad.points()
            ))
        })
    }

    /// Rectify the region bounded by `quad`. `quad` is in working
    /// coordinates and is multiplied by `ratio` to reach `image`'s.
    ///
    /// The output is `round(max(top, bottom))` by `round(max(left, right))`
    /// pixels. Samples falling outside the photo are filled white.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn rectify(
        &self,
        image: &RgbImage,
        quad: &Quadrilateral,
        ratio: f64,
    ) -> Result<(RgbImage, OrderedRectangle), DocscanError> {
        let ordered = self.order(&quad.scaled(ratio))?;
        let (out_w, out_h) = ordered.target_size();
        debug!(
            strategy = self.ordering.name(),
            top_left = %ordered.top_left(),
            out_w,
            out_h,
            "Corners ordered"
        );

        let (w, h) = (f64::from(out_w - 1), f64::from(out_h - 1));
        let dst = [
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        ];

        let projection = Homography::from_corners(&ordered.corners(), &dst)
            .and_then(|h| h.to_projection())
            .ok_or_else(|| {
                DocscanError::Rectification(format!(
                    "no perspective transform for corners {:?}",
                    ordered.corners()
                ))
            })?;

        let mut output = RgbImage::new(out_w, out_h);
        warp_into(
            image,
            &projection,
            Interpolation::Bilinear,
            Rgb([255u8, 255, 255]),
            &mut output,
        );

        info!(out_w, out_h, "Perspective correction applied");
        Ok((output, ordered))
    }
}
