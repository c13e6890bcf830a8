// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edge extraction — working-height downscale, blur, Canny.

use docscan_core::ScanConfig;
use image::{DynamicImage, GrayImage, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;

/// Output of the edge extractor.
#[derive(Debug, Clone)]
pub struct EdgeMap {
    /// The downscaled colour image edges were computed on.
    pub working: RgbImage,
    /// Binary edge map at working resolution: 255 on edges, 0 elsewhere.
    pub edges: GrayImage,
    /// `original_height / working_height`.
    pub ratio: f64,
}

/// Turns a photo into a binary map of strong boundaries.
///
/// Detection runs at a fixed working height: full-resolution Canny is both
/// slower and picks up paper texture.
#[derive(Debug, Clone)]
pub struct EdgeExtractor {
    working_height: u32,
    blur_sigma: f32,
    low_threshold: f32,
    high_threshold: f32,
    dilation: u8,
}

impl EdgeExtractor {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            working_height: config.working_height,
            blur_sigma: config.blur_sigma,
            low_threshold: config.canny_low,
            high_threshold: config.canny_high,
            dilation: config.edge_dilation,
        }
    }

    /// Downscale `image` and compute its edge map.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract(&self, image: &ImageProcessor) -> EdgeMap {
        let (working, ratio) = image.resize_to_height(self.working_height);
        let working = working.into_dynamic().to_rgb8();
        let edges = self.edges_of(&working);
        EdgeMap {
            working,
            edges,
            ratio,
        }
    }

    /// Edge map of an image that is already at working resolution.
    pub fn edges_of(&self, working: &RgbImage) -> GrayImage {
        let gray = DynamicImage::ImageRgb8(working.clone()).to_luma8();
        let blurred = gaussian_blur_f32(&gray, self.blur_sigma);
        let edges = canny(&blurred, self.low_threshold, self.high_threshold);
        debug!(
            sigma = self.blur_sigma,
            low = self.low_threshold,
            high = self.high_threshold,
            edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count(),
            "Canny edge detection complete"
        );

        if self.dilation == 0 {
            edges
        } else {
            dilate(&edges, Norm::LInf, self.dilation)
        }
    }
}
