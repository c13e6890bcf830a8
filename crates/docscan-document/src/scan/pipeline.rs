// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan pipeline — photo in, rectified black-and-white page out.

use std::time::Duration;

use docscan_core::error::DocscanError;
use docscan_core::{BoundarySource, OrderedRectangle, Quadrilateral, ScanConfig};
use image::{DynamicImage, GrayImage, RgbImage};
use tracing::{info, instrument, warn};

use super::binarize::Binarizer;
use super::correction::CornerCorrector;
use super::detect::QuadDetector;
use super::edges::EdgeExtractor;
use super::ordering::CornerOrdering;
use super::rectify::PerspectiveRectifier;
use crate::image::processor::ImageProcessor;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct ScanOutput {
    /// Rectified, binarized page (0 = ink, 255 = paper).
    pub scan: GrayImage,
    /// Document corners in original image coordinates.
    pub corners: OrderedRectangle,
    pub source: BoundarySource,
    /// Working-resolution image, kept when `keep_intermediates` is set.
    pub working: Option<RgbImage>,
    /// Edge map, kept when `keep_intermediates` is set.
    pub edges: Option<GrayImage>,
}

/// Edge extraction, detection, optional correction, rectification and
/// binarization, run strictly in that order.
///
/// ```ignore
/// let pipeline = ScanPipeline::new(ScanConfig::default())?
///     .with_corrector(FixedCorners::new(corners));
/// let output = pipeline.scan_bytes(&std::fs::read("receipt.jpg")?)?;
/// ```
pub struct ScanPipeline {
    keep_intermediates: bool,
    extractor: EdgeExtractor,
    detector: QuadDetector,
    rectifier: PerspectiveRectifier,
    binarizer: Binarizer,
    corrector: Option<Box<dyn CornerCorrector>>,
    correction_timeout: Option<Duration>,
}

impl ScanPipeline {
    /// Build a pipeline from a validated configuration. Without a corrector,
    /// a photo with no detectable outline fails with `BoundaryNotFound`.
    pub fn new(config: ScanConfig) -> Result<Self, DocscanError> {
        config.validate()?;
        Ok(Self {
            keep_intermediates: config.keep_intermediates,
            extractor: EdgeExtractor::new(&config),
            detector: QuadDetector::new(&config),
            rectifier: PerspectiveRectifier::default(),
            binarizer: Binarizer::new(&config),
            corrector: None,
            correction_timeout: None,
        })
    }

    pub fn with_corrector(mut self, corrector: impl CornerCorrector + 'static) -> Self {
        self.corrector = Some(Box::new(corrector));
        self
    }

    /// Replace the default sum/difference corner labelling.
    pub fn with_ordering(mut self, ordering: Box<dyn CornerOrdering>) -> Self {
        self.rectifier = PerspectiveRectifier::new(ordering);
        self
    }

    /// Bound the wait for corrected corners. Unbounded by default.
    pub fn with_correction_timeout(mut self, timeout: Duration) -> Self {
        self.correction_timeout = Some(timeout);
        self
    }

    pub fn scan(&self, image: DynamicImage) -> Result<ScanOutput, DocscanError> {
        self.run(ImageProcessor::from_dynamic(image)?)
    }

    pub fn scan_bytes(&self, data: &[u8]) -> Result<ScanOutput, DocscanError> {
        self.run(ImageProcessor::from_bytes(data)?)
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn run(&self, image: ImageProcessor) -> Result<ScanOutput, DocscanError> {
        let map = self.extractor.extract(&image);

        let (quad, source) = match self.detector.detect(&map.edges) {
            Some(quad) => (quad, BoundarySource::Detected),
            None => (self.request_correction(&map.working)?, BoundarySource::Corrected),
        };

        let original = image.into_dynamic().to_rgb8();
        let (warped, corners) = self.rectifier.rectify(&original, &quad, map.ratio)?;
        let scan = self.binarizer.binarize_color(&warped);

        info!(
            out_w = scan.width(),
            out_h = scan.height(),
            source = ?source,
            "Scan complete"
        );

        let (working, edges) = if self.keep_intermediates {
            (Some(map.working), Some(map.edges))
        } else {
            (None, None)
        };
        Ok(ScanOutput {
            scan,
            corners,
            source,
            working,
            edges,
        })
    }

    /// Ask the corrector for corners at working resolution. Called at most
    /// once per run.
    fn request_correction(&self, working: &RgbImage) -> Result<Quadrilateral, DocscanError> {
        let Some(corrector) = self.corrector.as_ref() else {
            return Err(DocscanError::BoundaryNotFound);
        };
        warn!("Falling back to manual corner correction");
        let corners = corrector
            .request_corners(working)?
            .wait(self.correction_timeout)?;
        Ok(*corners.quadrilateral())
    }
}
