// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — edge extraction, outline detection, corner correction,
// perspective rectification and adaptive binarization.

pub mod binarize;
pub mod contours;
pub mod correction;
pub mod detect;
pub mod edges;
pub mod homography;
pub mod ordering;
pub mod pipeline;
pub mod rectify;

pub use binarize::Binarizer;
pub use correction::{
    CornerCanceller, CornerCorrector, CornerRequest, CornerResponder, CornerSet, CornerSetBuilder,
    FixedCorners,
};
pub use detect::QuadDetector;
pub use edges::{EdgeExtractor, EdgeMap};
pub use homography::Homography;
pub use ordering::{CentroidAngleOrdering, CornerOrdering, SumDiffOrdering};
pub use pipeline::{ScanOutput, ScanPipeline};
pub use rectify::PerspectiveRectifier;
