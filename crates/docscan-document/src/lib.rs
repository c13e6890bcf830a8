// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan-document — Turns a photo of a paper document into a clean scan.
//
// Provides image decoding and resizing, the scanning pipeline (edge
// extraction, outline detection, manual corner fallback, perspective
// rectification, adaptive binarization), and scan-to-PDF export.

pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary structs so callers can use `docscan_document::ScanPipeline` etc.
pub use image::processor::ImageProcessor;
pub use pdf::writer::PdfWriter;
pub use scan::{
    CentroidAngleOrdering, CornerCorrector, CornerOrdering, CornerRequest, CornerResponder,
    CornerSet, CornerSetBuilder, FixedCorners, ScanOutput, ScanPipeline, SumDiffOrdering,
};
