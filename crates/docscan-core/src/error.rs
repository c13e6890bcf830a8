// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docscan.

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for all docscan operations.
///
/// Every variant is terminal for a single scan run. Nothing in the library
/// retries on its own.
#[derive(Debug, Error)]
pub enum DocscanError {
    // -- Input --
    #[error("invalid input image: {0}")]
    InvalidImage(String),

    // -- Boundary detection / correction --
    #[error("document boundary not found and no corner corrector is available")]
    BoundaryNotFound,

    #[error("corner correction was cancelled")]
    CorrectionCancelled,

    #[error("corner correction timed out after {0:?}")]
    CorrectionTimedOut(Duration),

    #[error("degenerate corners: {0}")]
    DegenerateCorners(String),

    // -- Rectification --
    #[error("rectification failed: {0}")]
    Rectification(String),

    // -- Output --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, DocscanError>;
