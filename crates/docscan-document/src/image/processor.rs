// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decoding, validation, working-height resize and
// encoding. Operates on in-memory images using the `image` crate.

use docscan_core::error::DocscanError;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info, instrument};

/// Wrapper around a single in-memory image.
///
/// Every transformation returns a new `ImageProcessor`, so the input buffer
/// is never mutated in place.
///
/// ```ignore
/// let photo = ImageProcessor::open("photo.jpg")?;
/// let (working, ratio) = photo.resize_to_height(500);
/// working.save("working.png")?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, DocscanError> {
        let img = image::open(path.as_ref()).map_err(|err| {
            DocscanError::InvalidImage(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Self::checked(img)
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, DocscanError> {
        let img = image::load_from_memory(data).map_err(|err| {
            DocscanError::InvalidImage(format!("failed to decode image: {}", err))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Self::checked(img)
    }

    /// Wrap an already-decoded `DynamicImage`, rejecting empty images.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, DocscanError> {
        Self::checked(image)
    }

    fn checked(image: DynamicImage) -> Result<Self, DocscanError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(DocscanError::InvalidImage(format!(
                "image has zero size ({}x{})",
                image.width(),
                image.height()
            )));
        }
        Ok(Self { image })
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Resize to exactly `height` rows, scaling the width by the same factor.
    ///
    /// Returns the resized copy and the ratio `original / new` height, which
    /// maps working coordinates back to the source image.
    #[instrument(skip(self), fields(height))]
    pub fn resize_to_height(&self, height: u32) -> (Self, f64) {
        let (src_w, src_h) = (self.image.width(), self.image.height());
        let ratio = src_h as f64 / height as f64;
        let width = ((src_w as f64 / ratio).round() as u32).max(1);
        let resized = self.image.resize_exact(width, height, FilterType::Triangle);
        debug!(
            from_w = src_w,
            from_h = src_h,
            to_w = width,
            to_h = height,
            ratio,
            "Resized to working height"
        );
        (Self { image: resized }, ratio)
    }

    // -- Output ---------------------------------------------------------------

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), DocscanError> {
        self.image.save(path.as_ref()).map_err(|err| {
            DocscanError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(path = %path.as_ref().display(), "Image written");
        Ok(())
    }
}
