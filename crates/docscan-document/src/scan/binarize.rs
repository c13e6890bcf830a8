// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive binarization — local-threshold a rectified page to pure black and
// white, tolerating uneven lighting.

use docscan_core::{LocalMethod, ScanConfig};
use image::{DynamicImage, GrayImage, Luma, RgbImage};
use imageproc::integral_image::{integral_image, sum_image_pixels};
use tracing::{debug, info, instrument};

/// Local-threshold binarizer.
///
/// Each pixel is compared with a weighted mean of its `block_size` square
/// neighbourhood minus `offset`. Pixels strictly above that threshold become
/// 255 (paper); all others become 0 (ink).
#[derive(Debug, Clone)]
pub struct Binarizer {
    block_size: u32,
    offset: f32,
    method: LocalMethod,
}

impl Binarizer {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            block_size: config.threshold_block_size,
            offset: config.threshold_offset,
            method: config.threshold_method,
        }
    }

    /// Convert to grayscale, then binarize.
    pub fn binarize_color(&self, image: &RgbImage) -> GrayImage {
        self.binarize(&DynamicImage::ImageRgb8(image.clone()).to_luma8())
    }

    /// Binarize a grayscale image. Output has the same dimensions and only
    /// the values 0 and 255.
    #[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
    pub fn binarize(&self, gray: &GrayImage) -> GrayImage {
        info!(
            block_size = self.block_size,
            offset = self.offset,
            method = ?self.method,
            "Applying adaptive binarization"
        );

        let means = match self.method {
            LocalMethod::Gaussian => gaussian_local_mean(gray, self.block_size),
            LocalMethod::Mean => box_local_mean(gray, self.block_size / 2),
        };

        let (width, height) = gray.dimensions();
        let mut output = GrayImage::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let threshold = means[(y * width + x) as usize] - self.offset;
            let value = if f32::from(pixel.0[0]) > threshold { 255u8 } else { 0u8 };
            output.put_pixel(x, y, Luma([value]));
        }

        debug!(
            ink_pixels = output.pixels().filter(|p| p.0[0] == 0).count(),
            "Binarization complete"
        );
        output
    }
}

// -- Gaussian-weighted local mean ---------------------------------------------

/// Gaussian-weighted mean of every pixel's neighbourhood, row-major.
///
/// `sigma = (block_size - 1) / 6`, weights confined to the `block_size`
/// window, borders mirrored (`d c b a | a b c d`).
fn gaussian_local_mean(gray: &GrayImage, block_size: u32) -> Vec<f32> {
    let (w, h) = (gray.width() as usize, gray.height() as usize);
    let sigma = block_size.saturating_sub(1) as f32 / 6.0;
    let kernel = gaussian_kernel(sigma, (block_size / 2) as usize);
    let radius = (kernel.len() / 2) as isize;

    let src: Vec<f32> = gray.pixels().map(|p| f32::from(p.0[0])).collect();

    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            horizontal[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| weight * row[reflect(x as isize + k as isize - radius, w)])
                .sum();
        }
    }

    let mut out = vec![0f32; w * h];
    for y in 0..h {
        for x in 0..w {
            out[y * w + x] = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    weight * horizontal[reflect(y as isize + k as isize - radius, h) * w + x]
                })
                .sum();
        }
    }
    out
}

/// Normalised 1-D Gaussian kernel of radius `round(4 * sigma)`, capped at
/// `max_radius`.
fn gaussian_kernel(sigma: f32, max_radius: usize) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }
    let radius = ((4.0 * sigma + 0.5) as isize).min(max_radius as isize);
    let raw: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
        .collect();
    let total: f32 = raw.iter().sum();
    raw.into_iter().map(|v| v / total).collect()
}

/// Mirror an out-of-range index back into `0..len`, repeating the edge sample.
fn reflect(i: isize, len: usize) -> usize {
    let len = len as isize;
    let period = 2 * len;
    let mut i = i.rem_euclid(period);
    if i >= len {
        i = period - 1 - i;
    }
    i as usize
}

// -- Box local mean -----------------------------------------------------------

/// Unweighted mean over a `(2 * radius + 1)` square clamped to the image.
fn box_local_mean(gray: &GrayImage, radius: u32) -> Vec<f32> {
    let (width, height) = gray.dimensions();
    let integral = integral_image::<_, u64>(gray);
    let mut out = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        let (top, bottom) = (y.saturating_sub(radius), (y + radius).min(height - 1));
        for x in 0..width {
            let (left, right) = (x.saturating_sub(radius), (x + radius).min(width - 1));
            let area = u64::from(right - left + 1) * u64::from(bottom - top + 1);
            let sum = sum_image_pixels(&integral, left, top, right, bottom)[0];
            out.push((sum as f64 / area as f64) as f32);
        }
    }
    out
}
