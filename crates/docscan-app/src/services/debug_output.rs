// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debug output — dump the intermediate images of a pipeline run for inspection.

use std::path::{Path, PathBuf};

use docscan_core::error::DocscanError;
use docscan_core::{BoundarySource, OrderedRectangle};
use docscan_document::{ImageProcessor, ScanOutput};
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use tracing::{debug, warn};

const DETECTED_COLOUR: Rgb<u8> = Rgb([0, 200, 0]);
const CORRECTED_COLOUR: Rgb<u8> = Rgb([230, 120, 0]);

/// Write `<stem>_working.png`, `<stem>_edges.png` and `<stem>_outline.png`
/// into `dir`. Returns the paths written.
///
/// `original_height` maps the output corners back to working resolution.
/// Missing intermediates are skipped with a warning.
pub fn write_debug_images(
    dir: &Path,
    stem: &str,
    output: &ScanOutput,
    original_height: u32,
) -> Result<Vec<PathBuf>, DocscanError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let Some(working) = output.working.as_ref() else {
        warn!("No intermediates kept; skipping debug images");
        return Ok(written);
    };

    let path = dir.join(format!("{stem}_working.png"));
    save(DynamicImage::ImageRgb8(working.clone()), &path)?;
    written.push(path);

    if let Some(edges) = output.edges.as_ref() {
        let path = dir.join(format!("{stem}_edges.png"));
        save(DynamicImage::ImageLuma8(edges.clone()), &path)?;
        written.push(path);
    }

    let ratio = f64::from(original_height) / f64::from(working.height());
    let outlined = draw_outline(working, &output.corners, ratio, output.source);
    let path = dir.join(format!("{stem}_outline.png"));
    save(DynamicImage::ImageRgb8(outlined), &path)?;
    written.push(path);

    debug!(files = written.len(), dir = %dir.display(), "Debug images written");
    Ok(written)
}

/// Copy of `working` with the document outline drawn on it. Corners are in
/// original coordinates and are divided by `ratio`.
pub fn draw_outline(
    working: &RgbImage,
    corners: &OrderedRectangle,
    ratio: f64,
    source: BoundarySource,
) -> RgbImage {
    let colour = match source {
        BoundarySource::Detected => DETECTED_COLOUR,
        BoundarySource::Corrected => CORRECTED_COLOUR,
    };
    let pts = corners
        .corners()
        .map(|p| ((p.x / ratio) as f32, (p.y / ratio) as f32));

    let mut canvas = working.clone();
    for i in 0..4 {
        let (a, b) = (pts[i], pts[(i + 1) % 4]);
        draw_line_segment_mut(&mut canvas, a, b, colour);
    }
    for (x, y) in pts {
        draw_filled_circle_mut(&mut canvas, (x.round() as i32, y.round() as i32), 3, colour);
    }
    canvas
}

fn save(image: DynamicImage, path: &Path) -> Result<(), DocscanError> {
    ImageProcessor::from_dynamic(image)?.save(path)
}
