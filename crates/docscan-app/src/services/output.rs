// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output location resolution and scan writing.

use std::path::{Path, PathBuf};

use docscan_core::PaperSize;
use docscan_core::error::DocscanError;
use docscan_document::{ImageProcessor, PdfWriter};
use image::{DynamicImage, GrayImage};
use tracing::info;

/// File format of the finished scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputKind {
    Png,
    Pdf { paper: PaperSize, dpi: f32 },
}

impl OutputKind {
    fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Pdf { .. } => "pdf",
        }
    }
}

/// Directory results go to: `dest` if given, else the input's directory.
pub fn output_dir(input: &Path, dest: Option<&Path>) -> PathBuf {
    match dest {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// File stem of the input, or `scan` when it has none.
pub fn input_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scan".into())
}

/// `<dir>/<stem>_scan.<ext>`.
pub fn scan_path(dir: &Path, input: &Path, kind: OutputKind) -> PathBuf {
    dir.join(format!("{}_scan.{}", input_stem(input), kind.extension()))
}

/// Create `dir` and its parents if needed.
pub fn ensure_dir(dir: &Path) -> Result<(), DocscanError> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// Write the scan to `path` in the requested format.
pub fn write_scan(scan: &GrayImage, path: &Path, kind: OutputKind) -> Result<(), DocscanError> {
    match kind {
        OutputKind::Png => {
            ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(scan.clone()))?.save(path)?;
        }
        OutputKind::Pdf { paper, dpi } => {
            let mut writer = PdfWriter::new(paper);
            writer.set_title(format!("docscan {}", input_stem(path)));
            writer.set_dpi(dpi);
            writer.write_scan_to_file(scan, path)?;
        }
    }
    info!(path = %path.display(), "Scan written");
    Ok(())
}
