// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — embed a finished scan in a single-page PDF using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use docscan_core::PaperSize;
use docscan_core::error::DocscanError;
use image::{DynamicImage, GrayImage};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

/// Page margin on every side.
const MARGIN_MM: f32 = 15.0;

/// Creates print-ready PDFs from binarized scans.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
    /// Resolution the scan's pixels are placed at.
    dpi: f32,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size at 150 dpi.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
            dpi: 150.0,
        }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set the placement resolution. Non-positive values are ignored.
    pub fn set_dpi(&mut self, dpi: f32) {
        if dpi > 0.0 {
            self.dpi = dpi;
        } else {
            warn!(dpi, "Ignoring non-positive DPI");
        }
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Create a single-page PDF containing the scan.
    ///
    /// The scan is placed at the configured DPI, shrunk (never enlarged) to
    /// fit within the page margins with its aspect ratio preserved, and
    /// centred on the page.
    #[instrument(skip_all, fields(width = scan.width(), height = scan.height()))]
    pub fn create_from_scan(&self, scan: &GrayImage) -> Result<Vec<u8>, DocscanError> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("docscan Scan");

        info!(paper = ?self.paper_size, title, "Creating scan PDF");

        let (img_width, img_height) = (scan.width() as usize, scan.height() as usize);
        if img_width == 0 || img_height == 0 {
            return Err(DocscanError::PdfError("scan has zero size".into()));
        }

        // Convert to RGB8 for printpdf.
        let rgb_image = DynamicImage::ImageLuma8(scan.clone()).to_rgb8();
        let raw = RawImage {
            pixels: RawImageData::U8(rgb_image.into_raw()),
            width: img_width,
            height: img_height,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        let usable_w_pt = Mm(page_w.0 - 2.0 * MARGIN_MM).into_pt().0;
        let usable_h_pt = Mm(page_h.0 - 2.0 * MARGIN_MM).into_pt().0;

        let img_w_pt = img_width as f32 / self.dpi * 72.0;
        let img_h_pt = img_height as f32 / self.dpi * 72.0;

        // Scale to fit while preserving aspect ratio; do not upscale.
        let scale = (usable_w_pt / img_w_pt)
            .min(usable_h_pt / img_h_pt)
            .min(1.0);
        let rendered_w_pt = img_w_pt * scale;
        let rendered_h_pt = img_h_pt * scale;

        let margin_pt = Mm(MARGIN_MM).into_pt().0;
        let x_offset = margin_pt + (usable_w_pt - rendered_w_pt) / 2.0;
        let y_offset = margin_pt + (usable_h_pt - rendered_h_pt) / 2.0;

        let ops = vec![Op::UseXobject {
            id: xobject_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x_offset)),
                translate_y: Some(Pt(y_offset)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(self.dpi),
                rotate: None,
            },
        }];

        doc.with_pages(vec![PdfPage::new(page_w, page_h, ops)]);

        debug!(rendered_w_pt, rendered_h_pt, scale, "Scan placed on page");

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            debug!(warnings = warnings.len(), "printpdf reported warnings");
        }

        Ok(output)
    }

    /// Create a scan PDF and write it directly to a file.
    pub fn write_scan_to_file(
        &self,
        scan: &GrayImage,
        path: impl AsRef<Path>,
    ) -> Result<(), DocscanError> {
        let bytes = self.create_from_scan(scan)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote scan PDF to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn page() -> GrayImage {
        GrayImage::from_fn(210, 297, |x, y| {
            if (x + y) % 17 == 0 { Luma([0]) } else { Luma([255]) }
        })
    }

    #[test]
    fn scan_pdf_has_pdf_header() {
        let bytes = PdfWriter::a4().create_from_scan(&page()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn every_paper_size_produces_a_pdf() {
        for paper in [PaperSize::A3, PaperSize::A5, PaperSize::Letter, PaperSize::Legal] {
            let mut writer = PdfWriter::new(paper);
            writer.set_title("receipt");
            writer.set_dpi(300.0);
            let bytes = writer.create_from_scan(&page()).unwrap();
            assert!(bytes.starts_with(b"%PDF"), "{paper:?}");
        }
    }

    #[test]
    fn empty_scan_is_rejected() {
        let result = PdfWriter::a4().create_from_scan(&GrayImage::new(0, 0));
        assert!(matches!(result, Err(DocscanError::PdfError(_))));
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.pdf");
        PdfWriter::a4().write_scan_to_file(&page(), &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert!(written.starts_with(b"%PDF"));
    }
}
