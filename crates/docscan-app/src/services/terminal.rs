// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal corner corrector — shows the user where the preview image is and
// reads four typed corners from stdin on a helper thread.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;

use docscan_core::error::DocscanError;
use docscan_core::human_errors::humanize_error;
use docscan_document::{
    CornerCorrector, CornerRequest, CornerSet, CornerSetBuilder, ImageProcessor,
};
use image::{DynamicImage, RgbImage};
use tracing::{debug, info};

use super::corners::parse_point;
use super::output::ensure_dir;

/// Answers correction requests from the terminal.
///
/// The preview is written to `preview_path` so it can be opened in any image
/// viewer; coordinates are read in that image's pixel space.
pub struct TerminalCorrector {
    preview_path: PathBuf,
}

impl TerminalCorrector {
    pub fn new(preview_path: impl Into<PathBuf>) -> Self {
        Self {
            preview_path: preview_path.into(),
        }
    }
}

impl CornerCorrector for TerminalCorrector {
    fn request_corners(&self, preview: &RgbImage) -> Result<CornerRequest, DocscanError> {
        if let Some(dir) = self.preview_path.parent() {
            ensure_dir(dir)?;
        }
        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(preview.clone()))?
            .save(&self.preview_path)?;
        info!(path = %self.preview_path.display(), "Correction preview written");

        eprintln!(
            "Could not find the document edges.\n\
             Open {} ({}x{}) and type the four page corners as x,y, one per line.\n\
             Type u to undo the last corner, q to give up.",
            self.preview_path.display(),
            preview.width(),
            preview.height()
        );

        let (responder, request) = CornerRequest::channel();
        thread::Builder::new()
            .name("corner-input".into())
            .spawn(move || {
                let stdin = io::stdin();
                match read_corners(stdin.lock(), io::stderr()) {
                    Some(corners) => responder.submit(corners),
                    None => responder.cancel(),
                }
            })?;
        Ok(request)
    }
}

/// Read lines until four valid corners are collected.
///
/// Unparseable lines are reported on `prompt` and skipped. A complete but
/// degenerate set is reported and collection starts over. Returns `None` on
/// `q`, end of input or a read error.
pub fn read_corners(input: impl BufRead, mut prompt: impl Write) -> Option<CornerSet> {
    let mut builder = CornerSetBuilder::new();

    for line in input.lines() {
        let Ok(line) = line else {
            return None;
        };
        match line.trim() {
            "" => continue,
            "q" | "quit" => return None,
            "u" | "undo" => {
                if let Some(point) = builder.undo() {
                    let _ = writeln!(prompt, "removed {point}");
                }
                continue;
            }
            text => {
                if let Err(err) = parse_point(text).and_then(|p| builder.push(p)) {
                    let _ = writeln!(prompt, "{}", humanize_error(&err).suggestion);
                    continue;
                }
            }
        }

        if !builder.is_complete() {
            let _ = writeln!(prompt, "corner {} of 4:", builder.len() + 1);
            continue;
        }
        match std::mem::take(&mut builder).build() {
            Ok(corners) => {
                debug!(corners = ?corners.points(), "Corners read from terminal");
                return Some(corners);
            }
            Err(err) => {
                let _ = writeln!(
                    prompt,
                    "{} Starting over.",
                    humanize_error(&err).message
                );
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use docscan_core::Point2D;
    use std::io::Cursor;

    fn read(text: &str) -> (Option<CornerSet>, String) {
        let mut prompt = Vec::new();
        let result = read_corners(Cursor::new(text.to_string()), &mut prompt);
        (result, String::from_utf8(prompt).unwrap())
    }

    #[test]
    fn reads_four_corners() {
        let (set, _) = read("10,10\n90,10\n90,90\n10,90\n");
        assert_eq!(set.unwrap().points()[1], Point2D::new(90.0, 10.0));
    }

    #[test]
    fn bad_lines_are_reported_and_skipped() {
        let (set, prompt) = read("10,10\nnonsense\n\n90,10\n90,90\n10,90\n");
        assert!(set.is_some());
        assert!(prompt.contains("x,y"));
    }

    #[test]
    fn undo_replaces_the_last_corner() {
        let (set, prompt) = read("10,10\n500,500\nu\n90,10\n90,90\n10,90\n");
        let set = set.unwrap();
        assert!(!set.points().contains(&Point2D::new(500.0, 500.0)));
        assert!(prompt.contains("removed"));
    }

    #[test]
    fn degenerate_set_starts_over() {
        let (set, prompt) = read("0,0\n10,0\n20,0\n5,9\n10,10\n90,10\n90,90\n10,90\n");
        assert_eq!(set.unwrap().points()[0], Point2D::new(10.0, 10.0));
        assert!(prompt.contains("Starting over"));
    }

    #[test]
    fn quit_and_end_of_input_give_up() {
        assert!(read("10,10\nq\n90,10\n90,90\n10,90\n").0.is_none());
        assert!(read("10,10\n90,10\n").0.is_none());
    }
}
