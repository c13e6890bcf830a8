// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docscan — Turn a photo of a document into a clean black-and-white scan.
//
// Entry point. Parses arguments, initialises logging, runs the scan pipeline
// and writes the result next to the input (or into --dest).

mod services;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use docscan_core::error::DocscanError;
use docscan_core::human_errors::{Severity, humanize_error};
use docscan_core::{PaperSize, ScanConfig};
use docscan_document::{FixedCorners, ImageProcessor, ScanPipeline};

use services::corners::parse_corner_list;
use services::debug_output::write_debug_images;
use services::output::{self, OutputKind};
use services::terminal::TerminalCorrector;

#[derive(Parser, Debug)]
#[command(name = "docscan")]
#[command(about = "Convert a photograph of a document into a rectified black-and-white scan")]
#[command(version)]
struct Cli {
    /// Path to the photo to scan.
    #[arg(long, value_name = "PATH")]
    image: PathBuf,

    /// Directory the scan is written to. Defaults to the photo's directory.
    #[arg(long, value_name = "DIR")]
    dest: Option<PathBuf>,

    /// Write a single-page PDF instead of a PNG.
    #[arg(long)]
    pdf: bool,

    /// Paper size for --pdf (a4, a3, a5, letter, legal). Overrides the config file.
    #[arg(long, value_name = "NAME", value_parser = parse_paper)]
    paper: Option<PaperSize>,

    /// JSON file with scan settings.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Corners to use if detection fails, as four "x,y" pairs in
    /// working-resolution pixels, e.g. "12,8 340,15 335,490 9,482".
    #[arg(long, value_name = "POINTS", value_parser = parse_corner_list)]
    corners: Option<docscan_document::CornerSet>,

    /// Fail instead of asking for corners on the terminal.
    #[arg(long)]
    no_interactive: bool,

    /// Give up waiting for typed corners after this many seconds.
    #[arg(long, value_name = "SECS")]
    correction_timeout: Option<u64>,

    /// Write the working image, edge map and detected outline here.
    #[arg(long, value_name = "DIR")]
    debug_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,
}

fn parse_paper(name: &str) -> Result<PaperSize, String> {
    PaperSize::from_name(name).ok_or_else(|| format!("unknown paper size {name:?}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("docscan starting");

    match run(&cli) {
        Ok(path) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "scan failed");
            let human = humanize_error(&err);
            eprintln!("{human}");
            match human.severity {
                Severity::ActionRequired => ExitCode::from(2),
                Severity::Permanent => ExitCode::FAILURE,
            }
        }
    }
}

/// Scan `cli.image` and return the path of the written result.
fn run(cli: &Cli) -> Result<PathBuf, DocscanError> {
    if !cli.image.is_file() {
        return Err(DocscanError::InvalidImage(format!(
            "{} does not exist or is not a file",
            cli.image.display()
        )));
    }

    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if let Some(paper) = cli.paper {
        config.paper_size = paper;
    }
    if cli.debug_dir.is_some() {
        config.keep_intermediates = true;
    }
    let kind = if cli.pdf {
        OutputKind::Pdf {
            paper: config.paper_size,
            dpi: config.pdf_dpi,
        }
    } else {
        OutputKind::Png
    };

    let dest = output::output_dir(&cli.image, cli.dest.as_deref());
    let pipeline = build_pipeline(cli, config, &dest)?;

    let photo = ImageProcessor::open(&cli.image)?;
    let original_height = photo.height();
    let result = pipeline.scan(photo.into_dynamic())?;
    tracing::info!(source = ?result.source, corners = ?result.corners.corners(), "Boundary used");

    if let Some(dir) = &cli.debug_dir {
        write_debug_images(dir, &output::input_stem(&cli.image), &result, original_height)?;
    }

    output::ensure_dir(&dest)?;
    let path = output::scan_path(&dest, &cli.image, kind);
    output::write_scan(&result.scan, &path, kind)?;
    Ok(path)
}

fn build_pipeline(cli: &Cli, config: ScanConfig, dest: &Path) -> Result<ScanPipeline, DocscanError> {
    let mut pipeline = ScanPipeline::new(config)?;

    if let Some(corners) = cli.corners {
        pipeline = pipeline.with_corrector(FixedCorners::new(corners));
    } else if !cli.no_interactive {
        let preview = dest.join(format!("{}_preview.png", output::input_stem(&cli.image)));
        pipeline = pipeline.with_corrector(TerminalCorrector::new(preview));
    }

    if let Some(secs) = cli.correction_timeout {
        pipeline = pipeline.with_correction_timeout(Duration::from_secs(secs));
    }
    Ok(pipeline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::{Rgb, RgbImage};

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_full_argument_set() {
        let cli = Cli::try_parse_from([
            "docscan",
            "--image",
            "photo.jpg",
            "--dest",
            "out",
            "--pdf",
            "--paper",
            "letter",
            "--corners",
            "10,10 90,10 90,90 10,90",
            "--correction-timeout",
            "30",
            "-v",
        ])
        .unwrap();
        assert!(cli.pdf && cli.verbose);
        assert_eq!(cli.paper, Some(PaperSize::Letter));
        assert_eq!(cli.correction_timeout, Some(30));
        assert!(cli.corners.is_some());
    }

    #[test]
    fn rejects_bad_corner_list_and_paper() {
        assert!(Cli::try_parse_from(["docscan", "--image", "a.jpg", "--corners", "1,1 2,2"]).is_err());
        assert!(Cli::try_parse_from(["docscan", "--image", "a.jpg", "--paper", "b5"]).is_err());
    }

    #[test]
    fn missing_image_is_invalid() {
        let cli = Cli::try_parse_from(["docscan", "--image", "/definitely/not/here.jpg"]).unwrap();
        assert!(matches!(run(&cli), Err(DocscanError::InvalidImage(_))));
    }

    #[test]
    fn blank_photo_without_interaction_is_boundary_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("blank.png");
        RgbImage::from_pixel(300, 400, Rgb([128, 128, 128])).save(&photo).unwrap();

        let cli = Cli::try_parse_from([
            "docscan",
            "--image",
            photo.to_str().unwrap(),
            "--no-interactive",
        ])
        .unwrap();
        assert!(matches!(run(&cli), Err(DocscanError::BoundaryNotFound)));
    }

    #[test]
    fn failed_scan_leaves_no_dest_directory() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("blank.png");
        RgbImage::from_pixel(300, 400, Rgb([128, 128, 128])).save(&photo).unwrap();
        let dest = dir.path().join("scans");

        let cli = Cli::try_parse_from([
            "docscan",
            "--image",
            photo.to_str().unwrap(),
            "--dest",
            dest.to_str().unwrap(),
            "--no-interactive",
        ])
        .unwrap();
        assert!(run(&cli).is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn preset_corners_produce_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("blank.png");
        RgbImage::from_pixel(300, 400, Rgb([128, 128, 128])).save(&photo).unwrap();
        let out = dir.path().join("out");
        let debug = dir.path().join("debug");

        let cli = Cli::try_parse_from([
            "docscan",
            "--image",
            photo.to_str().unwrap(),
            "--dest",
            out.to_str().unwrap(),
            "--pdf",
            "--corners",
            "20,20 200,20 200,480 20,480",
            "--debug-dir",
            debug.to_str().unwrap(),
        ])
        .unwrap();

        let written = run(&cli).unwrap();
        assert_eq!(written, out.join("blank_scan.pdf"));
        assert!(std::fs::read(&written).unwrap().starts_with(b"%PDF"));
        assert!(debug.join("blank_outline.png").exists());
    }
}
