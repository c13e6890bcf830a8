// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DocscanError, Result};

/// Neighbourhood statistic used by the adaptive threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocalMethod {
    /// Gaussian-weighted mean over the block.
    #[default]
    Gaussian,
    /// Unweighted box mean over the block.
    Mean,
}

/// Tunable parameters for one scan run.
///
/// Missing fields in a config file fall back to [`ScanConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Height of the downscaled working image used for edge detection.
    pub working_height: u32,
    /// Sigma of the Gaussian blur applied before Canny.
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
    /// Dilation radius applied to the edge map (0 disables).
    pub edge_dilation: u8,
    /// How many of the largest contours are tried as document candidates.
    pub max_candidates: usize,
    /// Polygon approximation tolerance as a fraction of contour perimeter.
    pub approx_epsilon_ratio: f64,
    /// Side of the square adaptive-threshold window. Must be odd.
    pub threshold_block_size: u32,
    /// Constant subtracted from the local mean.
    pub threshold_offset: f32,
    pub threshold_method: LocalMethod,
    /// Keep the working image and edge map in the scan output.
    pub keep_intermediates: bool,
    /// Page size used for PDF export.
    pub paper_size: crate::PaperSize,
    /// Resolution assumed when placing the scan on a PDF page.
    pub pdf_dpi: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            working_height: 500,
            blur_sigma: 1.1,
            canny_low: 75.0,
            canny_high: 200.0,
            edge_dilation: 1,
            max_candidates: 5,
            approx_epsilon_ratio: 0.02,
            threshold_block_size: 11,
            threshold_offset: 10.0,
            threshold_method: LocalMethod::Gaussian,
            keep_intermediates: false,
            paper_size: crate::PaperSize::A4,
            pdf_dpi: 150.0,
        }
    }
}

impl ScanConfig {
    /// Load a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<()> {
        if self.working_height == 0 {
            return Err(DocscanError::Config("working_height must be positive".into()));
        }
        if !(self.blur_sigma > 0.0) {
            return Err(DocscanError::Config("blur_sigma must be positive".into()));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(DocscanError::Config(format!(
                "canny thresholds out of order: low {} high {}",
                self.canny_low, self.canny_high
            )));
        }
        if self.max_candidates == 0 {
            return Err(DocscanError::Config("max_candidates must be at least 1".into()));
        }
        if !(self.approx_epsilon_ratio > 0.0 && self.approx_epsilon_ratio < 1.0) {
            return Err(DocscanError::Config(
                "approx_epsilon_ratio must lie in (0, 1)".into(),
            ));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(DocscanError::Config(format!(
                "threshold_block_size must be odd and >= 3, got {}",
                self.threshold_block_size
            )));
        }
        if !(self.pdf_dpi > 0.0) {
            return Err(DocscanError::Config("pdf_dpi must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        ScanConfig::default().validate().unwrap();
    }

    #[test]
    fn even_block_size_is_rejected() {
        let config = ScanConfig {
            threshold_block_size: 10,
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(DocscanError::Config(_))));
    }

    #[test]
    fn inverted_canny_thresholds_are_rejected() {
        let config = ScanConfig {
            canny_low: 250.0,
            canny_high: 100.0,
            ..ScanConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "working_height": 640, "threshold_method": "mean" }}"#).unwrap();

        let config = ScanConfig::load(file.path()).unwrap();
        assert_eq!(config.working_height, 640);
        assert_eq!(config.threshold_method, LocalMethod::Mean);
        assert_eq!(config.max_candidates, 5);
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            ScanConfig::load(file.path()),
            Err(DocscanError::Serialization(_))
        ));
    }
}
