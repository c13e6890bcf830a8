// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral detection — pick the document outline from an edge map.

use docscan_core::{Contour, Point2D, Quadrilateral, ScanConfig};
use image::GrayImage;
use tracing::{debug, info, instrument, warn};

use super::contours::{approximate_closed, contour_area, contour_perimeter, find_closed_contours};

/// Selects the document boundary among the closed contours of an edge map.
///
/// The policy is greedy: candidates are the `max_candidates` largest
/// contours by area, tried largest first, and the first one that simplifies
/// to exactly four vertices wins. Shape quality plays no part in the choice.
#[derive(Debug, Clone)]
pub struct QuadDetector {
    max_candidates: usize,
    epsilon_ratio: f64,
}

impl QuadDetector {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            max_candidates: config.max_candidates,
            epsilon_ratio: config.approx_epsilon_ratio,
        }
    }

    /// Find the document outline, or `None` when no candidate has four corners.
    #[instrument(skip_all, fields(width = edges.width(), height = edges.height()))]
    pub fn detect(&self, edges: &GrayImage) -> Option<Quadrilateral> {
        let candidates = self.rank_candidates(find_closed_contours(edges));
        debug!(candidates = candidates.len(), "Ranked contour candidates");

        for (rank, contour) in candidates.iter().enumerate() {
            let perimeter = contour_perimeter(contour);
            if perimeter <= 0.0 {
                continue;
            }
            let polygon = approximate_closed(contour.points(), self.epsilon_ratio * perimeter);
            debug!(
                rank,
                area = contour_area(contour),
                perimeter,
                vertices = polygon.len(),
                "Simplified candidate"
            );

            if let Some(quad) = as_quadrilateral(&polygon) {
                info!(
                    rank,
                    area = quad.area(),
                    "Document boundary detected"
                );
                return Some(quad);
            }
        }

        warn!("No four-cornered contour among the largest candidates");
        None
    }

    /// Sort contours by enclosed area, largest first, and keep the top few.
    pub fn rank_candidates(&self, contours: Vec<Contour>) -> Vec<Contour> {
        let mut scored: Vec<(f64, Contour)> =
            contours.into_iter().map(|c| (contour_area(&c), c)).collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored.truncate(self.max_candidates);
        scored.into_iter().map(|(_, c)| c).collect()
    }
}

fn as_quadrilateral(polygon: &[Point2D]) -> Option<Quadrilateral> {
    let corners: [Point2D; 4] = polygon.try_into().ok()?;
    Quadrilateral::new(corners).ok()
}
