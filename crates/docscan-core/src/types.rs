// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types: points, contours, quadrilaterals and paper sizes.

use serde::{Deserialize, Serialize};

use crate::error::{DocscanError, Result};

/// A point in image space. Coordinates are in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Multiply both coordinates by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Absolute polygon area via the shoelace formula. Vertices must be in
/// boundary order (CW or CCW).
pub fn polygon_area(points: &[Point2D]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    twice_area.abs() / 2.0
}

/// A closed polygon traced around a connected edge region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    points: Vec<Point2D>,
}

impl Contour {
    pub fn new(points: Vec<Point2D>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Four distinct points describing a candidate document boundary.
///
/// No ordering is implied; see [`OrderedRectangle`] for labelled corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    points: [Point2D; 4],
}

impl Quadrilateral {
    /// Build a quadrilateral, rejecting repeated points.
    pub fn new(points: [Point2D; 4]) -> Result<Self> {
        for i in 0..4 {
            for j in (i + 1)..4 {
                if points[i].distance(&points[j]) < f64::EPSILON {
                    return Err(DocscanError::DegenerateCorners(format!(
                        "corner {} repeats corner {}",
                        points[j], points[i]
                    )));
                }
            }
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Point2D; 4] {
        &self.points
    }

    /// Scale every point by `factor` (working resolution → original).
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            points: self.points.map(|p| p.scaled(factor)),
        }
    }

    /// Area in the stored point order.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }
}

/// A quadrilateral with labelled corners.
///
/// Created by a corner-ordering strategy and consumed by the rectifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderedRectangle {
    top_left: Point2D,
    top_right: Point2D,
    bottom_right: Point2D,
    bottom_left: Point2D,
}

impl OrderedRectangle {
    pub fn new(
        top_left: Point2D,
        top_right: Point2D,
        bottom_right: Point2D,
        bottom_left: Point2D,
    ) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub fn top_left(&self) -> Point2D {
        self.top_left
    }

    pub fn top_right(&self) -> Point2D {
        self.top_right
    }

    pub fn bottom_right(&self) -> Point2D {
        self.bottom_right
    }

    pub fn bottom_left(&self) -> Point2D {
        self.bottom_left
    }

    /// Corners as `[top_left, top_right, bottom_right, bottom_left]`.
    pub fn corners(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    pub fn top_width(&self) -> f64 {
        self.top_left.distance(&self.top_right)
    }

    pub fn bottom_width(&self) -> f64 {
        self.bottom_left.distance(&self.bottom_right)
    }

    pub fn left_height(&self) -> f64 {
        self.top_left.distance(&self.bottom_left)
    }

    pub fn right_height(&self) -> f64 {
        self.top_right.distance(&self.bottom_right)
    }

    /// Output size of the rectified view: the longer of each pair of
    /// opposite edges, rounded, never below one pixel.
    pub fn target_size(&self) -> (u32, u32) {
        let width = self.top_width().max(self.bottom_width()).round().max(1.0);
        let height = self.left_height().max(self.right_height()).round().max(1.0);
        (width as u32, height as u32)
    }
}

/// Where the boundary used for rectification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundarySource {
    /// Found automatically in the edge map.
    Detected,
    /// Supplied by the corner corrector after detection failed.
    Corrected,
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Parse a paper name such as `a4` or `letter`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a4" => Some(Self::A4),
            "a3" => Some(Self::A3),
            "a5" => Some(Self::A5),
            "letter" => Some(Self::Letter),
            "legal" => Some(Self::Legal),
            _ => None,
        }
    }
}
