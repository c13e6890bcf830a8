// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parsing of typed corner coordinates.

use docscan_core::Point2D;
use docscan_core::error::DocscanError;
use docscan_document::{CornerSet, CornerSetBuilder};

/// Parse a single `x,y` pair. Surrounding whitespace is ignored.
pub fn parse_point(text: &str) -> Result<Point2D, DocscanError> {
    let invalid = || DocscanError::DegenerateCorners(format!("expected x,y but got {text:?}"));

    let (x, y) = text.trim().split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(Point2D::new(x, y))
}

/// Parse four whitespace-separated `x,y` pairs, e.g. `"10,10 90,12 88,95 8,90"`.
pub fn parse_corner_list(text: &str) -> Result<CornerSet, DocscanError> {
    let mut builder = CornerSetBuilder::new();
    for token in text.split_whitespace() {
        builder.push(parse_point(token)?)?;
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_with_spaces() {
        assert_eq!(parse_point(" 12.5 , 40 ").unwrap(), Point2D::new(12.5, 40.0));
    }

    #[test]
    fn rejects_malformed_points() {
        for bad in ["", "12", "a,b", "1,2,3", "inf,4"] {
            assert!(parse_point(bad).is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn parses_four_corners() {
        let set = parse_corner_list("10,10 90,12 88,95 8,90").unwrap();
        assert_eq!(set.points()[2], Point2D::new(88.0, 95.0));
    }

    #[test]
    fn wrong_corner_count_is_rejected() {
        assert!(parse_corner_list("10,10 90,12 88,95").is_err());
        assert!(parse_corner_list("10,10 90,12 88,95 8,90 50,50").is_err());
    }
}
