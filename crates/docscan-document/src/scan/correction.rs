// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive corner correction — the fallback used when no document outline
// is detected. A collaborator (terminal, GUI, script) supplies four corners
// through a one-shot request/response channel.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

use docscan_core::error::DocscanError;
use docscan_core::{Point2D, Quadrilateral, polygon_area};
use image::RgbImage;
use tracing::{debug, info, warn};

/// Source of user-supplied corners.
///
/// `preview` is the working-resolution image; returned points must be in its
/// coordinate space.
pub trait CornerCorrector {
    fn request_corners(&self, preview: &RgbImage) -> Result<CornerRequest, DocscanError>;
}

// -- Corner sets --------------------------------------------------------------

/// Four validated corners, in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerSet {
    quad: Quadrilateral,
}

impl CornerSet {
    /// Validate four points.
    ///
    /// Rejects duplicates and any three collinear points, which together
    /// guarantee a non-zero enclosed area.
    pub fn new(points: [Point2D; 4]) -> Result<Self, DocscanError> {
        let quad = Quadrilateral::new(points)?;
        for skip in 0..4 {
            let triple: Vec<Point2D> = (0..4).filter(|&i| i != skip).map(|i| points[i]).collect();
            if polygon_area(&triple) <= COLLINEAR_AREA {
                return Err(DocscanError::DegenerateCorners(format!(
                    "corners {}, {} and {} are collinear",
                    triple[0], triple[1], triple[2]
                )));
            }
        }
        Ok(Self { quad })
    }

    pub fn points(&self) -> &[Point2D; 4] {
        self.quad.points()
    }

    pub fn quadrilateral(&self) -> &Quadrilateral {
        &self.quad
    }
}

/// Triangles smaller than half a square pixel count as collinear.
const COLLINEAR_AREA: f64 = 0.5;

/// Accumulates clicks (or typed points) until four are collected.
#[derive(Debug, Default, Clone)]
pub struct CornerSetBuilder {
    points: Vec<Point2D>,
}

impl CornerSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a corner. A fifth point is rejected and leaves the builder as is.
    pub fn push(&mut self, point: Point2D) -> Result<(), DocscanError> {
        if self.points.len() == 4 {
            return Err(DocscanError::DegenerateCorners(
                "already have four corners".into(),
            ));
        }
        self.points.push(point);
        Ok(())
    }

    /// Drop the most recent corner.
    pub fn undo(&mut self) -> Option<Point2D> {
        self.points.pop()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() == 4
    }

    pub fn build(self) -> Result<CornerSet, DocscanError> {
        let points: [Point2D; 4] = self.points.as_slice().try_into().map_err(|_| {
            DocscanError::DegenerateCorners(format!(
                "need exactly 4 corners, got {}",
                self.points.len()
            ))
        })?;
        CornerSet::new(points)
    }
}

// -- Request / response -------------------------------------------------------

enum Reply {
    Corners(CornerSet),
    Cancelled,
}

/// Pending answer to a corner request.
pub struct CornerRequest {
    rx: Receiver<Reply>,
    tx: Sender<Reply>,
}

/// The collaborator's end of a [`CornerRequest`]. Dropping it without
/// answering cancels the request.
pub struct CornerResponder {
    tx: Sender<Reply>,
}

/// Cancels a [`CornerRequest`] from another thread.
#[derive(Clone)]
pub struct CornerCanceller {
    tx: Sender<Reply>,
}

impl CornerRequest {
    /// Create a linked responder/request pair.
    pub fn channel() -> (CornerResponder, CornerRequest) {
        let (tx, rx) = mpsc::channel();
        let responder = CornerResponder { tx: tx.clone() };
        (responder, CornerRequest { rx, tx })
    }

    /// A request that is already answered.
    pub fn ready(corners: CornerSet) -> Self {
        let (responder, request) = Self::channel();
        responder.submit(corners);
        request
    }

    pub fn canceller(&self) -> CornerCanceller {
        CornerCanceller {
            tx: self.tx.clone(),
        }
    }

    /// Block until corners arrive, the request is cancelled, or `timeout`
    /// elapses. `None` waits indefinitely.
    pub fn wait(self, timeout: Option<Duration>) -> Result<CornerSet, DocscanError> {
        // Keep only the receiver so a dropped responder disconnects the channel
        // once no canceller is alive either.
        let CornerRequest { rx, tx } = self;
        drop(tx);

        let reply = match timeout {
            None => rx.recv().ok(),
            Some(limit) => match rx.recv_timeout(limit) {
                Ok(reply) => Some(reply),
                Err(RecvTimeoutError::Timeout) => {
                    warn!(?limit, "Corner correction timed out");
                    return Err(DocscanError::CorrectionTimedOut(limit));
                }
                Err(RecvTimeoutError::Disconnected) => None,
            },
        };

        match reply {
            Some(Reply::Corners(corners)) => {
                info!(corners = ?corners.points(), "Corrected corners received");
                Ok(corners)
            }
            Some(Reply::Cancelled) | None => {
                debug!("Corner correction cancelled");
                Err(DocscanError::CorrectionCancelled)
            }
        }
    }
}

impl CornerResponder {
    pub fn submit(self, corners: CornerSet) {
        // The request may already be gone; nothing is waiting then.
        let _ = self.tx.send(Reply::Corners(corners));
    }

    pub fn cancel(self) {
        let _ = self.tx.send(Reply::Cancelled);
    }
}

impl CornerCanceller {
    pub fn cancel(&self) {
        let _ = self.tx.send(Reply::Cancelled);
    }
}

// -- Preset corrector ---------------------------------------------------------

/// Answers every request with the same preset corners.
#[derive(Debug, Clone, Copy)]
pub struct FixedCorners {
    corners: CornerSet,
}

impl FixedCorners {
    pub fn new(corners: CornerSet) -> Self {
        Self { corners }
    }
}

impl CornerCorrector for FixedCorners {
    fn request_corners(&self, preview: &RgbImage) -> Result<CornerRequest, DocscanError> {
        debug!(
            width = preview.width(),
            height = preview.height(),
            "Answering corner request with preset corners"
        );
        Ok(CornerRequest::ready(self.corners))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn square() -> [Point2D; 4] {
        [
            Point2D::new(10.0, 10.0),
            Point2D::new(90.0, 10.0),
            Point2D::new(90.0, 90.0),
            Point2D::new(10.0, 90.0),
        ]
    }

    #[test]
    fn builder_collects_four_points() {
        let mut builder = CornerSetBuilder::new();
        for p in square() {
            builder.push(p).unwrap();
        }
        assert!(builder.is_complete());
        let set = builder.build().unwrap();
        assert_eq!(set.points(), &square());
    }

    #[test]
    fn builder_rejects_a_fifth_point() {
        let mut builder = CornerSetBuilder::new();
        for p in square() {
            builder.push(p).unwrap();
        }
        let err = builder.push(Point2D::new(50.0, 50.0)).unwrap_err();
        assert!(matches!(err, DocscanError::DegenerateCorners(_)));
        assert_eq!(builder.len(), 4);
    }

    #[test]
    fn builder_with_three_points_fails_to_build() {
        let mut builder = CornerSetBuilder::new();
        for p in &square()[..3] {
            builder.push(*p).unwrap();
        }
        assert!(matches!(builder.build(), Err(DocscanError::DegenerateCorners(_))));
    }

    #[test]
    fn undo_removes_the_last_point() {
        let mut builder = CornerSetBuilder::new();
        builder.push(Point2D::new(1.0, 2.0)).unwrap();
        assert_eq!(builder.undo(), Some(Point2D::new(1.0, 2.0)));
        assert!(builder.is_empty());
    }

    #[test]
    fn duplicate_corners_are_rejected() {
        let mut pts = square();
        pts[3] = pts[0];
        assert!(matches!(CornerSet::new(pts), Err(DocscanError::DegenerateCorners(_))));
    }

    #[test]
    fn collinear_corners_are_rejected() {
        let pts = [
            Point2D::new(0.0, 0.0),
            Point2D::new(50.0, 0.0),
            Point2D::new(100.0, 0.0),
            Point2D::new(50.0, 80.0),
        ];
        assert!(matches!(CornerSet::new(pts), Err(DocscanError::DegenerateCorners(_))));
    }

    #[test]
    fn corners_in_any_order_are_accepted() {
        let [a, b, c, d] = square();
        assert!(CornerSet::new([c, a, d, b]).is_ok());
    }

    #[test]
    fn submitted_corners_are_received_across_threads() {
        let (responder, request) = CornerRequest::channel();
        let handle = thread::spawn(move || {
            responder.submit(CornerSet::new(square()).unwrap());
        });
        let set = request.wait(Some(Duration::from_secs(5))).unwrap();
        handle.join().unwrap();
        assert_eq!(set.points(), &square());
    }

    #[test]
    fn cancelled_request_reports_cancellation() {
        let (responder, request) = CornerRequest::channel();
        responder.cancel();
        assert!(matches!(
            request.wait(None),
            Err(DocscanError::CorrectionCancelled)
        ));
    }

    #[test]
    fn dropped_responder_cancels() {
        let (responder, request) = CornerRequest::channel();
        drop(responder);
        assert!(matches!(
            request.wait(None),
            Err(DocscanError::CorrectionCancelled)
        ));
    }

    #[test]
    fn canceller_ends_the_wait_from_another_thread() {
        let (_responder, request) = CornerRequest::channel();
        let canceller = request.canceller();
        let handle = thread::spawn(move || canceller.cancel());
        assert!(matches!(
            request.wait(Some(Duration::from_secs(5))),
            Err(DocscanError::CorrectionCancelled)
        ));
        handle.join().unwrap();
    }

    #[test]
    fn silent_responder_times_out() {
        let (_responder, request) = CornerRequest::channel();
        let limit = Duration::from_millis(20);
        match request.wait(Some(limit)) {
            Err(DocscanError::CorrectionTimedOut(d)) => assert_eq!(d, limit),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn fixed_corners_answer_immediately() {
        let corrector = FixedCorners::new(CornerSet::new(square()).unwrap());
        let request = corrector.request_corners(&RgbImage::new(4, 4)).unwrap();
        assert_eq!(request.wait(None).unwrap().points(), &square());
    }
}
