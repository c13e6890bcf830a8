// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the CLI reports it.

use crate::error::DocscanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The user can fix it and run again (better photo, manual corners).
    ActionRequired,
    /// Running again with the same input will fail the same way.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether re-running with different input or options can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\n{}", self.message, self.suggestion)
    }
}

/// Convert a `DocscanError` into a `HumanError`.
pub fn humanize_error(err: &DocscanError) -> HumanError {
    match err {
        DocscanError::InvalidImage(detail) => HumanError {
            message: "This file could not be read as a photo.".into(),
            suggestion: format!("Use a JPEG or PNG image. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocscanError::BoundaryNotFound => HumanError {
            message: "We couldn't find the edges of the document.".into(),
            suggestion: "Photograph the page on a darker, plain surface so all four corners are visible, or pass the corners by hand with --corners.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        DocscanError::CorrectionCancelled => HumanError {
            message: "Corner selection was cancelled.".into(),
            suggestion: "Run the scan again and enter all four corners.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        DocscanError::CorrectionTimedOut(waited) => HumanError {
            message: "No corners were entered in time.".into(),
            suggestion: format!(
                "Waited {}s. Run again, or raise --correction-timeout.",
                waited.as_secs()
            ),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        DocscanError::DegenerateCorners(detail) => HumanError {
            message: "Those corners don't outline a page.".into(),
            suggestion: format!(
                "Give four different points, one per corner, that are not on a single line. ({detail})"
            ),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        DocscanError::Rectification(detail) => HumanError {
            message: "The page could not be straightened.".into(),
            suggestion: format!("Try entering the corners by hand. ({detail})"),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        DocscanError::ImageError(_) => HumanError {
            message: "The scan image could not be written.".into(),
            suggestion: "Check the output file name ends in .png or .jpg and that the folder is writable.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocscanError::PdfError(_) => HumanError {
            message: "The PDF could not be created.".into(),
            suggestion: "Try saving the scan as PNG instead (drop --pdf).".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocscanError::Config(detail) => HumanError {
            message: "The configuration file has an invalid value.".into(),
            suggestion: format!("Fix the setting and try again. ({detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        DocscanError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A file or folder could not be found.".into(),
                    suggestion: "Check the path and try again.".into(),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            } else {
                HumanError {
                    message: "A file could not be read or written.".into(),
                    suggestion: format!("Check permissions and free disk space. ({io_err})"),
                    retriable: false,
                    severity: Severity::Permanent,
                }
            }
        }

        DocscanError::Serialization(_) => HumanError {
            message: "The configuration file is not valid JSON.".into(),
            suggestion: "Check the file for typos such as missing commas or quotes.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn boundary_not_found_is_action_required() {
        let human = humanize_error(&DocscanError::BoundaryNotFound);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(human.retriable);
        assert!(human.suggestion.contains("--corners"));
    }

    #[test]
    fn timeout_mentions_waited_seconds() {
        let human = humanize_error(&DocscanError::CorrectionTimedOut(Duration::from_secs(30)));
        assert!(human.suggestion.contains("30s"));
    }

    #[test]
    fn undecodable_image_is_permanent() {
        let human = humanize_error(&DocscanError::InvalidImage("bad magic".into()));
        assert_eq!(human.severity, Severity::Permanent);
        assert!(!human.retriable);
    }

    #[test]
    fn missing_file_is_reported_as_not_found() {
        let err = DocscanError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        let human = humanize_error(&err);
        assert!(human.message.contains("could not be found"));
    }
}
