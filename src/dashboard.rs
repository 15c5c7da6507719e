//! Analysis lifecycle.
//!
//! A [`Dashboard`] runs one analysis at a time through
//! `idle -> loading -> success | error`. Every failure, whatever its source,
//! ends up as a message string in the `Error` state.

use crate::analysis::aggregate;
use crate::models::{PerformanceReport, RawAuditResult};
use crate::pagespeed::{AuditSource, FetchError};
use tracing::{debug, info, warn};

/// Where the dashboard is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Idle,
    Loading,
    Success,
    Error(String),
}

/// Drives fetch -> aggregate for one URL at a time.
pub struct Dashboard<S> {
    source: S,
    status: Status,
    report: Option<PerformanceReport>,
}

impl<S: AuditSource> Dashboard<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            status: Status::Idle,
            report: None,
        }
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// The most recent successful report.
    ///
    /// A failed analysis leaves the previous report in place.
    pub fn report(&self) -> Option<&PerformanceReport> {
        self.report.as_ref()
    }

    /// Error message, when the last analysis failed.
    pub fn error(&self) -> Option<&str> {
        match self.status {
            Status::Error(ref message) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Analyze `input`. Blank input is ignored.
    pub async fn submit(&mut self, input: &str) -> &Status {
        let url = input.trim();
        if url.is_empty() {
            debug!("Ignoring blank URL submission");
            return &self.status;
        }

        self.begin(url);
        let result = self.source.fetch(url).await;
        self.settle(result);

        &self.status
    }

    fn begin(&mut self, url: &str) {
        info!("Analyzing {}", url);
        self.status = Status::Loading;
    }

    fn settle(&mut self, result: Result<RawAuditResult, FetchError>) {
        match result {
            Ok(raw) => {
                let report = aggregate(raw);
                info!(
                    "Analysis complete: grade {}, {} requests across {} domains",
                    report.grade(),
                    report.http_request_count,
                    report.size_by_domain.len()
                );
                self.report = Some(report);
                self.status = Status::Success;
            }
            Err(e) => {
                let message = error_message(&e);
                warn!("Analysis failed: {}", message);
                self.status = Status::Error(message);
            }
        }
    }
}

/// User-facing message for an error, with a fallback for empty messages.
pub fn error_message(err: &dyn std::error::Error) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}
