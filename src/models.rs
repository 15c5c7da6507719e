//! Data models for the performance grader.
//!
//! This module contains the raw audit data consumed from the upstream API
//! and the report view model produced by the aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One row of the upstream resource summary (already grouped by type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummaryItem {
    /// Resource category (script, image, stylesheet, document, ...).
    pub resource_type: String,
    /// Number of requests of this type.
    pub request_count: u64,
    /// Bytes transferred for this type.
    pub transfer_size_bytes: u64,
}

/// A single network request recorded during the audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRequest {
    /// Full request URL.
    pub url: String,
    /// Resource category of the request.
    pub resource_type: String,
    /// Bytes transferred over the network.
    pub transfer_size_bytes: u64,
}

/// The subset of an audit payload the aggregator consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAuditResult {
    /// The page that was analyzed.
    pub analyzed_url: String,
    /// When the payload was received.
    pub fetched_at: DateTime<Utc>,
    /// Performance score in `[0, 1]`.
    pub performance_score: f64,
    /// Human-formatted page weight, as provided upstream.
    pub page_size_display: String,
    /// Human-formatted load time, as provided upstream.
    pub load_time_display: String,
    /// Per-type summary, in upstream order.
    pub resource_summary_items: Vec<ResourceSummaryItem>,
    /// Every recorded network request, in upstream order.
    pub network_requests: Vec<NetworkRequest>,
}

/// Content size and request count for one resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTypeRow {
    pub resource_type: String,
    pub request_count: u64,
    pub size_bytes: u64,
}

/// Total transfer size attributed to one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSize {
    pub domain: String,
    pub size_bytes: u64,
}

/// Number of requests sent to one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRequests {
    pub domain: String,
    pub count: usize,
}

/// The dashboard view model for one completed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// The page that was analyzed.
    pub analyzed_url: String,
    /// When the audit payload was received.
    pub fetched_at: DateTime<Utc>,
    /// Performance score in `[0, 1]`.
    pub performance_score: f64,
    /// Page weight display value (pass-through).
    pub page_size: String,
    /// Load time display value (pass-through).
    pub load_time: String,
    /// Number of network requests made by the page.
    pub http_request_count: usize,
    /// Content size by resource type, in upstream order.
    pub size_by_resource_type: Vec<ResourceTypeRow>,
    /// Content size by domain, in first-seen order.
    pub size_by_domain: Vec<DomainSize>,
    /// Request count by domain, same order as `size_by_domain`.
    pub requests_by_domain: Vec<DomainRequests>,
}

impl PerformanceReport {
    /// Letter grade for the report's performance score.
    pub fn grade(&self) -> Grade {
        crate::analysis::grade(self.performance_score)
    }
}

/// Letter grade derived from a performance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Donut stroke colour for this grade.
    pub fn color(&self, theme: Theme) -> &'static str {
        let palette: [&str; 6] = match theme {
            Theme::Light => [
                "#10B981", "#84cc16", "#facc15", "#f87171", "#ef4444", "#b91c1c",
            ],
            Theme::Dark => [
                "#22c55e", "#a3e635", "#fde047", "#fb7185", "#f87171", "#dc2626",
            ],
        };
        palette[*self as usize]
    }

    /// Returns an emoji representation of the grade.
    pub fn emoji(&self) -> &'static str {
        match self {
            Grade::A => "🟢",
            Grade::B | Grade::C => "🟡",
            Grade::D | Grade::E => "🟠",
            Grade::F => "🔴",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

/// Colour theme for rendered dashboards.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (default)
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}
