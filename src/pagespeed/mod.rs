//! PageSpeed Insights integration.
//!
//! This module calls the analysis API and decodes its Lighthouse payload
//! into the aggregator's input.

pub mod client;
pub mod error;
pub mod payload;

pub use client::{AuditSource, ClientConfig, PageSpeedClient, DEFAULT_ENDPOINT};
pub use error::FetchError;
