//! PageSpeed Insights HTTP client.
//!
//! One `GET` per analysis: the target URL and optional API key go in the
//! query string, the body is decoded with [`parse_payload`].

use super::error::FetchError;
use super::payload::parse_payload;
use crate::models::RawAuditResult;
use chrono::Utc;
use futures::future::BoxFuture;
use std::time::Duration;
use tracing::{debug, info};

/// Default PageSpeed Insights v5 endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";

/// Anything that can produce an audit payload for a URL.
pub trait AuditSource {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<RawAuditResult, FetchError>>;
}

/// Configuration for the PageSpeed client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// No timeout when `None`: a hung request stays in flight.
    pub timeout_seconds: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout_seconds: None,
        }
    }
}

/// Client for the PageSpeed Insights `runPagespeed` endpoint.
pub struct PageSpeedClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl PageSpeedClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http_client = builder
            .build()
            .map_err(|e| FetchError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Query parameters for analyzing `url`.
    fn query_params<'a>(&'a self, url: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("url", url)];
        if let Some(ref key) = self.config.api_key {
            params.push(("key", key.as_str()));
        }
        params
    }

    /// Run one analysis and decode the payload.
    pub async fn run_pagespeed(&self, url: &str) -> Result<RawAuditResult, FetchError> {
        info!("Requesting PageSpeed analysis for {}", url);
        debug!(
            "Endpoint: {} (api key {})",
            self.config.endpoint,
            if self.config.api_key.is_some() {
                "set"
            } else {
                "not set"
            }
        );

        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&self.query_params(url))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::Transport(format!(
                        "Request timed out after {}s",
                        self.config.timeout_seconds.unwrap_or_default()
                    ))
                } else {
                    // The request URL carries the API key.
                    FetchError::Transport(e.without_url().to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!("PageSpeed API answered {}", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.without_url().to_string()))?;
        debug!("Received {} byte payload", body.len());

        parse_payload(&body, url, Utc::now())
    }
}

impl AuditSource for PageSpeedClient {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<RawAuditResult, FetchError>> {
        Box::pin(self.run_pagespeed(url))
    }
}
