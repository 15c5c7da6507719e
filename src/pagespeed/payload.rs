//! PageSpeed Insights response decoding.
//!
//! Only the Lighthouse fields the aggregator consumes are modelled; serde
//! ignores everything else in the (large) response document.

use super::error::FetchError;
use crate::models::{NetworkRequest, RawAuditResult, ResourceSummaryItem};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageSpeedResponse {
    lighthouse_result: LighthouseResult,
}

#[derive(Debug, Deserialize)]
struct LighthouseResult {
    categories: Categories,
    audits: Audits,
}

#[derive(Debug, Deserialize)]
struct Categories {
    performance: CategoryScore,
}

#[derive(Debug, Deserialize)]
struct CategoryScore {
    score: f64,
}

#[derive(Debug, Deserialize)]
struct Audits {
    #[serde(rename = "total-byte-weight")]
    total_byte_weight: DisplayAudit,
    interactive: DisplayAudit,
    #[serde(rename = "network-requests")]
    network_requests: ItemsAudit<NetworkRequestItem>,
    #[serde(rename = "resource-summary")]
    resource_summary: ItemsAudit<ResourceSummaryEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisplayAudit {
    display_value: String,
}

#[derive(Debug, Deserialize)]
struct ItemsAudit<T> {
    details: Details<T>,
}

#[derive(Debug, Deserialize)]
struct Details<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NetworkRequestItem {
    url: String,
    #[serde(default = "default_resource_type")]
    resource_type: String,
    #[serde(default, deserialize_with = "byte_count")]
    transfer_size: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceSummaryEntry {
    resource_type: String,
    request_count: u64,
    #[serde(deserialize_with = "byte_count")]
    transfer_size: u64,
}

fn default_resource_type() -> String {
    "Other".to_string()
}

/// Lighthouse reports sizes as JSON numbers that are occasionally fractional or null.
fn byte_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.map(|v| v.max(0.0).round() as u64).unwrap_or(0))
}

/// Decode a PageSpeed response body into the aggregator's input.
pub fn parse_payload(
    body: &str,
    analyzed_url: &str,
    fetched_at: DateTime<Utc>,
) -> Result<RawAuditResult, FetchError> {
    let response: PageSpeedResponse = serde_json::from_str(body)?;
    let lighthouse = response.lighthouse_result;
    let audits = lighthouse.audits;

    let network_requests = audits
        .network_requests
        .details
        .items
        .into_iter()
        .map(|item| NetworkRequest {
            url: item.url,
            resource_type: item.resource_type,
            transfer_size_bytes: item.transfer_size,
        })
        .collect();

    let resource_summary_items = audits
        .resource_summary
        .details
        .items
        .into_iter()
        .map(|item| ResourceSummaryItem {
            resource_type: item.resource_type,
            request_count: item.request_count,
            transfer_size_bytes: item.transfer_size,
        })
        .collect();

    Ok(RawAuditResult {
        analyzed_url: analyzed_url.to_string(),
        fetched_at,
        performance_score: lighthouse.categories.performance.score,
        page_size_display: audits.total_byte_weight.display_value,
        load_time_display: audits.interactive.display_value,
        resource_summary_items,
        network_requests,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../fixtures/pagespeed_response.json");

    #[test]
    fn test_parse_fixture() {
        let raw = parse_payload(FIXTURE, "https://www.example.com", Utc::now()).unwrap();

        assert_eq!(raw.analyzed_url, "https://www.example.com");
        assert_eq!(raw.performance_score, 0.87);
        assert_eq!(raw.page_size_display, "Total size was 1,234 KiB");
        assert_eq!(raw.load_time_display, "3.1 s");
        assert_eq!(raw.network_requests.len(), 5);
        assert_eq!(raw.resource_summary_items.len(), 4);

        assert_eq!(raw.network_requests[0].url, "https://www.example.com/");
        assert_eq!(raw.network_requests[0].resource_type, "Document");
        assert_eq!(raw.network_requests[0].transfer_size_bytes, 15320);

        assert_eq!(raw.resource_summary_items[1].resource_type, "script");
        assert_eq!(raw.resource_summary_items[1].request_count, 2);
        assert_eq!(raw.resource_summary_items[1].transfer_size_bytes, 412_000);
    }

    #[test]
    fn test_parse_fixture_defaults_missing_request_fields() {
        let raw = parse_payload(FIXTURE, "https://www.example.com", Utc::now()).unwrap();

        // The data: URI entry carries no resourceType and a null transferSize
        let inline = &raw.network_requests[4];
        assert!(inline.url.starts_with("data:"));
        assert_eq!(inline.resource_type, "Other");
        assert_eq!(inline.transfer_size_bytes, 0);
    }

    #[test]
    fn test_parse_rounds_fractional_sizes() {
        let raw = parse_payload(FIXTURE, "https://www.example.com", Utc::now()).unwrap();
        // 2048.6 in the fixture
        assert_eq!(raw.network_requests[3].transfer_size_bytes, 2049);
    }

    #[test]
    fn test_parse_missing_audit_is_malformed() {
        let body = r#"{"lighthouseResult": {"categories": {"performance": {"score": 0.5}}, "audits": {}}}"#;
        let err = parse_payload(body, "https://example.com", Utc::now()).unwrap_err();

        assert!(matches!(err, FetchError::MalformedPayload(_)));
        assert!(err.to_string().contains("total-byte-weight"));
    }

    #[test]
    fn test_parse_null_score_is_malformed() {
        let body = FIXTURE.replace("\"score\": 0.87", "\"score\": null");
        let err = parse_payload(&body, "https://example.com", Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }

    #[test]
    fn test_parse_not_json() {
        let err = parse_payload("<html>oops</html>", "https://example.com", Utc::now()).unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }
}
