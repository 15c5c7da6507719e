//! Audit aggregation and statistics.
//!
//! This module turns a raw audit payload into the dashboard's
//! `PerformanceReport`, and provides the pure display helpers (grade,
//! percentage, byte formatting) the renderers share.

use crate::models::{
    DomainRequests, DomainSize, Grade, NetworkRequest, PerformanceReport, RawAuditResult,
    ResourceTypeRow,
};
use reqwest::Url;
use std::collections::HashMap;

const BYTE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Build the report view model from a raw audit payload.
///
/// Total over well-formed input: there is no failure path.
pub fn aggregate(raw: RawAuditResult) -> PerformanceReport {
    let (size_by_domain, requests_by_domain) = group_by_domain(&raw.network_requests);

    let size_by_resource_type = raw
        .resource_summary_items
        .into_iter()
        .map(|item| ResourceTypeRow {
            resource_type: item.resource_type,
            request_count: item.request_count,
            size_bytes: item.transfer_size_bytes,
        })
        .collect();

    PerformanceReport {
        analyzed_url: raw.analyzed_url,
        fetched_at: raw.fetched_at,
        performance_score: raw.performance_score,
        page_size: raw.page_size_display,
        load_time: raw.load_time_display,
        http_request_count: raw.network_requests.len(),
        size_by_resource_type,
        size_by_domain,
        requests_by_domain,
    }
}

/// Extract the domain of a request URL.
///
/// The hostname loses a leading `www.`; a string that does not parse as a
/// URL is returned unchanged.
pub fn domain_of(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let host = parsed.host_str().unwrap_or("");
            host.strip_prefix("www.").unwrap_or(host).to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Group requests by domain, summing sizes and counting requests.
///
/// Both lists share one key set, ordered by first appearance.
pub fn group_by_domain(requests: &[NetworkRequest]) -> (Vec<DomainSize>, Vec<DomainRequests>) {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut sizes: Vec<DomainSize> = Vec::new();
    let mut counts: Vec<DomainRequests> = Vec::new();

    for request in requests {
        let domain = domain_of(&request.url);

        let slot = match index.get(&domain) {
            Some(&slot) => slot,
            None => {
                let slot = sizes.len();
                index.insert(domain.clone(), slot);
                sizes.push(DomainSize {
                    domain: domain.clone(),
                    size_bytes: 0,
                });
                counts.push(DomainRequests { domain, count: 0 });
                slot
            }
        };

        sizes[slot].size_bytes += request.transfer_size_bytes;
        counts[slot].count += 1;
    }

    (sizes, counts)
}

/// Share of the total content size taken by `row`, as a rounded percentage.
///
/// A zero total is treated as 1, so every row reads 0%.
pub fn percent_of_total(row: &ResourceTypeRow, all_rows: &[ResourceTypeRow]) -> u32 {
    let total: u64 = all_rows.iter().map(|r| r.size_bytes).sum();
    let total = if total == 0 { 1 } else { total };

    ((row.size_bytes as f64 / total as f64) * 100.0).round() as u32
}

/// Letter grade for a performance score. Each band includes its lower bound.
pub fn grade(score: f64) -> Grade {
    if score >= 0.9 {
        Grade::A
    } else if score >= 0.8 {
        Grade::B
    } else if score >= 0.7 {
        Grade::C
    } else if score >= 0.6 {
        Grade::D
    } else if score >= 0.5 {
        Grade::E
    } else {
        Grade::F
    }
}

/// Format a byte count with the largest base-1024 unit that keeps the value >= 1.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < BYTE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, BYTE_UNITS[unit])
}

/// Pair each domain's size with its request count.
///
/// `group_by_domain` emits both lists over the same keys in the same
/// order, so row `i` of one matches row `i` of the other.
pub fn domain_rows<'a>(
    sizes: &'a [DomainSize],
    requests: &'a [DomainRequests],
) -> impl Iterator<Item = (&'a DomainSize, usize)> + 'a {
    sizes.iter().zip(requests.iter().map(|r| r.count))
}

/// Domains ordered by transferred size (largest first), with request counts.
pub fn heaviest_domains<'a>(
    sizes: &'a [DomainSize],
    requests: &'a [DomainRequests],
    n: usize,
) -> Vec<(&'a DomainSize, usize)> {
    let mut sorted: Vec<(&DomainSize, usize)> = domain_rows(sizes, requests).collect();
    sorted.sort_by_key(|(d, _)| std::cmp::Reverse(d.size_bytes));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceSummaryItem;
    use chrono::Utc;

    fn request(url: &str, size: u64) -> NetworkRequest {
        NetworkRequest {
            url: url.to_string(),
            resource_type: "script".to_string(),
            transfer_size_bytes: size,
        }
    }

    fn row(resource_type: &str, size: u64) -> ResourceTypeRow {
        ResourceTypeRow {
            resource_type: resource_type.to_string(),
            request_count: 1,
            size_bytes: size,
        }
    }

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade(0.95), Grade::A);
        assert_eq!(grade(0.85), Grade::B);
        assert_eq!(grade(0.75), Grade::C);
        assert_eq!(grade(0.65), Grade::D);
        assert_eq!(grade(0.55), Grade::E);
        assert_eq!(grade(0.10), Grade::F);
    }

    #[test]
    fn test_grade_boundaries_take_higher_band() {
        assert_eq!(grade(0.90), Grade::A);
        assert_eq!(grade(0.80), Grade::B);
        assert_eq!(grade(0.70), Grade::C);
        assert_eq!(grade(0.60), Grade::D);
        assert_eq!(grade(0.50), Grade::E);
        assert_eq!(grade(0.0), Grade::F);
        assert_eq!(grade(1.0), Grade::A);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(500), "500 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_073_741_824), "1 GB");
    }

    #[test]
    fn test_format_bytes_rounds_to_two_decimals() {
        // 1234 / 1024 = 1.205078...
        assert_eq!(format_bytes(1234), "1.21 KB");
    }

    #[test]
    fn test_format_bytes_caps_at_gigabytes() {
        assert_eq!(format_bytes(2 * 1024 * 1_073_741_824), "2048 GB");
    }

    #[test]
    fn test_domain_of_strips_www() {
        assert_eq!(domain_of("https://www.example.com/a"), "example.com");
        assert_eq!(domain_of("https://example.com/b"), "example.com");
        assert_eq!(domain_of("https://cdn.example.com/c.js"), "cdn.example.com");
    }

    #[test]
    fn test_domain_of_only_strips_leading_www() {
        assert_eq!(domain_of("https://assets.www.example.com/"), "assets.www.example.com");
    }

    #[test]
    fn test_domain_of_malformed_url_falls_back() {
        assert_eq!(domain_of("not-a-url"), "not-a-url");
    }

    #[test]
    fn test_domain_of_hostless_url() {
        assert_eq!(domain_of("data:image/png;base64,AAAA"), "");
    }

    #[test]
    fn test_group_by_domain_merges_www() {
        let requests = vec![
            request("https://www.example.com/a", 500),
            request("https://example.com/b", 300),
            request("https://other.com/c", 200),
        ];

        let (sizes, counts) = group_by_domain(&requests);

        assert_eq!(
            sizes,
            vec![
                DomainSize {
                    domain: "example.com".to_string(),
                    size_bytes: 800
                },
                DomainSize {
                    domain: "other.com".to_string(),
                    size_bytes: 200
                },
            ]
        );
        assert_eq!(
            counts,
            vec![
                DomainRequests {
                    domain: "example.com".to_string(),
                    count: 2
                },
                DomainRequests {
                    domain: "other.com".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_group_by_domain_first_seen_order() {
        let requests = vec![
            request("https://zeta.com/", 1),
            request("https://alpha.com/", 1),
            request("https://zeta.com/2", 1),
            request("https://mid.com/", 1),
        ];

        let (sizes, counts) = group_by_domain(&requests);
        let order: Vec<&str> = sizes.iter().map(|d| d.domain.as_str()).collect();

        assert_eq!(order, vec!["zeta.com", "alpha.com", "mid.com"]);
        let count_order: Vec<&str> = counts.iter().map(|d| d.domain.as_str()).collect();
        assert_eq!(order, count_order);
    }

    #[test]
    fn test_group_by_domain_conserves_totals() {
        let requests = vec![
            request("https://www.a.com/1", 10),
            request("https://b.com/1", 0),
            request("not-a-url", 7),
            request("https://a.com/2", 33),
            request("https://c.org/x?y=1", 1024),
            request("not-a-url", 3),
        ];

        let (sizes, counts) = group_by_domain(&requests);

        let total_size: u64 = sizes.iter().map(|d| d.size_bytes).sum();
        let expected_size: u64 = requests.iter().map(|r| r.transfer_size_bytes).sum();
        assert_eq!(total_size, expected_size);

        let total_count: usize = counts.iter().map(|d| d.count).sum();
        assert_eq!(total_count, requests.len());
    }

    #[test]
    fn test_group_by_domain_keeps_malformed_urls() {
        let requests = vec![request("not-a-url", 42)];
        let (sizes, counts) = group_by_domain(&requests);

        assert_eq!(sizes[0].domain, "not-a-url");
        assert_eq!(sizes[0].size_bytes, 42);
        assert_eq!(counts[0].count, 1);
    }

    #[test]
    fn test_group_by_domain_empty() {
        let (sizes, counts) = group_by_domain(&[]);
        assert!(sizes.is_empty());
        assert!(counts.is_empty());
    }

    #[test]
    fn test_percent_of_total() {
        let rows = vec![row("script", 300), row("image", 100)];
        assert_eq!(percent_of_total(&rows[0], &rows), 75);
        assert_eq!(percent_of_total(&rows[1], &rows), 25);
    }

    #[test]
    fn test_percent_of_total_rounds() {
        let rows = vec![row("a", 1), row("b", 1), row("c", 1)];
        assert_eq!(percent_of_total(&rows[0], &rows), 33);

        let rows = vec![row("a", 1), row("b", 199)];
        // 0.5% rounds up
        assert_eq!(percent_of_total(&rows[0], &rows), 1);
    }

    #[test]
    fn test_percent_of_total_zero_total() {
        let rows = vec![row("script", 0), row("image", 0)];
        for r in &rows {
            assert_eq!(percent_of_total(r, &rows), 0);
        }
    }

    #[test]
    fn test_heaviest_domains() {
        let sizes = vec![
            DomainSize {
                domain: "small.com".to_string(),
                size_bytes: 10,
            },
            DomainSize {
                domain: "big.com".to_string(),
                size_bytes: 1000,
            },
            DomainSize {
                domain: "mid.com".to_string(),
                size_bytes: 100,
            },
        ];

        let requests = vec![
            DomainRequests {
                domain: "small.com".to_string(),
                count: 1,
            },
            DomainRequests {
                domain: "big.com".to_string(),
                count: 7,
            },
            DomainRequests {
                domain: "mid.com".to_string(),
                count: 3,
            },
        ];

        let top = heaviest_domains(&sizes, &requests, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.domain, "big.com");
        assert_eq!(top[0].1, 7);
        assert_eq!(top[1].0.domain, "mid.com");
        assert_eq!(top[1].1, 3);
    }

    #[test]
    fn test_domain_rows_follow_grouping_order() {
        let requests = vec![
            request("https://a.com/1", 10),
            request("https://b.com/1", 20),
            request("https://a.com/2", 5),
            request("data:image/png;base64,AAAA", 0),
        ];
        let (sizes, counts) = group_by_domain(&requests);

        let rows: Vec<(&str, u64, usize)> = domain_rows(&sizes, &counts)
            .map(|(d, count)| (d.domain.as_str(), d.size_bytes, count))
            .collect();
        assert_eq!(rows, vec![("a.com", 15, 2), ("b.com", 20, 1), ("", 0, 1)]);
    }

    #[test]
    fn test_aggregate_end_to_end() {
        let raw = RawAuditResult {
            analyzed_url: "https://www.test.com".to_string(),
            fetched_at: Utc::now(),
            performance_score: 0.92,
            page_size_display: "1.2 MB".to_string(),
            load_time_display: "3.1 s".to_string(),
            resource_summary_items: vec![ResourceSummaryItem {
                resource_type: "script".to_string(),
                request_count: 2,
                transfer_size_bytes: 300,
            }],
            network_requests: vec![
                request("https://www.test.com/app.js", 100),
                request("https://www.test.com/vendor.js", 200),
            ],
        };

        let report = aggregate(raw);

        assert_eq!(report.grade(), Grade::A);
        assert_eq!(report.page_size, "1.2 MB");
        assert_eq!(report.load_time, "3.1 s");
        assert_eq!(report.http_request_count, 2);
        assert_eq!(
            report.size_by_domain,
            vec![DomainSize {
                domain: "test.com".to_string(),
                size_bytes: 300
            }]
        );
        assert_eq!(
            report.requests_by_domain,
            vec![DomainRequests {
                domain: "test.com".to_string(),
                count: 2
            }]
        );
        assert_eq!(
            report.size_by_resource_type,
            vec![ResourceTypeRow {
                resource_type: "script".to_string(),
                request_count: 2,
                size_bytes: 300
            }]
        );
        assert_eq!(
            percent_of_total(
                &report.size_by_resource_type[0],
                &report.size_by_resource_type
            ),
            100
        );
    }

    #[test]
    fn test_aggregate_preserves_resource_type_order() {
        let raw = RawAuditResult {
            analyzed_url: "https://example.com".to_string(),
            fetched_at: Utc::now(),
            performance_score: 0.4,
            page_size_display: "10 KiB".to_string(),
            load_time_display: "0.8 s".to_string(),
            resource_summary_items: ["total", "script", "image", "other"]
                .iter()
                .map(|t| ResourceSummaryItem {
                    resource_type: t.to_string(),
                    request_count: 0,
                    transfer_size_bytes: 0,
                })
                .collect(),
            network_requests: vec![],
        };

        let report = aggregate(raw);
        let types: Vec<&str> = report
            .size_by_resource_type
            .iter()
            .map(|r| r.resource_type.as_str())
            .collect();

        assert_eq!(types, vec!["total", "script", "image", "other"]);
        assert_eq!(report.http_request_count, 0);
        assert!(report.size_by_domain.is_empty());
        assert_eq!(report.grade(), Grade::F);
    }
}
