//! Text, Markdown and JSON report generation.
//!
//! This module renders a `PerformanceReport` in the formats that do not
//! need styling: a terminal summary, a Markdown report and raw JSON.

use crate::analysis::{domain_rows, format_bytes, heaviest_domains, percent_of_total};
use crate::models::{DomainRequests, DomainSize, PerformanceReport, ResourceTypeRow};
use anyhow::Result;

const BAR_WIDTH: usize = 20;

/// Options shared by all renderers.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Render the per-domain tables.
    pub include_domains: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_domains: true,
        }
    }
}

/// Generate a plain-text summary for the terminal.
pub fn generate_text_report(report: &PerformanceReport, options: RenderOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Performance report for {}\n\n", report.analyzed_url));
    output.push_str(&format!(
        "  {} Performance Grade: {}\n",
        report.grade().emoji(),
        report.grade()
    ));
    output.push_str(&format!("  Page Size:     {}\n", report.page_size));
    output.push_str(&format!("  Load Time:     {}\n", report.load_time));
    output.push_str(&format!("  HTTP Requests: {}\n\n", report.http_request_count));

    output.push_str("Content Size by Type\n");
    let type_width = report
        .size_by_resource_type
        .iter()
        .map(|r| r.resource_type.len())
        .max()
        .unwrap_or(0)
        .max("Content Type".len());

    output.push_str(&format!(
        "  {:<width$}  {:>12}  {:>8}  Percentage\n",
        "Content Type",
        "Size",
        "Requests",
        width = type_width
    ));
    for row in &report.size_by_resource_type {
        let percent = percent_of_total(row, &report.size_by_resource_type);
        output.push_str(&format!(
            "  {:<width$}  {:>12}  {:>8}  {} {}%\n",
            row.resource_type.to_uppercase(),
            format_bytes(row.size_bytes),
            row.request_count,
            percent_bar(percent, BAR_WIDTH),
            percent,
            width = type_width
        ));
    }

    if options.include_domains && !report.size_by_domain.is_empty() {
        output.push_str("\nHeaviest Domains\n");
        for (domain, count) in
            heaviest_domains(&report.size_by_domain, &report.requests_by_domain, 5)
        {
            output.push_str(&format!(
                "  {:<40}  {:>12}  {} requests\n",
                display_domain(&domain.domain),
                format_bytes(domain.size_bytes),
                count
            ));
        }
    }

    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &PerformanceReport, options: RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("# PageGrade Report\n\n");
    output.push_str(&generate_metadata_section(report));
    output.push_str(&generate_metrics_section(report));
    output.push_str(&generate_type_section(&report.size_by_resource_type));

    if options.include_domains {
        output.push_str(&generate_domain_section(
            &report.size_by_domain,
            &report.requests_by_domain,
        ));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(report: &PerformanceReport) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **URL:** {}\n", report.analyzed_url));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Performance Score:** {:.0}\n\n",
        report.performance_score * 100.0
    ));

    section
}

/// Generate the headline metric cards as a table.
fn generate_metrics_section(report: &PerformanceReport) -> String {
    let mut section = String::new();

    section.push_str("## Metrics\n\n");
    section.push_str("| Performance Grade | Page Size | Load Time | HTTP Requests |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} **{}** | {} | {} | {} |\n\n",
        report.grade().emoji(),
        report.grade(),
        report.page_size,
        report.load_time,
        report.http_request_count
    ));

    section
}

/// Generate the content-by-type table.
fn generate_type_section(rows: &[ResourceTypeRow]) -> String {
    let mut section = String::new();

    section.push_str("## Content Size by Type\n\n");

    if rows.is_empty() {
        section.push_str("No resource summary was reported.\n\n");
        return section;
    }

    section.push_str("| Content Type | Size | Request Count | Percentage |\n");
    section.push_str("|:---|---:|---:|---:|\n");

    for row in rows {
        let percent = percent_of_total(row, rows);
        section.push_str(&format!(
            "| {} | {} | {} | `{}` {}% |\n",
            row.resource_type.to_uppercase(),
            format_bytes(row.size_bytes),
            row.request_count,
            percent_bar(percent, BAR_WIDTH),
            percent
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-domain table.
fn generate_domain_section(sizes: &[DomainSize], requests: &[DomainRequests]) -> String {
    let mut section = String::new();

    section.push_str("## Content by Domain\n\n");

    if sizes.is_empty() {
        section.push_str("No network requests were recorded.\n\n");
        return section;
    }

    section.push_str("| Domain | Size | Requests |\n");
    section.push_str("|:---|---:|---:|\n");

    for (domain, count) in domain_rows(sizes, requests) {
        section.push_str(&format!(
            "| `{}` | {} | {} |\n",
            display_domain(&domain.domain),
            format_bytes(domain.size_bytes),
            count
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by PageGrade from PageSpeed Insights data*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &PerformanceReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Text progress bar for a percentage.
pub fn percent_bar(percent: u32, width: usize) -> String {
    let percent = percent.min(100) as usize;
    let filled = (percent * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Label for a domain key; requests without a host group under the empty key.
pub(crate) fn display_domain(domain: &str) -> &str {
    if domain.is_empty() {
        "(inline)"
    } else {
        domain
    }
}
