//! Self-contained HTML dashboard.
//!
//! Renders the metric cards, the grade donut and the content-by-type table
//! with coloured percentage bars into a single page with inline styles.

use super::generator::{display_domain, RenderOptions};
use crate::analysis::{domain_rows, format_bytes, percent_of_total};
use crate::models::{PerformanceReport, Theme};

struct Palette {
    background: &'static str,
    card: &'static str,
    border: &'static str,
    text: &'static str,
    muted: &'static str,
    track: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: "#f3f4f6",
            card: "#ffffff",
            border: "#e5e7eb",
            text: "#111827",
            muted: "#6b7280",
            track: "#e5e7eb",
        },
        Theme::Dark => Palette {
            background: "#111827",
            card: "#1f2937",
            border: "#374151",
            text: "#F3F4F6",
            muted: "#9ca3af",
            track: "#374151",
        },
    }
}

/// Bar colour for a resource type.
pub fn bar_color(resource_type: &str) -> &'static str {
    match resource_type {
        "image" => "#3b82f6",
        "script" => "#22c55e",
        "stylesheet" => "#a855f7",
        "document" => "#f97316",
        _ => "#6b7280",
    }
}

/// Escape text for inclusion in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Generate the HTML dashboard.
pub fn generate_html_report(
    report: &PerformanceReport,
    theme: Theme,
    options: RenderOptions,
) -> String {
    let colors = palette(theme);
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    page.push_str(&format!(
        "<title>PageGrade - {}</title>\n",
        escape_html(&report.analyzed_url)
    ));
    page.push_str(&format!(
        "<style>\n\
         body {{ margin: 0; font-family: system-ui, sans-serif; background: {bg}; color: {text}; }}\n\
         main {{ max-width: 72rem; margin: 0 auto; padding: 2rem 1rem; }}\n\
         .cards {{ display: grid; grid-template-columns: repeat(auto-fit, minmax(14rem, 1fr)); gap: 1.5rem; }}\n\
         .card {{ background: {card}; border: 1px solid {border}; border-radius: 0.5rem; padding: 1rem; }}\n\
         .value {{ font-size: 1.25rem; font-weight: 700; }}\n\
         .muted {{ color: {muted}; }}\n\
         table {{ width: 100%; border-collapse: separate; border-spacing: 0 0.5rem; }}\n\
         th, td {{ padding: 0.25rem 0.5rem; }}\n\
         th {{ text-transform: uppercase; font-size: 0.8rem; text-align: left; }}\n\
         .num {{ text-align: right; }}\n\
         .track {{ display: inline-block; width: 8rem; height: 0.75rem; background: {track}; border-radius: 9999px; overflow: hidden; vertical-align: middle; }}\n\
         .fill {{ display: block; height: 0.75rem; border-radius: 9999px; }}\n\
         section {{ background: {card}; border: 1px solid {border}; border-radius: 1rem; padding: 1.5rem; margin-top: 2rem; }}\n\
         </style>\n",
        bg = colors.background,
        text = colors.text,
        card = colors.card,
        border = colors.border,
        muted = colors.muted,
        track = colors.track,
    ));
    page.push_str("</head>\n<body>\n<main>\n");
    page.push_str("<h1>Website Performance Analyzer</h1>\n");
    page.push_str(&format!(
        "<p class=\"muted\">{} &middot; {}</p>\n",
        escape_html(&report.analyzed_url),
        report.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    page.push_str("<div class=\"cards\">\n");
    page.push_str(&metric_card(
        &grade_donut(report, theme),
        "Performance Grade",
        "Overall performance score",
    ));
    page.push_str(&metric_card(
        &format!("<span class=\"value\">{}</span>", escape_html(&report.page_size)),
        "Page Size",
        "Total downloaded content",
    ));
    page.push_str(&metric_card(
        &format!("<span class=\"value\">{}</span>", escape_html(&report.load_time)),
        "Load Time",
        "Time to fully load",
    ));
    page.push_str(&metric_card(
        &format!("<span class=\"value\">{}</span>", report.http_request_count),
        "HTTP Requests",
        "Total network requests",
    ));
    page.push_str("</div>\n");

    page.push_str(&type_table(report));
    if options.include_domains {
        page.push_str(&domain_table(report));
    }

    page.push_str("</main>\n</body>\n</html>\n");
    page
}

fn metric_card(value: &str, title: &str, description: &str) -> String {
    format!(
        "<div class=\"card\">\n<div>{}</div>\n<p><strong>{}</strong></p>\n<p class=\"muted\">{}</p>\n</div>\n",
        value, title, description
    )
}

/// Donut ring around the grade letter, stroked with the grade colour.
fn grade_donut(report: &PerformanceReport, theme: Theme) -> String {
    let grade = report.grade();
    let colors = palette(theme);
    let circumference = 2.0 * std::f64::consts::PI * 16.0;

    format!(
        "<svg width=\"64\" height=\"64\" viewBox=\"0 0 36 36\">\
         <circle cx=\"18\" cy=\"18\" r=\"16\" fill=\"none\" stroke=\"{track}\" stroke-width=\"3\"/>\
         <circle cx=\"18\" cy=\"18\" r=\"16\" fill=\"none\" stroke=\"{stroke}\" stroke-width=\"3\" \
         stroke-dasharray=\"{circumference:.2}\" stroke-linecap=\"round\" transform=\"rotate(-90 18 18)\"/>\
         <text x=\"18\" y=\"22\" text-anchor=\"middle\" font-size=\"12\" font-weight=\"bold\" fill=\"{text}\">{grade}</text>\
         </svg>",
        track = colors.track,
        stroke = grade.color(theme),
        circumference = circumference,
        text = colors.text,
        grade = grade,
    )
}

fn type_table(report: &PerformanceReport) -> String {
    let mut section = String::new();
    let rows = &report.size_by_resource_type;

    section.push_str("<section>\n<h2>Content Size by Type</h2>\n<table>\n");
    section.push_str(
        "<thead><tr><th>Content Type</th><th class=\"num\">Size</th>\
         <th class=\"num\">Request Count</th><th class=\"num\">Percentage</th></tr></thead>\n<tbody>\n",
    );

    for row in rows {
        let percent = percent_of_total(row, rows);
        section.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td>\
             <td class=\"num\"><span class=\"track\"><span class=\"fill\" style=\"width: {}%; background: {};\"></span></span> {}%</td></tr>\n",
            escape_html(&row.resource_type.to_uppercase()),
            format_bytes(row.size_bytes),
            row.request_count,
            percent,
            bar_color(&row.resource_type),
            percent
        ));
    }

    section.push_str("</tbody>\n</table>\n</section>\n");
    section
}

fn domain_table(report: &PerformanceReport) -> String {
    let mut section = String::new();

    section.push_str("<section>\n<h2>Content by Domain</h2>\n<table>\n");
    section.push_str(
        "<thead><tr><th>Domain</th><th class=\"num\">Size</th>\
         <th class=\"num\">Requests</th></tr></thead>\n<tbody>\n",
    );

    for (domain, count) in domain_rows(&report.size_by_domain, &report.requests_by_domain) {
        section.push_str(&format!(
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>\n",
            escape_html(display_domain(&domain.domain)),
            format_bytes(domain.size_bytes),
            count
        ));
    }

    section.push_str("</tbody>\n</table>\n</section>\n");
    section
}
