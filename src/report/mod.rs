//! Report rendering.
//!
//! This module renders a `PerformanceReport` as text, Markdown, JSON or HTML.

pub mod generator;
pub mod html;

pub use generator::{
    generate_json_report, generate_markdown_report, generate_text_report, RenderOptions,
};
pub use html::generate_html_report;
