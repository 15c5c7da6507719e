//! PageGrade - web page performance grader
//!
//! A CLI tool that runs a PageSpeed Insights audit for a URL and reports
//! the page's grade, size, load time, request count, and content
//! breakdown by resource type and by domain.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments, config, failed analysis, etc.)

mod analysis;
mod cli;
mod config;
mod dashboard;
mod models;
mod pagespeed;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dashboard::{Dashboard, Status};
use indicatif::{ProgressBar, ProgressStyle};
use models::PerformanceReport;
use pagespeed::PageSpeedClient;
use report::RenderOptions;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("PageGrade v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .pagegrade.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  {} already exists. Remove it first or edit it manually.", CONFIG_FILE_NAME);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the API key, output format, and theme.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// `RUST_LOG` takes precedence over the CLI flags. Logs go to stderr so a
/// report printed on stdout stays clean.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Run one analysis and write the report.
async fn run_analysis(args: Args) -> Result<()> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let client = PageSpeedClient::new(config.client_config())?;
    let mut dashboard = Dashboard::new(client);

    let url = args.target_url().to_string();
    let spinner = if args.quiet {
        None
    } else {
        Some(loading_spinner(&url))
    };

    dashboard.submit(&url).await;

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let Some(message) = dashboard.error() {
        anyhow::bail!("{}", message);
    }
    if dashboard.status() != &Status::Success {
        anyhow::bail!("Analysis did not complete");
    }

    let report = dashboard
        .report()
        .context("Analysis finished without a report")?;

    write_report(report, &config)?;

    if config.report.output.is_some() && !args.quiet {
        println!(
            "\n📊 {} Grade {} | {} | {} | {} requests",
            report.grade().emoji(),
            report.grade(),
            report.page_size,
            report.load_time,
            report.http_request_count
        );
    }

    Ok(())
}

/// Spinner shown while the analysis is in flight.
fn loading_spinner(url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    match ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        Ok(style) => pb.set_style(style),
        Err(e) => warn!("Invalid spinner template: {}", e),
    }
    pb.set_message(format!("Please wait while we analyze {}", url));
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Render the report and write it to the configured output or stdout.
fn write_report(report: &PerformanceReport, config: &Config) -> Result<()> {
    let options = RenderOptions {
        include_domains: config.report.include_domains,
    };

    let output = match config.report.format {
        OutputFormat::Text => report::generate_text_report(report, options),
        OutputFormat::Markdown => report::generate_markdown_report(report, options),
        OutputFormat::Json => report::generate_json_report(report)?,
        OutputFormat::Html => report::generate_html_report(report, config.report.theme, options),
    };

    match config.report.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;
            println!("✅ Report saved to: {}", path);
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
