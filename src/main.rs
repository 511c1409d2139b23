//! SEO Crawler main entry point
//!
//! This is the command-line interface for crawling a site and scoring its
//! pages.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use seo_crawler::analysis::Analyzer;
use seo_crawler::config::{load_config_or_default, Config};
use seo_crawler::crawler::Crawler;
use seo_crawler::output::{
    print_analysis_report, print_crawl_report, write_json_report, AnalysisReport,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// SEO Crawler: site traversal and per-page SEO scoring
///
/// Crawls the internal link graph of a site from a seed URL, then analyzes
/// the discovered pages: structure, performance (with a headless browser),
/// content and technical signals, summarized as a score out of 100.
#[derive(Parser, Debug)]
#[command(name = "seo-crawler")]
#[command(version = "1.0.0")]
#[command(about = "Crawl a site and score its pages for SEO", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site from a seed URL
    Crawl {
        /// Seed URL
        url: String,

        /// Maximum number of pages to visit
        #[arg(long)]
        max_pages: Option<usize>,

        /// Analyze every crawled page after the crawl
        #[arg(long)]
        analyze: bool,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Analyze a list of pages
    Analyze {
        /// Page URLs
        #[arg(required = true)]
        urls: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// Run the browser pass for performance metrics
    #[arg(long)]
    full: bool,

    /// Write the report as JSON to this file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }
    let config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    match cli.command {
        Command::Crawl {
            url,
            max_pages,
            analyze,
            report,
        } => handle_crawl(&config, &url, max_pages, analyze, &report).await,
        Command::Analyze { urls, report } => handle_analyze(&config, &urls, &report).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("seo_crawler=info,warn"),
            1 => EnvFilter::new("seo_crawler=debug,info"),
            2 => EnvFilter::new("seo_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles the crawl command, optionally analyzing what was found
async fn handle_crawl(
    config: &Config,
    url: &str,
    max_pages: Option<usize>,
    analyze: bool,
    args: &ReportArgs,
) -> anyhow::Result<()> {
    let crawler = Crawler::new(config)?;
    let report = crawler
        .crawl(url, max_pages)
        .await
        .with_context(|| format!("Cannot crawl {}", url))?;

    if !analyze {
        return emit(&report, args, || print_crawl_report(&report));
    }

    if !args.json {
        print_crawl_report(&report);
    }

    let urls = report.page_urls();
    if urls.is_empty() {
        bail!("No page of {} could be fetched, nothing to analyze", report.base_url);
    }

    analyze_urls(config, &urls, args).await
}

/// Handles the analyze command
async fn handle_analyze(config: &Config, urls: &[String], args: &ReportArgs) -> anyhow::Result<()> {
    analyze_urls(config, urls, args).await
}

async fn analyze_urls(config: &Config, urls: &[String], args: &ReportArgs) -> anyhow::Result<()> {
    let analyzer = Analyzer::new(config)?;
    let analysis = analyzer.analyze_site(urls, args.full).await?;
    let report = AnalysisReport::from(analysis);

    emit(&report, args, || print_analysis_report(&report))
}

/// Writes and/or prints a report according to the report flags
fn emit<T: Serialize>(
    report: &T,
    args: &ReportArgs,
    print_summary: impl FnOnce(),
) -> anyhow::Result<()> {
    if let Some(path) = &args.output {
        write_json_report(report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!("Report written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_summary();
    }

    Ok(())
}
