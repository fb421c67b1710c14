use std::borrow::Cow;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use site_autoconfig::fetcher::{self, FetchedPage};
use site_autoconfig::output::{self, ConfigFile};
use site_autoconfig::settings::Settings;
use site_autoconfig::{analyze_html, Heuristics, SiteSchema};

#[derive(Parser)]
#[command(name = "site_autoconfig", about = "Infer scraping configs for news/listing pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and analyze one or more listing pages
    Analyze {
        /// Page URLs; a missing scheme defaults to https://
        #[arg(required = true)]
        urls: Vec<String>,
        /// Write the config here instead of the timestamped default
        #[arg(short = 'o', long = "output")]
        out: Option<PathBuf>,
        /// Print the config JSON instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Analyze a saved HTML file
    File {
        path: PathBuf,
        /// URL the page was saved from (used to resolve relative links)
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Show the effective settings
    Settings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let settings = Settings::load().context("Failed to load settings")?;
    let heuristics = Heuristics::from_overrides(&settings.heuristics);

    let result = match cli.command {
        Commands::Analyze { urls, out, stdout } => {
            let mut targets = Vec::with_capacity(urls.len());
            for raw in &urls {
                match fetcher::normalize_url(raw) {
                    Ok(url) => targets.push(url),
                    Err(e) => warn!("Skipping {}", e),
                }
            }
            if targets.is_empty() {
                println!("No valid URLs to analyze.");
                return Ok(());
            }

            let t_fetch = Instant::now();
            println!("Fetching {} pages...", targets.len());
            let (pages, stats) = fetcher::fetch_pages(targets, &settings).await?;
            println!(
                "Fetched {} pages ({} ok, {} errors) in {:.1}s",
                stats.total,
                stats.ok,
                stats.errors,
                t_fetch.elapsed().as_secs_f64()
            );

            let schemas = analyze_pages(&pages, &heuristics);
            if schemas.is_empty() {
                println!("Nothing to analyze (every fetch failed).");
                return Ok(());
            }
            print_summary(&schemas);

            let config = ConfigFile::new(schemas, chrono::Local::now());
            if stdout {
                println!("{}", config.to_json()?);
            } else {
                let path = out.unwrap_or_else(|| output::default_path(&settings.output_dir, chrono::Local::now()));
                output::write_config(&path, &config)?;
                println!("\nSaved {} site configs to {}", config.sites.len(), path.display());
            }
            Ok(())
        }
        Commands::File { path, url } => {
            let markup = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let url = url.unwrap_or_else(|| file_url(&path));
            let schema = analyze_html(&url, &markup, &heuristics);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Commands::Settings => {
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", elapsed_label(elapsed));
    }

    result
}

/// Analyze fetched pages in parallel. Each worker parses its own document;
/// failed fetches are skipped.
fn analyze_pages(pages: &[FetchedPage], heuristics: &Heuristics) -> Vec<SiteSchema> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} analyzed")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let schemas: Vec<SiteSchema> = pages
        .par_iter()
        .filter_map(|page| {
            let schema = match (&page.html, &page.error) {
                (Some(html), _) => Some(analyze_html(&page.url, html, heuristics)),
                (None, err) => {
                    warn!(
                        status = ?page.status,
                        latency_ms = page.latency_ms,
                        "Skipping {}: {}",
                        page.url,
                        err.as_deref().unwrap_or("no content")
                    );
                    None
                }
            };
            pb.inc(1);
            schema
        })
        .collect();

    pb.finish_and_clear();
    info!("Analyzed {} of {} pages", schemas.len(), pages.len());
    schemas
}

fn print_summary(schemas: &[SiteSchema]) {
    println!(
        "\n{:>3} | {:<32} | {:<20} | {:<20} | {:>5} | {:<36}",
        "#", "URL", "Container", "Items", "Count", "Page 2"
    );
    println!("{}", "-".repeat(130));

    for (i, s) in schemas.iter().enumerate() {
        let (items, count) = match &s.items {
            Some(p) => (p.selector.as_str(), p.sample_count.to_string()),
            None => ("-", "-".to_string()),
        };
        let next = s
            .pagination
            .as_ref()
            .map(|p| format!("{} (max {})", p.page_url(2), p.max_page_observed))
            .unwrap_or_else(|| "-".into());

        println!(
            "{:>3} | {:<32} | {:<20} | {:<20} | {:>5} | {:<36}",
            i + 1,
            clip(&s.url, 32),
            clip(&s.container.selector, 20),
            clip(items, 20),
            count,
            clip(&next, 36)
        );
    }

    let filtered: Vec<_> = schemas
        .iter()
        .filter(|s| !s.filters.include_patterns.is_empty() || !s.filters.exclude_patterns.is_empty())
        .collect();
    if !filtered.is_empty() {
        println!("\n--- Filters ---");
        for s in &filtered {
            println!(
                "  {}: include [{}] exclude [{}]",
                clip(&s.url, 40),
                s.filters.include_patterns.join(", "),
                s.filters.exclude_patterns.join(", ")
            );
        }
    }
}

fn file_url(path: &std::path::Path) -> String {
    std::fs::canonicalize(path)
        .ok()
        .and_then(|abs| url::Url::from_file_path(abs).ok())
        .map(|u| u.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Clip `s` to `width` chars for the summary table.
fn clip(s: &str, width: usize) -> Cow<'_, str> {
    match s.char_indices().nth(width) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &s[..cut])),
        None => Cow::Borrowed(s),
    }
}

fn elapsed_label(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{:.1}s", d.as_secs_f64());
    }
    let (h, m, s) = (secs / 3600, secs / 60 % 60, secs % 60);
    if h > 0 {
        format!("{h}h {m}m {s}s")
    } else {
        format!("{m}m {s}s")
    }
}
