//! CLI administration tool for linkfolio.
//!
//! Provides code validation, owner metrics, and database checks without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check whether a custom code is acceptable and free
//! cargo run --bin admin -- validate my-promo
//!
//! # Print an owner's metrics report
//! cargo run --bin admin -- metrics owner-42 --time-frame 7d
//!
//! # Preview generated code candidates
//! cargo run --bin admin -- generate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL`, or `DB_HOST`/`DB_PORT`/`DB_USER`/`DB_PASSWORD`/`DB_NAME`
//!   (required for `metrics`, `db` and the availability part of `validate`)

use linkfolio::application::services::{Availability, MetricsService};
use linkfolio::config::{Config, mask_connection_string};
use linkfolio::domain::entities::{DimensionalBreakdown, MetricsReport, TimeFrame};
use linkfolio::domain::repositories::LinkRepository;
use linkfolio::infrastructure::persistence::{PgEventRepository, PgLinkRepository};
use linkfolio::utils::code_generator::CodeGenerator;
use linkfolio::utils::slug_validator::validate_code;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkfolio.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Validate a custom short code and check whether it is taken
    Validate {
        code: String,

        /// Only run the format rules, without a database lookup
        #[arg(long)]
        offline: bool,
    },

    /// Show an owner's metrics report
    Metrics {
        owner_id: String,

        /// One of 24h, 7d, 30d, 90d, 1y
        #[arg(short, long, default_value = "30d")]
        time_frame: TimeFrame,

        /// Skip the precomputed rollup and aggregate raw events
        #[arg(long)]
        raw: bool,
    },

    /// Print one candidate per generation strategy
    Generate,

    /// Database diagnostics
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Run a trivial query
    Check,

    /// Print the server version and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { code, offline } => handle_validate(&code, offline).await?,
        Commands::Metrics {
            owner_id,
            time_frame,
            raw,
        } => handle_metrics(&owner_id, time_frame, raw).await?,
        Commands::Generate => handle_generate(),
        Commands::Db { action } => handle_db(action, &connect().await?).await?,
    }

    Ok(())
}

/// Same resolution as the server: `DATABASE_URL`, else the `DB_*` parts.
fn database_url() -> Result<String> {
    Config::load_database_url()?
        .context("no database configured: set DATABASE_URL, or DB_NAME with DB_USER and DB_PASSWORD")
}

async fn connect() -> Result<PgPool> {
    let database_url = database_url()?;

    PgPool::connect(&database_url).await.with_context(|| {
        format!("failed to connect to {}", mask_connection_string(&database_url))
    })
}

/// Runs the slug rules, then looks the code up unless `offline`.
async fn handle_validate(code: &str, offline: bool) -> Result<()> {
    println!("{} {}", "Checking code".bright_blue().bold(), code.cyan());
    println!();

    if let Err(reason) = validate_code(code) {
        println!("  {} {}", "INVALID".red().bold(), reason);
        return Ok(());
    }

    if offline {
        println!("  {}", "Format OK".green().bold());
        return Ok(());
    }

    let repo = PgLinkRepository::new(Arc::new(connect().await?));
    let availability = match repo
        .find_by_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
    {
        Some(_) => Availability::Taken,
        None => Availability::Available,
    };

    if availability.is_available() {
        println!("  {}", "AVAILABLE".green().bold());
    } else {
        println!("  {}", "TAKEN".yellow().bold());
    }

    Ok(())
}

async fn handle_metrics(owner_id: &str, time_frame: TimeFrame, raw: bool) -> Result<()> {
    let pool = Arc::new(connect().await?);
    let service = MetricsService::new(
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgEventRepository::new(pool)),
        !raw,
    );

    let report = service
        .get_metrics(owner_id, time_frame)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load metrics: {}", e))?;

    print_report(owner_id, &report);
    Ok(())
}

fn print_report(owner_id: &str, report: &MetricsReport) {
    println!(
        "{} {} ({})",
        "Metrics for".bright_blue().bold(),
        owner_id.cyan(),
        report.time_frame
    );
    println!(
        "  {}",
        format!("source: {:?}", report.source).bright_black()
    );
    println!();

    let overview = &report.overview;
    for (label, window) in [
        ("Clicks", &overview.clicks),
        ("Views", &overview.views),
        ("Unique visitors", &overview.unique_visitors),
    ] {
        println!(
            "  {:<18} {:>8}  {}",
            label,
            window.current_total.to_string().bright_green().bold(),
            window.display_change().bright_black()
        );
    }
    println!(
        "  {:<18} {:>7.1}%",
        "Conversion rate", overview.conversion_rate.current
    );
    println!();

    print_breakdown("Devices", &report.by_device);
    print_breakdown("Browsers", &report.by_browser);
    print_breakdown("Countries", &report.by_country);
}

fn print_breakdown(title: &str, breakdown: &DimensionalBreakdown) {
    println!("  {}", title.bright_white().bold());

    if breakdown.total == 0 {
        println!("    {}", "no data".bright_black());
    }

    for item in breakdown.items.iter().filter(|item| item.count > 0) {
        println!(
            "    {:<20} {:>6} {:>4}%",
            item.category.cyan(),
            item.count,
            item.percentage
        );
    }
    println!();
}

fn handle_generate() {
    println!("{}", "Candidate codes".bright_blue().bold());
    println!();

    let generator = CodeGenerator::new();
    for (strategy, code) in generator.candidates() {
        let status = match validate_code(&code) {
            Ok(()) => "ok".green(),
            Err(_) => "rejected".red(),
        };
        println!("  {:<14} {:<16} {}", strategy.as_str(), code.cyan(), status);
    }
    println!();
}

async fn handle_db(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .context("database did not answer")?;
            println!("{}", "database reachable".green().bold());
        }
        DbAction::Info => {
            let (version, links, events): (String, i64, i64) = sqlx::query_as(
                "SELECT version(), \
                        (SELECT COUNT(*) FROM short_links), \
                        (SELECT COUNT(*) FROM analytics_events)",
            )
            .fetch_one(pool)
            .await
            .context("failed to read database info")?;

            println!("{}", "Storage".bright_blue().bold());
            println!("  {:<10} {}", "server", version.bright_white());
            println!("  {:<10} {}", "links", links.to_string().bright_green().bold());
            println!("  {:<10} {}", "events", events.to_string().bright_green().bold());
        }
    }

    Ok(())
}
