//! CLI administration tool for tinyurl.
//!
//! Operates on the same PostgreSQL database and Redis instance as the server,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Remove a cached mapping
//! cargo run --bin admin -- evict mGkAYBHPwp
//!
//! # Drain pending clicks into PostgreSQL now
//! cargo run --bin admin -- flush
//!
//! # Durable, pending and total clicks for a code
//! cargo run --bin admin -- stats mGkAYBHPwp
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `DB_*` (required)
//! - `REDIS_URL` or `REDIS_*` (required for `evict` and `flush`)

use tinyurl::application::services::ClickAggregator;
use tinyurl::config::{Config, mask_connection_string};
use tinyurl::domain::encoder::is_valid_code;
use tinyurl::domain::repositories::MappingRepository;
use tinyurl::infrastructure::persistence::PgMappingRepository;
use tinyurl::server::{FastStore, connect_database, connect_fast_store};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;

/// CLI tool for managing tinyurl.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove a cached mapping
    Evict {
        short_code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Run one click flush cycle
    Flush,

    /// Show click statistics for a short code
    Stats { short_code: String },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Evict { short_code, yes } => evict(&config, &short_code, yes).await?,
        Commands::Flush => flush(&config).await?,
        Commands::Stats { short_code } => stats(&config, &short_code).await?,
        Commands::Db { action } => handle_db_action(action, &config).await?,
    }

    Ok(())
}

/// Connects to Redis, refusing the in-process fallback: it would only see
/// this tool's own empty state.
async fn shared_fast_store(config: &Config) -> Result<FastStore> {
    let store = connect_fast_store(config).await;
    if !store.shared {
        anyhow::bail!("Redis is required for this command (set REDIS_URL or REDIS_HOST)");
    }
    Ok(store)
}

async fn pg_repository(config: &Config) -> Result<Arc<PgMappingRepository>> {
    let pool = connect_database(config).await?;
    Ok(Arc::new(PgMappingRepository::new(Arc::new(pool))))
}

/// Evicts a cached mapping after confirmation.
///
/// The next resolution reloads the mapping from PostgreSQL.
async fn evict(config: &Config, short_code: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Evict cached mapping".bright_blue().bold());
    println!();

    let store = shared_fast_store(config).await?;

    println!("  Code: {}", short_code.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Evict this cache entry?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    store
        .cache
        .evict(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to evict: {}", e))?;

    println!("{}", "✅ Cache entry evicted".green().bold());
    Ok(())
}

/// Runs one flush cycle and prints its report.
async fn flush(config: &Config) -> Result<()> {
    println!("{}", "🔄 Flushing pending clicks...".bright_blue());

    let store = shared_fast_store(config).await?;
    let repository = pg_repository(config).await?;
    let aggregator = ClickAggregator::new(store.click_counter, repository);

    let report = aggregator
        .flush()
        .await
        .map_err(|e| anyhow::anyhow!("Flush failed: {}", e))?;

    if report.is_empty() {
        println!("{}", "Nothing to flush".bright_black());
        return Ok(());
    }

    println!();
    println!("  Pending codes: {}", report.keys.to_string().bright_white());
    println!("  Flushed:       {}", report.flushed.to_string().green());
    println!("  Failed:        {}", report.failed.to_string().red());
    println!(
        "  Clicks:        {}",
        report.clicks.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Prints durable, pending and total clicks for one code.
async fn stats(config: &Config, short_code: &str) -> Result<()> {
    if !is_valid_code(short_code) {
        anyhow::bail!("'{}' is not a valid short code", short_code);
    }

    let repository = pg_repository(config).await?;
    let mapping = repository
        .find_by_short_code(short_code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .context("Short code not found")?;

    let store = connect_fast_store(config).await;
    let pending = if store.shared {
        Some(
            store
                .click_counter
                .peek(short_code)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read pending clicks: {}", e))?,
        )
    } else {
        None
    };

    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();
    println!("  Code:     {}", mapping.short_code.cyan());
    println!("  URL:      {}", mapping.long_url);
    println!(
        "  Created:  {}",
        mapping
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Durable:  {}",
        mapping.click_count.to_string().bright_green()
    );

    match pending {
        Some(pending) => {
            println!("  Pending:  {}", pending.to_string().yellow());
            println!(
                "  Total:    {}",
                (mapping.click_count + pending)
                    .to_string()
                    .bright_green()
                    .bold()
            );
        }
        None => println!("  Pending:  {}", "unknown (Redis not configured)".bright_black()),
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!(
                "{} {}",
                "🔍 Checking database connection".bright_blue(),
                mask_connection_string(&config.database_url).bright_black()
            );

            let repository = pg_repository(config).await?;
            if !repository.health_check().await {
                anyhow::bail!("Database did not answer");
            }

            println!("{}", "✅ Database connection OK".green().bold());
        }
    }

    Ok(())
}
