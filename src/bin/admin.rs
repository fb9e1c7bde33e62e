//! CLI administration tool for ttl-shortener.
//!
//! Read-only inspection of the Redis partitions without going through the
//! HTTP API. Nothing here creates, refreshes or spends anything.
//!
//! # Usage
//!
//! ```bash
//! # Total redirects served
//! cargo run --bin admin -- counter
//!
//! # Where a code points
//! cargo run --bin admin -- lookup abc123
//!
//! # Remaining quota for a client key (IP address)
//! cargo run --bin admin -- quota 203.0.113.7
//!
//! # PING both partitions
//! cargo run --bin admin -- check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DOMAIN`, `REDIS_URL` (or `REDIS_HOST` / `REDIS_PORT`
//! / `REDIS_PASSWORD`), `REDIS_LINKS_DB`, `REDIS_QUOTA_DB`.

use ttl_shortener::application::services::{RateLimiter, RedirectService};
use ttl_shortener::config::{self, ShortenerSettings, mask_connection_string};
use ttl_shortener::domain::repositories::KeyValueStore;
use ttl_shortener::server::{Stores, connect_redis};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use colored::*;

/// CLI tool for inspecting ttl-shortener stores.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the global redirect counter
    Counter,

    /// Show the target URL and remaining lifetime of a code
    Lookup {
        /// Short code (without domain)
        code: String,
    },

    /// Show the remaining quota of a client key
    Quota {
        /// Client key, normally the client's IP address
        client: String,
    },

    /// Check both store partitions
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let Some(redis_url) = config.redis_url.clone() else {
        bail!("Redis is not configured: set REDIS_URL or REDIS_HOST");
    };

    let stores = connect_redis(&redis_url, &config).await?;

    match cli.command {
        Commands::Counter => handle_counter(&stores).await?,
        Commands::Lookup { code } => handle_lookup(&stores, &config.domain, &code).await?,
        Commands::Quota { client } => {
            handle_quota(&stores, &config.shortener_settings(), &client).await?
        }
        Commands::Check => handle_check(&stores, &redis_url).await,
    }

    Ok(())
}

async fn handle_counter(stores: &Stores) -> Result<()> {
    let redirects = RedirectService::new(stores.links.clone(), stores.quotas.clone());
    let total = redirects.redirect_count().await?;

    println!("{}", "📊 Redirects".bright_blue().bold());
    println!();
    println!("  Total: {}", total.to_string().bright_yellow().bold());

    Ok(())
}

/// Reads the mapping directly; going through the resolver would bump the
/// redirect counter.
async fn handle_lookup(stores: &Stores, domain: &str, code: &str) -> Result<()> {
    println!("{}", "🔗 Lookup".bright_blue().bold());
    println!();

    let Some(target) = stores.links.get(code).await? else {
        println!("  {}", format!("{}/{} not found (or expired)", domain, code).yellow());
        return Ok(());
    };

    println!("  Short:  {}", format!("{}/{}", domain, code).cyan());
    println!("  Target: {}", target.bright_white());

    match stores.links.ttl(code).await? {
        Some(ttl) => {
            let secs = ttl.as_secs();
            println!("  Expires in: {}h {}m", secs / 3600, (secs % 3600) / 60);
        }
        None => println!("  Expires in: {}", "never".red()),
    }

    Ok(())
}

async fn handle_quota(
    stores: &Stores,
    settings: &ShortenerSettings,
    client: &str,
) -> Result<()> {
    let limiter = RateLimiter::new(stores.quotas.clone(), settings);

    println!("{}", "⏱️  Quota".bright_blue().bold());
    println!();
    println!("  Client: {}", client.cyan());

    match limiter.snapshot(client).await? {
        Some(snapshot) => {
            let remaining = if snapshot.remaining > 0 {
                snapshot.remaining.to_string().green()
            } else {
                snapshot.remaining.to_string().red()
            };
            println!("  Remaining: {} of {}", remaining, settings.quota);
            println!("  Resets in: {} min", snapshot.reset_minutes);
        }
        None => println!(
            "  Remaining: {} of {} (no active window)",
            settings.quota.to_string().green(),
            settings.quota
        ),
    }

    Ok(())
}

async fn handle_check(stores: &Stores, redis_url: &str) {
    println!("{}", "🔍 Checking stores...".bright_blue());
    println!("  Redis: {}", mask_connection_string(redis_url).bright_white());

    for (name, store) in [("links", &stores.links), ("quota", &stores.quotas)] {
        if store.ping().await {
            println!("  {} {}", "✅".green(), name);
        } else {
            println!("  {} {}", "❌".red(), name);
        }
    }
}
