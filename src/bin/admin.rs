//! CLI administration tool for linkshrink.
//!
//! Inspects and manages short links against the same backends as the server,
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Offline code arithmetic
//! cargo run --bin admin -- encode 1000000
//! cargo run --bin admin -- decode 4C92
//!
//! # Against the configured backends
//! cargo run --bin admin -- create https://example.com/page --expires-in 3600
//! cargo run --bin admin -- resolve 4C92
//! cargo run --bin admin -- delete 4C92
//! cargo run --bin admin -- health
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see `linkshrink::config`.

use linkshrink::application::services::ShortenerService;
use linkshrink::config::{self, Config};
use linkshrink::server::{build_shortener, connect_backends};
use linkshrink::utils::code_encoder::{decode, encode};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing linkshrink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the short code for an identifier
    Encode {
        /// Identifier (1..=18446744073709551615)
        id: u64,
    },

    /// Print the identifier behind a short code
    Decode { code: String },

    /// Create a short link
    Create {
        url: String,

        /// Expire the link after this many seconds
        #[arg(long)]
        expires_in: Option<i64>,
    },

    /// Show the stored mapping behind a short code (not counted as a hit)
    Resolve { code: String },

    /// Delete a short link
    Delete {
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Check backend connectivity
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { id } => handle_encode(id),
        Commands::Decode { code } => handle_decode(&code),
        command => {
            let config = config::load_from_env()?;
            run_with_service(&config, command).await
        }
    }
}

fn handle_encode(id: u64) -> Result<()> {
    anyhow::ensure!(id != 0, "Identifier 0 is never allocated");

    println!("{} → {}", id.to_string().bright_black(), encode(id).cyan().bold());
    Ok(())
}

fn handle_decode(code: &str) -> Result<()> {
    let id = decode(code).with_context(|| format!("'{}' is not a valid short code", code))?;

    println!("{} → {}", code.cyan().bold(), id.to_string().bright_white());
    Ok(())
}

/// Connects the configured backends, runs one command, then drains the hit queue.
async fn run_with_service(config: &Config, command: Commands) -> Result<()> {
    let backends = connect_backends(config).await?;
    let (service, hit_worker) = build_shortener(config, backends);

    let result = match command {
        Commands::Create { url, expires_in } => handle_create(&service, config, &url, expires_in).await,
        Commands::Resolve { code } => handle_resolve(&service, config, &code).await,
        Commands::Delete { code, yes } => handle_delete(&service, &code, yes).await,
        Commands::Health => handle_health(&service).await,
        Commands::Encode { .. } | Commands::Decode { .. } => Ok(()),
    };

    drop(service);
    hit_worker.await.context("Hit worker terminated abnormally")?;

    result
}

async fn handle_create(
    service: &ShortenerService,
    config: &Config,
    url: &str,
    expires_in: Option<i64>,
) -> Result<()> {
    let expires_at = expires_in.map(expiry_after).transpose()?;

    let mapping = service
        .create(url, expires_at)
        .await
        .context("Failed to create short link")?;

    println!("{}", "✅ Short link created".green().bold());
    println!("  Code:    {}", mapping.short_code.cyan().bold());
    println!(
        "  URL:     {}",
        format!("{}/{}", config.base_url, mapping.short_code).bright_yellow()
    );
    println!("  Target:  {}", mapping.original_url);
    if let Some(expires_at) = mapping.expires_at {
        println!(
            "  Expires: {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
        );
    }

    Ok(())
}

/// Absolute expiry `secs` seconds from now.
fn expiry_after(secs: i64) -> Result<DateTime<Utc>> {
    ChronoDuration::try_seconds(secs)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .context("--expires-in out of range")
}

async fn handle_resolve(service: &ShortenerService, config: &Config, code: &str) -> Result<()> {
    let mapping = service
        .lookup(code)
        .await
        .with_context(|| format!("Failed to resolve '{}'", code))?;

    println!("  Code:    {}", mapping.short_code.cyan().bold());
    println!(
        "  URL:     {}",
        format!("{}/{}", config.base_url, mapping.short_code).bright_yellow()
    );
    println!("  Target:  {}", mapping.original_url);
    println!(
        "  Created: {}",
        mapping.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
    );
    match mapping.expires_at {
        Some(expires_at) => println!(
            "  Expires: {}",
            expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string().bright_black()
        ),
        None => println!("  Expires: {}", "never".bright_black()),
    }
    println!("  Hits:    {}", mapping.hit_count.to_string().bright_white());

    Ok(())
}

async fn handle_delete(service: &ShortenerService, code: &str, skip_confirm: bool) -> Result<()> {
    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete short link '{}'?", code))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(code)
        .await
        .with_context(|| format!("Failed to delete '{}'", code))?;

    println!("{}", "✅ Deleted (or never existed)".green().bold());
    Ok(())
}

async fn handle_health(service: &ShortenerService) -> Result<()> {
    let health = service.health().await;

    let mark = |ok: bool| if ok { "OK".green() } else { "FAILED".red() };

    println!("{}", "🩺 Backend health".bright_blue().bold());
    println!("  Store:     {}", mark(health.store));
    println!("  Allocator: {}", mark(health.allocator));
    println!("  Cache:     {}", mark(health.cache));
    println!(
        "  Hit queue: {} (capacity {})",
        mark(health.hit_queue_open),
        health.hit_queue_capacity
    );

    anyhow::ensure!(health.is_healthy(), "One or more backends are unhealthy");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_after() {
        let before = Utc::now();
        let expires_at = expiry_after(3600).unwrap();

        assert!(expires_at >= before + ChronoDuration::hours(1));
    }

    #[test]
    fn test_expiry_after_out_of_range() {
        assert!(expiry_after(i64::MAX).is_err());
        assert!(expiry_after(i64::MIN).is_err());
    }
}
