//! fuzzcache entry point.
//!
//! Results go to stdout as JSON. Logging goes to stderr so output stays
//! machine-readable.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use fuzzcache_client::{OpenLibraryClient, OpenLibraryConfig};
use fuzzcache_core::{AppConfig, CacheDb, Resolver, SearchService};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod command;

use clap::Parser;
use command::{Cli, Command};

#[derive(Debug, Serialize)]
struct PurgeOutput {
    expired: u64,
    trimmed: u64,
    remaining: u64,
}

#[derive(Debug, Serialize)]
struct ErrorOutput {
    error: &'static str,
    message: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load().context("failed to load configuration")?;
    let db = CacheDb::open(&config.db_path)
        .await
        .with_context(|| format!("failed to open cache at {}", config.db_path.display()))?;

    match cli.command {
        Command::Search { query } => search(db, &config, &query.join(" ")).await,
        Command::Purge => purge(&db, &config).await,
    }
}

async fn search(db: CacheDb, config: &AppConfig, query: &str) -> Result<ExitCode> {
    let provider = OpenLibraryClient::new(OpenLibraryConfig::from_app_config(config))?;
    let resolver = Resolver::new(Arc::new(db), config.resolver_config());
    let service = SearchService::new(resolver, Arc::new(provider), config.result_limit);

    tracing::info!(query, "starting search");

    match service.search(query).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "search failed");
            let output = ErrorOutput { error: e.code(), message: e.to_string() };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn purge(db: &CacheDb, config: &AppConfig) -> Result<ExitCode> {
    let expired = db.purge_expired().await?;
    let trimmed = db.purge_lru(config.max_entries).await?;
    let remaining = db.entry_count().await?;

    tracing::info!(expired, trimmed, remaining, "cache purged");

    let output = PurgeOutput { expired, trimmed, remaining };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(ExitCode::SUCCESS)
}
