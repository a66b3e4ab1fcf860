mod api;
mod config;
mod generator;
mod models;
mod pipeline;
mod scraper;
mod utils;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::api::AppState;
use crate::config::AppConfig;
use crate::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "listing-scout", about = "Marketplace listing scraper + API", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Serve GET /api/ebay
    Serve {
        /// Address to bind (overrides server.bind_addr)
        #[arg(short, long, env = "SCOUT_BIND")]
        bind: Option<String>,
    },

    /// Run the strategy pipeline once and print the listings as JSON
    Search {
        /// Search term (default: pipeline.default_query)
        query: Option<String>,

        #[arg(long)]
        pretty: bool,
    },

    /// Print fallback-generator output without touching the network
    Generate {
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "listing_scout=info,warn",
        1 => "listing_scout=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    match cli.command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind_addr.clone());
            let pipeline = Pipeline::new(&config)?;
            api::serve(AppState { pipeline: Arc::new(pipeline) }, &bind)
                .await
                .with_context(|| format!("Server on {} failed", bind))?;
        }

        Command::Search { query, pretty } => {
            let _t = utils::Timer::start("search");
            let pipeline = Pipeline::new(&config)?;
            let query = pipeline.resolve_query(query.as_deref());
            let outcome = pipeline.search(query).await;
            info!("{} listings via {}", outcome.listings.len(), outcome.strategy);

            let json = if pretty {
                serde_json::to_string_pretty(&outcome.listings)?
            } else {
                serde_json::to_string(&outcome.listings)?
            };
            println!("{}", json);
        }

        Command::Generate { query } => {
            let query = query
                .filter(|q| !q.trim().is_empty())
                .unwrap_or_else(|| config.pipeline.default_query.clone());
            let listings = generator::generate_listings(
                &query,
                config.pipeline.generated_max_items,
                Utc::now().timestamp_millis(),
            );
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
    }

    Ok(())
}
