//! Pokedex - browse the catalog from the terminal
//!
//! One-shot commands print a page or a single entry; `browse` opens an
//! interactive session with paging, search and neighbor walking.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pokedex_core::catalog::{Direction, Neighbor};
use pokedex_core::{Catalog, CatalogConfig, Session};

mod browse_cli;
mod render;

/// Log levels
#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "pokedex",
    about = "Browse the Pokédex catalog from the terminal",
    version
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Set log level
    #[clap(long, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Override the configuration file path
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Override the catalog API root (e.g., "https://pokeapi.co/api/v2")
    #[clap(long, global = true)]
    base_url: Option<String>,
}

#[derive(Parser, Debug)]
enum Command {
    /// Print one catalog page
    Page {
        /// Index of the first entry on the page
        #[clap(long, default_value_t = 0)]
        offset: u32,

        /// Entries per page (defaults to the configured page size)
        #[clap(long)]
        limit: Option<u32>,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Show one entry with its neighbors
    Show {
        /// Name or national dex number
        query: String,

        /// Show the normal sprite instead of the shiny one
        #[clap(long)]
        normal: bool,

        /// Show the back sprite
        #[clap(long)]
        back: bool,

        /// Output as JSON
        #[clap(long)]
        json: bool,
    },

    /// Interactive browser (type `help` inside for commands)
    Browse,
}

/// Initialize tracing with CLI flags
fn initialize_tracing(log_level: &LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // stdout carries tables and JSON
        .init();
}

fn load_config(path: Option<&PathBuf>, base_url: Option<String>) -> Result<CatalogConfig> {
    let mut config = match path {
        Some(path) => CatalogConfig::load_from_path(path)?,
        None => CatalogConfig::load()?,
    };

    if let Some(base_url) = base_url {
        config.api_base_url = base_url;
        config.validate().context("Invalid --base-url")?;
    }

    debug!("Resolved catalog config: {:?}", config);
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    initialize_tracing(&cli.log_level);

    let config = load_config(cli.config.as_ref(), cli.base_url)?;
    let catalog = Arc::new(Catalog::connect(config)?);
    let session = Session::new(catalog);

    match cli.command {
        Command::Page {
            offset,
            limit,
            json,
        } => page_command(&session, offset, limit, json).await,
        Command::Show {
            query,
            normal,
            back,
            json,
        } => show_command(&session, &query, normal, back, json).await,
        Command::Browse => browse_cli::run(&session).await,
    }
}

async fn page_command(session: &Session, offset: u32, limit: Option<u32>, json: bool) -> Result<()> {
    let config = session.catalog().config();
    let url = config.page_url(offset, limit.unwrap_or(config.page_size));

    let entities = session
        .load_page(&url)
        .await
        .with_context(|| format!("Failed to load catalog page {url}"))?;
    let view = session.snapshot().await;

    if json {
        let output = serde_json::json!({
            "url": url,
            "total": view.total,
            "next": view.cursor.advance(Direction::Forward).ok(),
            "previous": view.cursor.advance(Direction::Backward).ok(),
            "results": entities.iter().map(|e| e.as_ref()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render::page_table(&entities));
        println!("{}", render::page_footer(&view));
    }

    Ok(())
}

async fn show_command(
    session: &Session,
    query: &str,
    normal: bool,
    back: bool,
    json: bool,
) -> Result<()> {
    let detail = session
        .search(query)
        .await
        .with_context(|| format!("Could not find '{query}'"))?;

    if normal {
        session.toggle_shiny().await;
    }
    if back {
        session.toggle_facing().await;
    }
    let sprite = session
        .current_sprite_url()
        .await
        .unwrap_or_else(|| detail.entity.sprites.default_url.clone());

    if json {
        let neighbor_name = |side: &Neighbor| match side {
            Ok(Some(e)) => serde_json::json!({"id": e.id, "name": e.name}),
            _ => serde_json::Value::Null,
        };
        let (previous, next) = match &detail.neighbors {
            Some(n) => (neighbor_name(&n.previous), neighbor_name(&n.next)),
            None => (serde_json::Value::Null, serde_json::Value::Null),
        };
        let output = serde_json::json!({
            "entity": &*detail.entity,
            "sprite": sprite,
            "previous": previous,
            "next": next,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render::detail_text(&detail, &sprite));
    }

    Ok(())
}
