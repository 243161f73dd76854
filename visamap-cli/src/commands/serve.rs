//! HTTP server command
//!
//! Serves the map pages and the JSON API backed by the `immigration` table.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use visamap_server::db::create_pool_with_options;
use visamap_server::db::pool::DEFAULT_MAX_CONNECTIONS;
use visamap_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "VISAMAP_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config/environment)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Directory containing index.html, about.html and static assets
    #[arg(long, env = "VISAMAP_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Maximum database connections in the pool
    #[arg(long, env = "VISAMAP_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = args
        .database_url
        .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.visamap/.env")?;

    tracing::info!("Starting visamap server on {}", args.bind);

    let pool = create_pool_with_options(&database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    let mut config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        ..ServerConfig::default()
    };
    if let Some(dir) = args.static_dir {
        config.static_dir = dir;
    }

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
