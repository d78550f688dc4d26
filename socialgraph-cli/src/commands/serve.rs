//! HTTP server command
//!
//! Connects to Postgres, applies the schema, then serves the API until
//! Ctrl+C or SIGTERM. `--memory` skips the database entirely.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use socialgraph_server::db::{create_pool_with_options, migrations, pool::DEFAULT_MAX_CONNECTIONS};
use socialgraph_server::http::{run_server, ServerConfig};
use socialgraph_server::{MemoryStore, PgStore, Revalidator, SocialGraph, SocialStore};

use super::require_database_url;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Keep all data in process memory (lost on exit)
    #[arg(long)]
    pub memory: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let store: Arc<dyn SocialStore> = if args.memory {
        tracing::warn!("Using in-memory store; data will not persist");
        Arc::new(MemoryStore::new())
    } else {
        let database_url = require_database_url(args.database_url)?;

        let pool = create_pool_with_options(&database_url, args.max_connections)
            .await
            .context("Failed to create database pool")?;

        migrations::run(&pool)
            .await
            .context("Failed to apply database schema")?;

        Arc::new(PgStore::new(pool))
    };

    tracing::info!("Starting socialgraph server on {}", args.bind);

    let graph = SocialGraph::new(store, Revalidator::default());
    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    run_server(graph, config).await.context("Server error")?;

    Ok(())
}
