//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use socialgraph_server::db::{create_pool_with_options, migrations};

use super::require_database_url;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Apply every schema statement; safe to run repeatedly
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = require_database_url(args.database_url)?;

    let pool = create_pool_with_options(&database_url, 1)
        .await
        .context("Failed to connect to database")?;

    migrations::run(&pool)
        .await
        .context("Migration failed")?;

    tracing::info!(
        statements = migrations::STATEMENTS.len(),
        "Schema is up to date"
    );
    pool.close().await;

    Ok(())
}
