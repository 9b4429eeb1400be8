//! Migration tool wrapper for dbstrap.
//!
//! Regenerates the migration tool config from the application config, then
//! hands the command line to the migration tool with `-c <ini>` inserted.
//!
//! Usage:
//!   migrate up       - Run all pending migrations
//!   migrate down     - Rollback last migration
//!   migrate status   - Show migration status
//!   migrate fresh    - Drop all tables and re-run migrations
//!   migrate stamp    - Mark all migrations as applied without running them
//!   migrate init     - Create the configured migration script directory

use anyhow::Context;
use dbstrap_db::Migrator;
use dbstrap_shared::AppConfig;
use dbstrap_tool::{ToolConfig, ToolError, argv::rewrite_args, cli, write_tool_config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let ini = &config.migrations.ini;
    let versions = &config.migrations.versions;

    write_tool_config(ini, versions, &config.database.url)
        .with_context(|| format!("Failed to write {}", ini.display()))?;
    let tool_config = ToolConfig::load(ini)?;

    let invocation = match cli::parse(rewrite_args(std::env::args_os(), ini, versions)) {
        Err(ToolError::Cli(err)) => err.exit(),
        parsed => parsed?,
    };

    // Logger levels come from the generated config unless RUST_LOG is set
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(invocation.log_filter(&tool_config))),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::execute::<Migrator>(&invocation)
        .await
        .context("Migration command failed")
}
