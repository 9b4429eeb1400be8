//! Database bootstrap for dbstrap.
//!
//! Creates every application table straight from the entities, loads the
//! development fixtures and stamps the migration history to `head`.
//!
//! Usage:
//!   initdb                     - Create missing tables, seed, stamp
//!   initdb --iwanttodeletedb   - Delete all rows of every table first
//!   initdb --no-fixtures       - Skip seed data

use anyhow::Context;
use clap::Parser;
use dbstrap_db::{AppDrivers, DevFixtures, Migrator, connect};
use dbstrap_shared::AppConfig;
use dbstrap_tool::{BootstrapOptions, DatabaseBootstrapper, MigratorStamper, write_tool_config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Log filter used when `RUST_LOG` is unset, one directive per logging crate.
const DEFAULT_LOG_FILTER: &str = "initdb=info,dbstrap_tool=info,dbstrap_db=info";

#[derive(Debug, Parser)]
#[command(name = "initdb")]
#[command(about = "Create the database schema, load fixtures and stamp migrations")]
struct Args {
    /// Delete all rows of every application table before creating the schema
    #[arg(long = "iwanttodeletedb")]
    delete_existing: bool,

    /// Do not load development fixtures
    #[arg(long)]
    no_fixtures: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;
    let ini = &config.migrations.ini;

    write_tool_config(ini, &config.migrations.versions, &config.database.url)
        .with_context(|| format!("Failed to write {}", ini.display()))?;

    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    let options = BootstrapOptions::new(ini).delete_existing(args.delete_existing);
    let mut bootstrapper =
        DatabaseBootstrapper::<AppDrivers>::new(db, MigratorStamper::<Migrator>::new(), options);
    if !args.no_fixtures {
        bootstrapper = bootstrapper.with_fixtures(DevFixtures::default());
    }

    bootstrapper.run().await.context("Database bootstrap failed")?;
    info!("Database initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::EnvFilter;

    use super::*;

    #[test]
    fn test_default_log_filter_covers_every_logging_crate() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
        for target in ["initdb", "dbstrap_tool", "dbstrap_db"] {
            assert!(DEFAULT_LOG_FILTER.contains(&format!("{target}=info")));
        }
    }

    #[test]
    fn test_args_default_to_non_destructive() {
        let args = Args::try_parse_from(["initdb"]).unwrap();

        assert!(!args.delete_existing);
        assert!(!args.no_fixtures);
    }

    #[test]
    fn test_args_destructive_flag() {
        let args = Args::try_parse_from(["initdb", "--iwanttodeletedb", "--no-fixtures"]).unwrap();

        assert!(args.delete_existing);
        assert!(args.no_fixtures);
    }
}
