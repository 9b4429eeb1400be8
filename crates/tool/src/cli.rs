//! Command-line entry point of the migration tool.
//!
//! Every invocation names the generated config file with `-c`. All
//! subcommands except `init` connect to the database URL in that file and
//! drive a sea-orm [`MigratorTrait`] implementation.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use url::Url;

use crate::error::{ToolError, ToolResult};
use crate::stamp::{self, HEAD};
use crate::tool_config::ToolConfig;

#[derive(Debug, Parser)]
#[command(name = "migrate")]
#[command(about = "Database migration tool")]
struct Cli {
    /// Migration tool config file
    #[arg(short = 'c', long = "config")]
    config: PathBuf,

    /// Show more details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

/// Migration tool subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create the migration script directory
    Init {
        /// Directory to create
        directory: PathBuf,
    },

    #[command(flatten)]
    Migrate(MigrateCommand),
}

/// Subcommands that run against the configured database.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum MigrateCommand {
    /// Apply pending migrations
    Up {
        /// Number of migrations to apply (all by default)
        #[arg(short, long)]
        num: Option<u32>,
    },

    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },

    /// Show the status of every migration
    Status,

    /// Drop all tables, then apply all migrations
    Fresh,

    /// Roll back all migrations, then apply them again
    Refresh,

    /// Roll back all migrations
    Reset,

    /// Record migrations as applied without running them
    Stamp {
        /// Migration name, or `head` for all
        #[arg(default_value = HEAD)]
        revision: String,
    },
}

/// A parsed migration tool command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Config file given with `-c`.
    pub config: PathBuf,
    /// Whether `--verbose` was given.
    pub verbose: bool,
    /// Subcommand to run.
    pub command: Command,
}

impl Invocation {
    /// `EnvFilter` directives for this invocation.
    ///
    /// Without `--verbose` the logger levels of the config file apply.
    /// With it every named logger is lowered to `debug`.
    pub fn log_filter(&self, config: &ToolConfig) -> String {
        if !self.verbose {
            return config.log_filter();
        }

        let mut directives = vec!["info".to_owned()];
        directives.extend(
            config
                .loggers()
                .iter()
                .filter(|logger| !logger.qualname.is_empty())
                .map(|logger| format!("{}=debug", logger.qualname)),
        );
        directives.join(",")
    }
}

/// Parses a full argument list, program name first.
///
/// # Errors
///
/// Returns [`ToolError::Cli`] for unknown or missing arguments and for
/// `--help`/`--version`.
pub fn parse<I, T>(args: I) -> ToolResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::try_parse_from(args)?;
    Ok(Invocation {
        config: cli.config,
        verbose: cli.verbose,
        command: cli.command,
    })
}

/// Parses `args` and runs the command against migrator `M`.
///
/// # Errors
///
/// Returns an error if parsing, loading the config, connecting or the
/// migration command fails.
pub async fn run<M, I, T>(args: I) -> ToolResult<()>
where
    M: MigratorTrait,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let invocation = parse(args)?;
    execute::<M>(&invocation).await
}

/// Runs a parsed invocation against migrator `M`.
///
/// # Errors
///
/// Returns an error if loading the config, connecting or the migration
/// command fails. `init` needs neither the config nor a connection.
pub async fn execute<M: MigratorTrait>(invocation: &Invocation) -> ToolResult<()> {
    match &invocation.command {
        Command::Init { directory } => init_script_location(directory),
        Command::Migrate(command) => {
            let config = ToolConfig::load(&invocation.config)?;
            let db = Database::connect(config.database_url()).await?;
            debug!(url = %redact_url(config.database_url()), "Connected to database");
            migrate::<M>(&db, command).await
        }
    }
}

async fn migrate<M: MigratorTrait>(
    db: &DatabaseConnection,
    command: &MigrateCommand,
) -> ToolResult<()> {
    match command {
        MigrateCommand::Up { num } => M::up(db, *num).await?,
        MigrateCommand::Down { num } => M::down(db, Some(*num)).await?,
        MigrateCommand::Status => M::status(db).await?,
        MigrateCommand::Fresh => M::fresh(db).await?,
        MigrateCommand::Refresh => M::refresh(db).await?,
        MigrateCommand::Reset => M::reset(db).await?,
        MigrateCommand::Stamp { revision } => {
            stamp::stamp::<M>(db, revision).await?;
        }
    }
    Ok(())
}

/// Creates the migration script directory.
///
/// # Errors
///
/// Returns [`ToolError::DirectoryNotEmpty`] if `directory` already has
/// entries, or an I/O error if it cannot be created.
pub fn init_script_location(directory: &Path) -> ToolResult<()> {
    if directory.exists() && fs::read_dir(directory)?.next().is_some() {
        return Err(ToolError::DirectoryNotEmpty(directory.to_path_buf()));
    }

    fs::create_dir_all(directory)?;
    info!(directory = %directory.display(), "Created migration script directory");
    Ok(())
}

/// Hides the password in a connection URL.
fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_owned();
    };
    if parsed.password().is_some() && parsed.set_password(Some("***")).is_ok() {
        return parsed.to_string();
    }
    url.to_owned()
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
