//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Migration tool file locations.
    #[serde(default)]
    pub migrations: MigrationsConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
}

/// Where the migration tool keeps its files.
#[derive(Debug, Clone, Deserialize)]
pub struct MigrationsConfig {
    /// Migration script directory, written as `script_location`.
    #[serde(default = "default_versions")]
    pub versions: PathBuf,
    /// Path of the generated migration tool config file.
    #[serde(default = "default_ini")]
    pub ini: PathBuf,
}

impl Default for MigrationsConfig {
    fn default() -> Self {
        Self {
            versions: default_versions(),
            ini: default_ini(),
        }
    }
}

fn default_versions() -> PathBuf {
    PathBuf::from("migrations/versions")
}

fn default_ini() -> PathBuf {
    PathBuf::from("migrations/migrate.ini")
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("DBSTRAP").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
