//! Error types for the migration tool and the bootstrapper.

use std::path::PathBuf;

use sea_orm::DbErr;
use thiserror::Error;

/// Result type alias using `ToolError`.
pub type ToolResult<T> = Result<T, ToolError>;

/// Errors raised while configuring, migrating or bootstrapping a database.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The migration tool config could not be loaded.
    #[error("Invalid migration tool config: {0}")]
    Config(#[from] config::ConfigError),

    /// A database statement failed.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// The command line could not be parsed.
    #[error(transparent)]
    Cli(#[from] clap::Error),

    /// A driver failed to describe its schema.
    #[error("Driver '{driver}' failed: {message}")]
    Driver {
        /// Driver name.
        driver: String,
        /// Failure description.
        message: String,
    },

    /// The fixture generator failed.
    #[error("Fixture generation failed: {0}")]
    Fixture(String),

    /// A stamp target names no known migration.
    #[error("Unknown revision: {0}")]
    UnknownRevision(String),

    /// `init` was pointed at a directory that already has content.
    #[error("Directory {} already exists and is not empty", .0.display())]
    DirectoryNotEmpty(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ToolError::Driver {
                driver: "accounts".into(),
                message: "boom".into(),
            }
            .to_string(),
            "Driver 'accounts' failed: boom"
        );
        assert_eq!(
            ToolError::Fixture("msg".into()).to_string(),
            "Fixture generation failed: msg"
        );
        assert_eq!(
            ToolError::UnknownRevision("m1".into()).to_string(),
            "Unknown revision: m1"
        );
        assert_eq!(
            ToolError::DirectoryNotEmpty(PathBuf::from("/tmp/versions")).to_string(),
            "Directory /tmp/versions already exists and is not empty"
        );
        assert_eq!(
            ToolError::Database(DbErr::Custom("msg".into())).to_string(),
            "Database error: Custom Error: msg"
        );
    }
}
