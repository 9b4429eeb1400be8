//! Shared configuration for dbstrap.
//!
//! This crate provides the application configuration used by both binaries:
//! - Database connection settings
//! - Locations of the migration tool's config file and script directory

pub mod config;

pub use config::{AppConfig, DatabaseConfig, MigrationsConfig};
