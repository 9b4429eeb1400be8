//! Migration tool wrapper and database bootstrapper.
//!
//! This crate provides:
//! - Generation and loading of the migration tool's INI config
//! - Argument rewriting that points the tool at that config
//! - The migration tool CLI on top of `sea-orm-migration`
//! - Stamping migration history without running migrations
//! - Driver-based schema collection and the bootstrap sequence

pub mod argv;
pub mod bootstrap;
pub mod cli;
pub mod driver;
pub mod error;
pub mod fixtures;
pub mod schema;
pub mod stamp;
pub mod tool_config;

pub use bootstrap::{BootstrapOptions, DatabaseBootstrapper};
pub use driver::{Driver, DriverHolder};
pub use error::{ToolError, ToolResult};
pub use fixtures::FixtureGenerator;
pub use schema::{SchemaCollection, SchemaDef, TableDef};
pub use stamp::{HEAD, MigrationStamper, MigratorStamper};
pub use tool_config::{ToolConfig, write_tool_config};
