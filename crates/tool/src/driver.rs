//! Pluggable schema drivers.
//!
//! A driver knows how to describe one portion of the application schema. A
//! [`DriverHolder`] is built from the live connection and hands out the
//! drivers it knows about.

use sea_orm::DatabaseConnection;

use crate::error::ToolResult;
use crate::schema::SchemaCollection;

/// Describes part of the schema.
pub trait Driver: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Appends this driver's schema definitions to `schemas`.
    fn append_schemas(&self, schemas: &mut SchemaCollection) -> ToolResult<()>;
}

/// Source of drivers for one bootstrap run.
pub trait DriverHolder: Sized {
    /// Builds the holder from the connection the schema will be created on.
    fn from_database(db: &DatabaseConnection) -> Self;

    /// Materializes the drivers in the order they should be consulted.
    fn drivers(&self) -> ToolResult<Vec<Box<dyn Driver>>>;
}
