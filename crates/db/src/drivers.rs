//! Schema drivers for the application's entities.

use dbstrap_tool::{Driver, DriverHolder, SchemaCollection, SchemaDef, ToolResult};
use sea_orm::DatabaseConnection;

use crate::entities::{accounts, memberships, teams};

/// Name of the schema described by [`DirectoryDriver`].
pub const DIRECTORY_SCHEMA: &str = "directory";

/// Accounts, teams and the memberships linking them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryDriver;

impl Driver for DirectoryDriver {
    fn name(&self) -> &str {
        DIRECTORY_SCHEMA
    }

    fn append_schemas(&self, schemas: &mut SchemaCollection) -> ToolResult<()> {
        // memberships references both other tables
        let schema = SchemaDef::new(DIRECTORY_SCHEMA)
            .table(schemas.entity(accounts::Entity))
            .table(schemas.entity(teams::Entity))
            .table(schemas.entity(memberships::Entity));
        schemas.insert(schema);
        Ok(())
    }
}

/// Every driver of the application.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppDrivers;

impl DriverHolder for AppDrivers {
    fn from_database(_db: &DatabaseConnection) -> Self {
        Self
    }

    fn drivers(&self) -> ToolResult<Vec<Box<dyn Driver>>> {
        Ok(vec![Box::new(DirectoryDriver)])
    }
}
