//! Database layer with `SeaORM` entities, schema drivers and migrations.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The drivers that describe them to the bootstrapper
//! - Development fixtures
//! - Database migrations

pub mod drivers;
pub mod entities;
pub mod fixtures;
pub mod migration;

pub use drivers::{AppDrivers, DirectoryDriver};
pub use fixtures::DevFixtures;
pub use migration::Migrator;

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
