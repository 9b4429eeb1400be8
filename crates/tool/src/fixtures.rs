//! Seed data loaded after schema creation.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::ToolResult;

/// Populates seed data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FixtureGenerator: Send + Sync {
    /// Hands the generator a shared handle to the live connection.
    fn feed_database(&mut self, db: Arc<DatabaseConnection>);

    /// Inserts all seed data through the fed connection.
    async fn create_all(&mut self) -> ToolResult<()>;
}
