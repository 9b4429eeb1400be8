//! Stamping migration history without running migrations.
//!
//! After the schema is created straight from the entities, the migration
//! table must record every migration as applied, otherwise the next `up`
//! would try to create the same tables again.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Alias, Query};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use crate::error::{ToolError, ToolResult};
use crate::tool_config::ToolConfig;

/// Revision that stands for "every known migration".
pub const HEAD: &str = "head";

/// Picks the migrations a stamp to `revision` has to record.
///
/// `all` is every migration in order and `pending` the ones not recorded
/// yet. With [`HEAD`] every pending migration is returned; with a migration
/// name, the pending ones up to and including it.
///
/// # Errors
///
/// Returns [`ToolError::UnknownRevision`] if `revision` names no migration.
pub fn revisions_to_stamp(
    all: &[String],
    pending: &[String],
    revision: &str,
) -> ToolResult<Vec<String>> {
    let upto = if revision == HEAD {
        all.len()
    } else {
        all.iter()
            .position(|name| name == revision)
            .map(|i| i + 1)
            .ok_or_else(|| ToolError::UnknownRevision(revision.to_owned()))?
    };

    Ok(all[..upto]
        .iter()
        .filter(|name| pending.contains(name))
        .cloned()
        .collect())
}

/// Records migrations of `M` as applied up to `revision`.
///
/// Creates the migration table if it does not exist yet. Returns the names
/// that were stamped.
///
/// # Errors
///
/// Returns an error if the revision is unknown or a statement fails.
pub async fn stamp<M: MigratorTrait>(
    db: &DatabaseConnection,
    revision: &str,
) -> ToolResult<Vec<String>> {
    let all: Vec<String> = M::migrations()
        .iter()
        .map(|m| m.name().to_owned())
        .collect();
    let pending: Vec<String> = M::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_owned())
        .collect();

    let targets = revisions_to_stamp(&all, &pending, revision)?;
    if targets.is_empty() {
        info!(revision, "Migration history already at target");
        return Ok(targets);
    }

    let applied_at = Utc::now().timestamp();
    let mut insert = Query::insert();
    insert
        .into_table(M::migration_table_name())
        .columns([Alias::new("version"), Alias::new("applied_at")]);
    for name in &targets {
        insert.values_panic([name.clone().into(), applied_at.into()]);
    }
    db.execute(db.get_database_backend().build(&insert)).await?;

    info!(revision, stamped = targets.len(), "Stamped migration history");
    Ok(targets)
}

/// Marks migration history as applied.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MigrationStamper: Send + Sync {
    /// Stamps the database described by `config` to `revision`.
    async fn stamp(&self, config: &ToolConfig, revision: &str) -> ToolResult<()>;
}

/// Stamps the history of migrator `M` on the database named in the config.
pub struct MigratorStamper<M> {
    _migrator: PhantomData<fn() -> M>,
}

impl<M> MigratorStamper<M> {
    /// Creates a stamper for `M`.
    pub fn new() -> Self {
        Self {
            _migrator: PhantomData,
        }
    }
}

impl<M> Default for MigratorStamper<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M: MigratorTrait + 'static> MigrationStamper for MigratorStamper<M> {
    async fn stamp(&self, config: &ToolConfig, revision: &str) -> ToolResult<()> {
        let db = Database::connect(config.database_url()).await?;
        stamp::<M>(&db, revision).await?;
        Ok(())
    }
}
