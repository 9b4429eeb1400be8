//! Database bootstrap: reset, schema creation, seed data and stamping.
//!
//! A run goes through a fixed sequence:
//!
//! 1. optional destructive reset of every known table
//! 2. schema collection from the drivers of a [`DriverHolder`]
//! 3. `CREATE TABLE IF NOT EXISTS` for every collected table
//! 4. optional seed data from a [`FixtureGenerator`]
//! 5. stamping the migration history to `head`
//!
//! Errors are not recovered; the first failing step aborts the run.
//!
//! # Usage
//!
//! ```ignore
//! let options = BootstrapOptions::new("migrations/migrate.ini");
//! DatabaseBootstrapper::<AppDrivers>::new(db, MigratorStamper::<Migrator>::new(), options)
//!     .with_fixtures(DevFixtures::default())
//!     .run()
//!     .await?;
//! ```

use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::{debug, info};

use crate::driver::DriverHolder;
use crate::error::ToolResult;
use crate::fixtures::FixtureGenerator;
use crate::schema::SchemaCollection;
use crate::stamp::{HEAD, MigrationStamper};
use crate::tool_config::ToolConfig;

/// Settings for one bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapOptions {
    /// Delete all rows of every known table before creating the schema.
    pub delete_existing: bool,
    /// Generated migration tool config used by the stamp step.
    pub ini_path: PathBuf,
}

impl BootstrapOptions {
    /// Non-destructive options stamping through the config at `ini_path`.
    pub fn new(ini_path: impl Into<PathBuf>) -> Self {
        Self {
            delete_existing: false,
            ini_path: ini_path.into(),
        }
    }

    /// Sets whether existing rows are deleted first.
    #[must_use]
    pub fn delete_existing(mut self, delete_existing: bool) -> Self {
        self.delete_existing = delete_existing;
        self
    }
}

/// Creates the application schema on a database and marks it up to date.
pub struct DatabaseBootstrapper<H> {
    db: Arc<DatabaseConnection>,
    schemas: SchemaCollection,
    stamper: Box<dyn MigrationStamper>,
    fixtures: Option<Box<dyn FixtureGenerator>>,
    options: BootstrapOptions,
    _holder: PhantomData<fn() -> H>,
}

impl<H: DriverHolder> DatabaseBootstrapper<H> {
    /// Holds the connection and starts with an empty schema collection.
    ///
    /// Takes either an owned connection or a shared `Arc` handle.
    pub fn new(
        db: impl Into<Arc<DatabaseConnection>>,
        stamper: impl MigrationStamper + 'static,
        options: BootstrapOptions,
    ) -> Self {
        let db = db.into();
        let schemas = SchemaCollection::new(db.get_database_backend());
        Self {
            db,
            schemas,
            stamper: Box::new(stamper),
            fixtures: None,
            options,
            _holder: PhantomData,
        }
    }

    /// Loads seed data with `fixtures` after the schema is created.
    #[must_use]
    pub fn with_fixtures(mut self, fixtures: impl FixtureGenerator + 'static) -> Self {
        self.fixtures = Some(Box::new(fixtures));
        self
    }

    /// Releases the bootstrapper and returns its connection handle.
    pub fn into_connection(self) -> Arc<DatabaseConnection> {
        self.db
    }

    /// Schemas collected so far.
    pub fn schemas(&self) -> &SchemaCollection {
        &self.schemas
    }

    /// Runs every step in order.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any step.
    pub async fn run(mut self) -> ToolResult<()> {
        self.delete_database().await?;
        self.collect_schemas()?;
        self.create_schema().await?;
        self.generate_fixtures().await?;
        self.stamp().await
    }

    /// Deletes every row of every known table, children first.
    ///
    /// Does nothing unless [`BootstrapOptions::delete_existing`] is set. The
    /// deletes run outside a transaction, so a failure leaves the tables
    /// deleted so far empty. Returns the number of tables cleared.
    pub async fn delete_database(&mut self) -> ToolResult<usize> {
        if !self.options.delete_existing {
            return Ok(0);
        }

        info!("Removing old database...");
        if self.schemas.is_empty() {
            self.append_driver_schemas()?;
        }

        let backend = self.schemas.backend();
        let mut cleared = 0;
        for schema in &self.schemas {
            for table in schema.tables_for_delete() {
                debug!(schema = schema.name(), table = table.name(), "Deleting rows");
                self.db.execute(table.build_delete(backend)).await?;
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    /// Asks every driver of `H` to describe its schema.
    pub fn collect_schemas(&mut self) -> ToolResult<()> {
        info!("Scanning for models...");
        self.append_driver_schemas()
    }

    fn append_driver_schemas(&mut self) -> ToolResult<()> {
        let holder = H::from_database(&self.db);
        for driver in holder.drivers()? {
            debug!(driver = driver.name(), "Collecting schemas");
            driver.append_schemas(&mut self.schemas)?;
        }
        Ok(())
    }

    /// Creates every collected table that does not exist yet.
    ///
    /// Returns the number of create statements executed.
    pub async fn create_schema(&self) -> ToolResult<usize> {
        info!("Initializing database...");

        let backend = self.schemas.backend();
        let mut created = 0;
        for schema in &self.schemas {
            for table in schema.tables() {
                debug!(schema = schema.name(), table = table.name(), "Creating table");
                self.db.execute(table.build_create(backend)).await?;
                created += 1;
            }
        }
        Ok(created)
    }

    /// Loads seed data if a fixture generator is configured.
    pub async fn generate_fixtures(&mut self) -> ToolResult<()> {
        let Some(fixtures) = self.fixtures.as_mut() else {
            return Ok(());
        };

        info!("Creating fixtures...");
        fixtures.feed_database(Arc::clone(&self.db));
        fixtures.create_all().await
    }

    /// Marks the migration history as fully applied.
    pub async fn stamp(&self) -> ToolResult<()> {
        let config = ToolConfig::load(&self.options.ini_path)?;
        self.stamper.stamp(&config, HEAD).await
    }
}

#[cfg(test)]
#[path = "bootstrap_tests.rs"]
mod tests;
