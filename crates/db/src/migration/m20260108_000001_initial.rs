//! Initial schema migration.
//!
//! Creates the directory tables from their entities so that a migrated
//! database matches one built by the bootstrapper.

use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

use crate::entities::{accounts, memberships, teams};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        create_table_for(manager, &schema, accounts::Entity).await?;
        create_table_for(manager, &schema, teams::Entity).await?;
        create_table_for(manager, &schema, memberships::Entity).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_table_for(manager, memberships::Entity).await?;
        drop_table_for(manager, teams::Entity).await?;
        drop_table_for(manager, accounts::Entity).await?;
        Ok(())
    }
}

async fn create_table_for<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .create_table(
            schema
                .create_table_from_entity(entity)
                .if_not_exists()
                .to_owned(),
        )
        .await
}

async fn drop_table_for<E: EntityTrait>(
    manager: &SchemaManager<'_>,
    entity: E,
) -> Result<(), DbErr> {
    manager
        .drop_table(Table::drop().table(entity).if_exists().to_owned())
        .await
}
