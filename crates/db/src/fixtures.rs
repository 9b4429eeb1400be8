//! Development fixtures.
//!
//! Seeds a test account that owns a test team, all with fixed ids. Rows that
//! already exist are left alone, so the fixtures can be loaded repeatedly.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dbstrap_tool::{FixtureGenerator, ToolError, ToolResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tracing::info;
use uuid::Uuid;

use crate::entities::{accounts, memberships, teams};

/// Test account ID (consistent for all seeds)
pub const TEST_ACCOUNT_ID: Uuid = Uuid::from_u128(1);
/// Test team ID (consistent for all seeds)
pub const TEST_TEAM_ID: Uuid = Uuid::from_u128(2);
/// Role of the test account in the test team.
pub const OWNER_ROLE: &str = "owner";

/// Seed data for local development and testing.
#[derive(Debug, Default)]
pub struct DevFixtures {
    db: Option<Arc<DatabaseConnection>>,
}

#[async_trait]
impl FixtureGenerator for DevFixtures {
    fn feed_database(&mut self, db: Arc<DatabaseConnection>) {
        self.db = Some(db);
    }

    async fn create_all(&mut self) -> ToolResult<()> {
        let db = self
            .db
            .as_deref()
            .ok_or_else(|| ToolError::Fixture("no database connection was fed".into()))?;

        seed_test_account(db).await?;
        seed_test_team(db).await?;
        seed_owner_membership(db).await?;
        Ok(())
    }
}

async fn seed_test_account(db: &DatabaseConnection) -> ToolResult<()> {
    if accounts::Entity::find_by_id(TEST_ACCOUNT_ID)
        .one(db)
        .await?
        .is_some()
    {
        info!("Test account already exists, skipping");
        return Ok(());
    }

    accounts::ActiveModel {
        id: Set(TEST_ACCOUNT_ID),
        email: Set("dev@dbstrap.dev".to_string()),
        display_name: Set("Dev Account".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    info!(email = "dev@dbstrap.dev", "Created test account");
    Ok(())
}

async fn seed_test_team(db: &DatabaseConnection) -> ToolResult<()> {
    if teams::Entity::find_by_id(TEST_TEAM_ID).one(db).await?.is_some() {
        info!("Test team already exists, skipping");
        return Ok(());
    }

    teams::ActiveModel {
        id: Set(TEST_TEAM_ID),
        name: Set("dev-team".to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    info!(name = "dev-team", "Created test team");
    Ok(())
}

async fn seed_owner_membership(db: &DatabaseConnection) -> ToolResult<()> {
    if memberships::Entity::find_by_id((TEST_ACCOUNT_ID, TEST_TEAM_ID))
        .one(db)
        .await?
        .is_some()
    {
        return Ok(());
    }

    memberships::ActiveModel {
        account_id: Set(TEST_ACCOUNT_ID),
        team_id: Set(TEST_TEAM_ID),
        role: Set(OWNER_ROLE.to_string()),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await?;

    info!(role = OWNER_ROLE, "Added test account to test team");
    Ok(())
}
