//! PostgreSQL implementations of the membership gate and event directory
//!
//! Membership and event state are owned by the group service; this crate
//! only reads them to authorize channel access.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use planpal_core::{EventDirectory, MembershipGate, MembershipRole, RepoResult, Snowflake};

use crate::models::MembershipRow;

use super::error::map_db_error;

/// PostgreSQL implementation of MembershipGate
#[derive(Clone)]
pub struct PgMembershipGate {
    pool: PgPool,
}

impl PgMembershipGate {
    /// Create a new PgMembershipGate
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipGate for PgMembershipGate {
    #[instrument(skip(self))]
    async fn check(
        &self,
        user_id: Snowflake,
        event_id: Snowflake,
    ) -> RepoResult<Option<MembershipRole>> {
        let row = sqlx::query_as::<_, MembershipRow>(
            r#"
            SELECT gm.role
            FROM group_members gm
            JOIN events e ON e.group_id = gm.group_id
            WHERE e.id = $1 AND gm.user_id = $2
            "#,
        )
        .bind(event_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        // An unknown role string means the schema and this binary disagree;
        // treat it as no access rather than guessing a role.
        Ok(row.and_then(|r| r.role.parse::<MembershipRole>().ok()))
    }
}

/// PostgreSQL implementation of EventDirectory
#[derive(Clone)]
pub struct PgEventDirectory {
    pool: PgPool,
}

impl PgEventDirectory {
    /// Create a new PgEventDirectory
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventDirectory for PgEventDirectory {
    #[instrument(skip(self))]
    async fn exists(&self, event_id: Snowflake) -> RepoResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)",
        )
        .bind(event_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(exists)
    }
}
