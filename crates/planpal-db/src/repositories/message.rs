//! PostgreSQL implementation of the message store

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use planpal_core::{Message, MessageRepository, PageQuery, RepoResult, Snowflake};

use crate::mappers::{group_reactions, message_with_reactions};
use crate::models::{MessageModel, ReactionModel};

use super::error::{is_fk_violation, map_db_error};

/// PostgreSQL implementation of MessageRepository
///
/// Single writer of message and reaction truth. The reaction upsert keys on
/// `(message_id, user_id)`, so a repeat reaction from the same user replaces
/// the stored emoji and two concurrent reactions from different users both
/// land.
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_reactions(&self, message_id: i64) -> RepoResult<Vec<ReactionModel>> {
        sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, emoji, created_at
            FROM message_reactions
            WHERE message_id = $1
            ORDER BY created_at, user_id
            "#,
        )
        .bind(message_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let model = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, event_id, sender_id, text, created_at, updated_at
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match model {
            Some(model) => {
                let reactions = self.load_reactions(model.id).await?;
                Ok(Some(message_with_reactions(model, reactions)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_event(
        &self,
        event_id: Snowflake,
        query: PageQuery,
    ) -> RepoResult<Vec<Message>> {
        // Snowflake ids sort by creation time, with the sequence counter
        // breaking ties within the same millisecond.
        let models = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT id, event_id, sender_id, text, created_at, updated_at
            FROM messages
            WHERE event_id = $1
            ORDER BY id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(event_id.into_inner())
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let reactions = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, emoji, created_at
            FROM message_reactions
            WHERE message_id = ANY($1)
            ORDER BY created_at, user_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut grouped = group_reactions(reactions);
        Ok(models
            .into_iter()
            .map(|model| {
                let reactions = grouped.remove(&model.id).unwrap_or_default();
                message_with_reactions(model, reactions)
            })
            .collect())
    }

    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, event_id, sender_id, text, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.into_inner())
        .bind(message.event_id.into_inner())
        .bind(message.sender_id.into_inner())
        .bind(&message.text)
        .bind(message.created_at)
        .bind(message.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn edit(&self, id: Snowflake, text: &str) -> RepoResult<Option<Message>> {
        let model = sqlx::query_as::<_, MessageModel>(
            r#"
            UPDATE messages
            SET text = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, event_id, sender_id, text, created_at, updated_at
            "#,
        )
        .bind(id.into_inner())
        .bind(text)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        match model {
            Some(model) => {
                let reactions = self.load_reactions(model.id).await?;
                Ok(Some(message_with_reactions(model, reactions)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<bool> {
        // message_reactions rows go with the message via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn set_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
        emoji: &str,
    ) -> RepoResult<Option<Message>> {
        let result = sqlx::query(
            r#"
            INSERT INTO message_reactions (message_id, user_id, emoji, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (message_id, user_id) DO UPDATE SET emoji = EXCLUDED.emoji
            "#,
        )
        .bind(message_id.into_inner())
        .bind(user_id.into_inner())
        .bind(emoji)
        .execute(&self.pool)
        .await;

        if let Err(e) = result {
            if is_fk_violation(&e) {
                return Ok(None);
            }
            return Err(map_db_error(e));
        }

        self.find_by_id(message_id).await
    }

    #[instrument(skip(self))]
    async fn clear_reaction(
        &self,
        message_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<Message>> {
        sqlx::query("DELETE FROM message_reactions WHERE message_id = $1 AND user_id = $2")
            .bind(message_id.into_inner())
            .bind(user_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        self.find_by_id(message_id).await
    }
}
