use crate::domain::message::{Message, NewMessage};
use crate::error::{AppError, Result};
use crate::storage::records::MessageRecord;
use crate::storage::{DbPool, MessageStore};
use async_trait::async_trait;
use uuid::Uuid;

/// PostgreSQL backed message store.
///
/// `creation_time` comes from `clock_timestamp()`, bumped past the newest stored
/// row so restored future-dated records never list ahead of new posts. The `seq`
/// column orders messages whose timestamps collide at microsecond resolution.
#[derive(Clone, Debug)]
pub struct PgMessageStore {
    pool: DbPool,
}

impl PgMessageStore {
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            INSERT INTO messages (id, name, email, text, creation_time)
            VALUES (
                $1, $2, $3, $4,
                GREATEST(clock_timestamp(), (SELECT max(creation_time) FROM messages) + interval '1 microsecond')
            )
            RETURNING id, name, email, text, creation_time
            ",
        )
        .bind(Uuid::new_v4())
        .bind(message.name)
        .bind(message.email)
        .bind(message.text)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn get(&self, id: Uuid) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, name, email, text, creation_time
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Into::into).ok_or(AppError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            r"
            SELECT id, name, email, text, creation_time
            FROM messages
            ORDER BY creation_time DESC, seq DESC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn update_text(&self, id: Uuid, text: String) -> Result<Message> {
        let record = sqlx::query_as::<_, MessageRecord>(
            r"
            UPDATE messages
            SET text = $1
            WHERE id = $2
            RETURNING id, name, email, text, creation_time
            ",
        )
        .bind(text)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        record.map(Into::into).ok_or(AppError::NotFound)
    }

    async fn restore(&self, message: Message) -> Result<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO messages (id, name, email, text, creation_time)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(message.id)
        .bind(message.name)
        .bind(message.email)
        .bind(message.text)
        .bind(message.creation_time)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
