use crate::domain::message::{Message, NewMessage};
use crate::error::{AppError, Result};
use crate::storage::MessageStore;
use opentelemetry::{KeyValue, global, metrics::Counter};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub(crate) struct Metrics {
    pub(crate) created_total: Counter<u64>,
    pub(crate) updated_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("board-server");
        Self {
            created_total: meter
                .u64_counter("board_messages_created_total")
                .with_description("Total messages posted to the board")
                .build(),
            updated_total: meter
                .u64_counter("board_messages_updated_total")
                .with_description("Total message text edits")
                .build(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    metrics: Metrics,
}

impl MessageService {
    #[must_use]
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store, metrics: Metrics::new() }
    }

    /// Posts a new message to the board.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if any field is empty.
    #[tracing::instrument(err(level = "warn"), skip(self, message))]
    pub async fn create_message(&self, message: NewMessage) -> Result<Message> {
        require_non_empty("name", &message.name)?;
        require_non_empty("email", &message.email)?;
        require_non_empty("text", &message.text)?;

        match self.store.create(message).await {
            Ok(created) => {
                tracing::debug!(message_id = %created.id, "Message created");
                self.metrics.created_total.add(1, &[KeyValue::new("status", "success")]);
                Ok(created)
            }
            Err(e) => {
                self.metrics.created_total.add(1, &[KeyValue::new("status", "failure")]);
                Err(e)
            }
        }
    }

    /// # Errors
    /// Returns `AppError::NotFound` if the message does not exist.
    #[tracing::instrument(err(level = "debug"), skip(self, id), fields(message_id = %id))]
    pub async fn get_message(&self, id: Uuid) -> Result<Message> {
        self.store.get(id).await
    }

    /// Returns every message, newest first.
    ///
    /// # Errors
    /// Returns `AppError::Database` if the store cannot be read.
    #[tracing::instrument(err(level = "warn"), skip(self))]
    pub async fn list_messages(&self) -> Result<Vec<Message>> {
        let messages = self.store.list().await?;
        tracing::debug!(count = messages.len(), "Listed messages");
        Ok(messages)
    }

    /// Replaces the text of a message.
    ///
    /// # Errors
    /// Returns `AppError::NotFound` if the message does not exist.
    #[tracing::instrument(err(level = "debug"), skip(self, id, text), fields(message_id = %id))]
    pub async fn update_text(&self, id: Uuid, text: String) -> Result<Message> {
        let updated = self.store.update_text(id, text).await?;
        self.metrics.updated_total.add(1, &[]);
        Ok(updated)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("Missing required field: {field}")));
    }
    Ok(())
}
