use crate::domain::message::{Message, NewMessage};
use crate::error::{AppError, Result};
use crate::storage::MessageStore;
use async_trait::async_trait;
use std::collections::HashMap;
use time::{Duration, OffsetDateTime};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    messages: HashMap<Uuid, Message>,
    // Ids in ascending creation_time order.
    order: Vec<Uuid>,
    latest: Option<OffsetDateTime>,
}

/// Process-local message store.
///
/// A single lock covers the records and their ordering, so every operation is
/// atomic and concurrent creates are ordered by lock acquisition.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Inner {
    /// Returns a timestamp strictly after every stored message, at the
    /// microsecond precision PostgreSQL keeps.
    ///
    /// Fails once a restored message sits at the end of the representable range.
    fn next_creation_time(&self) -> Result<OffsetDateTime> {
        let now = truncate_to_micros(OffsetDateTime::now_utc());
        match self.latest {
            Some(latest) if now <= latest => latest.checked_add(Duration::microseconds(1)).ok_or(AppError::Internal),
            _ => Ok(now),
        }
    }

    fn fresh_id(&self) -> Uuid {
        loop {
            let id = Uuid::new_v4();
            if !self.messages.contains_key(&id) {
                return id;
            }
        }
    }
}

fn truncate_to_micros(ts: OffsetDateTime) -> OffsetDateTime {
    let micros = ts.microsecond();
    ts.replace_microsecond(micros).unwrap_or(ts)
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn create(&self, message: NewMessage) -> Result<Message> {
        let mut inner = self.inner.write().await;

        let creation_time = inner.next_creation_time()?;
        let created = Message {
            id: inner.fresh_id(),
            name: message.name,
            email: message.email,
            text: message.text,
            creation_time,
        };

        inner.latest = Some(created.creation_time);
        inner.order.push(created.id);
        inner.messages.insert(created.id, created.clone());

        Ok(created)
    }

    async fn get(&self, id: Uuid) -> Result<Message> {
        let inner = self.inner.read().await;
        inner.messages.get(&id).cloned().ok_or(AppError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Message>> {
        let inner = self.inner.read().await;
        Ok(inner.order.iter().rev().filter_map(|id| inner.messages.get(id)).cloned().collect())
    }

    async fn update_text(&self, id: Uuid, text: String) -> Result<Message> {
        let mut inner = self.inner.write().await;
        let message = inner.messages.get_mut(&id).ok_or(AppError::NotFound)?;
        message.text = text;
        Ok(message.clone())
    }

    async fn restore(&self, message: Message) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if inner.messages.contains_key(&message.id) {
            return Ok(false);
        }

        let Inner { messages, order, latest } = &mut *inner;
        let position = order.partition_point(|id| {
            messages.get(id).is_some_and(|existing| existing.creation_time <= message.creation_time)
        });
        order.insert(position, message.id);
        if (*latest).is_none_or(|ts| ts < message.creation_time) {
            *latest = Some(message.creation_time);
        }
        messages.insert(message.id, message);

        Ok(true)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
