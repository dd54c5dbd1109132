use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A single post on the board.
///
/// Only `text` changes after creation; every other field is fixed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,
}

/// The author-supplied part of a message, before the store assigns identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub text: String,
}
