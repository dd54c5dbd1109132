use time::OffsetDateTime;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub(crate) struct Message {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub text: String,
    pub creation_time: OffsetDateTime,
}

impl From<Message> for crate::domain::message::Message {
    fn from(record: Message) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            text: record.text,
            creation_time: record.creation_time,
        }
    }
}
