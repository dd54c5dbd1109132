use crate::domain::message::NewMessage;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateMessageRequest {
    pub name: String,
    pub email: String,
    pub text: String,
}

impl From<CreateMessageRequest> for NewMessage {
    fn from(req: CreateMessageRequest) -> Self {
        Self { name: req.name, email: req.email, text: req.text }
    }
}

// Unknown fields such as `name` or `email` are accepted and ignored.
#[derive(Deserialize)]
pub struct UpdateMessageRequest {
    pub text: String,
}
