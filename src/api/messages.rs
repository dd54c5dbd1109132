use crate::api::AppState;
use crate::api::dto::message::{CreateMessageRequest, UpdateMessageRequest};
use crate::api::middleware::BasicAuth;
use crate::error::{AppError, Result};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Posts a message. Open to anyone.
///
/// # Errors
/// Returns `AppError::BadRequest` if the body is not a complete message.
pub async fn create_message(State(state): State<AppState>, body: Bytes) -> Result<impl IntoResponse> {
    let req: CreateMessageRequest = decode_json(&body)?;

    let message = state.message_service.create_message(req.into()).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// Lists all messages, newest first.
///
/// # Errors
/// Returns `AppError::AuthError` without valid credentials.
pub async fn list_messages(_auth: BasicAuth, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let messages = state.message_service.list_messages().await?;
    Ok(Json(messages))
}

/// Fetches a single message.
///
/// # Errors
/// Returns `AppError::AuthError` without valid credentials.
/// Returns `AppError::NotFound` if the id is unknown or not a UUID.
pub async fn get_message(
    _auth: BasicAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let message = state.message_service.get_message(id).await?;
    Ok(Json(message))
}

/// Replaces the text of a message.
///
/// # Errors
/// Returns `AppError::AuthError` without valid credentials.
/// Returns `AppError::NotFound` if the id is unknown or not a UUID.
/// Returns `AppError::BadRequest` if the body has no `text`.
pub async fn update_message(
    _auth: BasicAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let req: UpdateMessageRequest = decode_json(&body)?;

    let message = state.message_service.update_text(id, req.text).await?;
    Ok(Json(message))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound)
}

fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid request payload: {e}")))
}
