use crate::api::AppState;
use crate::error::AppError;
use crate::services::auth_service::Credentials;
use axum::{
    extract::FromRequestParts,
    http::{HeaderValue, Request, header, request::Parts},
};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Proof that the request carried the configured Basic credentials.
#[derive(Debug, Clone, Copy)]
pub struct BasicAuth;

impl FromRequestParts<AppState> for BasicAuth {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts.headers.get(header::AUTHORIZATION).ok_or(AppError::AuthError)?;
        let auth_str = auth_header.to_str().map_err(|_| AppError::AuthError)?;
        let credentials = Credentials::from_basic_header(auth_str).ok_or(AppError::AuthError)?;

        if !state.auth_service.authorize(&credentials) {
            tracing::info!("Rejected invalid credentials");
            return Err(AppError::AuthError);
        }

        Ok(Self)
    }
}

/// Reuses an incoming `x-request-id` when present, otherwise generates a UUID.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(existing) = request.headers().get("x-request-id") {
            return Some(RequestId::new(existing.clone()));
        }

        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
