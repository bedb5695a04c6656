use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::WithSessionCookies;
use crate::inbound::http::middleware::request_cookies;
use crate::inbound::http::router::AppState;

/// Exchange the refresh-token cookie for a fresh cookie pair.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<WithSessionCookies<ApiSuccess<SessionMessage>>, ApiError> {
    let cookies = state.sessions.refresh(&request_cookies(&headers)).await?;

    Ok(WithSessionCookies::new(
        cookies,
        ApiSuccess::new(StatusCode::OK, SessionMessage::new("Session refreshed")),
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMessage {
    pub message: String,
}

impl SessionMessage {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
