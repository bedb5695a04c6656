use axum::extract::State;
use axum::http::StatusCode;

use super::refresh::SessionMessage;
use super::ApiSuccess;
use super::WithSessionCookies;
use crate::inbound::http::router::AppState;

/// Clear both session cookies. Tokens already issued stay valid until expiry.
pub async fn logout(State(state): State<AppState>) -> WithSessionCookies<ApiSuccess<SessionMessage>> {
    WithSessionCookies::new(
        state.sessions.logout_cookies(),
        ApiSuccess::new(StatusCode::OK, SessionMessage::new("Logged out")),
    )
}
