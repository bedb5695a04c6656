use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use super::WithSessionCookies;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::Password;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<WithSessionCookies<ApiSuccess<UserData>>, ApiError> {
    // A malformed email cannot match an account; answer like any bad login.
    let command = body
        .try_into_command()
        .map_err(|_| ApiError::from(UserError::InvalidCredentials))?;

    let user = state.user_service.authenticate(command).await?;
    let cookies = state
        .sessions
        .issue_session_cookies(user.email.as_str())
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");
    Ok(WithSessionCookies::new(
        cookies,
        ApiSuccess::new(StatusCode::OK, (&user).into()),
    ))
}

/// HTTP request body for login (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl LoginRequest {
    fn try_into_command(self) -> Result<LoginCommand, UserError> {
        let email = EmailAddress::new(self.email)?;
        let password = Password::new(self.password)?;
        Ok(LoginCommand::new(email, password))
    }
}
