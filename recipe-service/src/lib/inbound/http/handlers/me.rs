use auth::Principal;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user = current_user(&state, &principal).await?;
    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

/// Account behind an authenticated principal.
///
/// The directory confirmed the account moments ago, so a miss here means it
/// was deleted in between and the caller is treated as signed out.
pub(super) async fn current_user(
    state: &AppState,
    principal: &Principal,
) -> Result<User, ApiError> {
    let email = EmailAddress::new(principal.identity.clone()).map_err(UserError::from)?;
    state
        .user_service
        .get_user_by_email(&email)
        .await
        .map_err(|e| match e {
            UserError::NotFoundByEmail(_) => {
                ApiError::Unauthorized("Authentication required".to_string())
            }
            _ => ApiError::from(e),
        })
}
