use auth::Principal;
use auth::Role;
use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn list_users(State(state): State<AppState>) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    let users = state.user_service.list_users().await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        users.iter().map(UserData::from).collect(),
    ))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(UserError::from)?;

    state
        .user_service
        .get_user(&user_id)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for changing a role (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateRoleRequest {
    role: String,
}

/// Change an account's role. Takes effect on the account's next request.
pub async fn update_role(
    State(state): State<AppState>,
    Extension(admin): Extension<Principal>,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(UserError::from)?;
    let role = body
        .role
        .parse::<Role>()
        .map_err(|e| UserError::InvalidRole(e.to_string()))?;

    let user = state.user_service.update_role(&user_id, role).await?;

    tracing::info!(admin = %admin.identity, user_id = %user.id, role = %role, "Role updated by admin");
    Ok(ApiSuccess::new(StatusCode::OK, (&user).into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteUserResponseData {
    pub id: String,
}

pub async fn delete_user(
    State(state): State<AppState>,
    Extension(admin): Extension<Principal>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<DeleteUserResponseData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(UserError::from)?;

    state.user_service.delete_user(&user_id).await?;

    tracing::info!(admin = %admin.identity, user_id = %user_id, "User deleted by admin");
    Ok(ApiSuccess::new(
        StatusCode::OK,
        DeleteUserResponseData {
            id: user_id.to_string(),
        },
    ))
}
