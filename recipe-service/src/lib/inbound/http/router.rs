use std::sync::Arc;
use std::time::Duration;

use auth::SessionManager;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::admin_users::delete_user;
use super::handlers::admin_users::get_user;
use super::handlers::admin_users::list_users;
use super::handlers::admin_users::update_role;
use super::handlers::login::login;
use super::handlers::logout::logout;
use super::handlers::me::me;
use super::handlers::preferences::get_preferences;
use super::handlers::preferences::patch_preferences;
use super::handlers::refresh::refresh;
use super::handlers::register::register;
use super::middleware::authenticate;
use super::middleware::require_admin;
use super::middleware::require_member;
use crate::domain::preferences::ports::PreferencesServicePort;
use crate::domain::user::ports::UserServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub preferences_service: Arc<dyn PreferencesServicePort>,
    pub sessions: Arc<SessionManager>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    preferences_service: Arc<dyn PreferencesServicePort>,
    sessions: Arc<SessionManager>,
) -> Router {
    let state = AppState {
        user_service,
        preferences_service,
        sessions,
    };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout));

    let member_routes = Router::new()
        .route("/api/auth/me", get(me))
        .route(
            "/api/preferences",
            get(get_preferences).patch(patch_preferences),
        )
        .route_layer(middleware::from_fn(require_member));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/users/:user_id", get(get_user).delete(delete_user))
        .route("/api/admin/users/:user_id/role", put(update_role))
        .route_layer(middleware::from_fn(require_admin));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out: they carry the session cookies.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(member_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
