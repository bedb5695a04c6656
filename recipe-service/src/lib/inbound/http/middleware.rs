use auth::Authentication;
use auth::Principal;
use auth::RequestCookies;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Request authentication interceptor.
///
/// Runs on every request. A valid access-token cookie puts the resolved
/// [`Principal`] into the request extensions; anything else leaves the request
/// anonymous. Never rejects on its own, that is up to the route guards.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let cookies = request_cookies(req.headers());

    if let Authentication::Authenticated(principal) = state.sessions.authenticate(&cookies).await {
        tracing::debug!(identity = %principal.identity, role = %principal.role, "Request authenticated");
        req.extensions_mut().insert(principal);
    }

    next.run(req).await
}

/// Collect every `Cookie` header; values that are not visible ASCII are skipped.
pub fn request_cookies(headers: &HeaderMap) -> RequestCookies {
    RequestCookies::from_headers(
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok()),
    )
}

/// Guard for routes open to any signed-in account (`USER` or `ADMIN`).
pub async fn require_member(req: Request, next: Next) -> Response {
    if req.extensions().get::<Principal>().is_none() {
        return unauthenticated();
    }

    next.run(req).await
}

/// Guard for administrator routes.
pub async fn require_admin(req: Request, next: Next) -> Response {
    let refusal = match req.extensions().get::<Principal>() {
        None => Some(unauthenticated()),
        Some(principal) if !principal.is_admin() => {
            tracing::warn!(
                identity = %principal.identity,
                role = %principal.role,
                uri = %req.uri(),
                "Admin route refused"
            );
            Some(ApiError::Forbidden("Access denied".to_string()).into_response())
        }
        Some(_) => None,
    };

    match refusal {
        Some(response) => response,
        None => next.run(req).await,
    }
}

fn unauthenticated() -> Response {
    ApiError::Unauthorized("Authentication required".to_string()).into_response()
}
