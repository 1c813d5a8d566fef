use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::warn;

use crate::handlers::ApiState;
use crate::types::ApiError;

/// Rejects requests without `Authorization: Bearer <token>` when a token is
/// configured.
pub async fn require_auth(
    State(state): State<Arc<ApiState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.auth_token.as_deref() else {
        return next.run(request).await;
    };

    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if presented != Some(expected) {
        warn!("rejected unauthenticated request to {}", request.uri().path());
        return ApiError::unauthorized().into_response();
    }

    next.run(request).await
}
