use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers::{self, ApiState};
use crate::middleware::require_auth;

pub fn create_router(state: Arc<ApiState>) -> Router {
    let funding = Router::new()
        .route("/fund/bzz/:address", post(handlers::fund_bzz))
        .route("/fund/native/:address", post(handlers::fund_native))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/overlay/:address", post(handlers::create_overlay))
        .merge(funding)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
