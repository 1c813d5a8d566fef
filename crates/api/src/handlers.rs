use axum::{
    extract::{Path, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json},
};
use faucet_service::{gather_metrics, Faucet};
use faucet_types::{Address, OverlayTx, TransactionReceipt};
use faucet_watcher::BlockWatcher;
use std::sync::Arc;
use tracing::{error, info};

use crate::types::{ApiError, HealthResponse};

pub struct ApiState {
    pub faucet: Arc<Faucet>,
    pub watcher: Arc<BlockWatcher>,
    pub auth_token: Option<String>,
}

fn parse_address(address: &str) -> Result<Address, ApiError> {
    address.parse().map_err(|_| ApiError::invalid_address())
}

pub async fn create_overlay(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<OverlayTx>, ApiError> {
    let address = parse_address(&address)?;
    info!("overlay requested for {}", address);
    Ok(Json(state.faucet.create_overlay_tx(&address).await?))
}

pub async fn fund_bzz(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<TransactionReceipt>, ApiError> {
    let address = parse_address(&address)?;
    Ok(Json(state.faucet.fund_token(&address).await?))
}

pub async fn fund_native(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<TransactionReceipt>, ApiError> {
    let address = parse_address(&address)?;
    Ok(Json(state.faucet.fund_native(&address).await?))
}

pub async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    let running = state.watcher.is_running();
    Json(HealthResponse {
        status: if running { "healthy" } else { "degraded" }.to_string(),
        watcher_running: running,
        last_processed_block: state.watcher.last_processed_block(),
        listeners: state.watcher.listener_count(),
    })
}

pub async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let body = gather_metrics().map_err(|e| {
        error!("failed to encode metrics: {}", e);
        ApiError::internal()
    })?;
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
