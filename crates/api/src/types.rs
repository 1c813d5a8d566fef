use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use faucet_service::FaucetError;
use faucet_types::BlockNumber;
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub watcher_running: bool,
    pub last_processed_block: Option<BlockNumber>,
    pub listeners: usize,
}

/// Error side of every handler.
pub(crate) struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_address() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid address")
    }

    pub(crate) fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }

    pub(crate) fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized")
    }
}

impl From<FaucetError> for ApiError {
    fn from(e: FaucetError) -> Self {
        match e {
            FaucetError::NotConfigured(_) => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "amount not configured")
            }
            other => {
                error!("request failed: {}", other);
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
