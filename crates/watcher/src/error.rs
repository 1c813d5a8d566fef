use faucet_types::BlockNumber;
use thiserror::Error;

/// Failures talking to the chain. All of them are recoverable: the watcher
/// retries on its next tick and callers decide for themselves.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("block {0} not found")]
    BlockNotFound(BlockNumber),
}

#[derive(Debug, Error)]
pub enum WatcherError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("block event stream closed")]
    StreamClosed,

    #[error("block watcher is already running")]
    AlreadyRunning,
}
