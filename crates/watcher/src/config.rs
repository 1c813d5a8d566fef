use faucet_types::watcher::DEFAULT_POLL_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Connection settings for the JSON-RPC node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub rpc_timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    pub poll_interval_ms: u64,
}

impl WatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        // tokio's interval panics on a zero period
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: std::env::var("RPC_URL")
                .unwrap_or_else(|_| "http://localhost:8545".to_string()),
            rpc_timeout_seconds: env_or("RPC_TIMEOUT_SECONDS", 30),
            max_retries: env_or("MAX_RETRIES", 3),
            retry_delay_seconds: env_or("RETRY_DELAY_SECONDS", 1),
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: env_or("BLOCK_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
        }
    }
}
