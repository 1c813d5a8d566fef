use faucet_types::{gas, Address};
use serde::{Deserialize, Serialize};
use std::time::Duration;

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_opt<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingConfig {
    /// Token contract used by `fund_token`.
    pub bzz_address: Option<Address>,
    pub bzz_amount: Option<u128>,
    pub native_amount: Option<u128>,
    pub token_gas_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub receipt_timeout_seconds: u64,
    pub receipt_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaucetConfig {
    pub funding: FundingConfig,
    pub block_wait_timeout_seconds: u64,
}

impl WalletConfig {
    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_seconds)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms.max(1))
    }
}

impl FaucetConfig {
    pub fn block_wait_timeout(&self) -> Duration {
        Duration::from_secs(self.block_wait_timeout_seconds)
    }
}

impl Default for FundingConfig {
    fn default() -> Self {
        Self {
            bzz_address: env_opt("BZZ_ADDRESS"),
            bzz_amount: env_opt("FUND_BZZ_AMOUNT"),
            native_amount: env_opt("FUND_NATIVE_AMOUNT"),
            token_gas_limit: env_or("TOKEN_GAS_LIMIT", gas::CONTRACT_CALL_GAS_LIMIT),
        }
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            receipt_timeout_seconds: env_or("RECEIPT_TIMEOUT_SECONDS", 120),
            receipt_poll_interval_ms: env_or("RECEIPT_POLL_INTERVAL_MS", 1_000),
        }
    }
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            funding: FundingConfig::default(),
            block_wait_timeout_seconds: env_or("BLOCK_WAIT_TIMEOUT_SECONDS", 120),
        }
    }
}
