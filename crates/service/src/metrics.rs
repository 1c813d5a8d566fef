//! Prometheus counters for faucet operations.
//!
//! A request refused before anything is sent (unconfigured amount, invalid
//! address) counts as neither success nor failure.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

lazy_static! {
    /// Registry served on the metrics endpoint.
    pub static ref REGISTRY: Registry = Registry::new();

    pub static ref OVERLAY_CREATED: IntCounter =
        register_counter("faucet_overlay_created_total", "Overlay transactions created");
    pub static ref OVERLAY_FAILED: IntCounter =
        register_counter("faucet_overlay_failed_total", "Overlay transactions that failed");
    pub static ref TOKEN_FUNDED: IntCounter =
        register_counter("faucet_bzz_funded_total", "Token funding transfers sent");
    pub static ref TOKEN_FUND_FAILED: IntCounter =
        register_counter("faucet_bzz_fund_failed_total", "Token funding transfers that failed");
    pub static ref NATIVE_FUNDED: IntCounter =
        register_counter("faucet_native_funded_total", "Native funding transfers sent");
    pub static ref NATIVE_FUND_FAILED: IntCounter =
        register_counter("faucet_native_fund_failed_total", "Native funding transfers that failed");
}

fn register_counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("counter name and help are valid");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("counter is registered once");
    counter
}

/// Bumps `success` or `failure` depending on `result`.
pub(crate) fn record<T, E>(result: &Result<T, E>, success: &IntCounter, failure: &IntCounter) {
    match result {
        Ok(_) => success.inc(),
        Err(_) => failure.inc(),
    }
}

/// Encodes every registered metric in the Prometheus text format.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    // force registration so zero-valued counters are exported too
    for counter in [
        &*OVERLAY_CREATED,
        &*OVERLAY_FAILED,
        &*TOKEN_FUNDED,
        &*TOKEN_FUND_FAILED,
        &*NATIVE_FUNDED,
        &*NATIVE_FUND_FAILED,
    ] {
        let _ = counter.get();
    }

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
