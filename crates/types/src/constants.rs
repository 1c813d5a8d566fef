pub mod address {
    pub const ADDRESS_SIZE: usize = 20;
    pub const HEX_LENGTH: usize = ADDRESS_SIZE * 2;
}

pub mod watcher {
    /// Polling interval used when none is configured.
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
}

pub mod gas {
    pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 21_000;
    pub const CONTRACT_CALL_GAS_LIMIT: u64 = 100_000;
}
