use faucet_types::{Address, TxHash};
use faucet_watcher::{ChainError, WatcherError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaucetError {
    #[error("address {0} already has balance")]
    HasBalance(Address),

    #[error("invalid private key")]
    InvalidKey,

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("{0} amount not configured")]
    NotConfigured(&'static str),

    #[error("transaction {0} reverted")]
    TransactionFailed(TxHash),

    #[error("no receipt for transaction {0} in time")]
    ReceiptTimeout(TxHash),

    #[error("block {0} not observed in time")]
    BlockWaitTimeout(u64),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Watcher(#[from] WatcherError),
}
