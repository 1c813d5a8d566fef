mod calldata;
mod config;
mod error;
mod faucet;
pub mod metrics;
mod rlp;
mod signer;
mod wallet;


pub use calldata::{erc20_transfer_calldata, intrinsic_gas, overlay_calldata};
pub use config::{FaucetConfig, FundingConfig, WalletConfig};
pub use error::FaucetError;
pub use faucet::Faucet;
pub use metrics::gather_metrics;
pub use signer::{LegacyTransaction, LocalSigner, SignedTransaction};
pub use wallet::{LocalWallet, TransactionRequest, Wallet};
