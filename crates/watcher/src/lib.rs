mod block_waiter;
mod block_watcher;
mod chain;
mod config;
mod error;
mod events;
mod rpc_client;
pub mod testing;

#[cfg(test)]
mod tests;

pub use block_waiter::{BlockWaiter, WaitResolution};
pub use block_watcher::{BlockWatcher, PollOutcome};
pub use chain::ChainAccessor;
pub use config::{ChainConfig, WatcherConfig};
pub use error::{ChainError, WatcherError};
pub use events::{BlockEventBus, BlockSubscription, ListenerId};
pub use rpc_client::RpcClient;
