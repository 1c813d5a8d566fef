use crate::block_watcher::BlockWatcher;
use crate::error::{ChainError, WatcherError};
use crate::events::BlockSubscription;
use faucet_types::{BlockHash, BlockNumber};
use std::sync::Arc;
use tracing::debug;

/// How a wait on the event stream ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitResolution {
    /// The target block's own event arrived.
    Observed(BlockHash),
    /// The watcher was already at or past the target when the listener was
    /// registered, or a later block arrived first. Either way the target's
    /// own event was missed and the block has to be fetched directly.
    Elapsed { observed: BlockNumber },
}

/// Resolves the hash of a specific block once the watcher reaches it.
#[derive(Clone)]
pub struct BlockWaiter {
    watcher: Arc<BlockWatcher>,
}

impl BlockWaiter {
    pub fn new(watcher: Arc<BlockWatcher>) -> Self {
        Self { watcher }
    }

    pub fn watcher(&self) -> &Arc<BlockWatcher> {
        &self.watcher
    }

    /// Waits for block `target` and returns its hash.
    ///
    /// Never times out on its own: if the watcher is stopped before reaching
    /// `target` the future stays pending. Wrap it in `tokio::time::timeout`
    /// when a bound is needed.
    pub async fn wait_for_block(&self, target: BlockNumber) -> Result<BlockHash, WatcherError> {
        // Subscribe before anything else so the target cannot slip through
        // between a check and the registration.
        let subscription = self.watcher.subscribe();

        let resolution = match self.watcher.last_processed_block() {
            Some(last) if last >= target => {
                drop(subscription);
                WaitResolution::Elapsed { observed: last }
            }
            _ => Self::watch_for(subscription, target).await?,
        };

        match resolution {
            WaitResolution::Observed(hash) => {
                debug!("block {} observed on the event stream", target);
                Ok(hash)
            }
            WaitResolution::Elapsed { observed } => {
                debug!(
                    "block {} already elapsed (saw {}), fetching it directly",
                    target, observed
                );
                self.fetch_block_hash(target).await
            }
        }
    }

    /// Consumes `subscription` until it settles `target`; the listener is
    /// unregistered when this returns.
    pub async fn watch_for(
        mut subscription: BlockSubscription,
        target: BlockNumber,
    ) -> Result<WaitResolution, WatcherError> {
        while let Some(event) = subscription.recv().await {
            if event.number == target {
                return Ok(WaitResolution::Observed(event.hash));
            }
            if event.number > target {
                return Ok(WaitResolution::Elapsed {
                    observed: event.number,
                });
            }
        }

        Err(WatcherError::StreamClosed)
    }

    async fn fetch_block_hash(&self, target: BlockNumber) -> Result<BlockHash, WatcherError> {
        let hash = self
            .watcher
            .chain()
            .get_block_hash_by_number(target)
            .await?
            .ok_or(ChainError::BlockNotFound(target))?;
        Ok(hash)
    }
}
