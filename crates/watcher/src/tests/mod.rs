
use crate::testing::MockChain;
use crate::{BlockSubscription, BlockWatcher, WatcherConfig};
use faucet_types::{BlockEvent, BlockNumber};
use std::sync::Arc;

fn watcher_on(chain: &Arc<MockChain>) -> Arc<BlockWatcher> {
    Arc::new(BlockWatcher::new(
        chain.clone(),
        WatcherConfig {
            poll_interval_ms: 10,
        },
    ))
}

fn drain(subscription: &mut BlockSubscription) -> Vec<BlockNumber> {
    let mut numbers = Vec::new();
    while let Some(BlockEvent { number, hash }) = subscription.try_recv() {
        assert_eq!(hash, MockChain::hash_for(number));
        numbers.push(number);
    }
    numbers
}
