use crate::chain::ChainAccessor;
use crate::config::WatcherConfig;
use crate::error::{ChainError, WatcherError};
use crate::events::{BlockEventBus, BlockSubscription, ListenerId};
use faucet_types::{BlockEvent, BlockHash, BlockNumber};
use std::sync::{Arc, Mutex as StdMutex, PoisonError, Weak};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
struct WatcherState {
    /// Next block number to emit; the last processed block is the one before
    /// it. `None` until the first successful head query.
    next_block: Option<BlockNumber>,
}

/// Result of one `check` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Another check held the lock; this one did nothing.
    Skipped,
    CaughtUp { emitted: u64 },
    /// The cycle aborted after emitting `emitted` blocks. The rest is retried
    /// on the next check.
    Failed { emitted: u64 },
}

/// Polls the chain head and emits one [`BlockEvent`] per block number, in
/// ascending order and without gaps.
pub struct BlockWatcher {
    chain: Arc<dyn ChainAccessor>,
    config: WatcherConfig,
    state: Mutex<WatcherState>,
    progress: watch::Sender<Option<BlockNumber>>,
    events: BlockEventBus,
    timer: StdMutex<Option<JoinHandle<()>>>,
}

impl BlockWatcher {
    pub fn new(chain: Arc<dyn ChainAccessor>, config: WatcherConfig) -> Self {
        let (progress, _) = watch::channel(None);
        Self {
            chain,
            config,
            state: Mutex::new(WatcherState::default()),
            progress,
            events: BlockEventBus::new(),
            timer: StdMutex::new(None),
        }
    }

    pub fn chain(&self) -> &Arc<dyn ChainAccessor> {
        &self.chain
    }

    pub fn subscribe(&self) -> BlockSubscription {
        self.events.subscribe()
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn listener_count(&self) -> usize {
        self.events.listener_count()
    }

    /// Highest block number emitted so far.
    pub fn last_processed_block(&self) -> Option<BlockNumber> {
        *self.progress.borrow()
    }

    /// Watch channel updated every time a block is emitted.
    pub fn progress(&self) -> watch::Receiver<Option<BlockNumber>> {
        self.progress.subscribe()
    }

    /// Runs one poll cycle. If a cycle is already in flight the call returns
    /// [`PollOutcome::Skipped`] immediately instead of waiting for it.
    pub async fn check(&self) -> PollOutcome {
        let Ok(mut state) = self.state.try_lock() else {
            debug!("block check already in progress, skipping");
            return PollOutcome::Skipped;
        };

        let mut emitted = 0;
        match self.catch_up(&mut state, &mut emitted).await {
            Ok(()) => PollOutcome::CaughtUp { emitted },
            Err(e) => {
                error!("failed to check blocks: {}", e);
                PollOutcome::Failed { emitted }
            }
        }
    }

    async fn catch_up(
        &self,
        state: &mut WatcherState,
        emitted: &mut u64,
    ) -> Result<(), WatcherError> {
        let head = self.chain.get_current_block_number().await?;

        // First poll: start at the current head, never replay history.
        let next = *state.next_block.get_or_insert(head);

        if head < next {
            // A lagging node behind a load balancer can report an older head.
            debug!("head {} is behind next block {}, nothing to do", head, next);
            return Ok(());
        }

        debug!("checking blocks {} - {}", next, head);

        for current in next..=head {
            let hash = self
                .chain
                .get_block_hash_by_number(current)
                .await?
                .ok_or(ChainError::BlockNotFound(current))?;

            self.handle_block(current, hash);
            state.next_block = Some(current + 1);
            self.progress.send_replace(Some(current));
            *emitted += 1;
        }

        Ok(())
    }

    fn handle_block(&self, number: BlockNumber, hash: BlockHash) {
        debug!("block hash for block {} is {}", number, hash);
        let listeners = self.events.emit(&BlockEvent { number, hash });
        debug!("emitted block {} to {} listeners", number, listeners);
    }

    /// Starts polling: one check right away, then one per interval. Each tick
    /// runs its check on its own task so a slow cycle makes the next tick hit
    /// the lock and get dropped.
    pub fn start(self: &Arc<Self>) -> Result<(), WatcherError> {
        let mut timer = self.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if timer.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Err(WatcherError::AlreadyRunning);
        }

        let period = self.config.poll_interval();
        let watcher: Weak<Self> = Arc::downgrade(self);

        info!("starting block watcher (interval: {:?})", period);

        *timer = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let Some(watcher) = watcher.upgrade() else {
                    warn!("block watcher dropped, stopping timer");
                    break;
                };

                tokio::spawn(async move {
                    watcher.check().await;
                });
            }
        }));

        Ok(())
    }

    /// Stops scheduling new checks. A check already running finishes its
    /// range. Returns `false` if the watcher was not running.
    pub fn stop(&self) -> bool {
        let handle = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                info!("block watcher stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for BlockWatcher {
    fn drop(&mut self) {
        if let Some(handle) = self
            .timer
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}
