//! In-memory chain for tests.

use crate::chain::ChainAccessor;
use crate::error::ChainError;
use async_trait::async_trait;
use faucet_types::{BlockHash, BlockNumber};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Default)]
struct MockChainState {
    head: BlockNumber,
    failing_blocks: HashSet<BlockNumber>,
    fail_head_query: bool,
    head_queries: usize,
    hash_requests: Vec<BlockNumber>,
    head_gate: Option<Arc<Notify>>,
}

/// A chain whose head is set by the test. Block `n` has hash
/// [`MockChain::hash_for`]`(n)`; blocks above the head do not exist.
#[derive(Default)]
pub struct MockChain {
    state: Mutex<MockChainState>,
}

impl MockChain {
    pub fn new(head: BlockNumber) -> Self {
        let chain = Self::default();
        chain.set_head(head);
        chain
    }

    pub fn hash_for(number: BlockNumber) -> BlockHash {
        format!("0x{:064x}", number)
    }

    fn state(&self) -> MutexGuard<'_, MockChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_head(&self, head: BlockNumber) {
        self.state().head = head;
    }

    pub fn head(&self) -> BlockNumber {
        self.state().head
    }

    /// Makes hash lookups for `number` fail until [`MockChain::heal_block`].
    pub fn fail_block(&self, number: BlockNumber) {
        self.state().failing_blocks.insert(number);
    }

    pub fn heal_block(&self, number: BlockNumber) {
        self.state().failing_blocks.remove(&number);
    }

    pub fn fail_head_query(&self, fail: bool) {
        self.state().fail_head_query = fail;
    }

    pub fn head_queries(&self) -> usize {
        self.state().head_queries
    }

    /// Block numbers whose hash was requested, in request order.
    pub fn hash_requests(&self) -> Vec<BlockNumber> {
        self.state().hash_requests.clone()
    }

    /// Holds every head query until the returned gate is notified.
    pub fn gate_head_queries(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state().head_gate = Some(gate.clone());
        gate
    }

    pub fn open_head_queries(&self) {
        if let Some(gate) = self.state().head_gate.take() {
            gate.notify_waiters();
            gate.notify_one();
        }
    }
}

#[async_trait]
impl ChainAccessor for MockChain {
    async fn get_current_block_number(&self) -> Result<BlockNumber, ChainError> {
        let gate = {
            let mut state = self.state();
            state.head_queries += 1;
            state.head_gate.clone()
        };

        if let Some(gate) = gate {
            gate.notified().await;
        }

        let state = self.state();
        if state.fail_head_query {
            return Err(ChainError::InvalidResponse("head query failed".to_string()));
        }
        Ok(state.head)
    }

    async fn get_block_hash_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<BlockHash>, ChainError> {
        let mut state = self.state();
        state.hash_requests.push(number);

        if state.failing_blocks.contains(&number) {
            return Err(ChainError::Rpc {
                code: -32000,
                message: format!("failed to fetch block {}", number),
            });
        }

        if number > state.head {
            return Ok(None);
        }

        Ok(Some(Self::hash_for(number)))
    }
}
