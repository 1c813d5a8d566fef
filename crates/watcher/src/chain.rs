use async_trait::async_trait;
use faucet_types::{BlockHash, BlockNumber};

use crate::error::ChainError;

/// Read access to the chain head and block hashes.
#[async_trait]
pub trait ChainAccessor: Send + Sync {
    async fn get_current_block_number(&self) -> Result<BlockNumber, ChainError>;

    /// `Ok(None)` when the node does not know the block yet.
    async fn get_block_hash_by_number(
        &self,
        number: BlockNumber,
    ) -> Result<Option<BlockHash>, ChainError>;
}
