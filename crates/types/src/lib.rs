mod address;
mod constants;

pub use address::{Address, AddressError};
pub use constants::{gas, watcher};

use serde::{Deserialize, Serialize};

pub type BlockNumber = u64;

/// `0x`-prefixed hex hash as reported by the node.
pub type BlockHash = String;
pub type TxHash = String;

/// One block observed by the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub number: BlockNumber,
    pub hash: BlockHash,
}

impl BlockEvent {
    pub fn new(number: BlockNumber, hash: impl Into<BlockHash>) -> Self {
        Self {
            number,
            hash: hash.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReceipt {
    pub transaction_hash: TxHash,
    pub block_number: BlockNumber,
    pub block_hash: BlockHash,
    /// `false` when the transaction was included but reverted.
    pub status: bool,
}

/// Proof that an overlay registration transaction landed and that at least
/// one further block was produced after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayTx {
    pub block_hash: BlockHash,
    pub transaction_hash: TxHash,
    pub next_block_hash: BlockHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_tx_serializes_camel_case() {
        let tx = OverlayTx {
            block_hash: "0xaa".to_string(),
            transaction_hash: "0xbb".to_string(),
            next_block_hash: "0xcc".to_string(),
        };
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["blockHash"], "0xaa");
        assert_eq!(json["transactionHash"], "0xbb");
        assert_eq!(json["nextBlockHash"], "0xcc");
    }

    #[test]
    fn test_constant_groups_are_exported_beside_address() {
        assert_eq!(gas::NATIVE_TRANSFER_GAS_LIMIT, 21_000);
        assert_eq!(watcher::DEFAULT_POLL_INTERVAL_MS, 5_000);
        assert_eq!(
            std::mem::size_of::<Address>(),
            constants::address::ADDRESS_SIZE
        );
    }
}
