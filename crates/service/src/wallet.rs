use async_trait::async_trait;
use faucet_types::{Address, TransactionReceipt, TxHash};
use faucet_watcher::RpcClient;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::config::WalletConfig;
use crate::error::FaucetError;
use crate::signer::{LegacyTransaction, LocalSigner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRequest {
    pub to: Address,
    pub value: u128,
    pub data: Vec<u8>,
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// The faucet's funded account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Wallet: Send + Sync {
    fn address(&self) -> Address;

    async fn get_balance(&self, address: &Address) -> Result<u128, FaucetError>;

    async fn gas_price(&self) -> Result<u128, FaucetError>;

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, FaucetError>;

    /// Waits until `hash` is mined. A reverted transaction is an error.
    async fn wait_for_receipt(&self, hash: &str) -> Result<TransactionReceipt, FaucetError>;
}

/// Signs transactions locally and broadcasts them over JSON-RPC.
pub struct LocalWallet {
    rpc: Arc<RpcClient>,
    signer: LocalSigner,
    chain_id: u64,
    config: WalletConfig,
    /// Next nonce to use; `None` means ask the node.
    nonce: Mutex<Option<u64>>,
}

impl LocalWallet {
    pub async fn connect(
        rpc: Arc<RpcClient>,
        private_key: &str,
        config: WalletConfig,
    ) -> Result<Self, FaucetError> {
        let signer = LocalSigner::from_hex(private_key)?;
        let chain_id = rpc.chain_id().await?;

        info!(
            "wallet {} connected to chain {} at {}",
            signer.address(),
            chain_id,
            rpc.url()
        );

        Ok(Self {
            rpc,
            signer,
            chain_id,
            config,
            nonce: Mutex::new(None),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }
}

#[async_trait]
impl Wallet for LocalWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    async fn get_balance(&self, address: &Address) -> Result<u128, FaucetError> {
        debug!("checking balance of {}", address);
        let balance = self.rpc.get_balance(address).await?;
        info!("balance of {} is {}", address, balance);
        Ok(balance)
    }

    async fn gas_price(&self) -> Result<u128, FaucetError> {
        Ok(self.rpc.gas_price().await?)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<TxHash, FaucetError> {
        // Held until the node accepted the transaction so concurrent sends
        // never share a nonce.
        let mut next_nonce = self.nonce.lock().await;
        let nonce = match *next_nonce {
            Some(nonce) => nonce,
            None => self.rpc.get_pending_nonce(&self.signer.address()).await?,
        };

        let signed = self.signer.sign(&LegacyTransaction {
            nonce,
            gas_price: request.gas_price,
            gas_limit: request.gas_limit,
            to: request.to,
            value: request.value,
            data: request.data,
            chain_id: self.chain_id,
        })?;

        match self.rpc.send_raw_transaction(&signed.raw).await {
            Ok(hash) => {
                *next_nonce = Some(nonce + 1);
                info!("sent transaction {} to {} (nonce {})", hash, request.to, nonce);
                Ok(hash)
            }
            Err(e) => {
                warn!("failed to send transaction {}: {}", signed.hash, e);
                *next_nonce = None;
                Err(e.into())
            }
        }
    }

    async fn wait_for_receipt(&self, hash: &str) -> Result<TransactionReceipt, FaucetError> {
        let deadline = Instant::now() + self.config.receipt_timeout();

        loop {
            if let Some(receipt) = self.rpc.get_transaction_receipt(hash).await? {
                if !receipt.status {
                    return Err(FaucetError::TransactionFailed(hash.to_string()));
                }
                debug!(
                    "transaction {} mined in block {}",
                    hash, receipt.block_number
                );
                return Ok(receipt);
            }

            if Instant::now() >= deadline {
                return Err(FaucetError::ReceiptTimeout(hash.to_string()));
            }
            sleep(self.config.receipt_poll_interval()).await;
        }
    }
}
