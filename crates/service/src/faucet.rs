use faucet_types::{Address, OverlayTx, TransactionReceipt};
use faucet_watcher::BlockWaiter;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::calldata::{erc20_transfer_calldata, intrinsic_gas, overlay_calldata};
use crate::config::FaucetConfig;
use crate::error::FaucetError;
use crate::metrics::{
    self, NATIVE_FUNDED, NATIVE_FUND_FAILED, OVERLAY_CREATED, OVERLAY_FAILED, TOKEN_FUNDED,
    TOKEN_FUND_FAILED,
};
use crate::wallet::{TransactionRequest, Wallet};

pub struct Faucet {
    wallet: Arc<dyn Wallet>,
    waiter: BlockWaiter,
    config: FaucetConfig,
}

impl Faucet {
    pub fn new(wallet: Arc<dyn Wallet>, waiter: BlockWaiter, config: FaucetConfig) -> Self {
        Self {
            wallet,
            waiter,
            config,
        }
    }

    pub fn config(&self) -> &FaucetConfig {
        &self.config
    }

    pub fn wallet_address(&self) -> Address {
        self.wallet.address()
    }

    /// Registers `address` as an overlay and proves the registration with
    /// the hash of the block after the one it landed in.
    pub async fn create_overlay_tx(&self, address: &Address) -> Result<OverlayTx, FaucetError> {
        let result = self.send_overlay_tx(address).await;
        metrics::record(&result, &OVERLAY_CREATED, &OVERLAY_FAILED);
        result
    }

    async fn send_overlay_tx(&self, address: &Address) -> Result<OverlayTx, FaucetError> {
        if self.wallet.get_balance(address).await? > 0 {
            info!("address {} already has balance", address);
            return Err(FaucetError::HasBalance(*address));
        }

        let data = overlay_calldata(address);
        let request = TransactionRequest {
            to: *address,
            value: 0,
            gas_limit: intrinsic_gas(&data),
            gas_price: self.wallet.gas_price().await?,
            data,
        };

        info!("sending overlay transaction to {}", address);
        let hash = self.wallet.send_transaction(request).await?;
        let receipt = self.wallet.wait_for_receipt(&hash).await?;

        let next_block = receipt.block_number + 1;
        debug!(
            "overlay transaction {} in block {}, waiting for block {}",
            receipt.transaction_hash, receipt.block_number, next_block
        );

        let next_block_hash = timeout(
            self.config.block_wait_timeout(),
            self.waiter.wait_for_block(next_block),
        )
        .await
        .map_err(|_| FaucetError::BlockWaitTimeout(next_block))??;

        Ok(OverlayTx {
            block_hash: receipt.block_hash,
            transaction_hash: receipt.transaction_hash,
            next_block_hash,
        })
    }

    pub async fn fund_native(&self, address: &Address) -> Result<TransactionReceipt, FaucetError> {
        let amount = self
            .config
            .funding
            .native_amount
            .ok_or(FaucetError::NotConfigured("native"))?;

        let result = self.transfer_native(address, amount).await;
        metrics::record(&result, &NATIVE_FUNDED, &NATIVE_FUND_FAILED);
        result
    }

    async fn transfer_native(
        &self,
        address: &Address,
        amount: u128,
    ) -> Result<TransactionReceipt, FaucetError> {
        let request = TransactionRequest {
            to: *address,
            value: amount,
            data: Vec::new(),
            gas_limit: intrinsic_gas(&[]),
            gas_price: self.wallet.gas_price().await?,
        };

        debug!("fund_native address {} amount {}", address, amount);
        let hash = self.wallet.send_transaction(request).await?;
        self.wallet.wait_for_receipt(&hash).await
    }

    pub async fn fund_token(&self, address: &Address) -> Result<TransactionReceipt, FaucetError> {
        let funding = &self.config.funding;
        let (Some(token), Some(amount)) = (funding.bzz_address, funding.bzz_amount) else {
            return Err(FaucetError::NotConfigured("bzz"));
        };

        let result = self.transfer_token(address, token, amount).await;
        metrics::record(&result, &TOKEN_FUNDED, &TOKEN_FUND_FAILED);
        result
    }

    async fn transfer_token(
        &self,
        address: &Address,
        token: Address,
        amount: u128,
    ) -> Result<TransactionReceipt, FaucetError> {
        let request = TransactionRequest {
            to: token,
            value: 0,
            data: erc20_transfer_calldata(address, amount),
            gas_limit: self.config.funding.token_gas_limit,
            gas_price: self.wallet.gas_price().await?,
        };

        debug!("fund_token address {} amount {}", address, amount);
        let hash = self.wallet.send_transaction(request).await?;
        self.wallet.wait_for_receipt(&hash).await
    }
}
