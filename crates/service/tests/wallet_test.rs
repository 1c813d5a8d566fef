// LocalWallet against a mocked JSON-RPC node.

use faucet_service::{FaucetError, LocalWallet, TransactionRequest, Wallet, WalletConfig};
use faucet_types::Address;
use faucet_watcher::{ChainConfig, RpcClient};
use mockito::{Matcher, Mock, Server};
use serde_json::{json, Value};
use std::sync::Arc;

const KEY: &str = "0x4646464646464646464646464646464646464646464646464646464646464646";

fn wallet_config() -> WalletConfig {
    WalletConfig {
        receipt_timeout_seconds: 1,
        receipt_poll_interval_ms: 10,
    }
}

fn rpc_mock(server: &mut Server, method: &str, result: Value) -> Mock {
    server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": method })))
        .with_body(json!({ "jsonrpc": "2.0", "id": 1, "result": result }).to_string())
}

async fn mock_rpc(server: &mut Server, method: &str, result: Value) -> Mock {
    rpc_mock(server, method, result).create_async().await
}

async fn connect(server: &mut Server) -> LocalWallet {
    mock_rpc(server, "eth_chainId", json!("0x7a69")).await;
    let rpc = RpcClient::new(ChainConfig {
        rpc_url: server.url(),
        rpc_timeout_seconds: 5,
        max_retries: 0,
        retry_delay_seconds: 0,
    })
    .unwrap();
    LocalWallet::connect(Arc::new(rpc), KEY, wallet_config())
        .await
        .unwrap()
}

fn request() -> TransactionRequest {
    TransactionRequest {
        to: "0x3535353535353535353535353535353535353535".parse().unwrap(),
        value: 1,
        data: vec![],
        gas_limit: 21_000,
        gas_price: 1,
    }
}

#[tokio::test]
async fn test_connect_reads_chain_id_and_derives_address() {
    let mut server = Server::new_async().await;
    let wallet = connect(&mut server).await;

    assert_eq!(wallet.chain_id(), 31337);
    let expected: Address = "0x9d8a62f656a8d1615c1294fd71e9cfb3e4855a4f".parse().unwrap();
    assert_eq!(wallet.address(), expected);
}

#[tokio::test]
async fn test_nonce_is_fetched_once_then_incremented() {
    let mut server = Server::new_async().await;
    let wallet = connect(&mut server).await;

    let nonce = rpc_mock(&mut server, "eth_getTransactionCount", json!("0x5"))
        .expect(1)
        .create_async()
        .await;
    let send = rpc_mock(&mut server, "eth_sendRawTransaction", json!("0xabc"))
        .expect(2)
        .create_async()
        .await;

    assert_eq!(wallet.send_transaction(request()).await.unwrap(), "0xabc");
    assert_eq!(wallet.send_transaction(request()).await.unwrap(), "0xabc");

    // the second send used the cached nonce
    nonce.assert_async().await;
    send.assert_async().await;
}

#[tokio::test]
async fn test_wait_for_receipt_polls_until_mined() {
    let mut server = Server::new_async().await;
    let wallet = connect(&mut server).await;

    let pending = mock_rpc(&mut server, "eth_getTransactionReceipt", Value::Null).await;
    let waiting = tokio::spawn(async move { wallet.wait_for_receipt("0xabc").await });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    pending.remove_async().await;
    mock_rpc(
        &mut server,
        "eth_getTransactionReceipt",
        json!({
            "transactionHash": "0xabc",
            "blockNumber": "0x2a",
            "blockHash": "0xb10c",
            "status": "0x1"
        }),
    )
    .await;

    let receipt = waiting.await.unwrap().unwrap();
    assert_eq!(receipt.block_number, 42);
    assert_eq!(receipt.block_hash, "0xb10c");
}

#[tokio::test]
async fn test_wait_for_receipt_times_out() {
    let mut server = Server::new_async().await;
    let wallet = connect(&mut server).await;
    mock_rpc(&mut server, "eth_getTransactionReceipt", Value::Null).await;

    assert!(matches!(
        wallet.wait_for_receipt("0xabc").await,
        Err(FaucetError::ReceiptTimeout(hash)) if hash == "0xabc"
    ));
}

#[tokio::test]
async fn test_rejected_send_refetches_nonce() {
    let mut server = Server::new_async().await;
    let wallet = connect(&mut server).await;

    let nonce = rpc_mock(&mut server, "eth_getTransactionCount", json!("0x0"))
        .expect(2)
        .create_async()
        .await;
    let rejected = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_sendRawTransaction" })))
        .with_body(
            json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": -32000, "message": "nonce too low" } })
                .to_string(),
        )
        .create_async()
        .await;

    assert!(matches!(
        wallet.send_transaction(request()).await,
        Err(FaucetError::Chain(_))
    ));
    rejected.remove_async().await;
    mock_rpc(&mut server, "eth_sendRawTransaction", json!("0xabc")).await;

    wallet.send_transaction(request()).await.unwrap();
    nonce.assert_async().await;
}
