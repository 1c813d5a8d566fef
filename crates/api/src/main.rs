use faucet_api::{create_router, ApiState, ServerConfig};
use faucet_service::{Faucet, FaucetConfig, LocalWallet, WalletConfig};
use faucet_watcher::{BlockWaiter, BlockWatcher, ChainConfig, RpcClient, WatcherConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let server_config = ServerConfig::default();
    let private_key = std::env::var("PRIVATE_KEY").map_err(|_| "PRIVATE_KEY is not set")?;

    let rpc = Arc::new(RpcClient::new(ChainConfig::default())?);
    let watcher = Arc::new(BlockWatcher::new(rpc.clone(), WatcherConfig::default()));
    watcher.start()?;

    let wallet = LocalWallet::connect(rpc, &private_key, WalletConfig::default()).await?;
    let faucet = Faucet::new(
        Arc::new(wallet),
        BlockWaiter::new(watcher.clone()),
        FaucetConfig::default(),
    );
    info!("faucet wallet {}", faucet.wallet_address());
    if server_config.auth_token.is_none() {
        info!("AUTH_TOKEN not set, funding routes are open");
    }

    let app = create_router(Arc::new(ApiState {
        faucet: Arc::new(faucet),
        watcher: watcher.clone(),
        auth_token: server_config.auth_token,
    }));

    let listener = TcpListener::bind(("0.0.0.0", server_config.port)).await?;
    info!("faucet listening on http://0.0.0.0:{}", server_config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    watcher.stop();
    info!("shut down");
    Ok(())
}
