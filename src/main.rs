use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};
use vortex_bot::{
    bot,
    config::AppConfig,
    ledger::{BalanceOracle, SolanaRpcClient},
    logging,
    service::WalletService,
    store::UserStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real environment variables win
    let dotenv = dotenvy::dotenv();

    // Load configuration before anything touches the network
    let config = match AppConfig::init() {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(false);
            error!("Refusing to start: {}", e);
            if matches!(e, vortex_bot::AppError::ConfigMissing(_)) {
                error!("Set VORTEX_BOT__TOKEN (or BOT_TOKEN) to your Discord bot token");
            }
            return Err(e.into());
        }
    };

    logging::init_logging(config.log.json);
    info!("Starting Vortex bot v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = dotenv {
        if !e.not_found() {
            warn!("Ignoring unreadable .env file: {}", e);
        }
    }

    // A corrupt snapshot stops startup instead of discarding wallets
    let store = Arc::new(UserStore::open(&config.store.path).await?);
    warn!(
        "Private keys are stored unencrypted in {}; restrict access to this file",
        store.path().display()
    );

    let rpc = SolanaRpcClient::new(&config.ledger)?;
    info!("Solana RPC endpoint: {}", rpc.url());
    let oracle = BalanceOracle::new(
        Arc::new(rpc),
        Duration::from_secs(config.ledger.timeout_secs),
    );

    let service = WalletService::new(store, oracle, config.access_policy());

    match bot::start_bot_with_token(service, config.bot.guild_id, &config.bot.token).await {
        Ok(()) => info!("Discord bot shut down gracefully"),
        Err(e) => {
            error!("Discord bot error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
