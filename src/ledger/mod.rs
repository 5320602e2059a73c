pub mod client;

pub use client::SolanaRpcClient;

use crate::error::{AppError, AppResult};
use crate::wallet::KeyGenerator;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Lamports in one SOL
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}

/// Anything that can report the raw lamport balance of an address.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    async fn lamports(&self, address: &str) -> AppResult<u64>;
}

/// Confirmed balance lookups in whole SOL, bounded by a timeout.
#[derive(Clone)]
pub struct BalanceOracle {
    source: Arc<dyn BalanceSource>,
    timeout: Duration,
}

impl std::fmt::Debug for BalanceOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceOracle")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BalanceOracle {
    pub fn new(source: Arc<dyn BalanceSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub async fn fetch_balance(&self, address: &str) -> AppResult<f64> {
        KeyGenerator::validate_address(address)?;

        match tokio::time::timeout(self.timeout, self.source.lamports(address)).await {
            Ok(Ok(lamports)) => Ok(lamports_to_sol(lamports)),
            Ok(Err(AppError::OracleUnavailable(reason))) => Err(AppError::OracleUnavailable(reason)),
            Ok(Err(e)) => Err(AppError::oracle(e.to_string())),
            Err(_) => {
                warn!(address, "Balance lookup timed out after {:?}", self.timeout);
                Err(AppError::oracle(format!("timed out after {:?}", self.timeout)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(u64);

    #[async_trait]
    impl BalanceSource for Fixed {
        async fn lamports(&self, _address: &str) -> AppResult<u64> {
            Ok(self.0)
        }
    }

    struct Hang;

    #[async_trait]
    impl BalanceSource for Hang {
        async fn lamports(&self, _address: &str) -> AppResult<u64> {
            std::future::pending::<AppResult<u64>>().await
        }
    }

    struct Broken;

    #[async_trait]
    impl BalanceSource for Broken {
        async fn lamports(&self, _address: &str) -> AppResult<u64> {
            Err(AppError::Io(std::io::Error::other("connection reset")))
        }
    }

    fn address() -> String {
        KeyGenerator::generate().address
    }

    #[test]
    fn test_lamport_conversion() {
        assert_eq!(lamports_to_sol(5_000_000), 0.005);
        assert_eq!(lamports_to_sol(20_000_000), 0.02);
        assert_eq!(lamports_to_sol(LAMPORTS_PER_SOL), 1.0);
    }

    #[tokio::test]
    async fn test_fetch_converts_to_sol() {
        let oracle = BalanceOracle::new(Arc::new(Fixed(1_500_000_000)), Duration::from_secs(1));
        assert_eq!(oracle.fetch_balance(&address()).await.unwrap(), 1.5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_is_unavailable() {
        let oracle = BalanceOracle::new(Arc::new(Hang), Duration::from_secs(5));
        let err = oracle.fetch_balance(&address()).await.unwrap_err();
        assert!(matches!(err, AppError::OracleUnavailable(_)));
    }

    #[tokio::test]
    async fn test_source_errors_are_unavailable() {
        let oracle = BalanceOracle::new(Arc::new(Broken), Duration::from_secs(1));
        let err = oracle.fetch_balance(&address()).await.unwrap_err();
        assert!(matches!(err, AppError::OracleUnavailable(_)));
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected_before_lookup() {
        let oracle = BalanceOracle::new(Arc::new(Fixed(1)), Duration::from_secs(1));
        let err = oracle.fetch_balance("not an address").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidAddress(_)));
    }
}
