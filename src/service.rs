//! User-facing wallet operations composed from the store, the balance
//! oracle and the access policy.

use crate::access::{AccessPolicy, Feature, FeatureSet};
use crate::error::{AppError, AppResult};
use crate::ledger::BalanceOracle;
use crate::store::{UserId, UserRecord, UserStore};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of `ensure_wallet`.
///
/// `created` is true exactly once per user. Only then may the secret key be
/// shown to them.
#[derive(Debug, Clone)]
pub struct EnsuredWallet {
    pub record: UserRecord,
    pub created: bool,
}

/// Balance and unlocked features after a refresh
#[derive(Debug, Clone, PartialEq)]
pub struct AccessReport {
    pub address: String,
    pub balance: f64,
    pub features: FeatureSet,
    pub unlocked: bool,
}

#[derive(Debug, Clone)]
pub struct WalletService {
    store: Arc<UserStore>,
    oracle: BalanceOracle,
    policy: AccessPolicy,
}

impl WalletService {
    pub fn new(store: Arc<UserStore>, oracle: BalanceOracle, policy: AccessPolicy) -> Self {
        Self {
            store,
            oracle,
            policy,
        }
    }

    pub fn policy(&self) -> &AccessPolicy {
        &self.policy
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub async fn ensure_wallet(
        &self,
        user_id: &UserId,
        display_name: &str,
    ) -> AppResult<EnsuredWallet> {
        let (record, created) = self.store.get_or_create(user_id, display_name).await?;
        if !created {
            info!(user_id = %user_id, "Returning user");
        }
        Ok(EnsuredWallet { record, created })
    }

    /// Fetch the on-chain balance, store it and report the unlocked features.
    ///
    /// On oracle failure the stored balance is left as it was.
    pub async fn refresh_access(&self, user_id: &UserId) -> AppResult<AccessReport> {
        let record = self
            .store
            .get(user_id)
            .await
            .ok_or_else(|| AppError::NotFound(user_id.clone()))?;

        let balance = match self.oracle.fetch_balance(&record.address).await {
            Ok(balance) => balance,
            Err(e) => {
                warn!(user_id = %user_id, address = %record.address, "Balance refresh failed: {}", e);
                return Err(e);
            }
        };

        let updated = self.store.set_balance(user_id, balance).await?;
        let report = AccessReport {
            address: updated.address,
            balance: updated.balance,
            features: self.policy.features_for(updated.balance),
            unlocked: self.policy.is_unlocked(updated.balance),
        };

        info!(
            user_id = %user_id,
            balance = report.balance,
            unlocked = report.unlocked,
            "Balance refreshed"
        );
        Ok(report)
    }

    pub async fn deposit_address(&self, user_id: &UserId) -> AppResult<String> {
        self.store
            .get(user_id)
            .await
            .map(|record| record.address)
            .ok_or_else(|| AppError::NotFound(user_id.clone()))
    }

    /// Whether the user may use `feature`, judged from the stored balance.
    /// Unknown users are treated as having no balance.
    pub async fn check_feature(&self, user_id: &UserId, feature: Feature) -> bool {
        let balance = self
            .store
            .get(user_id)
            .await
            .map(|record| record.balance)
            .unwrap_or(0.0);
        self.policy.allows(balance, feature)
    }
}
