//! Balance-driven feature gating.
//!
//! A user whose last observed balance reaches the configured minimum gets the
//! full feature set; everyone else only sees the deposit flow.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A gated bot capability. The id doubles as the button `custom_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Raid,
    Shill,
    Token,
    Wallet,
    Refer,
    Deposit,
}

impl Feature {
    /// Features unlocked by a funded wallet, in display order
    pub const FULL: [Feature; 5] = [
        Feature::Raid,
        Feature::Shill,
        Feature::Token,
        Feature::Wallet,
        Feature::Refer,
    ];

    pub const ALL: [Feature; 6] = [
        Feature::Raid,
        Feature::Shill,
        Feature::Token,
        Feature::Wallet,
        Feature::Refer,
        Feature::Deposit,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Raid => "raid",
            Self::Shill => "shill",
            Self::Token => "token",
            Self::Wallet => "wallet",
            Self::Refer => "refer",
            Self::Deposit => "deposit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Raid => "Raider Mode",
            Self::Shill => "Shill Mode",
            Self::Token => "Token Mode",
            Self::Wallet => "Wallet",
            Self::Refer => "Refer",
            Self::Deposit => "Deposit",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.id() == id)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

pub type FeatureSet = BTreeSet<Feature>;

/// Threshold rule mapping a balance to the features it unlocks
#[derive(Debug, Clone, PartialEq)]
pub struct AccessPolicy {
    min_balance: f64,
    unlocked: FeatureSet,
    locked: FeatureSet,
}

impl AccessPolicy {
    pub const DEFAULT_MIN_BALANCE: f64 = 0.01;

    pub fn new(
        min_balance: f64,
        unlocked: impl IntoIterator<Item = Feature>,
        locked: impl IntoIterator<Item = Feature>,
    ) -> Self {
        Self {
            min_balance,
            unlocked: unlocked.into_iter().collect(),
            locked: locked.into_iter().collect(),
        }
    }

    pub fn min_balance(&self) -> f64 {
        self.min_balance
    }

    pub fn is_unlocked(&self, balance: f64) -> bool {
        balance >= self.min_balance
    }

    pub fn features_for(&self, balance: f64) -> FeatureSet {
        if self.is_unlocked(balance) {
            self.unlocked.clone()
        } else {
            self.locked.clone()
        }
    }

    pub fn allows(&self, balance: f64, feature: Feature) -> bool {
        if self.is_unlocked(balance) {
            self.unlocked.contains(&feature)
        } else {
            self.locked.contains(&feature)
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_BALANCE, Feature::FULL, [Feature::Deposit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_boundary() {
        let policy = AccessPolicy::default();
        assert_eq!(
            policy.features_for(0.01),
            Feature::FULL.into_iter().collect::<FeatureSet>()
        );
        assert_eq!(
            policy.features_for(0.009999),
            FeatureSet::from([Feature::Deposit])
        );
        assert_eq!(policy.features_for(0.0), FeatureSet::from([Feature::Deposit]));
    }

    #[test]
    fn test_allows() {
        let policy = AccessPolicy::default();
        assert!(!policy.allows(0.0, Feature::Raid));
        assert!(policy.allows(0.0, Feature::Deposit));
        assert!(policy.allows(0.5, Feature::Raid));
        assert!(!policy.allows(0.5, Feature::Deposit));
    }

    #[test]
    fn test_custom_threshold() {
        let policy = AccessPolicy::new(1.0, [Feature::Raid], [Feature::Deposit, Feature::Wallet]);
        assert!(!policy.is_unlocked(0.5));
        assert_eq!(policy.features_for(1.0), FeatureSet::from([Feature::Raid]));
        assert!(policy.allows(0.5, Feature::Wallet));
    }

    #[test]
    fn test_feature_ids() {
        for feature in Feature::ALL {
            assert_eq!(Feature::from_id(feature.id()), Some(feature));
        }
        assert_eq!(Feature::from_id("settings"), None);
        assert_eq!(serde_json::to_string(&Feature::Raid).unwrap(), "\"raid\"");
    }

    proptest! {
        #[test]
        fn features_follow_threshold(balance in 0.0f64..1_000.0) {
            let policy = AccessPolicy::default();
            let features = policy.features_for(balance);
            if balance >= 0.01 {
                prop_assert_eq!(features, Feature::FULL.into_iter().collect::<FeatureSet>());
            } else {
                prop_assert_eq!(features, FeatureSet::from([Feature::Deposit]));
            }
        }
    }
}
