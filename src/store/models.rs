use crate::wallet::WalletKeys;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable chat identity of a user, stored as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One user's wallet as persisted in the snapshot.
///
/// Field names on disk are `username`, `solAddress`, `privateKey` and
/// `balance`. The snake_case spellings are accepted when loading.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "username")]
    pub display_name: String,
    #[serde(rename = "solAddress", alias = "sol_address")]
    pub address: String,
    /// Plaintext base-58 keypair
    #[serde(rename = "privateKey", alias = "private_key")]
    pub secret_key: String,
    /// Last observed balance in SOL
    #[serde(default)]
    pub balance: f64,
}

impl UserRecord {
    pub fn new(display_name: &str, keys: WalletKeys) -> Self {
        Self {
            display_name: display_name.to_string(),
            address: keys.address,
            secret_key: keys.secret_key,
            balance: 0.0,
        }
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("display_name", &self.display_name)
            .field("address", &self.address)
            .field("balance", &self.balance)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_disk_field_names() {
        let record = UserRecord {
            display_name: "alice".to_string(),
            address: "addr".to_string(),
            secret_key: "secret".to_string(),
            balance: 0.5,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "alice",
                "solAddress": "addr",
                "privateKey": "secret",
                "balance": 0.5
            })
        );
    }

    #[test]
    fn test_snake_case_fields_accepted() {
        let record: UserRecord = serde_json::from_str(
            r#"{"username": "bob", "sol_address": "addr", "private_key": "secret", "balance": 0.0}"#,
        )
        .unwrap();
        assert_eq!(record.address, "addr");
        assert_eq!(record.secret_key, "secret");
    }

    #[test]
    fn test_user_id_is_a_string_key() {
        let id = UserId::from(42u64);
        assert_eq!(id.as_str(), "42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"42\"");
        assert_eq!(id, UserId::from("42"));
    }
}
