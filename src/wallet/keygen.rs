use crate::error::{AppError, AppResult};
use ed25519_dalek::{SigningKey, KEYPAIR_LENGTH, PUBLIC_KEY_LENGTH};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

/// A freshly generated Solana wallet: base-58 address plus the base-58
/// encoded 64-byte keypair (secret half followed by public half).
#[derive(Clone, PartialEq, Eq)]
pub struct WalletKeys {
    pub address: String,
    pub secret_key: String,
}

impl std::fmt::Debug for WalletKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletKeys")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

pub struct KeyGenerator;

impl KeyGenerator {
    /// Generate a new ed25519 keypair from OS entropy.
    pub fn generate() -> WalletKeys {
        let signing_key = SigningKey::generate(&mut OsRng);
        let keypair = Zeroizing::new(signing_key.to_keypair_bytes());

        WalletKeys {
            address: bs58::encode(signing_key.verifying_key().as_bytes()).into_string(),
            secret_key: bs58::encode(&keypair[..]).into_string(),
        }
    }

    /// Check that a string is a base-58 encoded 32-byte public key.
    pub fn validate_address(address: &str) -> AppResult<()> {
        let decoded = bs58::decode(address)
            .into_vec()
            .map_err(|e| AppError::InvalidAddress(format!("{}: {}", address, e)))?;

        if decoded.len() != PUBLIC_KEY_LENGTH {
            return Err(AppError::InvalidAddress(format!(
                "{}: expected {} bytes, got {}",
                address,
                PUBLIC_KEY_LENGTH,
                decoded.len()
            )));
        }
        Ok(())
    }

    /// True when `secret_key` is a well-formed keypair whose public half is `address`.
    pub fn keys_match(address: &str, secret_key: &str) -> bool {
        let decoded = match bs58::decode(secret_key).into_vec() {
            Ok(bytes) => Zeroizing::new(bytes),
            Err(_) => return false,
        };

        let bytes: &[u8; KEYPAIR_LENGTH] = match decoded.as_slice().try_into() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        // from_keypair_bytes rejects a public half that does not match the secret
        match SigningKey::from_keypair_bytes(bytes) {
            Ok(signing_key) => {
                bs58::encode(signing_key.verifying_key().as_bytes()).into_string() == address
            }
            Err(_) => false,
        }
    }
}
