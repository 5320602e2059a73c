use crate::store::UserId;
use std::path::PathBuf;
use thiserror::Error;

/// Application-wide error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Missing required configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("No wallet found for user {0}")]
    NotFound(UserId),

    #[error("Balance oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("User store at {path} is corrupt: {reason}")]
    StoreCorrupt { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Discord error: {0}")]
    Discord(#[from] serenity::Error),
}

impl AppError {
    pub fn oracle<S: Into<String>>(msg: S) -> Self {
        Self::OracleUnavailable(msg.into())
    }

    pub fn corrupt<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        Self::StoreCorrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors that should stop the process at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_) | Self::ConfigMissing(_) | Self::ConfigInvalid(_) | Self::StoreCorrupt { .. }
        )
    }

    /// Text shown to the chat user when an event fails.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "❌ No wallet found. Use /start to create one!",
            Self::OracleUnavailable(_) | Self::Http(_) => {
                "⚠️ Could not reach the Solana network right now. Please try again in a moment."
            }
            Self::InvalidAddress(_) => "❌ Your wallet address could not be read. Please contact support.",
            _ => "⚠️ Something went wrong. Please try again later.",
        }
    }
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
