use crate::access::{AccessPolicy, Feature};
use crate::error::{AppError, AppResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Public mainnet endpoint used when no RPC URL is configured
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Discord bot configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BotConfig {
    /// Bot authentication token (required)
    #[serde(default)]
    pub token: String,
    /// Register slash commands in this guild only (instant update during development)
    #[serde(default)]
    pub guild_id: Option<u64>,
}

/// Solana node configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_commitment")]
    pub commitment: String,
    /// Upper bound for one balance lookup, retries included
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_commitment() -> String {
    "confirmed".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    2
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            commitment: default_commitment(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// User snapshot location
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("users.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Feature gating thresholds
#[derive(Debug, Deserialize, Clone)]
pub struct AccessConfig {
    /// Minimum balance in SOL that unlocks the full feature set
    #[serde(default = "default_min_balance")]
    pub min_balance: f64,
    #[serde(default = "default_unlocked")]
    pub unlocked: Vec<Feature>,
    #[serde(default = "default_locked")]
    pub locked: Vec<Feature>,
}

fn default_min_balance() -> f64 {
    AccessPolicy::DEFAULT_MIN_BALANCE
}

fn default_unlocked() -> Vec<Feature> {
    Feature::FULL.to_vec()
}

fn default_locked() -> Vec<Feature> {
    vec![Feature::Deposit]
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            min_balance: default_min_balance(),
            unlocked: default_unlocked(),
            locked: default_locked(),
        }
    }
}

/// Logging output settings
#[derive(Debug, Deserialize, Clone, Default)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

/// Root application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> AppResult<Self> {
        let config = Config::builder()
            // Legacy un-prefixed variables have the lowest priority
            .set_default("bot.token", std::env::var("BOT_TOKEN").unwrap_or_default())?
            .set_default(
                "ledger.rpc_url",
                std::env::var("SOLANA_RPC_URL").unwrap_or_else(|_| default_rpc_url()),
            )?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., VORTEX_BOT__TOKEN, VORTEX_LEDGER__RPC_URL
            .add_source(
                Environment::with_prefix("VORTEX")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("access.unlocked")
                    .with_list_parse_key("access.locked"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Initialize the global config singleton
    pub fn init() -> AppResult<&'static Self> {
        let config = Self::load()?;
        Ok(CONFIG.get_or_init(|| config))
    }

    /// Reject configurations the bot cannot start with
    pub fn validate(&self) -> AppResult<()> {
        if self.bot.token.trim().is_empty() {
            return Err(AppError::ConfigMissing("bot.token"));
        }
        if !self.access.min_balance.is_finite() || self.access.min_balance < 0.0 {
            return Err(AppError::ConfigInvalid(format!(
                "access.min_balance must be a non-negative number, got {}",
                self.access.min_balance
            )));
        }
        if self.ledger.timeout_secs == 0 {
            return Err(AppError::ConfigInvalid(
                "ledger.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(
            self.access.min_balance,
            self.access.unlocked.iter().copied(),
            self.access.locked.iter().copied(),
        )
    }
}

impl LedgerConfig {
    /// RPC URL with any trailing slash removed
    pub fn endpoint(&self) -> &str {
        self.rpc_url.trim_end_matches('/')
    }

    /// Timeout for a single HTTP attempt, so that every retry fits in the
    /// overall lookup budget
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs) / (self.max_retries.saturating_add(1))
    }
}
