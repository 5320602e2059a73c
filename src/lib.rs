pub mod access;
pub mod bot;
pub mod config;
pub mod error;
pub mod ledger;
pub mod logging;
pub mod service;
pub mod store;
pub mod wallet;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
