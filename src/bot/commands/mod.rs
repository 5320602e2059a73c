pub mod features;
pub mod help;
pub mod start;
pub mod wallet;

pub use features::{raid, refer, shill, token};
pub use help::help;
pub use start::start;
pub use wallet::{deposit, wallet};

use crate::bot::Data;
use crate::error::AppError;

/// Get all registered commands
pub fn all_commands() -> Vec<poise::Command<Data, AppError>> {
    vec![
        start(),
        wallet(),
        deposit(),
        raid(),
        shill(),
        token(),
        refer(),
        help(),
    ]
}
