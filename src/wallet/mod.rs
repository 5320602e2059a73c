pub mod keygen;

pub use keygen::{KeyGenerator, WalletKeys};
