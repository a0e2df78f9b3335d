//! Network configuration
//!
//! Network version byte, epoch, fee table and clock are passed explicitly
//! to builders instead of being read from global state.

pub mod clock;
pub mod network;

pub use clock::{Clock, FixedClock, SystemClock};
pub use network::{
    ConfigError, FeeTable, NetworkConfig, ARK_EPOCH_SECONDS, DEVNET_VERSION, MAINNET_VERSION,
};
