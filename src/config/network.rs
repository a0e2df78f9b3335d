//! Network parameters
//!
//! Everything a builder needs to know about the chain it is building for:
//! the address/network version byte, the epoch timestamps are counted from,
//! the signature encoding and the static fee table.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::clock::Clock;
use crate::core::TransactionType;
use crate::crypto::SignatureScheme;

// =============================================================================
// Constants
// =============================================================================

/// Network version byte of mainnet (addresses start with "A")
pub const MAINNET_VERSION: u8 = 0x17;

/// Network version byte of devnet (addresses start with "D")
pub const DEVNET_VERSION: u8 = 0x1e;

/// 2017-03-21T13:00:00Z, shared by mainnet and devnet
pub const ARK_EPOCH_SECONDS: i64 = 1_490_101_200;

/// Errors loading a network configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Fee Table
// =============================================================================

/// Static fee per transaction type, in the smallest unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeeTable {
    pub transfer: u64,
    pub second_signature_registration: u64,
    pub delegate_registration: u64,
    pub vote: u64,
    pub multi_signature_registration: u64,
    pub ipfs: u64,
    pub multi_payment: u64,
    pub delegate_resignation: u64,
    pub htlc_lock: u64,
    pub htlc_claim: u64,
    pub htlc_refund: u64,
}

impl Default for FeeTable {
    fn default() -> Self {
        Self {
            transfer: 10_000_000,
            second_signature_registration: 500_000_000,
            delegate_registration: 2_500_000_000,
            vote: 100_000_000,
            multi_signature_registration: 500_000_000,
            ipfs: 500_000_000,
            multi_payment: 10_000_000,
            delegate_resignation: 2_500_000_000,
            htlc_lock: 10_000_000,
            htlc_claim: 0,
            htlc_refund: 0,
        }
    }
}

impl FeeTable {
    /// Get the fee for a transaction type
    pub fn get(&self, transaction_type: TransactionType) -> u64 {
        match transaction_type {
            TransactionType::Transfer => self.transfer,
            TransactionType::SecondSignatureRegistration => self.second_signature_registration,
            TransactionType::DelegateRegistration => self.delegate_registration,
            TransactionType::Vote => self.vote,
            TransactionType::MultiSignatureRegistration => self.multi_signature_registration,
            TransactionType::Ipfs => self.ipfs,
            TransactionType::MultiPayment => self.multi_payment,
            TransactionType::DelegateResignation => self.delegate_resignation,
            TransactionType::HtlcLock => self.htlc_lock,
            TransactionType::HtlcClaim => self.htlc_claim,
            TransactionType::HtlcRefund => self.htlc_refund,
        }
    }
}

// =============================================================================
// Network Config
// =============================================================================

/// Parameters of one chain network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Human-readable network name
    pub name: String,
    /// Network version byte, written into transactions and addresses
    pub version: u8,
    /// Instant that transaction timestamps are counted from
    pub epoch: DateTime<Utc>,
    /// Signature encoding produced by the signer
    #[serde(default)]
    pub signature_scheme: SignatureScheme,
    /// Default fees
    #[serde(default)]
    pub fees: FeeTable,
}

fn ark_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(ARK_EPOCH_SECONDS, 0)
        .single()
        .unwrap_or_default()
}

impl NetworkConfig {
    /// Mainnet parameters
    pub fn mainnet() -> Self {
        Self {
            name: "mainnet".to_string(),
            version: MAINNET_VERSION,
            epoch: ark_epoch(),
            signature_scheme: SignatureScheme::Schnorr,
            fees: FeeTable::default(),
        }
    }

    /// Devnet parameters
    pub fn devnet() -> Self {
        Self {
            name: "devnet".to_string(),
            version: DEVNET_VERSION,
            ..Self::mainnet()
        }
    }

    /// Look up a preset by name
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "mainnet" => Some(Self::mainnet()),
            "devnet" => Some(Self::devnet()),
            _ => None,
        }
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        log::debug!("Loaded network configuration from {:?}", path);
        Ok(config)
    }

    /// Save this configuration as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;
        Ok(())
    }

    /// Default fee for a transaction type
    pub fn fee(&self, transaction_type: TransactionType) -> u64 {
        self.fees.get(transaction_type)
    }

    /// Seconds elapsed since the network epoch according to `clock`
    pub fn time(&self, clock: &impl Clock) -> u32 {
        let elapsed = (clock.now() - self.epoch).num_seconds().max(0);
        u32::try_from(elapsed).unwrap_or(u32::MAX)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedClock;
    use chrono::Duration;

    #[test]
    fn test_presets() {
        let mainnet = NetworkConfig::mainnet();
        assert_eq!(mainnet.version, 23);
        assert_eq!(mainnet.epoch.timestamp(), ARK_EPOCH_SECONDS);

        let devnet = NetworkConfig::preset("devnet").unwrap();
        assert_eq!(devnet.version, 30);
        assert_eq!(devnet.epoch, mainnet.epoch);

        assert!(NetworkConfig::preset("moonnet").is_none());
    }

    #[test]
    fn test_fee_lookup() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.fee(TransactionType::Transfer), 10_000_000);
        assert_eq!(config.fee(TransactionType::DelegateRegistration), 2_500_000_000);
        assert_eq!(config.fee(TransactionType::HtlcClaim), 0);
    }

    #[test]
    fn test_time_is_epoch_relative() {
        let config = NetworkConfig::mainnet();
        let clock = FixedClock(config.epoch + Duration::seconds(12_345));
        assert_eq!(config.time(&clock), 12_345);

        let before_epoch = FixedClock(config.epoch - Duration::seconds(10));
        assert_eq!(config.time(&before_epoch), 0);
    }

    #[test]
    fn test_load_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("network.json");

        let mut config = NetworkConfig::devnet();
        config.signature_scheme = SignatureScheme::Ecdsa;
        config.fees.transfer = 42;
        config.save(&path).unwrap();

        let loaded = NetworkConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.json");
        fs::write(
            &path,
            r#"{ "name": "custom", "version": 88, "epoch": "2020-01-01T00:00:00Z",
                 "fees": { "transfer": 1 } }"#,
        )
        .unwrap();

        let config = NetworkConfig::load(&path).unwrap();
        assert_eq!(config.version, 88);
        assert_eq!(config.signature_scheme, SignatureScheme::Schnorr);
        assert_eq!(config.fee(TransactionType::Transfer), 1);
        assert_eq!(config.fee(TransactionType::Vote), 100_000_000);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = NetworkConfig::load(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
