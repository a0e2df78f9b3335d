//! Transaction builders
//!
//! A builder fills in the fields every transaction shares, attaches the
//! asset and signs with the scheme of its network configuration. Fields the
//! caller already set (fee, network, timestamp) are kept.

pub mod transactions;

use crate::config::{Clock, NetworkConfig, SystemClock};
use crate::core::{Asset, Transaction, TransactionError, TX_VERSION, TYPE_GROUP_CORE};

/// Builds and signs transactions for one network
pub struct TransactionBuilder<'a, C: Clock = SystemClock> {
    config: &'a NetworkConfig,
    clock: C,
}

impl<'a> TransactionBuilder<'a, SystemClock> {
    /// Create a builder that stamps transactions with the system time
    pub fn new(config: &'a NetworkConfig) -> Self {
        Self {
            config,
            clock: SystemClock,
        }
    }
}

impl<'a, C: Clock> TransactionBuilder<'a, C> {
    /// Create a builder with a custom clock
    pub fn with_clock(config: &'a NetworkConfig, clock: C) -> Self {
        Self { config, clock }
    }

    /// The network this builder targets
    pub fn config(&self) -> &NetworkConfig {
        self.config
    }

    /// Fill in defaults and attach `asset`
    fn set_common_fields(&self, tx: &mut Transaction, asset: Asset) {
        if tx.fee == 0 {
            tx.fee = self.config.fee(asset.transaction_type());
        }

        if tx.network == 0 {
            tx.network = self.config.version;
        }

        tx.second_sender_public_key.clear();
        tx.second_signature.clear();

        if tx.timestamp == 0 {
            tx.timestamp = self.config.time(&self.clock);
        }

        tx.type_group = TYPE_GROUP_CORE;
        tx.version = TX_VERSION;
        tx.asset = asset;
    }

    fn signed(
        &self,
        mut tx: Transaction,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        tx.build_signed(&self.config.signature_scheme, passphrase, second_passphrase)?;
        log::debug!("Built {} transaction {}", tx.transaction_type(), tx.id);
        Ok(tx)
    }

    fn multi_signed_with(
        &self,
        mut tx: Transaction,
        signer_index: u8,
        passphrase: &str,
    ) -> Result<Transaction, TransactionError> {
        tx.sign_multi(&self.config.signature_scheme, signer_index, passphrase)?;
        tx.id = tx.get_id()?;
        Ok(tx)
    }
}
