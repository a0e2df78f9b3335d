//! ark-transactions: Ark v2 transactions in Rust
//!
//! This crate provides the transaction layer of an Ark client:
//! - Deterministic wire serialization and deserialization
//! - ECDSA and Schnorr signatures (secp256k1) from passphrase-derived keys
//! - Second signatures and threshold multi-signatures
//! - Signature blob parsing that recovers the encoding from length alone
//! - Builders for every core transaction type
//! - Network presets with fee tables and epoch-relative timestamps
//!
//! # Example
//!
//! ```rust
//! use ark_transactions::builder::TransactionBuilder;
//! use ark_transactions::config::NetworkConfig;
//! use ark_transactions::core::Transaction;
//! use ark_transactions::crypto::address_from_passphrase;
//!
//! let config = NetworkConfig::devnet();
//! let builder = TransactionBuilder::new(&config);
//!
//! // Build and sign a transfer
//! let tx = Transaction {
//!     amount: 100_000_000,
//!     nonce: 1,
//!     recipient_id: address_from_passphrase("recipient", config.version).unwrap(),
//!     ..Default::default()
//! };
//! let tx = builder.transfer(tx, "sender passphrase", None).unwrap();
//! println!("Transaction id: {}", tx.id);
//!
//! // Verify it
//! assert!(tx.verify(&config.signature_scheme).is_ok());
//!
//! // Round trip through the wire format
//! let decoded = Transaction::from_hex(&tx.to_hex().unwrap()).unwrap();
//! assert_eq!(decoded.id, tx.id);
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;

// Re-export commonly used types
pub use builder::TransactionBuilder;
pub use config::{Clock, FixedClock, NetworkConfig, SystemClock};
pub use core::{Asset, SkipFlags, Transaction, TransactionError, TransactionType};
pub use crypto::{KeyMaterial, KeyPair, SignatureScheme};
