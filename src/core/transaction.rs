//! The transaction record
//!
//! A `Transaction` is built empty, filled in by a builder, mutated in place
//! by the signer and left untouched by the verifier. Its JSON form uses one
//! PascalCase key per field.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::asset::{Asset, TransactionType};
use crate::crypto::KeyError;

// =============================================================================
// Constants
// =============================================================================

/// The only transaction version produced and accepted
pub const TX_VERSION: u8 = 2;

/// The core type group all supported types belong to
pub const TYPE_GROUP_CORE: u32 = 1;

/// Marker byte that starts every serialized transaction
pub const HEADER_MARKER: u8 = 0xff;

/// Marker byte that would start an ECDSA multi-signature section
pub const MULTI_SIGNATURE_MARKER: u8 = 0xff;

// =============================================================================
// Error Types
// =============================================================================

/// Transaction-related errors
#[derive(Error, Debug)]
pub enum TransactionError {
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    #[error("Signature verification failed")]
    VerificationFailed,
    #[error("Duplicate signer index: {0}")]
    DuplicateSigner(u8),
    #[error("Signer index too large: {index}, total of {registered} signers have been registered")]
    SignerIndexOutOfRange { index: u8, registered: usize },
    #[error("Less than the minimum {min} signatures verified successfully")]
    InsufficientSignatures { min: u8 },
    #[error("Malformed signature blob: {0}")]
    MalformedSignatureBlob(String),
    #[error("Invalid field {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
    #[error("Malformed transaction bytes: {0}")]
    MalformedTransaction(String),
    #[error("Unsupported transaction version: {0}")]
    UnsupportedVersion(u8),
    #[error("Unsupported type group: {0}")]
    UnsupportedTypeGroup(u32),
    #[error("Unknown transaction type: {0}")]
    UnknownType(u16),
    #[error("Key error: {0}")]
    Key(#[from] KeyError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Transaction
// =============================================================================

/// A transaction of the core type group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// Hex sha256 id, derived from the unsigned encoding
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_version")]
    pub version: u8,
    /// Chain identifier byte
    #[serde(default)]
    pub network: u8,
    /// Type-specific payload; also determines the transaction type
    #[serde(flatten)]
    pub asset: Asset,
    #[serde(default = "default_type_group")]
    pub type_group: u32,
    /// Per-sender counter
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub sender_public_key: String,
    #[serde(default)]
    pub second_sender_public_key: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub recipient_id: String,
    #[serde(default)]
    pub amount: u64,
    #[serde(default)]
    pub fee: u64,
    /// 0 means the transaction never expires
    #[serde(default)]
    pub expiration: u32,
    #[serde(default)]
    pub vendor_field: String,
    /// Seconds since the network epoch
    #[serde(default)]
    pub timestamp: u32,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub second_signature: String,
    /// Each entry is hex of `[signer index] ++ signature`, in append order
    #[serde(default)]
    pub signatures: Vec<String>,
    /// Last wire encoding produced or parsed
    #[serde(skip)]
    pub serialized: Vec<u8>,
}

fn default_version() -> u8 {
    TX_VERSION
}

fn default_type_group() -> u32 {
    TYPE_GROUP_CORE
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            id: String::new(),
            version: TX_VERSION,
            network: 0,
            asset: Asset::Transfer,
            type_group: TYPE_GROUP_CORE,
            nonce: 0,
            sender_public_key: String::new(),
            second_sender_public_key: String::new(),
            sender_id: String::new(),
            recipient_id: String::new(),
            amount: 0,
            fee: 0,
            expiration: 0,
            vendor_field: String::new(),
            timestamp: 0,
            signature: String::new(),
            second_signature: String::new(),
            signatures: Vec::new(),
            serialized: Vec::new(),
        }
    }
}

impl Transaction {
    /// Create an empty transaction
    pub fn new() -> Self {
        Self::default()
    }

    /// The transaction type, derived from the asset
    pub fn transaction_type(&self) -> TransactionType {
        self.asset.transaction_type()
    }

    /// Check if this transaction carries any multi-signature entries
    pub fn is_multi_signed(&self) -> bool {
        !self.signatures.is_empty()
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> Result<String, TransactionError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_pretty(&self) -> Result<String, TransactionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from a JSON string
    pub fn from_json(json: &str) -> Result<Self, TransactionError> {
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Tests
// =============================================================================
