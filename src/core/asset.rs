//! Typed transaction payloads
//!
//! Each transaction type carries exactly one asset shape. The type is
//! derived from the asset variant, so a transaction cannot claim one type
//! while carrying another type's payload.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::TransactionError;

/// Transaction types of the core type group, with their wire values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum TransactionType {
    Transfer = 0,
    SecondSignatureRegistration = 1,
    DelegateRegistration = 2,
    Vote = 3,
    MultiSignatureRegistration = 4,
    Ipfs = 5,
    MultiPayment = 6,
    DelegateResignation = 7,
    HtlcLock = 8,
    HtlcClaim = 9,
    HtlcRefund = 10,
}

impl TransactionType {
    /// Wire value of this type
    pub fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for TransactionType {
    type Error = TransactionError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => TransactionType::Transfer,
            1 => TransactionType::SecondSignatureRegistration,
            2 => TransactionType::DelegateRegistration,
            3 => TransactionType::Vote,
            4 => TransactionType::MultiSignatureRegistration,
            5 => TransactionType::Ipfs,
            6 => TransactionType::MultiPayment,
            7 => TransactionType::DelegateResignation,
            8 => TransactionType::HtlcLock,
            9 => TransactionType::HtlcClaim,
            10 => TransactionType::HtlcRefund,
            other => return Err(TransactionError::UnknownType(other)),
        })
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Second public key registered by a SecondSignatureRegistration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecondSignatureAsset {
    pub public_key: String,
}

/// Delegate name claimed by a DelegateRegistration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DelegateAsset {
    pub username: String,
}

/// Registered multi-signature signer set
///
/// The position of a key in `public_keys` is its signer index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MultiSignatureAsset {
    /// Number of valid signatures required
    pub min: u8,
    /// Hex-encoded compressed public keys
    pub public_keys: Vec<String>,
}

/// One output of a MultiPayment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub amount: u64,
    pub recipient_id: String,
}

/// How an HTLC expiration value is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum HtlcExpirationType {
    EpochTimestamp = 1,
    BlockHeight = 2,
}

impl TryFrom<u8> for HtlcExpirationType {
    type Error = TransactionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(HtlcExpirationType::EpochTimestamp),
            2 => Ok(HtlcExpirationType::BlockHeight),
            other => Err(TransactionError::InvalidField {
                field: "Asset.Lock.Expiration.Type",
                reason: format!("unknown expiration type {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HtlcExpiration {
    #[serde(rename = "Type")]
    pub kind: HtlcExpirationType,
    pub value: u32,
}

/// Hash time locked transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HtlcLockAsset {
    /// Hex sha256 of the unlock secret
    pub secret_hash: String,
    pub expiration: HtlcExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HtlcClaimAsset {
    pub lock_transaction_id: String,
    /// Hex-encoded 32-byte secret
    pub unlock_secret: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HtlcRefundAsset {
    pub lock_transaction_id: String,
}

// =============================================================================
// Asset
// =============================================================================

/// The type-specific payload of a transaction
///
/// In JSON the variant name is stored under `Type` and the payload under
/// `Asset`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "Type", content = "Asset")]
pub enum Asset {
    #[default]
    Transfer,
    SecondSignatureRegistration(SecondSignatureAsset),
    DelegateRegistration(DelegateAsset),
    /// Votes in assigned order, `+<pubkey>` to vote and `-<pubkey>` to unvote
    Vote(Vec<String>),
    MultiSignatureRegistration(MultiSignatureAsset),
    /// Base58 multihash
    Ipfs(String),
    MultiPayment(Vec<Payment>),
    DelegateResignation,
    HtlcLock(HtlcLockAsset),
    HtlcClaim(HtlcClaimAsset),
    HtlcRefund(HtlcRefundAsset),
}

impl Asset {
    /// The transaction type this payload belongs to
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Asset::Transfer => TransactionType::Transfer,
            Asset::SecondSignatureRegistration(_) => TransactionType::SecondSignatureRegistration,
            Asset::DelegateRegistration(_) => TransactionType::DelegateRegistration,
            Asset::Vote(_) => TransactionType::Vote,
            Asset::MultiSignatureRegistration(_) => TransactionType::MultiSignatureRegistration,
            Asset::Ipfs(_) => TransactionType::Ipfs,
            Asset::MultiPayment(_) => TransactionType::MultiPayment,
            Asset::DelegateResignation => TransactionType::DelegateResignation,
            Asset::HtlcLock(_) => TransactionType::HtlcLock,
            Asset::HtlcClaim(_) => TransactionType::HtlcClaim,
            Asset::HtlcRefund(_) => TransactionType::HtlcRefund,
        }
    }

    /// The registered signer set, if this is a multi-signature registration
    pub fn multi_signature(&self) -> Option<&MultiSignatureAsset> {
        match self {
            Asset::MultiSignatureRegistration(asset) => Some(asset),
            _ => None,
        }
    }
}
