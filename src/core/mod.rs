//! Core transaction components
//!
//! This module contains the transaction protocol itself:
//! - The transaction record and its typed assets
//! - Canonical binary serialization and its inverse
//! - Signing (primary, second and multi-signatures)
//! - Verification, including threshold multi-signatures
//! - Signature blob parsing for ECDSA and Schnorr encodings

pub mod asset;
pub mod deserializer;
pub mod serializer;
pub mod signatures;
pub mod signer;
pub mod transaction;
pub mod verifier;

pub use asset::{
    Asset, DelegateAsset, HtlcClaimAsset, HtlcExpiration, HtlcExpirationType, HtlcLockAsset,
    HtlcRefundAsset, MultiSignatureAsset, Payment, SecondSignatureAsset, TransactionType,
};
pub use serializer::{SkipFlags, HASH_LEN, PUBLIC_KEY_LEN};
pub use signatures::{
    is_schnorr_signature, SignatureBlob, MULTI_SIGNATURE_ENTRY_LEN, SCHNORR_SIGNATURE_LEN,
};
pub use transaction::{
    Transaction, TransactionError, HEADER_MARKER, MULTI_SIGNATURE_MARKER, TX_VERSION,
    TYPE_GROUP_CORE,
};
