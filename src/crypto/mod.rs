//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 hashing
//! - Passphrase-derived secp256k1 keys with ECDSA and Schnorr signing
//! - Address encoding and decoding

pub mod address;
pub mod hash;
pub mod keys;

pub use address::{
    address_from_passphrase, address_from_payload, decode_address, public_key_to_address,
    validate_address, ADDRESS_PAYLOAD_LEN,
};
pub use hash::{double_sha256, sha256, sha256_hex, Hash256};
pub use keys::{public_key_from_hex, KeyError, KeyMaterial, KeyPair, SignatureScheme};
