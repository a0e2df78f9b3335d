//! Key material for transaction signing
//!
//! Keys are derived from a passphrase (`sha256(passphrase)` is the secret)
//! on the secp256k1 curve. Two signature encodings are supported: DER
//! encoded ECDSA and 64-byte BIP-340 Schnorr. Both sign a 32-byte digest.

use secp256k1::{ecdsa, schnorr, Keypair, Message, PublicKey, Secp256k1, SecretKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::hash::{sha256, Hash256};

/// Errors that can occur during key operations
#[derive(Error, Debug)]
pub enum KeyError {
    #[error("Key derivation failed: passphrase does not produce a valid private key")]
    InvalidPrivateKey,
    #[error("Invalid public key")]
    InvalidPublicKey,
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
    #[error("Secp256k1 error: {0}")]
    Secp256k1Error(#[from] secp256k1::Error),
}

/// A key pair consisting of a private key and its corresponding public key
#[derive(Clone)]
pub struct KeyPair {
    pub secret_key: SecretKey,
    pub public_key: PublicKey,
}

impl KeyPair {
    /// Derive a key pair from a passphrase
    pub fn from_passphrase(passphrase: &str) -> Result<Self, KeyError> {
        let secret_key = SecretKey::from_slice(&sha256(passphrase.as_bytes()))
            .map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Create a key pair from an existing secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        let secp = Secp256k1::new();
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Self {
            secret_key,
            public_key,
        }
    }

    /// Create a key pair from a hex-encoded private key
    pub fn from_private_key_hex(hex_key: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPrivateKey)?;
        let secret_key =
            SecretKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPrivateKey)?;
        Ok(Self::from_secret_key(secret_key))
    }

    /// Get the public key as a hex string (compressed format)
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }
}

/// Parse a compressed or uncompressed public key from a hex string
pub fn public_key_from_hex(hex_key: &str) -> Result<PublicKey, KeyError> {
    let bytes = hex::decode(hex_key).map_err(|_| KeyError::InvalidPublicKey)?;
    PublicKey::from_slice(&bytes).map_err(|_| KeyError::InvalidPublicKey)
}

/// Capability to derive keys and to sign and verify 32-byte digests.
pub trait KeyMaterial {
    /// Derive the signing key pair for a passphrase
    fn derive(&self, passphrase: &str) -> Result<KeyPair, KeyError> {
        KeyPair::from_passphrase(passphrase)
    }

    /// Sign a digest, returning the encoded signature bytes
    fn sign(&self, secret_key: &SecretKey, digest: &Hash256) -> Result<Vec<u8>, KeyError>;

    /// Check an encoded signature. Undecodable signatures do not verify.
    fn verify(&self, public_key: &PublicKey, signature: &[u8], digest: &Hash256) -> bool;
}

/// Signature encoding used by a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScheme {
    /// DER encoded ECDSA, variable length
    Ecdsa,
    /// BIP-340 Schnorr, always 64 bytes
    #[default]
    Schnorr,
}

impl KeyMaterial for SignatureScheme {
    fn sign(&self, secret_key: &SecretKey, digest: &Hash256) -> Result<Vec<u8>, KeyError> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(digest)?;

        match self {
            SignatureScheme::Ecdsa => {
                let signature = secp.sign_ecdsa(&message, secret_key);
                Ok(signature.serialize_der().to_vec())
            }
            SignatureScheme::Schnorr => {
                let keypair = Keypair::from_secret_key(&secp, secret_key);
                let signature = secp.sign_schnorr_no_aux_rand(&message, &keypair);
                Ok(signature.as_ref().to_vec())
            }
        }
    }

    fn verify(&self, public_key: &PublicKey, signature: &[u8], digest: &Hash256) -> bool {
        let secp = Secp256k1::new();
        let message = match Message::from_digest_slice(digest) {
            Ok(message) => message,
            Err(_) => return false,
        };

        match self {
            SignatureScheme::Ecdsa => match ecdsa::Signature::from_der(signature) {
                Ok(mut sig) => {
                    sig.normalize_s();
                    secp.verify_ecdsa(&message, &sig, public_key).is_ok()
                }
                Err(_) => false,
            },
            SignatureScheme::Schnorr => match schnorr::Signature::from_slice(signature) {
                Ok(sig) => {
                    let (x_only, _parity) = public_key.x_only_public_key();
                    secp.verify_schnorr(&sig, &message, &x_only).is_ok()
                }
                Err(_) => false,
            },
        }
    }
}
