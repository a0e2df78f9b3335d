//! Ark-style addresses
//!
//! An address is `Base58Check(network_version || RIPEMD160(pubkey))`, 21
//! payload bytes plus a 4-byte double SHA-256 checksum. On the wire the
//! recipient is carried as the 21 payload bytes.

use ripemd::Ripemd160;
use secp256k1::PublicKey;
use sha2::Digest;

use super::hash::double_sha256;
use super::keys::{KeyError, KeyPair};

/// Length of a decoded address payload (version byte + 20-byte hash)
pub const ADDRESS_PAYLOAD_LEN: usize = 21;

const CHECKSUM_LEN: usize = 4;

/// Convert a public key to an address on the given network
pub fn public_key_to_address(public_key: &PublicKey, network_version: u8) -> String {
    let mut ripemd = Ripemd160::new();
    ripemd.update(public_key.serialize());
    let ripemd_hash = ripemd.finalize();

    let mut payload = [0u8; ADDRESS_PAYLOAD_LEN];
    payload[0] = network_version;
    payload[1..].copy_from_slice(&ripemd_hash);

    address_from_payload(&payload)
}

/// Derive the address owned by a passphrase
pub fn address_from_passphrase(passphrase: &str, network_version: u8) -> Result<String, KeyError> {
    let key_pair = KeyPair::from_passphrase(passphrase)?;
    Ok(public_key_to_address(&key_pair.public_key, network_version))
}

/// Base58Check encode a 21-byte address payload
pub fn address_from_payload(payload: &[u8; ADDRESS_PAYLOAD_LEN]) -> String {
    let checksum = double_sha256(payload);

    let mut address_bytes = payload.to_vec();
    address_bytes.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(address_bytes).into_string()
}

/// Decode an address into its 21-byte payload, checking the checksum
pub fn decode_address(address: &str) -> Result<[u8; ADDRESS_PAYLOAD_LEN], KeyError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|e| KeyError::InvalidAddress(format!("{}: {}", address, e)))?;

    if bytes.len() != ADDRESS_PAYLOAD_LEN + CHECKSUM_LEN {
        return Err(KeyError::InvalidAddress(format!(
            "{}: expected {} bytes, got {}",
            address,
            ADDRESS_PAYLOAD_LEN + CHECKSUM_LEN,
            bytes.len()
        )));
    }

    let (payload, checksum) = bytes.split_at(ADDRESS_PAYLOAD_LEN);
    if double_sha256(payload)[..CHECKSUM_LEN] != *checksum {
        return Err(KeyError::InvalidAddress(format!("{}: bad checksum", address)));
    }

    let mut out = [0u8; ADDRESS_PAYLOAD_LEN];
    out.copy_from_slice(payload);
    Ok(out)
}

/// Check that an address decodes and belongs to the given network
pub fn validate_address(address: &str, network_version: u8) -> bool {
    matches!(decode_address(address), Ok(payload) if payload[0] == network_version)
}
