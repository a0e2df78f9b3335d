//! Canonical wire encoding
//!
//! The encoding is both the digest preimage for signing and the on-chain
//! format, so field order and widths are fixed:
//!
//! ```text
//! 0xff | version u8 | network u8 | type group u32 | type u16 | nonce u64
//!      | sender public key [33] | fee u64 | vendor field len u8 + bytes
//!      | asset | signature | second signature | multi-signatures
//! ```
//!
//! All integers are little-endian. The three trailing signature sections
//! are controlled by [`SkipFlags`].

use bitflags::bitflags;

use super::asset::{Asset, HtlcClaimAsset, HtlcLockAsset, HtlcRefundAsset, Payment};
use super::transaction::{Transaction, TransactionError, HEADER_MARKER};
use crate::crypto::{decode_address, ADDRESS_PAYLOAD_LEN};

/// Length of a compressed secp256k1 public key
pub const PUBLIC_KEY_LEN: usize = 33;

/// Length of a transaction id, secret hash or unlock secret
pub const HASH_LEN: usize = 32;

bitflags! {
    /// Signature sections left out of an encoding
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SkipFlags: u8 {
        const SIGNATURE = 0b001;
        const SECOND_SIGNATURE = 0b010;
        const MULTI_SIGNATURE = 0b100;
    }
}

impl Transaction {
    /// Encode this transaction, leaving out the signature sections in `skip`
    pub fn serialize(&self, skip: SkipFlags) -> Result<Vec<u8>, TransactionError> {
        let mut buf = Vec::with_capacity(256);

        self.write_header(&mut buf)?;
        self.write_vendor_field(&mut buf)?;
        self.write_asset(&mut buf)?;
        self.write_signatures(&mut buf, skip)?;

        Ok(buf)
    }

    /// Full encoding including every signature; refreshes `serialized`
    pub fn to_bytes(&mut self) -> Result<Vec<u8>, TransactionError> {
        let bytes = self.serialize(SkipFlags::empty())?;
        self.serialized = bytes.clone();
        Ok(bytes)
    }

    /// Full encoding as a hex string
    pub fn to_hex(&self) -> Result<String, TransactionError> {
        Ok(hex::encode(self.serialize(SkipFlags::empty())?))
    }

    fn write_header(&self, buf: &mut Vec<u8>) -> Result<(), TransactionError> {
        buf.push(HEADER_MARKER);
        buf.push(self.version);
        buf.push(self.network);
        buf.extend_from_slice(&self.type_group.to_le_bytes());
        buf.extend_from_slice(&self.transaction_type().as_u16().to_le_bytes());
        buf.extend_from_slice(&self.nonce.to_le_bytes());
        buf.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LEN>(
            "SenderPublicKey",
            &self.sender_public_key,
        )?);
        buf.extend_from_slice(&self.fee.to_le_bytes());
        Ok(())
    }

    fn write_vendor_field(&self, buf: &mut Vec<u8>) -> Result<(), TransactionError> {
        write_short_bytes(buf, "VendorField", self.vendor_field.as_bytes())
    }

    fn write_asset(&self, buf: &mut Vec<u8>) -> Result<(), TransactionError> {
        match &self.asset {
            Asset::Transfer => {
                buf.extend_from_slice(&self.amount.to_le_bytes());
                buf.extend_from_slice(&self.expiration.to_le_bytes());
                write_recipient(buf, "RecipientId", &self.recipient_id)?;
            }
            Asset::SecondSignatureRegistration(asset) => {
                buf.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LEN>(
                    "Asset.PublicKey",
                    &asset.public_key,
                )?);
            }
            Asset::DelegateRegistration(asset) => {
                write_short_bytes(buf, "Asset.Username", asset.username.as_bytes())?;
            }
            Asset::Vote(votes) => {
                buf.push(short_count("Asset.Votes", votes.len())?);
                for vote in votes {
                    let (direction, key) = if let Some(key) = vote.strip_prefix('+') {
                        (1u8, key)
                    } else if let Some(key) = vote.strip_prefix('-') {
                        (0u8, key)
                    } else {
                        return Err(TransactionError::InvalidField {
                            field: "Asset.Votes",
                            reason: format!("vote {:?} must start with '+' or '-'", vote),
                        });
                    };
                    buf.push(direction);
                    buf.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LEN>("Asset.Votes", key)?);
                }
            }
            Asset::MultiSignatureRegistration(asset) => {
                buf.push(asset.min);
                buf.push(short_count("Asset.PublicKeys", asset.public_keys.len())?);
                for key in &asset.public_keys {
                    buf.extend_from_slice(&decode_fixed::<PUBLIC_KEY_LEN>(
                        "Asset.PublicKeys",
                        key,
                    )?);
                }
            }
            Asset::Ipfs(hash) => {
                buf.extend_from_slice(&decode_ipfs(hash)?);
            }
            Asset::MultiPayment(payments) => {
                let count = u16::try_from(payments.len()).map_err(|_| {
                    TransactionError::InvalidField {
                        field: "Asset.Payments",
                        reason: format!("{} payments exceed {}", payments.len(), u16::MAX),
                    }
                })?;
                buf.extend_from_slice(&count.to_le_bytes());
                for Payment {
                    amount,
                    recipient_id,
                } in payments
                {
                    buf.extend_from_slice(&amount.to_le_bytes());
                    write_recipient(buf, "Asset.Payments.RecipientId", recipient_id)?;
                }
            }
            Asset::DelegateResignation => {}
            Asset::HtlcLock(HtlcLockAsset {
                secret_hash,
                expiration,
            }) => {
                buf.extend_from_slice(&self.amount.to_le_bytes());
                buf.extend_from_slice(&decode_fixed::<HASH_LEN>(
                    "Asset.Lock.SecretHash",
                    secret_hash,
                )?);
                buf.push(expiration.kind as u8);
                buf.extend_from_slice(&expiration.value.to_le_bytes());
                write_recipient(buf, "RecipientId", &self.recipient_id)?;
            }
            Asset::HtlcClaim(HtlcClaimAsset {
                lock_transaction_id,
                unlock_secret,
            }) => {
                buf.extend_from_slice(&decode_fixed::<HASH_LEN>(
                    "Asset.Claim.LockTransactionId",
                    lock_transaction_id,
                )?);
                buf.extend_from_slice(&decode_fixed::<HASH_LEN>(
                    "Asset.Claim.UnlockSecret",
                    unlock_secret,
                )?);
            }
            Asset::HtlcRefund(HtlcRefundAsset {
                lock_transaction_id,
            }) => {
                buf.extend_from_slice(&decode_fixed::<HASH_LEN>(
                    "Asset.Refund.LockTransactionId",
                    lock_transaction_id,
                )?);
            }
        }
        Ok(())
    }

    fn write_signatures(&self, buf: &mut Vec<u8>, skip: SkipFlags) -> Result<(), TransactionError> {
        if !skip.contains(SkipFlags::SIGNATURE) && !self.signature.is_empty() {
            buf.extend_from_slice(&decode_hex("Signature", &self.signature)?);
        }

        if !skip.contains(SkipFlags::SECOND_SIGNATURE) && !self.second_signature.is_empty() {
            buf.extend_from_slice(&decode_hex("SecondSignature", &self.second_signature)?);
        }

        if !skip.contains(SkipFlags::MULTI_SIGNATURE) {
            for entry in &self.signatures {
                buf.extend_from_slice(&decode_hex("Signatures", entry)?);
            }
        }

        Ok(())
    }
}

// =============================================================================
// Field encoders
// =============================================================================

pub(crate) fn decode_hex(field: &'static str, value: &str) -> Result<Vec<u8>, TransactionError> {
    hex::decode(value).map_err(|e| TransactionError::InvalidField {
        field,
        reason: e.to_string(),
    })
}

pub(crate) fn decode_fixed<const N: usize>(
    field: &'static str,
    value: &str,
) -> Result<[u8; N], TransactionError> {
    let bytes = decode_hex(field, value)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| TransactionError::InvalidField {
            field,
            reason: format!("expected {} bytes, got {}", N, bytes.len()),
        })
}

fn short_count(field: &'static str, len: usize) -> Result<u8, TransactionError> {
    u8::try_from(len).map_err(|_| TransactionError::InvalidField {
        field,
        reason: format!("{} entries exceed {}", len, u8::MAX),
    })
}

fn write_short_bytes(
    buf: &mut Vec<u8>,
    field: &'static str,
    bytes: &[u8],
) -> Result<(), TransactionError> {
    buf.push(short_count(field, bytes.len())?);
    buf.extend_from_slice(bytes);
    Ok(())
}

fn write_recipient(
    buf: &mut Vec<u8>,
    field: &'static str,
    address: &str,
) -> Result<(), TransactionError> {
    let payload: [u8; ADDRESS_PAYLOAD_LEN] =
        decode_address(address).map_err(|e| TransactionError::InvalidField {
            field,
            reason: e.to_string(),
        })?;
    buf.extend_from_slice(&payload);
    Ok(())
}

/// Decode a base58 multihash; its second byte is the digest length
pub(crate) fn decode_ipfs(hash: &str) -> Result<Vec<u8>, TransactionError> {
    let bytes = bs58::decode(hash)
        .into_vec()
        .map_err(|e| TransactionError::InvalidField {
            field: "Asset.Ipfs",
            reason: e.to_string(),
        })?;

    if bytes.len() < 2 || bytes.len() != bytes[1] as usize + 2 {
        return Err(TransactionError::InvalidField {
            field: "Asset.Ipfs",
            reason: format!("{} is not a multihash", hash),
        });
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DelegateAsset, MultiSignatureAsset};
    use crate::crypto::{address_from_passphrase, KeyPair};

    fn sender_key() -> String {
        KeyPair::from_passphrase("sender").unwrap().public_key_hex()
    }

    fn transfer() -> Transaction {
        Transaction {
            network: 23,
            nonce: 5,
            fee: 10_000_000,
            amount: 100_000_000,
            sender_public_key: sender_key(),
            recipient_id: address_from_passphrase("recipient", 23).unwrap(),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_layout() {
        let tx = transfer();
        let bytes = tx.serialize(SkipFlags::all()).unwrap();

        assert_eq!(bytes[0], 0xff);
        assert_eq!(bytes[1], 2);
        assert_eq!(bytes[2], 23);
        assert_eq!(&bytes[3..7], &1u32.to_le_bytes());
        assert_eq!(&bytes[7..9], &0u16.to_le_bytes());
        assert_eq!(&bytes[9..17], &5u64.to_le_bytes());
        assert_eq!(hex::encode(&bytes[17..50]), tx.sender_public_key);
        assert_eq!(&bytes[50..58], &10_000_000u64.to_le_bytes());
        // Empty vendor field
        assert_eq!(bytes[58], 0);
        // Amount, expiration, recipient
        assert_eq!(&bytes[59..67], &100_000_000u64.to_le_bytes());
        assert_eq!(&bytes[67..71], &0u32.to_le_bytes());
        assert_eq!(bytes.len(), 71 + ADDRESS_PAYLOAD_LEN);
    }

    #[test]
    fn test_vendor_field_is_length_prefixed() {
        let mut tx = transfer();
        tx.vendor_field = "hello".to_string();
        let bytes = tx.serialize(SkipFlags::all()).unwrap();
        assert_eq!(bytes[58], 5);
        assert_eq!(&bytes[59..64], b"hello");

        tx.vendor_field = "x".repeat(256);
        assert!(matches!(
            tx.serialize(SkipFlags::all()),
            Err(TransactionError::InvalidField {
                field: "VendorField",
                ..
            })
        ));
    }

    #[test]
    fn test_serialization_is_deterministic() {
        let mut tx = transfer();
        tx.signature = "aa".repeat(64);
        tx.signatures = vec![format!("01{}", "bb".repeat(64))];

        for skip in [SkipFlags::all(), SkipFlags::empty(), SkipFlags::SIGNATURE] {
            assert_eq!(tx.serialize(skip).unwrap(), tx.serialize(skip).unwrap());
        }
    }

    #[test]
    fn test_skip_flags_control_signature_sections() {
        let mut tx = transfer();
        let unsigned_len = tx.serialize(SkipFlags::all()).unwrap().len();

        tx.signature = "11".repeat(64);
        tx.second_signature = "22".repeat(64);
        tx.signatures = vec![format!("00{}", "33".repeat(64)), format!("03{}", "44".repeat(64))];

        assert_eq!(tx.serialize(SkipFlags::all()).unwrap().len(), unsigned_len);

        let with_first = tx
            .serialize(SkipFlags::SECOND_SIGNATURE | SkipFlags::MULTI_SIGNATURE)
            .unwrap();
        assert_eq!(with_first.len(), unsigned_len + 64);
        assert_eq!(&with_first[unsigned_len..], &[0x11; 64][..]);

        let full = tx.serialize(SkipFlags::empty()).unwrap();
        assert_eq!(full.len(), unsigned_len + 64 + 64 + 65 + 65);
        assert_eq!(full[unsigned_len + 128], 0x00);
        assert_eq!(full[unsigned_len + 128 + 65], 0x03);
    }

    #[test]
    fn test_vote_encoding_preserves_order() {
        let key_a = KeyPair::from_passphrase("delegate a").unwrap().public_key_hex();
        let key_b = KeyPair::from_passphrase("delegate b").unwrap().public_key_hex();
        let mut tx = transfer();
        tx.asset = Asset::Vote(vec![format!("-{}", key_a), format!("+{}", key_b)]);

        let bytes = tx.serialize(SkipFlags::all()).unwrap();
        let asset = &bytes[59..];
        assert_eq!(asset[0], 2);
        assert_eq!(asset[1], 0);
        assert_eq!(hex::encode(&asset[2..35]), key_a);
        assert_eq!(asset[35], 1);
        assert_eq!(hex::encode(&asset[36..69]), key_b);

        tx.asset = Asset::Vote(vec![key_a]);
        assert!(tx.serialize(SkipFlags::all()).is_err());
    }

    #[test]
    fn test_multi_signature_and_delegate_assets() {
        let mut tx = transfer();
        tx.asset = Asset::MultiSignatureRegistration(MultiSignatureAsset {
            min: 2,
            public_keys: vec![sender_key(), sender_key(), sender_key()],
        });
        let bytes = tx.serialize(SkipFlags::all()).unwrap();
        assert_eq!(bytes[59], 2);
        assert_eq!(bytes[60], 3);
        assert_eq!(bytes.len(), 61 + 3 * PUBLIC_KEY_LEN);

        tx.asset = Asset::DelegateRegistration(DelegateAsset {
            username: "boldninja".to_string(),
        });
        let bytes = tx.serialize(SkipFlags::all()).unwrap();
        assert_eq!(bytes[59], 9);
        assert_eq!(&bytes[60..], b"boldninja");
    }

    #[test]
    fn test_invalid_inputs_are_errors() {
        let mut tx = transfer();
        tx.sender_public_key = "abcd".to_string();
        assert!(matches!(
            tx.serialize(SkipFlags::all()),
            Err(TransactionError::InvalidField {
                field: "SenderPublicKey",
                ..
            })
        ));

        let mut tx = transfer();
        tx.recipient_id = "not an address".to_string();
        assert!(tx.serialize(SkipFlags::all()).is_err());

        let mut tx = transfer();
        tx.signature = "xyz".to_string();
        assert!(tx.serialize(SkipFlags::all()).is_ok());
        assert!(tx.serialize(SkipFlags::empty()).is_err());
    }

    #[test]
    fn test_ipfs_must_be_multihash() {
        let digest = [7u8; 32];
        let mut multihash = vec![0x12, 0x20];
        multihash.extend_from_slice(&digest);
        let hash = bs58::encode(&multihash).into_string();

        assert_eq!(decode_ipfs(&hash).unwrap(), multihash);
        assert!(decode_ipfs(&bs58::encode(&digest).into_string()).is_err());
        assert!(decode_ipfs("0OIl").is_err());
    }

    #[test]
    fn test_to_bytes_refreshes_cache() {
        let mut tx = transfer();
        assert!(tx.serialized.is_empty());
        let bytes = tx.to_bytes().unwrap();
        assert_eq!(tx.serialized, bytes);
        assert_eq!(tx.to_hex().unwrap(), hex::encode(bytes));
    }
}
