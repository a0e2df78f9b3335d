//! Reading transactions back from their wire encoding
//!
//! Fixed fields and the asset are read with a bounds-checked cursor. Where
//! the asset ends the signature block begins; that suffix is handed to the
//! signature blob parser.

use secp256k1::PublicKey;

use super::asset::{
    Asset, DelegateAsset, HtlcClaimAsset, HtlcExpiration, HtlcExpirationType, HtlcLockAsset,
    HtlcRefundAsset, MultiSignatureAsset, Payment, SecondSignatureAsset, TransactionType,
};
use super::serializer::{HASH_LEN, PUBLIC_KEY_LEN};
use super::transaction::{Transaction, TransactionError, HEADER_MARKER, TX_VERSION, TYPE_GROUP_CORE};
use crate::crypto::{address_from_payload, public_key_to_address, ADDRESS_PAYLOAD_LEN};

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    fn read_exact(&mut self, len: usize) -> Result<&'a [u8], TransactionError> {
        if self.remaining() < len {
            return Err(TransactionError::MalformedTransaction(format!(
                "truncated: need {} bytes at offset {}, {} left",
                len,
                self.pos,
                self.remaining()
            )));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.bytes[start..start + len])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], TransactionError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, TransactionError> {
        Ok(self.read_exact(1)?[0])
    }

    fn read_u16le(&mut self) -> Result<u16, TransactionError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    fn read_u32le(&mut self) -> Result<u32, TransactionError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    fn read_u64le(&mut self) -> Result<u64, TransactionError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    fn read_hex(&mut self, len: usize) -> Result<String, TransactionError> {
        Ok(hex::encode(self.read_exact(len)?))
    }

    fn read_short_string(&mut self, field: &'static str) -> Result<String, TransactionError> {
        let len = self.read_u8()? as usize;
        let bytes = self.read_exact(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| TransactionError::InvalidField {
            field,
            reason: e.to_string(),
        })
    }

    fn read_address(&mut self) -> Result<String, TransactionError> {
        Ok(address_from_payload(&self.read_array::<ADDRESS_PAYLOAD_LEN>()?))
    }
}

impl Transaction {
    /// Decode a transaction from its full wire encoding
    ///
    /// Signature fields are recovered by the blob parser, `SenderId` is
    /// derived from the sender key and `Id` is recomputed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut cursor = Cursor::new(bytes);

        let marker = cursor.read_u8()?;
        if marker != HEADER_MARKER {
            return Err(TransactionError::MalformedTransaction(format!(
                "expected header marker 0x{:02x}, got 0x{:02x}",
                HEADER_MARKER, marker
            )));
        }

        let version = cursor.read_u8()?;
        if version != TX_VERSION {
            return Err(TransactionError::UnsupportedVersion(version));
        }

        let network = cursor.read_u8()?;
        let type_group = cursor.read_u32le()?;
        if type_group != TYPE_GROUP_CORE {
            return Err(TransactionError::UnsupportedTypeGroup(type_group));
        }
        let transaction_type = TransactionType::try_from(cursor.read_u16le()?)?;
        let nonce = cursor.read_u64le()?;
        let sender_key_bytes = cursor.read_exact(PUBLIC_KEY_LEN)?;
        let fee = cursor.read_u64le()?;
        let vendor_field = cursor.read_short_string("VendorField")?;

        let sender_key = PublicKey::from_slice(sender_key_bytes)
            .map_err(|_| TransactionError::InvalidPublicKey(hex::encode(sender_key_bytes)))?;

        let mut tx = Transaction {
            version,
            network,
            type_group,
            nonce,
            sender_public_key: hex::encode(sender_key_bytes),
            sender_id: public_key_to_address(&sender_key, network),
            fee,
            vendor_field,
            ..Default::default()
        };

        tx.read_asset(transaction_type, &mut cursor)?;

        let sig_offset = cursor.position();
        tx.serialized = bytes.to_vec();
        tx.parse_signatures(sig_offset)?;
        tx.id = tx.get_id()?;

        log::debug!(
            "Decoded {} transaction {} ({} bytes, signatures at {})",
            transaction_type,
            tx.id,
            bytes.len(),
            sig_offset
        );

        Ok(tx)
    }

    /// Decode a transaction from a hex string
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| TransactionError::MalformedTransaction(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    fn read_asset(
        &mut self,
        transaction_type: TransactionType,
        cursor: &mut Cursor<'_>,
    ) -> Result<(), TransactionError> {
        self.asset = match transaction_type {
            TransactionType::Transfer => {
                self.amount = cursor.read_u64le()?;
                self.expiration = cursor.read_u32le()?;
                self.recipient_id = cursor.read_address()?;
                Asset::Transfer
            }
            TransactionType::SecondSignatureRegistration => {
                Asset::SecondSignatureRegistration(SecondSignatureAsset {
                    public_key: cursor.read_hex(PUBLIC_KEY_LEN)?,
                })
            }
            TransactionType::DelegateRegistration => Asset::DelegateRegistration(DelegateAsset {
                username: cursor.read_short_string("Asset.Username")?,
            }),
            TransactionType::Vote => {
                let count = cursor.read_u8()?;
                let mut votes = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let direction = match cursor.read_u8()? {
                        1 => '+',
                        0 => '-',
                        other => {
                            return Err(TransactionError::InvalidField {
                                field: "Asset.Votes",
                                reason: format!("unknown vote direction {}", other),
                            })
                        }
                    };
                    votes.push(format!("{}{}", direction, cursor.read_hex(PUBLIC_KEY_LEN)?));
                }
                Asset::Vote(votes)
            }
            TransactionType::MultiSignatureRegistration => {
                let min = cursor.read_u8()?;
                let count = cursor.read_u8()?;
                let mut public_keys = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    public_keys.push(cursor.read_hex(PUBLIC_KEY_LEN)?);
                }
                Asset::MultiSignatureRegistration(MultiSignatureAsset { min, public_keys })
            }
            TransactionType::Ipfs => {
                let header = cursor.read_exact(2)?;
                let (code, digest_len) = (header[0], header[1]);
                let digest = cursor.read_exact(digest_len as usize)?;

                let mut multihash = vec![code, digest_len];
                multihash.extend_from_slice(digest);
                Asset::Ipfs(bs58::encode(multihash).into_string())
            }
            TransactionType::MultiPayment => {
                let count = cursor.read_u16le()?;
                let mut payments = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let amount = cursor.read_u64le()?;
                    let recipient_id = cursor.read_address()?;
                    payments.push(Payment {
                        amount,
                        recipient_id,
                    });
                }
                Asset::MultiPayment(payments)
            }
            TransactionType::DelegateResignation => Asset::DelegateResignation,
            TransactionType::HtlcLock => {
                self.amount = cursor.read_u64le()?;
                let secret_hash = cursor.read_hex(HASH_LEN)?;
                let kind = HtlcExpirationType::try_from(cursor.read_u8()?)?;
                let value = cursor.read_u32le()?;
                self.recipient_id = cursor.read_address()?;
                Asset::HtlcLock(HtlcLockAsset {
                    secret_hash,
                    expiration: HtlcExpiration { kind, value },
                })
            }
            TransactionType::HtlcClaim => Asset::HtlcClaim(HtlcClaimAsset {
                lock_transaction_id: cursor.read_hex(HASH_LEN)?,
                unlock_secret: cursor.read_hex(HASH_LEN)?,
            }),
            TransactionType::HtlcRefund => Asset::HtlcRefund(HtlcRefundAsset {
                lock_transaction_id: cursor.read_hex(HASH_LEN)?,
            }),
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SkipFlags;
    use crate::crypto::{address_from_passphrase, KeyPair, SignatureScheme};

    fn key(passphrase: &str) -> String {
        KeyPair::from_passphrase(passphrase).unwrap().public_key_hex()
    }

    fn base(asset: Asset) -> Transaction {
        Transaction {
            network: 30,
            nonce: 12,
            fee: 2_500_000_000,
            vendor_field: "memo".to_string(),
            asset,
            ..Default::default()
        }
    }

    fn signed(mut tx: Transaction) -> Transaction {
        tx.build_signed(&SignatureScheme::Schnorr, "sender secret", None)
            .unwrap();
        tx
    }

    fn assert_round_trip(tx: Transaction) {
        let bytes = tx.serialize(SkipFlags::empty()).unwrap();
        let decoded = Transaction::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.asset, tx.asset);
        assert_eq!(decoded.nonce, tx.nonce);
        assert_eq!(decoded.fee, tx.fee);
        assert_eq!(decoded.network, tx.network);
        assert_eq!(decoded.amount, tx.amount);
        assert_eq!(decoded.recipient_id, tx.recipient_id);
        assert_eq!(decoded.vendor_field, tx.vendor_field);
        assert_eq!(decoded.sender_public_key, tx.sender_public_key);
        assert_eq!(decoded.signature, tx.signature);
        assert_eq!(decoded.id, tx.id);
        assert_eq!(decoded.serialized, bytes);
        assert_eq!(
            decoded.sender_id,
            address_from_passphrase("sender secret", tx.network).unwrap()
        );
    }

    #[test]
    fn test_transfer_round_trip() {
        let mut tx = base(Asset::Transfer);
        tx.amount = 100_000_000;
        tx.expiration = 9_000;
        tx.recipient_id = address_from_passphrase("recipient", 30).unwrap();
        let tx = signed(tx);

        let decoded = Transaction::from_bytes(&tx.serialize(SkipFlags::empty()).unwrap()).unwrap();
        assert_eq!(decoded.expiration, 9_000);
        assert_round_trip(tx);
    }

    #[test]
    fn test_every_asset_round_trips() {
        let mut multihash = vec![0x12, 0x20];
        multihash.extend_from_slice(&[9u8; 32]);
        let recipient = address_from_passphrase("recipient", 30).unwrap();

        let assets = vec![
            Asset::SecondSignatureRegistration(SecondSignatureAsset {
                public_key: key("second"),
            }),
            Asset::DelegateRegistration(DelegateAsset {
                username: "genesis_7".to_string(),
            }),
            Asset::Vote(vec![format!("+{}", key("d1")), format!("-{}", key("d2"))]),
            Asset::MultiSignatureRegistration(MultiSignatureAsset {
                min: 2,
                public_keys: vec![key("m1"), key("m2"), key("m3")],
            }),
            Asset::Ipfs(bs58::encode(&multihash).into_string()),
            Asset::MultiPayment(vec![
                Payment {
                    amount: 1,
                    recipient_id: recipient.clone(),
                },
                Payment {
                    amount: 2,
                    recipient_id: address_from_passphrase("other", 30).unwrap(),
                },
            ]),
            Asset::DelegateResignation,
            Asset::HtlcClaim(HtlcClaimAsset {
                lock_transaction_id: "ab".repeat(32),
                unlock_secret: "cd".repeat(32),
            }),
            Asset::HtlcRefund(HtlcRefundAsset {
                lock_transaction_id: "ef".repeat(32),
            }),
        ];

        for asset in assets {
            assert_round_trip(signed(base(asset)));
        }

        let mut lock = base(Asset::HtlcLock(HtlcLockAsset {
            secret_hash: "01".repeat(32),
            expiration: HtlcExpiration {
                kind: HtlcExpirationType::BlockHeight,
                value: 1_000,
            },
        }));
        lock.amount = 42;
        lock.recipient_id = recipient;
        assert_round_trip(signed(lock));
    }

    #[test]
    fn test_rejects_bad_headers() {
        let mut tx = base(Asset::DelegateResignation);
        tx.sender_public_key = key("sender secret");
        let bytes = tx.serialize(SkipFlags::all()).unwrap();

        let mut bad_marker = bytes.clone();
        bad_marker[0] = 0x00;
        assert!(matches!(
            Transaction::from_bytes(&bad_marker),
            Err(TransactionError::MalformedTransaction(_))
        ));

        let mut version_one = bytes.clone();
        version_one[1] = 1;
        assert!(matches!(
            Transaction::from_bytes(&version_one),
            Err(TransactionError::UnsupportedVersion(1))
        ));

        let mut other_group = bytes.clone();
        other_group[3] = 2;
        assert!(matches!(
            Transaction::from_bytes(&other_group),
            Err(TransactionError::UnsupportedTypeGroup(2))
        ));

        let mut unknown_type = bytes.clone();
        unknown_type[7] = 99;
        assert!(matches!(
            Transaction::from_bytes(&unknown_type),
            Err(TransactionError::UnknownType(99))
        ));

        assert!(matches!(
            Transaction::from_bytes(&bytes[..20]),
            Err(TransactionError::MalformedTransaction(_))
        ));
        assert!(Transaction::from_bytes(&[]).is_err());
    }

    #[test]
    fn test_rejects_unknown_vote_direction() {
        let mut tx = base(Asset::Vote(vec![format!("+{}", key("delegate"))]));
        tx.sender_public_key = key("sender secret");
        let mut bytes = tx.serialize(SkipFlags::all()).unwrap();

        // the direction byte sits right before the last 33-byte key
        let direction = bytes.len() - PUBLIC_KEY_LEN - 1;
        assert_eq!(bytes[direction], 1);
        assert!(Transaction::from_bytes(&bytes).is_ok());

        bytes[direction] = 0x07;
        assert!(matches!(
            Transaction::from_bytes(&bytes),
            Err(TransactionError::InvalidField {
                field: "Asset.Votes",
                ..
            })
        ));
    }

    #[test]
    fn test_unsigned_bytes_decode_with_empty_signature() {
        let mut tx = base(Asset::DelegateResignation);
        tx.sender_public_key = key("sender secret");
        let bytes = tx.serialize(SkipFlags::all()).unwrap();

        let decoded = Transaction::from_bytes(&bytes).unwrap();
        assert!(decoded.signature.is_empty());
        assert!(decoded.signatures.is_empty());
    }

    #[test]
    fn test_from_hex() {
        let tx = signed(base(Asset::DelegateResignation));
        let decoded = Transaction::from_hex(&tx.to_hex().unwrap()).unwrap();
        assert_eq!(decoded.id, tx.id);
        assert!(Transaction::from_hex("zz").is_err());
    }
}
