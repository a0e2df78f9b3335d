//! Signature verification
//!
//! Verification never mutates the transaction. Failures are typed so a
//! caller can tell a bad signature from malformed input.

use secp256k1::PublicKey;
use std::collections::HashSet;

use super::asset::MultiSignatureAsset;
use super::serializer::SkipFlags;
use super::transaction::{Transaction, TransactionError};
use crate::crypto::{public_key_from_hex, KeyMaterial};

impl Transaction {
    /// Check `Signature` against `SenderPublicKey`
    pub fn verify<K: KeyMaterial + ?Sized>(&self, keys: &K) -> Result<(), TransactionError> {
        let public_key = public_key_from_hex(&self.sender_public_key)
            .map_err(|_| TransactionError::InvalidPublicKey(self.sender_public_key.clone()))?;

        let digest = self.digest(SkipFlags::all())?;
        let signature =
            hex::decode(&self.signature).map_err(|_| TransactionError::VerificationFailed)?;

        if keys.verify(&public_key, &signature, &digest) {
            Ok(())
        } else {
            Err(TransactionError::VerificationFailed)
        }
    }

    /// Check `SecondSignature` against a registered second public key
    pub fn second_verify<K: KeyMaterial + ?Sized>(
        &self,
        keys: &K,
        second_public_key: &PublicKey,
    ) -> Result<(), TransactionError> {
        let digest = self.digest(SkipFlags::SECOND_SIGNATURE | SkipFlags::MULTI_SIGNATURE)?;
        let signature = hex::decode(&self.second_signature)
            .map_err(|_| TransactionError::VerificationFailed)?;

        if keys.verify(second_public_key, &signature, &digest) {
            Ok(())
        } else {
            Err(TransactionError::VerificationFailed)
        }
    }

    /// Check that at least `asset.min` distinct registered signers signed
    ///
    /// Entries are processed in order. The check succeeds as soon as the
    /// threshold is met and fails as soon as the remaining entries could no
    /// longer reach it, so the outcome can depend on entry order when
    /// invalid or duplicate entries appear before the threshold is met.
    pub fn verify_multi_signature<K: KeyMaterial + ?Sized>(
        &self,
        keys: &K,
        asset: &MultiSignatureAsset,
    ) -> Result<(), TransactionError> {
        let digest = self.digest(SkipFlags::all())?;
        let min = asset.min as usize;
        let total = self.signatures.len();

        let mut seen = HashSet::new();
        let mut num_verified = 0usize;

        for (i, entry) in self.signatures.iter().enumerate() {
            let bytes = hex::decode(entry).map_err(|e| TransactionError::InvalidField {
                field: "Signatures",
                reason: e.to_string(),
            })?;
            let (&index, signature) =
                bytes
                    .split_first()
                    .ok_or_else(|| TransactionError::InvalidField {
                        field: "Signatures",
                        reason: format!("entry {} is empty", i),
                    })?;

            if seen.contains(&index) {
                return Err(TransactionError::DuplicateSigner(index));
            }

            if index as usize >= asset.public_keys.len() {
                return Err(TransactionError::SignerIndexOutOfRange {
                    index,
                    registered: asset.public_keys.len(),
                });
            }

            seen.insert(index);

            let key_hex = &asset.public_keys[index as usize];
            let public_key = public_key_from_hex(key_hex)
                .map_err(|_| TransactionError::InvalidPublicKey(key_hex.clone()))?;

            if keys.verify(&public_key, signature, &digest) {
                num_verified += 1;
            } else {
                log::debug!("Multi-signature from signer {} did not verify", index);
            }

            if num_verified >= min {
                return Ok(());
            }

            if total - (i + 1 - num_verified) < min {
                return Err(TransactionError::InsufficientSignatures { min: asset.min });
            }
        }

        Err(TransactionError::InsufficientSignatures { min: asset.min })
    }
}
