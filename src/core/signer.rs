//! Signing
//!
//! Every signature is over `sha256` of the canonical encoding. The primary
//! signature and all multi-signatures sign the encoding without any
//! signature sections; the second signature also covers the primary one.

use super::serializer::SkipFlags;
use super::transaction::{Transaction, TransactionError, MULTI_SIGNATURE_MARKER};
use crate::crypto::{sha256, sha256_hex, Hash256, KeyMaterial};

impl Transaction {
    /// Hex id: sha256 of the encoding without any signatures
    pub fn get_id(&self) -> Result<String, TransactionError> {
        Ok(sha256_hex(&self.serialize(SkipFlags::all())?))
    }

    /// sha256 of the encoding with the given sections left out
    pub fn digest(&self, skip: SkipFlags) -> Result<Hash256, TransactionError> {
        Ok(sha256(&self.serialize(skip)?))
    }

    /// Sign with the sender's passphrase and set `SenderPublicKey`
    pub fn sign<K: KeyMaterial + ?Sized>(
        &mut self,
        keys: &K,
        passphrase: &str,
    ) -> Result<(), TransactionError> {
        let key_pair = keys.derive(passphrase)?;
        self.sender_public_key = key_pair.public_key_hex();

        let digest = self.digest(SkipFlags::all())?;
        let signature = keys.sign(&key_pair.secret_key, &digest)?;
        self.signature = hex::encode(signature);

        log::debug!(
            "Signed {} transaction for {}",
            self.transaction_type(),
            self.sender_public_key
        );
        Ok(())
    }

    /// Add the second signature, which covers the primary signature
    pub fn second_sign<K: KeyMaterial + ?Sized>(
        &mut self,
        keys: &K,
        passphrase: &str,
    ) -> Result<(), TransactionError> {
        let key_pair = keys.derive(passphrase)?;

        let digest = self.digest(SkipFlags::SECOND_SIGNATURE | SkipFlags::MULTI_SIGNATURE)?;
        let signature = keys.sign(&key_pair.secret_key, &digest)?;
        self.second_signature = hex::encode(signature);

        log::debug!("Second-signed {} transaction", self.transaction_type());
        Ok(())
    }

    /// Append a multi-signature entry for the signer at `signer_index`
    ///
    /// Entries are never deduplicated; a repeated index is rejected at
    /// verification time.
    pub fn sign_multi<K: KeyMaterial + ?Sized>(
        &mut self,
        keys: &K,
        signer_index: u8,
        passphrase: &str,
    ) -> Result<(), TransactionError> {
        if signer_index == MULTI_SIGNATURE_MARKER {
            return Err(TransactionError::SignerIndexOutOfRange {
                index: signer_index,
                registered: MULTI_SIGNATURE_MARKER as usize,
            });
        }

        let key_pair = keys.derive(passphrase)?;

        let digest = self.digest(SkipFlags::all())?;
        let signature = keys.sign(&key_pair.secret_key, &digest)?;

        let mut entry = Vec::with_capacity(signature.len() + 1);
        entry.push(signer_index);
        entry.extend_from_slice(&signature);
        self.signatures.push(hex::encode(entry));

        log::debug!(
            "Added multi-signature {} of {} transaction (signer index {})",
            self.signatures.len(),
            self.transaction_type(),
            signer_index
        );
        Ok(())
    }

    /// Sign, optionally second-sign, then set `Id`
    pub fn build_signed<K: KeyMaterial + ?Sized>(
        &mut self,
        keys: &K,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<(), TransactionError> {
        self.sign(keys, passphrase)?;

        if let Some(second) = second_passphrase.filter(|p| !p.is_empty()) {
            self.second_sign(keys, second)?;
        }

        self.id = self.get_id()?;
        Ok(())
    }
}
