//! Signature blob parsing
//!
//! On chain, the signatures of a transaction follow its asset as one opaque
//! byte string. Whether those bytes are Schnorr or ECDSA, and how many
//! signers they hold, has to be recovered from the length alone:
//!
//! - Schnorr signatures are 64 bytes; multi-signature entries are 65 bytes
//!   (signer index + signature).
//! - ECDSA signatures are DER encoded, `0x30 len ...`, so their size is
//!   `buf[1] + 2` and rarely lines up with multiples of 65.
//!
//! The classification can misjudge a DER blob whose total length happens to
//! look Schnorr-shaped. That ambiguity is part of the wire format.

use super::transaction::{Transaction, TransactionError, MULTI_SIGNATURE_MARKER};

/// Size of a Schnorr signature
pub const SCHNORR_SIGNATURE_LEN: usize = 64;

/// Size of one multi-signature entry: index byte + Schnorr signature
pub const MULTI_SIGNATURE_ENTRY_LEN: usize = SCHNORR_SIGNATURE_LEN + 1;

/// Signature fields recovered from a blob, hex encoded
///
/// An empty string means the field was not present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureBlob {
    pub signature: String,
    pub second_signature: String,
    pub signatures: Vec<String>,
}

/// Length-only test for a Schnorr encoded signature blob
pub fn is_schnorr_signature(len: usize) -> bool {
    len == SCHNORR_SIGNATURE_LEN // signature
        || len == 2 * SCHNORR_SIGNATURE_LEN // signature + second signature
        || len % MULTI_SIGNATURE_ENTRY_LEN == 0 // multi-signatures only
        || len % MULTI_SIGNATURE_ENTRY_LEN == 64 // signature + multi-signatures
        || len % MULTI_SIGNATURE_ENTRY_LEN == 63 // signature + second + multi-signatures
}

impl SignatureBlob {
    /// Split a raw signature block into its fields
    pub fn parse(bytes: &[u8]) -> Result<Self, TransactionError> {
        if bytes.is_empty() {
            return Ok(Self::default());
        }

        if is_schnorr_signature(bytes.len()) {
            Self::parse_schnorr(bytes)
        } else {
            Self::parse_ecdsa(bytes)
        }
    }

    fn parse_ecdsa(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut blob = Self::default();

        let first_len = ecdsa_signature_len(bytes)?;
        blob.signature = hex::encode(&bytes[..first_len]);
        let mut offset = first_len;

        if offset < bytes.len() && bytes[offset] != MULTI_SIGNATURE_MARKER {
            let second_len = ecdsa_signature_len(&bytes[offset..])?;
            blob.second_signature = hex::encode(&bytes[offset..offset + second_len]);
            offset += second_len;
        }

        if offset != bytes.len() {
            return Err(TransactionError::MalformedSignatureBlob(format!(
                "all signatures parsed, but {} bytes remain in the buffer: {}",
                bytes.len() - offset,
                hex::encode(bytes)
            )));
        }

        Ok(blob)
    }

    fn parse_schnorr(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut blob = Self::default();
        let mut offset = 0;

        let can_read_single = |offset: usize| {
            let remaining = bytes.len() - offset;
            remaining >= SCHNORR_SIGNATURE_LEN && remaining % MULTI_SIGNATURE_ENTRY_LEN != 0
        };

        if can_read_single(offset) {
            blob.signature = hex::encode(&bytes[offset..offset + SCHNORR_SIGNATURE_LEN]);
            offset += SCHNORR_SIGNATURE_LEN;
        }

        if can_read_single(offset) {
            blob.second_signature = hex::encode(&bytes[offset..offset + SCHNORR_SIGNATURE_LEN]);
            offset += SCHNORR_SIGNATURE_LEN;
        }

        let rest = &bytes[offset..];
        if rest.len() % MULTI_SIGNATURE_ENTRY_LEN != 0 {
            return Err(TransactionError::MalformedSignatureBlob(format!(
                "cannot parse Schnorr signatures: remaining {} bytes not a multiple of {}",
                rest.len(),
                MULTI_SIGNATURE_ENTRY_LEN
            )));
        }

        blob.signatures = rest
            .chunks_exact(MULTI_SIGNATURE_ENTRY_LEN)
            .map(hex::encode)
            .collect();

        Ok(blob)
    }
}

/// Total size of the DER signature at the start of `bytes`
fn ecdsa_signature_len(bytes: &[u8]) -> Result<usize, TransactionError> {
    let declared = bytes.get(1).ok_or_else(|| {
        TransactionError::MalformedSignatureBlob(format!(
            "{} bytes is too short for a DER signature",
            bytes.len()
        ))
    })?;

    let len = *declared as usize + 2;
    if len > bytes.len() {
        return Err(TransactionError::MalformedSignatureBlob(format!(
            "DER signature claims {} bytes, only {} available",
            len,
            bytes.len()
        )));
    }
    Ok(len)
}

impl Transaction {
    /// Recover the signature fields from `serialized[sig_offset..]`
    ///
    /// Only the fields present in the blob are written; multi-signature
    /// entries are appended in blob order.
    pub fn parse_signatures(&mut self, sig_offset: usize) -> Result<(), TransactionError> {
        let bytes = self.serialized.get(sig_offset..).ok_or_else(|| {
            TransactionError::MalformedSignatureBlob(format!(
                "signature offset {} is past the end of {} bytes",
                sig_offset,
                self.serialized.len()
            ))
        })?;

        if bytes.is_empty() {
            self.signature.clear();
            return Ok(());
        }

        let blob = SignatureBlob::parse(bytes).map_err(|e| {
            log::warn!("Failed to parse signatures at offset {}: {}", sig_offset, e);
            e
        })?;

        if !blob.signature.is_empty() {
            self.signature = blob.signature;
        }
        if !blob.second_signature.is_empty() {
            self.second_signature = blob.second_signature;
        }
        self.signatures.extend(blob.signatures);

        Ok(())
    }
}
