//! One builder per transaction type
//!
//! Each method takes the caller's partially filled transaction, applies the
//! common defaults, attaches its asset and signs. The fields a caller is
//! expected to set are listed on each method; fee, network and timestamp
//! are optional everywhere.

use super::TransactionBuilder;
use crate::config::Clock;
use crate::core::{
    Asset, DelegateAsset, HtlcClaimAsset, HtlcLockAsset, HtlcRefundAsset, MultiSignatureAsset,
    Payment, SecondSignatureAsset, Transaction, TransactionError,
};
use crate::crypto::{address_from_passphrase, KeyMaterial};

impl<'a, C: Clock> TransactionBuilder<'a, C> {
    /// Transfer. Set `amount`, `nonce`, `recipient_id`; optionally
    /// `expiration` and `vendor_field`.
    pub fn transfer(
        &self,
        mut tx: Transaction,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::Transfer);
        self.signed(tx, passphrase, second_passphrase)
    }

    /// Transfer from a multi-signature wallet; appends one signature to
    /// whatever `signatures` already holds.
    pub fn transfer_multi_signature(
        &self,
        mut tx: Transaction,
        signer_index: u8,
        passphrase: &str,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::Transfer);
        self.multi_signed_with(tx, signer_index, passphrase)
    }

    /// Register the key derived from `second_passphrase` as the sender's
    /// second signature key, then sign with both.
    pub fn second_signature_registration(
        &self,
        mut tx: Transaction,
        passphrase: &str,
        second_passphrase: &str,
    ) -> Result<Transaction, TransactionError> {
        let second = self.config.signature_scheme.derive(second_passphrase)?;

        self.set_common_fields(
            &mut tx,
            Asset::SecondSignatureRegistration(SecondSignatureAsset {
                public_key: second.public_key_hex(),
            }),
        );
        tx.amount = 0;

        self.signed(tx, passphrase, Some(second_passphrase))
    }

    pub fn delegate_registration(
        &self,
        mut tx: Transaction,
        delegate: DelegateAsset,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::DelegateRegistration(delegate));
        self.signed(tx, passphrase, second_passphrase)
    }

    /// Vote or unvote delegates (`+<pubkey>` / `-<pubkey>`). The recipient
    /// is always the voter's own address.
    pub fn vote(
        &self,
        mut tx: Transaction,
        votes: Vec<String>,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::Vote(votes));
        tx.recipient_id = address_from_passphrase(passphrase, tx.network)?;
        self.signed(tx, passphrase, second_passphrase)
    }

    pub fn multi_signature_registration(
        &self,
        mut tx: Transaction,
        multi_signature: MultiSignatureAsset,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::MultiSignatureRegistration(multi_signature));
        self.signed(tx, passphrase, second_passphrase)
    }

    /// Store an IPFS multihash (base58) on chain
    pub fn ipfs(
        &self,
        mut tx: Transaction,
        hash: String,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::Ipfs(hash));
        self.signed(tx, passphrase, second_passphrase)
    }

    pub fn multi_payment(
        &self,
        mut tx: Transaction,
        payments: Vec<Payment>,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::MultiPayment(payments));
        self.signed(tx, passphrase, second_passphrase)
    }

    pub fn delegate_resignation(
        &self,
        mut tx: Transaction,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::DelegateResignation);
        self.signed(tx, passphrase, second_passphrase)
    }

    /// Lock `amount` for `recipient_id` until the secret is revealed or the
    /// lock expires.
    pub fn htlc_lock(
        &self,
        mut tx: Transaction,
        lock: HtlcLockAsset,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::HtlcLock(lock));
        self.signed(tx, passphrase, second_passphrase)
    }

    pub fn htlc_claim(
        &self,
        mut tx: Transaction,
        claim: HtlcClaimAsset,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::HtlcClaim(claim));
        self.signed(tx, passphrase, second_passphrase)
    }

    pub fn htlc_refund(
        &self,
        mut tx: Transaction,
        refund: HtlcRefundAsset,
        passphrase: &str,
        second_passphrase: Option<&str>,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, Asset::HtlcRefund(refund));
        self.signed(tx, passphrase, second_passphrase)
    }

    /// Any transaction type, signed by one member of a multi-signature
    /// wallet. Call again with the returned transaction for each cosigner.
    pub fn multi_signed(
        &self,
        mut tx: Transaction,
        asset: Asset,
        signer_index: u8,
        passphrase: &str,
    ) -> Result<Transaction, TransactionError> {
        self.set_common_fields(&mut tx, asset);
        self.multi_signed_with(tx, signer_index, passphrase)
    }

    /// Unsigned transfer with the next nonce after `current_nonce`, for
    /// signing elsewhere. The timestamp is always the current time.
    pub fn transfer_to_self(
        &self,
        recipient_id: &str,
        amount: u64,
        sender_public_key: &str,
        sender_id: &str,
        current_nonce: u64,
    ) -> Result<Transaction, TransactionError> {
        let nonce = current_nonce
            .checked_add(1)
            .ok_or_else(|| TransactionError::InvalidField {
                field: "Nonce",
                reason: "nonce overflow".to_string(),
            })?;

        let mut tx = Transaction {
            sender_public_key: sender_public_key.to_string(),
            sender_id: sender_id.to_string(),
            recipient_id: recipient_id.to_string(),
            nonce,
            amount,
            ..Default::default()
        };

        self.set_common_fields(&mut tx, Asset::Transfer);
        tx.timestamp = self.config.time(&self.clock);

        Ok(tx)
    }
}
