//! CLI commands for the transaction tool
//!
//! Implements all command handlers for the CLI interface.

use crate::builder::TransactionBuilder;
use crate::config::NetworkConfig;
use crate::core::{MultiSignatureAsset, Transaction, TransactionError};
use crate::crypto::{public_key_from_hex, public_key_to_address, KeyMaterial};
use std::fs;
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Application state
pub struct AppState {
    pub config: NetworkConfig,
}

impl AppState {
    /// Resolve the network: a config file wins over the preset name
    pub fn new(network: &str, config_path: Option<&Path>) -> CliResult<Self> {
        let config = match config_path {
            Some(path) => NetworkConfig::load(path)?,
            None => NetworkConfig::preset(network)
                .ok_or_else(|| format!("unknown network {:?}", network))?,
        };

        log::debug!(
            "Using network {} (version {}, {:?} signatures)",
            config.name,
            config.version,
            config.signature_scheme
        );

        Ok(Self { config })
    }
}

/// Parameters of a transfer built from the command line
#[derive(Debug, Clone, Default)]
pub struct TransferRequest {
    pub recipient: String,
    pub amount: u64,
    pub nonce: u64,
    pub fee: Option<u64>,
    pub expiration: u32,
    pub vendor_field: Option<String>,
    pub passphrase: String,
    pub second_passphrase: Option<String>,
}

/// Build and sign a transfer
pub fn build_transfer(
    state: &AppState,
    request: &TransferRequest,
) -> Result<Transaction, TransactionError> {
    let tx = Transaction {
        recipient_id: request.recipient.clone(),
        amount: request.amount,
        nonce: request.nonce,
        fee: request.fee.unwrap_or(0),
        expiration: request.expiration,
        vendor_field: request.vendor_field.clone().unwrap_or_default(),
        ..Default::default()
    };

    TransactionBuilder::new(&state.config).transfer(
        tx,
        &request.passphrase,
        request.second_passphrase.as_deref(),
    )
}

/// Check every signature a transaction carries
///
/// With a signer set, the multi-signatures are checked against it instead
/// of the primary signature.
pub fn check_transaction(
    state: &AppState,
    tx: &Transaction,
    second_public_key: Option<&str>,
    multi_signature: Option<&MultiSignatureAsset>,
) -> Result<(), TransactionError> {
    let keys = &state.config.signature_scheme;

    match multi_signature {
        Some(asset) => tx.verify_multi_signature(keys, asset)?,
        None => tx.verify(keys)?,
    }

    if let Some(key_hex) = second_public_key {
        let key = public_key_from_hex(key_hex)
            .map_err(|_| TransactionError::InvalidPublicKey(key_hex.to_string()))?;
        tx.second_verify(keys, &key)?;
    }

    Ok(())
}

/// Build, sign and print a transfer
pub fn cmd_transfer(state: &AppState, request: &TransferRequest) -> CliResult<()> {
    let tx = build_transfer(state, request)?;

    println!("✍️  Signed transfer on {}", state.config.name);
    println!("   🆔 Id: {}", tx.id);
    println!("   💸 Amount: {} to {}", tx.amount, tx.recipient_id);
    println!("   🧾 Fee: {}", tx.fee);
    println!("\n{}", tx.to_json_pretty()?);
    println!("\n📦 Serialized: {}", tx.to_hex()?);

    Ok(())
}

/// Verify a JSON transaction read from a file
pub fn cmd_verify(
    state: &AppState,
    path: &Path,
    second_public_key: Option<&str>,
    multi_signature: Option<&MultiSignatureAsset>,
) -> CliResult<()> {
    let tx = Transaction::from_json(&fs::read_to_string(path)?)?;

    println!("🔍 Verifying {} transaction {}...", tx.transaction_type(), tx.id);

    if tx.is_multi_signed() && multi_signature.is_none() {
        println!("   ⚠️  Transaction carries multi-signatures; pass --min and --public-keys to check them");
    }

    match check_transaction(state, &tx, second_public_key, multi_signature) {
        Ok(()) => {
            println!("✅ Signatures are valid!");
            if tx.id != tx.get_id()? {
                println!("   ⚠️  Id field does not match the computed id {}", tx.get_id()?);
            }
        }
        Err(e) => {
            log::warn!("Verification of {} failed: {}", path.display(), e);
            println!("❌ Verification FAILED: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

/// Decode wire bytes into JSON
pub fn cmd_decode(hex_str: &str) -> CliResult<()> {
    let tx = Transaction::from_hex(hex_str.trim())?;
    println!("{}", tx.to_json_pretty()?);
    Ok(())
}

/// Derive the keys and address of a passphrase
pub fn cmd_address(state: &AppState, passphrase: &str) -> CliResult<()> {
    let key_pair = state.config.signature_scheme.derive(passphrase)?;

    println!("🔐 Keys for {}", state.config.name);
    println!(
        "   📍 Address: {}",
        public_key_to_address(&key_pair.public_key, state.config.version)
    );
    println!("   🔑 Public Key: {}", key_pair.public_key_hex());

    Ok(())
}

/// Write the active network configuration to a file
pub fn cmd_export_config(state: &AppState, path: &Path) -> CliResult<()> {
    state.config.save(path)?;
    println!("📦 Network configuration exported to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{address_from_passphrase, KeyPair};

    fn request() -> TransferRequest {
        TransferRequest {
            recipient: address_from_passphrase("recipient", 30).unwrap(),
            amount: 100_000_000,
            nonce: 5,
            passphrase: "abc".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_state_from_preset_and_file() {
        let state = AppState::new("devnet", None).unwrap();
        assert_eq!(state.config.version, 30);
        assert!(AppState::new("moonnet", None).is_err());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        let mut custom = NetworkConfig::devnet();
        custom.name = "custom".to_string();
        custom.save(&path).unwrap();

        let state = AppState::new("mainnet", Some(&path)).unwrap();
        assert_eq!(state.config.name, "custom");
    }

    #[test]
    fn test_build_and_check_transfer() {
        let state = AppState::new("devnet", None).unwrap();
        let mut req = request();
        req.second_passphrase = Some("def".to_string());
        req.vendor_field = Some("hello".to_string());

        let tx = build_transfer(&state, &req).unwrap();
        assert_eq!(tx.network, 30);
        assert_eq!(tx.vendor_field, "hello");

        let second = KeyPair::from_passphrase("def").unwrap().public_key_hex();
        assert!(check_transaction(&state, &tx, Some(&second), None).is_ok());

        let wrong = KeyPair::from_passphrase("abc").unwrap().public_key_hex();
        assert!(check_transaction(&state, &tx, Some(&wrong), None).is_err());
    }

    #[test]
    fn test_verify_and_decode_commands() {
        let state = AppState::new("devnet", None).unwrap();
        let tx = build_transfer(&state, &request()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.json");
        fs::write(&path, tx.to_json().unwrap()).unwrap();

        assert!(cmd_verify(&state, &path, None, None).is_ok());
        assert!(cmd_verify(&state, &dir.path().join("missing.json"), None, None).is_err());
        assert!(cmd_decode(&tx.to_hex().unwrap()).is_ok());

        let mut tampered = tx.clone();
        tampered.amount += 1;
        let tampered_path = dir.path().join("tampered.json");
        fs::write(&tampered_path, tampered.to_json().unwrap()).unwrap();
        assert!(cmd_verify(&state, &tampered_path, None, None).is_err());
        assert!(cmd_decode("ff02").is_err());
    }
}
