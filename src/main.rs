//! arktx CLI Application
//!
//! A command-line interface for building, signing, verifying and decoding
//! transactions.

use ark_transactions::cli::{self, AppState, TransferRequest};
use ark_transactions::core::MultiSignatureAsset;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arktx")]
#[command(version = "0.1.0")]
#[command(about = "Build, sign and verify Ark transactions", long_about = None)]
struct Cli {
    /// Network preset (mainnet or devnet)
    #[arg(short, long, default_value = "mainnet")]
    network: String,

    /// Network configuration file; overrides --network
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and sign a transfer
    Transfer {
        /// Recipient address
        #[arg(short, long)]
        to: String,

        /// Amount in the smallest unit
        #[arg(short, long)]
        amount: u64,

        /// Sender nonce
        #[arg(long)]
        nonce: u64,

        /// Fee; the network default when omitted
        #[arg(long)]
        fee: Option<u64>,

        /// Expiration height, 0 for none
        #[arg(long, default_value = "0")]
        expiration: u32,

        /// Optional vendor field
        #[arg(long)]
        vendor_field: Option<String>,

        /// Sender passphrase
        #[arg(short, long)]
        passphrase: String,

        /// Second passphrase, if the sender registered one
        #[arg(long)]
        second_passphrase: Option<String>,
    },

    /// Verify the signatures of a JSON transaction
    Verify {
        /// Transaction JSON file
        #[arg(short, long)]
        file: PathBuf,

        /// Registered second public key (hex)
        #[arg(long)]
        second_public_key: Option<String>,

        /// Multi-signature threshold
        #[arg(long, requires = "public_keys")]
        min: Option<u8>,

        /// Registered multi-signature public keys (comma-separated hex)
        #[arg(long, requires = "min")]
        public_keys: Option<String>,
    },

    /// Decode serialized transaction bytes to JSON
    Decode {
        /// Hex-encoded transaction
        hex: String,
    },

    /// Show the address and public key of a passphrase
    Address {
        /// Passphrase
        #[arg(short, long)]
        passphrase: String,
    },

    /// Export the active network configuration
    ExportConfig {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let Cli {
        network,
        config,
        command,
    } = Cli::parse();

    // Decoding needs no network parameters, so the state is loaded per command
    let load_state = || AppState::new(&network, config.as_deref());

    match command {
        Commands::Decode { hex } => {
            cli::cmd_decode(&hex)?;
        }

        Commands::Transfer {
            to,
            amount,
            nonce,
            fee,
            expiration,
            vendor_field,
            passphrase,
            second_passphrase,
        } => {
            let request = TransferRequest {
                recipient: to,
                amount,
                nonce,
                fee,
                expiration,
                vendor_field,
                passphrase,
                second_passphrase,
            };
            cli::cmd_transfer(&load_state()?, &request)?;
        }

        Commands::Verify {
            file,
            second_public_key,
            min,
            public_keys,
        } => {
            let multi_signature = match (min, public_keys) {
                (Some(min), Some(keys)) => Some(MultiSignatureAsset {
                    min,
                    public_keys: keys.split(',').map(|s| s.trim().to_string()).collect(),
                }),
                _ => None,
            };
            cli::cmd_verify(
                &load_state()?,
                &file,
                second_public_key.as_deref(),
                multi_signature.as_ref(),
            )?;
        }

        Commands::Address { passphrase } => {
            cli::cmd_address(&load_state()?, &passphrase)?;
        }

        Commands::ExportConfig { output } => {
            cli::cmd_export_config(&load_state()?, &output)?;
        }
    }

    Ok(())
}
