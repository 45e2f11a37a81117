//! Cosmos wallet SDK for Rust
//!
//! Builds, signs, simulates and broadcasts single-signer transactions for
//! Cosmos SDK chains.
//!
//! # Features
//!
//! - Automatic gas estimation through simulation, with a configurable adjustment
//! - Automatic fees from a gas price (`ceil(gas * price)`)
//! - Fee grants, memos and explicit sequence numbers for pre-signing
//! - Async, sync and commit broadcast modes
//!
//! # Example
//!
//! ```rust,ignore
//! use cosmos_wallet::{AccountConfig, ChainConfig, TransactionData, Wallet};
//! use cosmrs::bank::MsgSend;
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let chain = ChainConfig::from_env()?;
//!     let wallet = Wallet::from_config(&AccountConfig::new("abandon ..."), &chain)?;
//!
//!     let msg = MsgSend {
//!         from_address: wallet.address()?,
//!         to_address: "cosmos1...".parse()?,
//!         amount: vec![cosmrs::Coin::new(1000, "uatom")?],
//!     };
//!     let data = TransactionData::from_msgs([msg])?
//!         .with_gas_auto()
//!         .with_fee_auto();
//!
//!     let response = wallet.broadcast_tx_sync(&data).await?;
//!     println!("tx hash: {:?}", response.tx_hash());
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod signer;
pub mod types;
pub mod wallet;

// Re-export main types for convenience
pub use client::{CosmosClient, LedgerClient};
pub use config::{AccountConfig, ChainConfig, TxConfig};
pub use error::{eyre, Context, Report, Result, WalletError};
pub use signer::{LocalSigner, TransactionSigner};
pub use types::{
    AccountSnapshot, BroadcastMode, BroadcastResult, EventAttribute, FeeSetting, GasPrice,
    GasSetting, TransactionData, TransactionResponse, TxEvent,
};
pub use wallet::{DraftTx, FinalizedTx, SignedTx, SignerData, Wallet};
