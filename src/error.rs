//! Error types for the wallet SDK
//!
//! Collaborators (ledger client, signer, configuration) report failures with `eyre`
//! for ergonomic context chains. The build/broadcast pipeline wraps those reports in
//! [`WalletError`] so callers can tell which phase failed.

pub use eyre::{eyre, Context, Report, Result};

use crate::types::TransactionResponse;
use thiserror::Error;

/// Failure of a build or broadcast pipeline, tagged with the phase that failed
#[derive(Debug, Error)]
pub enum WalletError {
    /// The request carried no messages (checked before any network call)
    #[error("error while building a transaction with no messages")]
    EmptyMessages,

    /// The signer's account could not be fetched from the chain
    #[error("error while getting the account from the chain: {0:#}")]
    AccountLookup(Report),

    /// Gas simulation failed or returned no usable estimate
    #[error("error while simulating tx: {0:#}")]
    Simulation(Report),

    /// The fee could not be computed from the gas limit and gas price
    #[error("error while computing the fee amount: {0:#}")]
    Fee(Report),

    /// The chain id could not be fetched from the chain
    #[error("error while getting chain id: {0:#}")]
    ChainId(Report),

    /// The transaction could not be encoded or signed
    #[error("error while signing the transaction: {0:#}")]
    Signing(Report),

    /// The signed transaction could not be delivered to the node
    #[error("error while broadcasting the transaction: {error:#}")]
    Broadcast {
        /// Underlying transport or node error
        error: Report,
        /// Account and signed transaction used for the failed attempt
        response: Box<TransactionResponse>,
    },
}

impl WalletError {
    /// Short name of the phase that failed
    pub fn phase(&self) -> &'static str {
        match self {
            Self::EmptyMessages => "validation",
            Self::AccountLookup(_) => "account lookup",
            Self::Simulation(_) => "simulation",
            Self::Fee(_) => "fee",
            Self::ChainId(_) => "chain id lookup",
            Self::Signing(_) => "signing",
            Self::Broadcast { .. } => "broadcast",
        }
    }

    /// Partial response of a failed broadcast, if any
    pub fn response(&self) -> Option<&TransactionResponse> {
        match self {
            Self::Broadcast { response, .. } => Some(response),
            _ => None,
        }
    }
}
