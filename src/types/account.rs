//! On-chain account state used to sign a transaction

use serde::{Deserialize, Serialize};

/// Account number and sequence of the signing account
///
/// Fetched fresh for every build: a stale sequence makes the signature useless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Chain-assigned, permanent account number
    pub account_number: u64,
    /// Sequence the transaction is signed with
    pub sequence: u64,
}

impl AccountSnapshot {
    /// Create a snapshot
    pub fn new(account_number: u64, sequence: u64) -> Self {
        Self {
            account_number,
            sequence,
        }
    }

    /// Replace the sequence, keeping the account number
    pub fn with_sequence(self, sequence: u64) -> Self {
        Self { sequence, ..self }
    }
}
