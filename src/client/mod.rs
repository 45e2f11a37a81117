//! Ledger client abstraction
//!
//! Everything the transaction pipeline needs from the network: one round trip per
//! call, no retries. [`CosmosClient`] talks to a Cosmos SDK REST gateway and a
//! CometBFT RPC endpoint.

mod cosmos;
mod serde_helpers;

pub use cosmos::CosmosClient;

use crate::types::{AccountSnapshot, BroadcastMode, BroadcastResult};
use eyre::Result;
use std::future::Future;

/// Trait for querying chain state and submitting transactions
pub trait LedgerClient: Send + Sync {
    /// Account number and current sequence of `address`
    fn get_account(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<AccountSnapshot>> + Send;

    /// Chain identifier signatures must commit to
    fn get_chain_id(&self) -> impl Future<Output = Result<String>> + Send;

    /// Dry-runs the encoded transaction and returns the gas it used
    fn simulate_tx(&self, tx_bytes: &[u8]) -> impl Future<Output = Result<u64>> + Send;

    /// Submits the transaction and returns once the node queued it
    fn broadcast_tx_async(
        &self,
        tx_bytes: &[u8],
    ) -> impl Future<Output = Result<BroadcastResult>> + Send;

    /// Submits the transaction and returns once it passed mempool validation
    fn broadcast_tx_sync(
        &self,
        tx_bytes: &[u8],
    ) -> impl Future<Output = Result<BroadcastResult>> + Send;

    /// Submits the transaction and returns once it was executed in a committed block
    fn broadcast_tx_commit(
        &self,
        tx_bytes: &[u8],
    ) -> impl Future<Output = Result<BroadcastResult>> + Send;
}

/// Submits `tx_bytes` through the client primitive matching `mode`
///
/// Each mode maps to exactly one primitive; the requested confirmation depth is
/// never changed.
pub async fn broadcast<C: LedgerClient>(
    client: &C,
    tx_bytes: &[u8],
    mode: BroadcastMode,
) -> Result<BroadcastResult> {
    match mode {
        BroadcastMode::Async => client.broadcast_tx_async(tx_bytes).await,
        BroadcastMode::Sync => client.broadcast_tx_sync(tx_bytes).await,
        BroadcastMode::Commit => client.broadcast_tx_commit(tx_bytes).await,
    }
}
