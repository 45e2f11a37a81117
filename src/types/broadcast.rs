//! Broadcast modes and node responses

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confirmation depth requested when submitting a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    /// Return once the node queued the transaction
    Async,
    /// Return once the node admitted the transaction to its mempool
    Sync,
    /// Return once the transaction was executed in a committed block
    Commit,
}

impl BroadcastMode {
    /// CometBFT JSON-RPC method implementing this mode
    pub fn rpc_method(self) -> &'static str {
        match self {
            Self::Async => "broadcast_tx_async",
            Self::Sync => "broadcast_tx_sync",
            Self::Commit => "broadcast_tx_commit",
        }
    }
}

impl fmt::Display for BroadcastMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Async => "async",
            Self::Sync => "sync",
            Self::Commit => "commit",
        };
        f.write_str(name)
    }
}

/// Key/value pair attached to an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// Event emitted while executing a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    /// Value of the first attribute named `key`
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }
}

/// What the node reported for a broadcast transaction
///
/// Height, gas accounting and events only exist for [`BroadcastMode::Commit`]
/// results that made it into a block.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BroadcastResult {
    /// Uppercase hex transaction hash
    pub hash: String,
    /// 0 on success, otherwise the module-specific error code
    pub code: u32,
    /// Module namespace of a nonzero code
    pub codespace: String,
    /// Raw log or error reason
    pub log: String,
    /// Height of the block including the transaction
    pub height: Option<u64>,
    /// Gas limit requested by the transaction
    pub gas_wanted: Option<u64>,
    /// Gas consumed during execution
    pub gas_used: Option<u64>,
    /// Events emitted during execution, with attributes as the node encoded
    /// them (base64 on CometBFT 0.34)
    pub events: Vec<TxEvent>,
}

impl BroadcastResult {
    /// Whether the node accepted (or executed) the transaction successfully
    pub fn is_success(&self) -> bool {
        self.code == 0
    }

    /// Events of the given type
    pub fn events_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a TxEvent> + 'a {
        self.events.iter().filter(move |event| event.kind == kind)
    }
}
