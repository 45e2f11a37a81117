//! Transaction request and response types for the user-facing API

use crate::types::{AccountSnapshot, BroadcastResult};
use crate::wallet::SignedTx;
use cosmrs::tx::Msg;
use cosmrs::{AccountId, Any, Coin};
use eyre::{Context, Result};

/// How the gas limit of a transaction is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GasSetting {
    /// Use exactly this many gas units (zero included)
    Fixed(u64),
    /// Simulate the transaction and apply the configured gas adjustment
    Auto,
}

impl Default for GasSetting {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

/// How the fee of a transaction is chosen
#[derive(Debug, Clone, PartialEq)]
pub enum FeeSetting {
    /// Pay exactly these coins (an empty list included)
    Fixed(Vec<Coin>),
    /// Pay `ceil(gas_limit * gas_price)` in the gas price denomination
    Auto,
}

impl Default for FeeSetting {
    fn default() -> Self {
        Self::Fixed(Vec::new())
    }
}

/// Everything the caller wants in a transaction
///
/// Built once with the `with_*` methods, then handed to
/// [`crate::Wallet::build_tx`] or one of the broadcast methods.
#[derive(Debug, Clone)]
pub struct TransactionData {
    /// Messages, in execution order
    pub messages: Vec<Any>,
    /// Optional memo
    pub memo: Option<String>,
    /// Gas limit policy
    pub gas: GasSetting,
    /// Fee policy
    pub fee: FeeSetting,
    /// Account paying the fees through an existing on-chain fee grant
    pub fee_granter: Option<AccountId>,
    /// Explicit sequence number, superseding the one read from the chain
    pub sequence: Option<u64>,
}

impl TransactionData {
    /// Create a new request carrying the given messages
    ///
    /// Gas defaults to `Fixed(0)` and fees to `Fixed(vec![])`, the values a chain
    /// without fees accepts.
    pub fn new(messages: impl IntoIterator<Item = Any>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
            memo: None,
            gas: GasSetting::default(),
            fee: FeeSetting::default(),
            fee_granter: None,
            sequence: None,
        }
    }

    /// Create a new request from typed messages
    pub fn from_msgs<M: Msg>(messages: impl IntoIterator<Item = M>) -> Result<Self> {
        let messages = messages
            .into_iter()
            .map(|msg| msg.to_any())
            .collect::<std::result::Result<Vec<_>, _>>()
            .wrap_err("Failed to encode message")?;
        Ok(Self::new(messages))
    }

    /// Set the memo
    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// Use the given gas limit
    pub fn with_gas_limit(mut self, limit: u64) -> Self {
        self.gas = GasSetting::Fixed(limit);
        self
    }

    /// Compute the gas limit by simulating the transaction
    pub fn with_gas_auto(mut self) -> Self {
        self.gas = GasSetting::Auto;
        self
    }

    /// Pay the given fee amount
    pub fn with_fee_amount(mut self, amount: Vec<Coin>) -> Self {
        self.fee = FeeSetting::Fixed(amount);
        self
    }

    /// Compute the fee from the gas limit and the configured gas price
    pub fn with_fee_auto(mut self) -> Self {
        self.fee = FeeSetting::Auto;
        self
    }

    /// Let `granter` pay the fees.
    ///
    /// A fee grant from the granter towards the signer must already exist on chain.
    pub fn with_fee_granter(mut self, granter: AccountId) -> Self {
        self.fee_granter = Some(granter);
        self
    }

    /// Sign with the given sequence instead of the one currently stored on chain.
    ///
    /// Useful to pre-sign several transactions before broadcasting any of them.
    pub fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = Some(sequence);
        self
    }
}

/// Outcome of a broadcast call
#[derive(Debug, Clone, Default)]
pub struct TransactionResponse {
    /// Node response; absent if the broadcast failed before producing one
    pub result: Option<BroadcastResult>,
    /// Account that signed the transaction
    pub account: Option<AccountSnapshot>,
    /// Transaction that was broadcast
    pub tx: Option<SignedTx>,
}

impl TransactionResponse {
    /// Create an empty response
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the signing account
    pub fn with_account(mut self, account: AccountSnapshot) -> Self {
        self.account = Some(account);
        self
    }

    /// Set the signed transaction
    pub fn with_tx(mut self, tx: SignedTx) -> Self {
        self.tx = Some(tx);
        self
    }

    /// Set the broadcast result
    pub fn with_result(mut self, result: BroadcastResult) -> Self {
        self.result = Some(result);
        self
    }

    /// Hash of the broadcast transaction
    pub fn tx_hash(&self) -> Option<&str> {
        self.result.as_ref().map(|result| result.hash.as_str())
    }
}
