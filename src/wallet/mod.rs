//! Wallet - main entry point for the SDK

mod pipeline;

pub use pipeline::{DraftTx, FinalizedTx, SignedTx, SignerData};

use crate::client::{self, CosmosClient, LedgerClient};
use crate::config::{AccountConfig, ChainConfig, TxConfig};
use crate::constants::SIMULATION_GAS_LIMIT;
use crate::error::WalletError;
use crate::signer::{LocalSigner, TransactionSigner};
use crate::types::{
    AccountSnapshot, BroadcastMode, FeeSetting, GasSetting, TransactionData, TransactionResponse,
};
use cosmrs::{AccountId, Coin};
use eyre::{eyre, Result};

/// Wallet that builds, signs and broadcasts transactions for a single account
pub struct Wallet<C: LedgerClient, S: TransactionSigner = LocalSigner> {
    signer: S,
    config: TxConfig,
    client: C,
}

impl Wallet<CosmosClient, LocalSigner> {
    /// Create a wallet from a mnemonic and a chain configuration
    pub fn from_config(account: &AccountConfig, chain: &ChainConfig) -> Result<Self> {
        let signer = LocalSigner::from_mnemonic(&account.mnemonic, Some(&account.hd_path))?;
        let config = chain.tx_config()?;
        let client = CosmosClient::new(chain)?;

        Ok(Self::new(signer, config, client))
    }
}

impl<C: LedgerClient, S: TransactionSigner> Wallet<C, S> {
    /// Create a new wallet
    pub fn new(signer: S, config: TxConfig, client: C) -> Self {
        Self {
            signer,
            config,
            client,
        }
    }

    /// Get the signer's address
    pub fn address(&self) -> Result<AccountId> {
        self.signer.address(self.config.account_prefix())
    }

    /// Get the transaction configuration
    pub fn config(&self) -> &TxConfig {
        &self.config
    }

    /// Get the ledger client
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Get the signer
    pub fn signer(&self) -> &S {
        &self.signer
    }

    // ========== Build ==========

    /// Build and sign a transaction without broadcasting it
    ///
    /// Returns the account snapshot the transaction was signed against (with the
    /// requested sequence override applied) and the signed transaction.
    ///
    /// # Errors
    ///
    /// The [`WalletError`] variant names the phase that failed. A request without
    /// messages fails before any network call.
    pub async fn build_tx(
        &self,
        data: &TransactionData,
    ) -> Result<(AccountSnapshot, SignedTx), WalletError> {
        let draft = DraftTx::new(data)?;

        let address = self.address().map_err(WalletError::AccountLookup)?;
        let mut account = self
            .client
            .get_account(address.as_ref())
            .await
            .map_err(WalletError::AccountLookup)?;
        tracing::debug!(
            "Account {}: number {}, sequence {}",
            address,
            account.account_number,
            account.sequence
        );

        if let Some(sequence) = data.sequence {
            tracing::debug!("Overriding sequence {} with {}", account.sequence, sequence);
            account = account.with_sequence(sequence);
        }

        let gas_limit = match data.gas {
            GasSetting::Fixed(limit) => limit,
            GasSetting::Auto => self.simulate_gas(&draft, &account).await?,
        };

        let fee_amount = match &data.fee {
            FeeSetting::Fixed(amount) => amount.clone(),
            FeeSetting::Auto => self.config.fees(gas_limit).map_err(WalletError::Fee)?,
        };
        tracing::debug!("Gas limit {}, fee {}", gas_limit, format_coins(&fee_amount));

        let finalized = draft.finalize(gas_limit, fee_amount);

        let chain_id = self
            .client
            .get_chain_id()
            .await
            .map_err(WalletError::ChainId)?;

        let signer_data = SignerData {
            chain_id,
            account_number: account.account_number,
            sequence: account.sequence,
        };
        let signed = finalized
            .sign(&self.signer, &signer_data)
            .map_err(WalletError::Signing)?;
        tracing::debug!("Signed transaction {}", signed.hash());

        Ok((account, signed))
    }

    /// Simulate the draft and return the adjusted gas limit
    async fn simulate_gas(
        &self,
        draft: &DraftTx,
        account: &AccountSnapshot,
    ) -> Result<u64, WalletError> {
        let placeholder_fee = self
            .config
            .fees(SIMULATION_GAS_LIMIT)
            .map_err(WalletError::Simulation)?;
        let tx_bytes = draft
            .simulation_bytes(account.sequence, placeholder_fee)
            .map_err(WalletError::Simulation)?;

        let gas_used = self
            .client
            .simulate_tx(&tx_bytes)
            .await
            .map_err(WalletError::Simulation)?;
        if gas_used == 0 {
            return Err(WalletError::Simulation(eyre!(
                "Simulation reported zero gas used"
            )));
        }

        let gas_limit = self.config.adjusted_gas(gas_used);
        tracing::debug!(
            "Simulated gas used {}, adjusted limit {} (x{})",
            gas_used,
            gas_limit,
            self.config.gas_adjustment()
        );
        Ok(gas_limit)
    }

    // ========== Broadcast ==========

    /// Build, sign and broadcast a transaction with the given confirmation depth
    ///
    /// A committed transaction that failed on chain (nonzero code) is returned
    /// as `Ok`; inspect [`crate::BroadcastResult::is_success`].
    ///
    /// # Errors
    ///
    /// Build failures carry no response. A failed broadcast returns
    /// [`WalletError::Broadcast`] with the account and the signed transaction.
    pub async fn broadcast_tx(
        &self,
        data: &TransactionData,
        mode: BroadcastMode,
    ) -> Result<TransactionResponse, WalletError> {
        let (account, tx) = self.build_tx(data).await?;
        let tx_hash = tx.hash();

        match client::broadcast(&self.client, tx.tx_bytes(), mode).await {
            Ok(result) => {
                if result.is_success() {
                    tracing::info!("Broadcast transaction {} ({})", result.hash, mode);
                } else {
                    tracing::warn!(
                        "Transaction {} ({}) failed with code {}: {}",
                        result.hash,
                        mode,
                        result.code,
                        result.log
                    );
                }

                Ok(TransactionResponse::new()
                    .with_account(account)
                    .with_tx(tx)
                    .with_result(result))
            }
            Err(error) => {
                tracing::warn!("Failed to broadcast transaction {}: {:#}", tx_hash, error);

                Err(WalletError::Broadcast {
                    error,
                    response: Box::new(TransactionResponse::new().with_account(account).with_tx(tx)),
                })
            }
        }
    }

    /// Broadcast and return as soon as the node queued the transaction
    pub async fn broadcast_tx_async(
        &self,
        data: &TransactionData,
    ) -> Result<TransactionResponse, WalletError> {
        self.broadcast_tx(data, BroadcastMode::Async).await
    }

    /// Broadcast and return once the transaction passed mempool validation
    pub async fn broadcast_tx_sync(
        &self,
        data: &TransactionData,
    ) -> Result<TransactionResponse, WalletError> {
        self.broadcast_tx(data, BroadcastMode::Sync).await
    }

    /// Broadcast and return once the transaction was executed in a block
    pub async fn broadcast_tx_commit(
        &self,
        data: &TransactionData,
    ) -> Result<TransactionResponse, WalletError> {
        self.broadcast_tx(data, BroadcastMode::Commit).await
    }
}

fn format_coins(coins: &[Coin]) -> String {
    if coins.is_empty() {
        return "none".to_string();
    }
    coins
        .iter()
        .map(|coin| format!("{}{}", coin.amount, coin.denom))
        .collect::<Vec<_>>()
        .join(",")
}
