//! Typed transaction pipeline: `DraftTx -> FinalizedTx -> SignedTx`
//!
//! Gas and fee are fixed when a [`DraftTx`] becomes a [`FinalizedTx`], and a
//! [`SignedTx`] can only be produced from a [`FinalizedTx`]. Signing before the
//! fee is final therefore does not compile.

use crate::constants::{SECP256K1_PUBKEY_TYPE_URL, SIMULATION_GAS_LIMIT};
use crate::error::WalletError;
use crate::signer::TransactionSigner;
use crate::types::TransactionData;
use cosmrs::proto::cosmos::crypto::secp256k1::PubKey;
use cosmrs::proto::cosmos::tx::signing::v1beta1::SignMode;
use cosmrs::proto::cosmos::tx::v1beta1::{SignDoc, TxRaw};
use cosmrs::proto::traits::Message;
use cosmrs::tx::{self, ModeInfo, SignerInfo, SignerPublicKey};
use cosmrs::{AccountId, Any, Coin};
use eyre::{Context, Result};
use sha2::{Digest, Sha256};

/// Data a direct-mode signature commits to besides the transaction itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignerData {
    pub chain_id: String,
    pub account_number: u64,
    pub sequence: u64,
}

/// Messages, memo and fee granter, with gas and fee still open
#[derive(Debug, Clone)]
pub struct DraftTx {
    body: tx::Body,
    fee_granter: Option<AccountId>,
}

impl DraftTx {
    /// Start a draft from the caller's request
    pub fn new(data: &TransactionData) -> std::result::Result<Self, WalletError> {
        if data.messages.is_empty() {
            return Err(WalletError::EmptyMessages);
        }

        let memo = data.memo.clone().unwrap_or_default();
        Ok(Self {
            body: tx::Body::new(data.messages.clone(), memo, 0u32),
            fee_granter: data.fee_granter.clone(),
        })
    }

    /// Messages and memo, without timeout height
    pub fn body(&self) -> &tx::Body {
        &self.body
    }

    /// Encode the draft for gas simulation
    ///
    /// The signer slot holds an empty secp256k1 key and an empty signature: the
    /// node substitutes a sentinel key while simulating, so the estimate covers
    /// the size of a real signature. Gas is set to [`SIMULATION_GAS_LIMIT`].
    pub fn simulation_bytes(&self, sequence: u64, fee_amount: Vec<Coin>) -> Result<Vec<u8>> {
        let sentinel_key = Any {
            type_url: SECP256K1_PUBKEY_TYPE_URL.to_string(),
            value: PubKey { key: Vec::new() }.encode_to_vec(),
        };
        let signer_info = SignerInfo {
            public_key: Some(SignerPublicKey::Any(sentinel_key)),
            mode_info: ModeInfo::single(SignMode::Direct),
            sequence,
        };
        let auth_info = signer_info.auth_info(self.fee(fee_amount, SIMULATION_GAS_LIMIT));

        let raw = TxRaw {
            body_bytes: self.body.clone().into_bytes().context("Failed to encode tx body")?,
            auth_info_bytes: auth_info
                .into_bytes()
                .context("Failed to encode auth info")?,
            signatures: vec![Vec::new()],
        };
        Ok(raw.encode_to_vec())
    }

    /// Fix the gas limit and fee amount
    pub fn finalize(self, gas_limit: u64, fee_amount: Vec<Coin>) -> FinalizedTx {
        let fee = self.fee(fee_amount, gas_limit);
        FinalizedTx {
            body: self.body,
            fee,
        }
    }

    fn fee(&self, amount: Vec<Coin>, gas_limit: u64) -> tx::Fee {
        tx::Fee {
            amount,
            gas_limit,
            payer: None,
            granter: self.fee_granter.clone(),
        }
    }
}

/// Transaction whose gas limit and fee can no longer change
#[derive(Debug, Clone)]
pub struct FinalizedTx {
    body: tx::Body,
    fee: tx::Fee,
}

impl FinalizedTx {
    /// Body that will be signed, identical to the draft's
    pub fn body(&self) -> &tx::Body {
        &self.body
    }

    /// Final gas limit, fee coins and granter
    pub fn fee(&self) -> &tx::Fee {
        &self.fee
    }

    /// Attach the signer's key and sequence, then sign in `SIGN_MODE_DIRECT`
    pub fn sign<S: TransactionSigner + ?Sized>(
        self,
        signer: &S,
        signer_data: &SignerData,
    ) -> Result<SignedTx> {
        let auth_info = SignerInfo::single_direct(Some(signer.public_key()), signer_data.sequence)
            .auth_info(self.fee);

        let body_bytes = self
            .body
            .clone()
            .into_bytes()
            .context("Failed to encode tx body")?;
        let auth_info_bytes = auth_info
            .clone()
            .into_bytes()
            .context("Failed to encode auth info")?;

        let sign_doc_bytes = SignDoc {
            body_bytes: body_bytes.clone(),
            auth_info_bytes: auth_info_bytes.clone(),
            chain_id: signer_data.chain_id.clone(),
            account_number: signer_data.account_number,
        }
        .encode_to_vec();

        let signature = signer.sign(&sign_doc_bytes)?;

        let tx_bytes = TxRaw {
            body_bytes,
            auth_info_bytes,
            signatures: vec![signature.clone()],
        }
        .encode_to_vec();

        Ok(SignedTx {
            body: self.body,
            auth_info,
            signer_data: signer_data.clone(),
            sign_doc_bytes,
            signature,
            tx_bytes,
        })
    }
}

/// Fully signed single-signer transaction, ready to broadcast
#[derive(Debug, Clone)]
pub struct SignedTx {
    body: tx::Body,
    auth_info: tx::AuthInfo,
    signer_data: SignerData,
    sign_doc_bytes: Vec<u8>,
    signature: Vec<u8>,
    tx_bytes: Vec<u8>,
}

impl SignedTx {
    pub fn body(&self) -> &tx::Body {
        &self.body
    }

    pub fn auth_info(&self) -> &tx::AuthInfo {
        &self.auth_info
    }

    pub fn memo(&self) -> &str {
        &self.body.memo
    }

    pub fn messages(&self) -> &[Any] {
        &self.body.messages
    }

    pub fn gas_limit(&self) -> u64 {
        self.auth_info.fee.gas_limit
    }

    pub fn fee_amount(&self) -> &[Coin] {
        &self.auth_info.fee.amount
    }

    pub fn fee_granter(&self) -> Option<&AccountId> {
        self.auth_info.fee.granter.as_ref()
    }

    /// Chain id, account number and sequence the signature commits to
    pub fn signer_data(&self) -> &SignerData {
        &self.signer_data
    }

    pub fn sequence(&self) -> u64 {
        self.signer_data.sequence
    }

    /// 64 byte compact secp256k1 signature
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Encoded `SignDoc` the signature was computed over
    pub fn sign_doc_bytes(&self) -> &[u8] {
        &self.sign_doc_bytes
    }

    /// Encoded `TxRaw`, as sent to the network
    pub fn tx_bytes(&self) -> &[u8] {
        &self.tx_bytes
    }

    /// Uppercase hex SHA-256 of the encoded transaction
    pub fn hash(&self) -> String {
        hex::encode_upper(Sha256::digest(&self.tx_bytes))
    }
}
