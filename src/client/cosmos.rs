//! HTTP ledger client for Cosmos SDK chains
//!
//! Queries and simulation go through the REST gateway (`/cosmos/...` routes),
//! broadcasts through the CometBFT JSON-RPC endpoint.

use super::serde_helpers::{u64_from_any, value_to_u64};
use super::LedgerClient;
use crate::config::ChainConfig;
use crate::constants::USER_AGENT;
use crate::types::{AccountSnapshot, BroadcastResult, EventAttribute, TxEvent};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use cosmrs::{AccountId, Coin};
use eyre::{ensure, eyre, Context, Result};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Ledger client backed by a REST gateway and a CometBFT RPC node
#[derive(Debug)]
pub struct CosmosClient {
    account_prefix: String,
    rpc_url: String,
    rest_url: String,
    client: Client,
    next_request_id: AtomicU64,
}

// ========== REST Response Types ==========

#[derive(Debug, Deserialize)]
struct AccountResponse {
    account: Value,
}

#[derive(Debug, Deserialize)]
struct NodeInfoResponse {
    default_node_info: DefaultNodeInfo,
}

#[derive(Debug, Deserialize)]
struct DefaultNodeInfo {
    network: String,
}

#[derive(Debug, Serialize)]
struct SimulateRequest {
    tx_bytes: String,
}

#[derive(Debug, Deserialize)]
struct SimulateResponse {
    gas_info: Option<GasInfo>,
}

#[derive(Debug, Deserialize)]
struct GasInfo {
    #[serde(deserialize_with = "u64_from_any")]
    gas_used: u64,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    balances: Vec<RestCoin>,
}

#[derive(Debug, Deserialize)]
struct RestCoin {
    denom: String,
    amount: String,
}

// ========== JSON-RPC Types ==========

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct BroadcastTxResponse {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    log: String,
    hash: String,
}

#[derive(Debug, Deserialize)]
struct BroadcastTxCommitResponse {
    check_tx: ExecTxResult,
    // CometBFT 0.38 renamed `deliver_tx` to `tx_result`
    #[serde(default, alias = "deliver_tx")]
    tx_result: Option<ExecTxResult>,
    hash: String,
    #[serde(deserialize_with = "u64_from_any")]
    height: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ExecTxResult {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    log: String,
    #[serde(default, deserialize_with = "u64_from_any")]
    gas_wanted: u64,
    #[serde(default, deserialize_with = "u64_from_any")]
    gas_used: u64,
    #[serde(default)]
    events: Vec<RpcEvent>,
}

#[derive(Debug, Deserialize)]
struct RpcEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    attributes: Vec<RpcEventAttribute>,
}

// Passed through as the node encodes them: plain text since CometBFT 0.37,
// base64 on 0.34 nodes.
#[derive(Debug, Deserialize)]
struct RpcEventAttribute {
    key: String,
    #[serde(default)]
    value: Option<String>,
}

impl From<RpcEvent> for TxEvent {
    fn from(event: RpcEvent) -> Self {
        Self {
            kind: event.kind,
            attributes: event
                .attributes
                .into_iter()
                .map(|attr| EventAttribute {
                    key: attr.key,
                    value: attr.value.unwrap_or_default(),
                })
                .collect(),
        }
    }
}

impl CosmosClient {
    /// Create a new CosmosClient from the chain configuration
    pub fn new(config: &ChainConfig) -> Result<Self> {
        ensure!(
            !config.bech32_prefix.trim().is_empty(),
            "Bech32 prefix must not be empty"
        );
        let rpc_url: reqwest::Url = config.rpc_url.parse().context("Invalid RPC URL")?;
        let rest_url: reqwest::Url = config.rest_url.parse().context("Invalid REST URL")?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            account_prefix: config.bech32_prefix.clone(),
            rpc_url: rpc_url.as_str().trim_end_matches('/').to_string(),
            rest_url: rest_url.as_str().trim_end_matches('/').to_string(),
            client,
            next_request_id: AtomicU64::new(1),
        })
    }

    /// Bech32 prefix of the chain's account addresses
    pub fn account_prefix(&self) -> &str {
        &self.account_prefix
    }

    /// Parse a bech32 address, rejecting blank input and foreign prefixes
    pub fn parse_address(&self, address: &str) -> Result<AccountId> {
        ensure!(
            !address.trim().is_empty(),
            "empty address string is not allowed"
        );

        let account: AccountId = address
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid bech32 address: {address}"))?;
        ensure!(
            account.prefix() == self.account_prefix,
            "invalid bech32 prefix: expected {}, got {}",
            self.account_prefix,
            account.prefix()
        );

        Ok(account)
    }

    /// Balances held by `address`
    pub async fn get_balances(&self, address: &str) -> Result<Vec<Coin>> {
        let path = format!("/cosmos/bank/v1beta1/balances/{address}");
        let response: BalancesResponse = self.rest_get(&path).await?;

        response
            .balances
            .into_iter()
            .map(|coin| {
                let amount: u128 = coin
                    .amount
                    .parse()
                    .wrap_err_with(|| format!("Invalid balance amount: {}", coin.amount))?;
                Coin::new(amount, &coin.denom)
            })
            .collect()
    }

    async fn rest_get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.rest_url, path);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to GET {path}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            if status == StatusCode::NOT_FOUND {
                eyre::bail!("Not found: GET {} - {}", path, body);
            }
            eyre::bail!("GET {} failed: {} - {}", path, status, body);
        }

        resp.json()
            .await
            .wrap_err_with(|| format!("Failed to parse GET {path} response"))
    }

    async fn rest_post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.rest_url, path);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to POST {path}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            eyre::bail!("POST {} failed: {} - {}", path, status, body);
        }

        resp.json()
            .await
            .wrap_err_with(|| format!("Failed to parse POST {path} response"))
    }

    async fn rpc_call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_request_id.fetch_add(1, Ordering::Relaxed),
            method,
            params,
        };

        let resp = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .wrap_err_with(|| format!("Failed to call {method}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .wrap_err_with(|| format!("Failed to read {method} response"))?;

        let response: RpcResponse<T> = serde_json::from_str(&text).wrap_err_with(|| {
            format!(
                "Failed to parse {} response ({}): {}",
                method,
                status,
                text.chars().take(200).collect::<String>()
            )
        })?;

        if let Some(error) = response.error {
            let data = error.data.map(|d| d.to_string()).unwrap_or_default();
            eyre::bail!(
                "{} failed with code {}: {} {}",
                method,
                error.code,
                error.message,
                data
            );
        }

        response
            .result
            .ok_or_else(|| eyre!("{method} response has neither result nor error"))
    }

    async fn submit(&self, method: &str, tx_bytes: &[u8]) -> Result<BroadcastResult> {
        let params = serde_json::json!({ "tx": BASE64.encode(tx_bytes) });
        let response: BroadcastTxResponse = self.rpc_call(method, params).await?;
        Ok(response.into())
    }
}

impl From<BroadcastTxResponse> for BroadcastResult {
    fn from(res: BroadcastTxResponse) -> Self {
        Self {
            hash: res.hash,
            code: res.code,
            codespace: res.codespace,
            log: res.log,
            ..Default::default()
        }
    }
}

impl TryFrom<BroadcastTxCommitResponse> for BroadcastResult {
    type Error = eyre::Report;

    fn try_from(res: BroadcastTxCommitResponse) -> Result<Self> {
        // Rejected by CheckTx: never reached a block
        if res.check_tx.code != 0 {
            return Ok(exec_result(res.hash, None, res.check_tx));
        }

        let tx_result = res
            .tx_result
            .ok_or_else(|| eyre!("Commit response for {} has no tx_result", res.hash))?;
        Ok(exec_result(res.hash, Some(res.height), tx_result))
    }
}

fn exec_result(hash: String, height: Option<u64>, result: ExecTxResult) -> BroadcastResult {
    BroadcastResult {
        hash,
        code: result.code,
        codespace: result.codespace,
        log: result.log,
        height,
        gas_wanted: Some(result.gas_wanted),
        gas_used: Some(result.gas_used),
        events: result.events.into_iter().map(TxEvent::from).collect(),
    }
}

/// Find the object carrying `account_number`, looking through the base account
/// wrappers used by module and vesting accounts
fn find_base_account(account: &Value) -> Option<&Value> {
    if account.get("account_number").is_some() {
        return Some(account);
    }

    account
        .get("base_account")
        .and_then(find_base_account)
        .or_else(|| {
            account
                .get("base_vesting_account")
                .and_then(find_base_account)
        })
}

fn parse_account(account: &Value) -> Result<AccountSnapshot> {
    let base = find_base_account(account)
        .ok_or_else(|| eyre!("Unsupported account type: {}", account))?;

    let account_number = value_to_u64(&base["account_number"]).context("Invalid account_number")?;
    let sequence = match base.get("sequence") {
        Some(Value::Null) | None => 0,
        Some(value) => value_to_u64(value).context("Invalid sequence")?,
    };

    Ok(AccountSnapshot::new(account_number, sequence))
}

impl LedgerClient for CosmosClient {
    async fn get_account(&self, address: &str) -> Result<AccountSnapshot> {
        let path = format!("/cosmos/auth/v1beta1/accounts/{address}");
        let response: AccountResponse = self
            .rest_get(&path)
            .await
            .wrap_err_with(|| format!("Failed to get account {address}"))?;

        let account = parse_account(&response.account)?;
        tracing::debug!(
            "Fetched account {}: number {} sequence {}",
            address,
            account.account_number,
            account.sequence
        );
        Ok(account)
    }

    async fn get_chain_id(&self) -> Result<String> {
        let response: NodeInfoResponse = self
            .rest_get("/cosmos/base/tendermint/v1beta1/node_info")
            .await
            .context("Failed to get node info")?;

        Ok(response.default_node_info.network)
    }

    async fn simulate_tx(&self, tx_bytes: &[u8]) -> Result<u64> {
        let request = SimulateRequest {
            tx_bytes: BASE64.encode(tx_bytes),
        };
        let response: SimulateResponse = self
            .rest_post("/cosmos/tx/v1beta1/simulate", &request)
            .await?;

        let gas_info = response
            .gas_info
            .ok_or_else(|| eyre!("Simulation response has no gas_info"))?;
        Ok(gas_info.gas_used)
    }

    async fn broadcast_tx_async(&self, tx_bytes: &[u8]) -> Result<BroadcastResult> {
        self.submit("broadcast_tx_async", tx_bytes).await
    }

    async fn broadcast_tx_sync(&self, tx_bytes: &[u8]) -> Result<BroadcastResult> {
        self.submit("broadcast_tx_sync", tx_bytes).await
    }

    async fn broadcast_tx_commit(&self, tx_bytes: &[u8]) -> Result<BroadcastResult> {
        let params = serde_json::json!({ "tx": BASE64.encode(tx_bytes) });
        let response: BroadcastTxCommitResponse =
            self.rpc_call("broadcast_tx_commit", params).await?;
        response.try_into()
    }
}
