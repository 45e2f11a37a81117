//! Chain, account and transaction configuration

use crate::constants::{DEFAULT_GAS_ADJUSTMENT, DEFAULT_HD_PATH, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::types::GasPrice;
use eyre::{ensure, Context, Result};
use serde::Deserialize;

/// Connection and pricing settings of the chain to talk to
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// Bech32 human readable part of account addresses (e.g. `cosmos`)
    pub bech32_prefix: String,
    /// CometBFT RPC endpoint used to broadcast transactions
    pub rpc_url: String,
    /// Cosmos SDK REST gateway used for queries and simulation
    pub rest_url: String,
    /// Gas price, e.g. `0.025uatom`
    pub gas_price: String,
    /// Multiplier applied to simulated gas usage
    #[serde(default = "default_gas_adjustment")]
    pub gas_adjustment: f64,
    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_gas_adjustment() -> f64 {
    DEFAULT_GAS_ADJUSTMENT
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl ChainConfig {
    /// Create a configuration with the default gas adjustment and timeout
    pub fn new(
        bech32_prefix: impl Into<String>,
        rpc_url: impl Into<String>,
        rest_url: impl Into<String>,
        gas_price: impl Into<String>,
    ) -> Self {
        Self {
            bech32_prefix: bech32_prefix.into(),
            rpc_url: rpc_url.into(),
            rest_url: rest_url.into(),
            gas_price: gas_price.into(),
            gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }

    /// Read the configuration from `COSMOS_*` environment variables (and `.env`)
    ///
    /// `COSMOS_BECH32_PREFIX`, `COSMOS_RPC_URL`, `COSMOS_REST_URL` and
    /// `COSMOS_GAS_PRICE` are required; `COSMOS_GAS_ADJUSTMENT` and
    /// `COSMOS_REQUEST_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            env_var("COSMOS_BECH32_PREFIX")?,
            env_var("COSMOS_RPC_URL")?,
            env_var("COSMOS_REST_URL")?,
            env_var("COSMOS_GAS_PRICE")?,
        );

        if let Ok(adjustment) = dotenvy::var("COSMOS_GAS_ADJUSTMENT") {
            config.gas_adjustment = adjustment
                .parse()
                .wrap_err("COSMOS_GAS_ADJUSTMENT must be a number")?;
        }
        if let Ok(timeout) = dotenvy::var("COSMOS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = timeout
                .parse()
                .wrap_err("COSMOS_REQUEST_TIMEOUT_SECS must be an integer")?;
        }

        Ok(config)
    }

    /// Set the gas adjustment factor
    pub fn with_gas_adjustment(mut self, gas_adjustment: f64) -> Self {
        self.gas_adjustment = gas_adjustment;
        self
    }

    /// Set the HTTP request timeout
    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Parse the pricing settings into the immutable builder configuration
    pub fn tx_config(&self) -> Result<TxConfig> {
        let gas_price: GasPrice = self.gas_price.parse()?;
        TxConfig::new(&self.bech32_prefix, gas_price)?.with_gas_adjustment(self.gas_adjustment)
    }
}

fn env_var(name: &str) -> Result<String> {
    dotenvy::var(name).wrap_err_with(|| format!("{name} environment variable must be set"))
}

/// Key material of the signing account
#[derive(Debug, Clone, Deserialize)]
pub struct AccountConfig {
    /// BIP-39 mnemonic phrase
    pub mnemonic: String,
    /// BIP-32 derivation path
    #[serde(default = "default_hd_path")]
    pub hd_path: String,
}

fn default_hd_path() -> String {
    DEFAULT_HD_PATH.to_string()
}

impl AccountConfig {
    /// Create an account configuration using the default Cosmos derivation path
    pub fn new(mnemonic: impl Into<String>) -> Self {
        Self {
            mnemonic: mnemonic.into(),
            hd_path: default_hd_path(),
        }
    }

    /// Set the derivation path
    pub fn with_hd_path(mut self, hd_path: impl Into<String>) -> Self {
        self.hd_path = hd_path.into();
        self
    }
}

/// Read-only settings the transaction builder works with
///
/// Shared by every build of a wallet; changing any value means building a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct TxConfig {
    account_prefix: String,
    gas_price: GasPrice,
    gas_adjustment: f64,
}

impl TxConfig {
    /// Create a configuration with the default gas adjustment
    pub fn new(account_prefix: impl Into<String>, gas_price: GasPrice) -> Result<Self> {
        let account_prefix = account_prefix.into();
        ensure!(
            !account_prefix.trim().is_empty(),
            "Account prefix must not be empty"
        );

        Ok(Self {
            account_prefix,
            gas_price,
            gas_adjustment: DEFAULT_GAS_ADJUSTMENT,
        })
    }

    /// Set the gas adjustment factor
    pub fn with_gas_adjustment(mut self, gas_adjustment: f64) -> Result<Self> {
        ensure!(
            gas_adjustment.is_finite() && gas_adjustment > 0.0,
            "Gas adjustment must be a positive number, got {gas_adjustment}"
        );
        self.gas_adjustment = gas_adjustment;
        Ok(self)
    }

    /// Bech32 prefix used to encode the signer's address
    pub fn account_prefix(&self) -> &str {
        &self.account_prefix
    }

    /// Gas price used for automatic fees
    pub fn gas_price(&self) -> &GasPrice {
        &self.gas_price
    }

    /// Multiplier applied to simulated gas usage
    pub fn gas_adjustment(&self) -> f64 {
        self.gas_adjustment
    }

    /// Fees to pay for `gas` units at the configured gas price
    pub fn fees(&self, gas: u64) -> Result<Vec<cosmrs::Coin>> {
        self.gas_price.fees(gas)
    }

    /// Gas limit to request for a simulated usage of `gas_used`
    ///
    /// The product is computed in `f64` and rounded up, so representation error
    /// can add one unit: 100 gas at an adjustment of 1.1 yields 111, not 110.
    pub fn adjusted_gas(&self, gas_used: u64) -> u64 {
        (gas_used as f64 * self.gas_adjustment).ceil() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tx_config_from_chain_config() {
        let chain = ChainConfig::new(
            "cosmos",
            "http://localhost:26657",
            "http://localhost:1317",
            "0.025uatom",
        );
        let config = chain.tx_config().unwrap();

        assert_eq!(config.account_prefix(), "cosmos");
        assert_eq!(config.gas_price().to_string(), "0.025uatom");
        assert_eq!(config.gas_adjustment(), 1.5);
        assert_eq!(config.fees(120_000).unwrap()[0].amount, 3000);
    }

    #[test]
    fn test_adjusted_gas_rounds_up() {
        let config = TxConfig::new("cosmos", "0.025uatom".parse().unwrap()).unwrap();
        assert_eq!(config.adjusted_gas(80_000), 120_000);
        assert_eq!(config.adjusted_gas(3), 5);

        let config = config.with_gas_adjustment(1.3).unwrap();
        assert_eq!(config.adjusted_gas(100_001), 130_002);
    }

    #[test]
    fn test_adjusted_gas_rounds_float_error_up() {
        let config = TxConfig::new("cosmos", "0.025uatom".parse().unwrap())
            .unwrap()
            .with_gas_adjustment(1.1)
            .unwrap();

        // 100.0 * 1.1 == 110.00000000000001 in f64
        assert_eq!(config.adjusted_gas(100), 111);
        assert_eq!(config.adjusted_gas(0), 0);
    }

    #[test]
    fn test_invalid_tx_config() {
        let price: GasPrice = "0.025uatom".parse().unwrap();
        assert!(TxConfig::new("  ", price.clone()).is_err());

        let config = TxConfig::new("cosmos", price).unwrap();
        assert!(config.clone().with_gas_adjustment(0.0).is_err());
        assert!(config.clone().with_gas_adjustment(f64::NAN).is_err());
        assert!(config.with_gas_adjustment(-1.5).is_err());
    }

    #[test]
    fn test_chain_config_deserialize_defaults() {
        let config: ChainConfig = serde_json::from_value(serde_json::json!({
            "bech32_prefix": "osmo",
            "rpc_url": "http://localhost:26657",
            "rest_url": "http://localhost:1317",
            "gas_price": "0.0025uosmo"
        }))
        .unwrap();

        assert_eq!(config.gas_adjustment, DEFAULT_GAS_ADJUSTMENT);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);

        let account: AccountConfig =
            serde_json::from_value(serde_json::json!({ "mnemonic": "word" })).unwrap();
        assert_eq!(account.hd_path, DEFAULT_HD_PATH);
    }
}
