//! Constants and precision values for the wallet SDK

/// Gas prices carry up to 18 fractional digits (Cosmos SDK `Dec` precision)
pub const GAS_PRICE_DECIMALS: u32 = 18;

/// 10^18, the fixed-point scale of a [`crate::types::GasPrice`]
pub const GAS_PRICE_SCALE: u128 = 1_000_000_000_000_000_000;

/// Default multiplier applied to simulated gas usage
pub const DEFAULT_GAS_ADJUSTMENT: f64 = 1.5;

/// Gas limit attached to the draft transaction sent to simulation
pub const SIMULATION_GAS_LIMIT: u64 = 200_000;

/// Default BIP-44 derivation path for Cosmos SDK accounts (coin type 118)
pub const DEFAULT_HD_PATH: &str = "m/44'/118'/0'/0/0";

/// Protobuf type URL of a secp256k1 public key
pub const SECP256K1_PUBKEY_TYPE_URL: &str = "/cosmos.crypto.secp256k1.PubKey";

/// Default HTTP request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every HTTP request
pub const USER_AGENT: &str = "CosmosWalletRustSDK/0.1.0";
