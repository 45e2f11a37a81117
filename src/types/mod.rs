//! Types for the user-facing API

pub mod account;
pub mod broadcast;
pub mod gas_price;
pub mod transaction;

pub use account::AccountSnapshot;
pub use broadcast::{BroadcastMode, BroadcastResult, EventAttribute, TxEvent};
pub use gas_price::GasPrice;
pub use transaction::{FeeSetting, GasSetting, TransactionData, TransactionResponse};
