//! Send tokens to yourself, then pre-sign a batch and broadcast it in order
//!
//! Run with: cargo run --example broadcast
//!
//! Requires MNEMONIC and the COSMOS_* environment variables (see `ChainConfig::from_env`)

use cosmos_wallet::{AccountConfig, ChainConfig, LedgerClient, TransactionData, Wallet};
use cosmrs::bank::MsgSend;
use cosmrs::Coin;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mnemonic = dotenvy::var("MNEMONIC")?;
    let chain = ChainConfig::from_env()?;
    let wallet = Wallet::from_config(&AccountConfig::new(mnemonic), &chain)?;

    let address = wallet.address()?;
    println!("\n========================================");
    println!("       Cosmos Wallet Broadcast Demo");
    println!("========================================");
    println!("Wallet: {}", address);

    let balances = wallet.client().get_balances(address.as_ref()).await?;
    for coin in &balances {
        println!("Balance: {}{}", coin.amount, coin.denom);
    }

    let denom = wallet.config().gas_price().denom().to_string();
    let msg = MsgSend {
        from_address: address.clone(),
        to_address: address.clone(),
        amount: vec![Coin::new(1, &denom)?],
    };

    // Single send, wait for the block
    println!("\n=== SEND (commit) ===");
    let data = TransactionData::from_msgs([msg.clone()])?
        .with_memo("cosmos-wallet demo")
        .with_gas_auto()
        .with_fee_auto();
    let response = wallet.broadcast_tx_commit(&data).await?;
    if let Some(result) = &response.result {
        println!("Hash: {}", result.hash);
        println!("Code: {} {}", result.code, result.log);
        println!("Height: {:?}", result.height);
        println!("Gas: {:?} / {:?}", result.gas_used, result.gas_wanted);
    }

    // Pre-sign consecutive sequences, then submit them together
    println!("\n=== BATCH (sync) ===");
    let account = wallet.client().get_account(address.as_ref()).await?;
    let base = TransactionData::from_msgs([msg])?
        .with_gas_limit(200_000)
        .with_fee_auto();

    let mut signed = Vec::new();
    for offset in 0..3 {
        let data = base.clone().with_sequence(account.sequence + offset);
        let (_, tx) = wallet.build_tx(&data).await?;
        println!("Signed sequence {}: {}", tx.sequence(), tx.hash());
        signed.push(tx);
    }

    // In sequence order, the mempool rejects gaps
    for tx in &signed {
        match wallet.client().broadcast_tx_sync(tx.tx_bytes()).await {
            Ok(result) => println!("Submitted {} (code {})", result.hash, result.code),
            Err(e) => println!("Failed to submit: {:#}", e),
        }
    }

    Ok(())
}
