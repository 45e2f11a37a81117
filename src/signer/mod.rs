//! Transaction signer abstraction
//!
//! The wallet only needs a public key and a way to sign the canonical sign-doc
//! bytes. [`LocalSigner`] keeps a single secp256k1 private key in memory.

mod local;

pub use local::LocalSigner;

use cosmrs::crypto::PublicKey;
use cosmrs::AccountId;
use eyre::{Context, Result};

/// Trait for producing single-signer `SIGN_MODE_DIRECT` signatures
pub trait TransactionSigner: Send + Sync {
    /// Public key placed in the transaction's signer info
    fn public_key(&self) -> PublicKey;

    /// Bech32 address of the signer for the given prefix
    fn address(&self, prefix: &str) -> Result<AccountId> {
        self.public_key()
            .account_id(prefix)
            .wrap_err_with(|| format!("Failed to derive address with prefix {prefix}"))
    }

    /// Signs the encoded sign doc, returning the raw signature bytes
    fn sign(&self, sign_doc_bytes: &[u8]) -> Result<Vec<u8>>;
}
