//! Local private key signer implementation

use super::TransactionSigner;
use crate::constants::DEFAULT_HD_PATH;
use bip32::{DerivationPath, XPrv};
use bip39::{Language, Mnemonic};
use cosmrs::crypto::secp256k1::SigningKey;
use cosmrs::crypto::PublicKey;
use eyre::{Context, Result};
use std::fmt;

/// Local signer using a secp256k1 private key
///
/// Signatures are deterministic (RFC 6979): signing the same bytes twice yields
/// identical signatures.
pub struct LocalSigner {
    signing_key: SigningKey,
    public_key: PublicKey,
}

impl LocalSigner {
    /// Create a new LocalSigner from a private key hex string
    ///
    /// # Arguments
    ///
    /// * `private_key` - Hex-encoded 32 byte private key (with or without 0x prefix)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let signer = LocalSigner::from_private_key("0x...")?;
    /// ```
    pub fn from_private_key(private_key: impl AsRef<str>) -> Result<Self> {
        let key = private_key.as_ref().trim();
        let key = key.strip_prefix("0x").unwrap_or(key);

        let bytes = hex::decode(key).context("Private key is not valid hex")?;
        Self::from_bytes(&bytes)
    }

    /// Create a new LocalSigner from raw private key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(bytes).context("Failed to parse private key")?;
        let public_key = signing_key.public_key();

        Ok(Self {
            signing_key,
            public_key,
        })
    }

    /// Derive the signer from a BIP-39 mnemonic along a BIP-32 path
    ///
    /// # Arguments
    ///
    /// * `mnemonic` - English mnemonic phrase of 12, 15, 18, 21 or 24 words
    /// * `hd_path` - Derivation path, `m/44'/118'/0'/0/0` if `None`
    pub fn from_mnemonic(mnemonic: &str, hd_path: Option<&str>) -> Result<Self> {
        let phrase = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");
        let mnemonic = Mnemonic::parse_in_normalized(Language::English, &phrase)
            .context("Failed to parse mnemonic")?;
        let path: DerivationPath = hd_path
            .unwrap_or(DEFAULT_HD_PATH)
            .parse()
            .context("Invalid HD derivation path")?;

        let seed = mnemonic.to_seed("");
        let xprv = XPrv::derive_from_path(&seed, &path).context("Failed to derive key")?;

        Self::from_bytes(&xprv.private_key().to_bytes())
    }
}

impl TransactionSigner for LocalSigner {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    fn sign(&self, sign_doc_bytes: &[u8]) -> Result<Vec<u8>> {
        let signature = self
            .signing_key
            .sign(sign_doc_bytes)
            .context("Failed to sign transaction")?;

        Ok(signature.to_bytes().to_vec())
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k256::ecdsa::signature::Verifier;
    use k256::ecdsa::{Signature, VerifyingKey};

    const PRIVATE_KEY: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";
    const MNEMONIC: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const MNEMONIC_24: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn test_from_private_key_with_and_without_prefix() {
        let with = LocalSigner::from_private_key(PRIVATE_KEY).unwrap();
        let without = LocalSigner::from_private_key(&PRIVATE_KEY[2..]).unwrap();
        assert_eq!(with.public_key(), without.public_key());
        assert_eq!(with.public_key().to_bytes().len(), 33);
    }

    #[test]
    fn test_invalid_private_key() {
        assert!(LocalSigner::from_private_key("0xzz").is_err());
        assert!(LocalSigner::from_private_key("0x0102").is_err());
        assert!(LocalSigner::from_bytes(&[0u8; 32]).is_err());
    }

    #[test]
    fn test_address_uses_prefix() {
        let signer = LocalSigner::from_private_key(PRIVATE_KEY).unwrap();
        let cosmos = signer.address("cosmos").unwrap();
        let osmo = signer.address("osmo").unwrap();

        assert!(cosmos.to_string().starts_with("cosmos1"));
        assert!(osmo.to_string().starts_with("osmo1"));
        assert_eq!(cosmos.to_bytes(), osmo.to_bytes());
    }

    #[test]
    fn test_signature_is_deterministic_and_verifies() {
        let signer = LocalSigner::from_private_key(PRIVATE_KEY).unwrap();
        let message = b"sign doc bytes";

        let first = signer.sign(message).unwrap();
        let second = signer.sign(message).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);

        let verifying_key = VerifyingKey::from_sec1_bytes(&signer.public_key().to_bytes()).unwrap();
        let signature = Signature::from_slice(&first).unwrap();
        assert!(verifying_key.verify(message, &signature).is_ok());
        assert!(verifying_key.verify(b"other bytes", &signature).is_err());
    }

    #[test]
    fn test_from_mnemonic() {
        let default_path = LocalSigner::from_mnemonic(MNEMONIC, None).unwrap();
        let explicit = LocalSigner::from_mnemonic(MNEMONIC, Some("m/44'/118'/0'/0/0")).unwrap();
        let other_index = LocalSigner::from_mnemonic(MNEMONIC, Some("m/44'/118'/0'/0/1")).unwrap();

        assert_eq!(default_path.public_key(), explicit.public_key());
        assert_ne!(default_path.public_key(), other_index.public_key());

        assert!(LocalSigner::from_mnemonic("not a mnemonic", None).is_err());
        assert!(LocalSigner::from_mnemonic(MNEMONIC, Some("not/a/path")).is_err());
    }

    #[test]
    fn test_from_mnemonic_known_address() {
        let signer = LocalSigner::from_mnemonic(MNEMONIC, None).unwrap();
        assert_eq!(
            hex::encode(signer.public_key().to_bytes()),
            "024f4e2ad99c34d60b9ba6283c9431a8418af8673212961f97a77b6377fcd05b62"
        );
        assert_eq!(
            signer.address("cosmos").unwrap().to_string(),
            "cosmos19rl4cm2hmr8afy4kldpxz3fka4jguq0auqdal4"
        );

        let second = LocalSigner::from_mnemonic(MNEMONIC, Some("m/44'/118'/0'/0/1")).unwrap();
        assert_eq!(
            second.address("cosmos").unwrap().to_string(),
            "cosmos1jrkmdcwgq94uaamx6zax2luewlhf7u4kucx3kz"
        );
    }

    #[test]
    fn test_from_mnemonic_word_counts() {
        let spaced = format!("  {}\n", MNEMONIC.replace(' ', "   "));
        let signer = LocalSigner::from_mnemonic(&spaced, None).unwrap();
        assert_eq!(
            signer.public_key(),
            LocalSigner::from_mnemonic(MNEMONIC, None).unwrap().public_key()
        );

        let long = LocalSigner::from_mnemonic(MNEMONIC_24, None).unwrap();
        assert_ne!(long.public_key(), signer.public_key());

        // valid words, bad checksum
        let bad_checksum = MNEMONIC.replace("about", "abandon");
        assert!(LocalSigner::from_mnemonic(&bad_checksum, None).is_err());
    }
}
