//! Capability traits for the cryptographic primitives.
//!
//! The engine never performs cryptography itself: it moves opaque key
//! strings between storage and the primitives, and it never sees a
//! plaintext private key. Both traits are async so implementations may
//! call out to hardware or remote signers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// An opaque public/private key pair.
///
/// Key encoding is an implementation concern of the primitives; the
/// engine only stores and forwards these strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub pub_key: String,
    pub priv_key: String,
}

impl KeyPair {
    pub fn new(pub_key: impl Into<String>, priv_key: impl Into<String>) -> Self {
        Self {
            pub_key: pub_key.into(),
            priv_key: priv_key.into(),
        }
    }
}

/// Proxy re-encryption primitives.
///
/// `crypt_transform` is the heart of the delegation model: it converts a
/// ciphertext encrypted for identity X into one decryptable by identity Y
/// using a one-way transform key, without exposing the plaintext.
#[async_trait]
pub trait PrePrimitives: Send + Sync {
    /// Generate a fresh encryption key pair.
    async fn crypt_key_gen(&self) -> Result<KeyPair, CryptoError>;

    /// Generate a transform key re-encrypting from `key_pair`'s identity
    /// to the holder of `target_pub_key`.
    async fn crypt_transform_key_gen(
        &self,
        key_pair: &KeyPair,
        target_pub_key: &str,
    ) -> Result<String, CryptoError>;

    /// Encrypt a plaintext for the holder of `pub_key`.
    async fn encrypt(&self, pub_key: &str, plaintext: &str) -> Result<String, CryptoError>;

    /// Decrypt a ciphertext with the private half of `key_pair`.
    async fn decrypt(&self, key_pair: &KeyPair, ciphertext: &str) -> Result<String, CryptoError>;

    /// Re-encrypt `ciphertext` one hop along `transform_key`.
    ///
    /// `sign_key_pair` is the transforming service's own signing identity;
    /// schemes that authenticate transforms use it, others may ignore it.
    async fn crypt_transform(
        &self,
        transform_key: &str,
        ciphertext: &str,
        sign_key_pair: &KeyPair,
    ) -> Result<String, CryptoError>;

    /// Sign a message with `key_pair`.
    async fn sign(&self, key_pair: &KeyPair, message: &str) -> Result<String, CryptoError>;

    /// Verify `signature` over `message` against `pub_key`.
    ///
    /// Returns `Ok(false)` for a bad signature; `Err` is reserved for
    /// infrastructure failures.
    async fn verify(
        &self,
        pub_key: &str,
        signature: &str,
        message: &str,
    ) -> Result<bool, CryptoError>;
}

/// Generation of fresh signing identities.
///
/// Used for new documents (a document id is its signing public key) and
/// for the root document minted during account initialization.
#[async_trait]
pub trait SignKeyGen: Send + Sync {
    /// Produce a fresh signing key pair.
    async fn sign_key_gen(&self) -> Result<KeyPair, CryptoError>;
}
