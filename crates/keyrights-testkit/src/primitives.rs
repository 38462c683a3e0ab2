//! A deterministic, string-tagging fake of the cryptographic
//! capabilities.
//!
//! Instead of encrypting, every operation wraps its inputs in a
//! readable tag (`encrypted:{pub}:{pt}`, `transformed:{tk}:{ct}`,
//! `signed:{priv}:{msg}`), so tests can assert the exact key material
//! that flowed through the engine and count transform hops by counting
//! tags. Verification accepts a signature produced with a private key
//! equal to the claimed public key; test identities therefore use the
//! same string for both halves of a signing pair.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use keyrights_core::{CryptoError, KeyPair, PrePrimitives, SignKeyGen};

/// Tagging fake of [`PrePrimitives`] and [`SignKeyGen`].
///
/// Generated key pairs are numbered (`cryptPub1`, `signPub1`, ...) so a
/// test can predict the id a created document will receive.
#[derive(Default)]
pub struct TaggedPrimitives {
    crypt_counter: AtomicU64,
    sign_counter: AtomicU64,
}

impl TaggedPrimitives {
    pub fn new() -> Self {
        Self::default()
    }

    /// The signature this fake would produce for `message` under a
    /// signing key whose private half is `priv_key`.
    pub fn signature(priv_key: &str, message: &str) -> String {
        format!("signed:{priv_key}:{message}")
    }

    /// Count the transform hops a tagged ciphertext has been through.
    pub fn hops(ciphertext: &str) -> usize {
        ciphertext.matches("transformed:").count()
    }
}

#[async_trait]
impl PrePrimitives for TaggedPrimitives {
    async fn crypt_key_gen(&self) -> Result<KeyPair, CryptoError> {
        let n = self.crypt_counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(KeyPair::new(format!("cryptPub{n}"), format!("cryptPriv{n}")))
    }

    async fn crypt_transform_key_gen(
        &self,
        key_pair: &KeyPair,
        target_pub_key: &str,
    ) -> Result<String, CryptoError> {
        Ok(format!("transform:{}:{target_pub_key}", key_pair.priv_key))
    }

    async fn encrypt(&self, pub_key: &str, plaintext: &str) -> Result<String, CryptoError> {
        Ok(format!("encrypted:{pub_key}:{plaintext}"))
    }

    async fn decrypt(&self, key_pair: &KeyPair, ciphertext: &str) -> Result<String, CryptoError> {
        let prefix = format!("encrypted:{}:", key_pair.pub_key);
        ciphertext
            .strip_prefix(&prefix)
            .map(str::to_owned)
            .ok_or_else(|| CryptoError::Decryption("ciphertext not for this key".into()))
    }

    async fn crypt_transform(
        &self,
        transform_key: &str,
        ciphertext: &str,
        _sign_key_pair: &KeyPair,
    ) -> Result<String, CryptoError> {
        Ok(format!("transformed:{transform_key}:{ciphertext}"))
    }

    async fn sign(&self, key_pair: &KeyPair, message: &str) -> Result<String, CryptoError> {
        Ok(Self::signature(&key_pair.priv_key, message))
    }

    async fn verify(
        &self,
        pub_key: &str,
        signature: &str,
        message: &str,
    ) -> Result<bool, CryptoError> {
        Ok(signature == Self::signature(pub_key, message))
    }
}

#[async_trait]
impl SignKeyGen for TaggedPrimitives {
    async fn sign_key_gen(&self) -> Result<KeyPair, CryptoError> {
        let n = self.sign_counter.fetch_add(1, Ordering::Relaxed) + 1;
        Ok(KeyPair::new(format!("signPub{n}"), format!("signPriv{n}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tags_are_deterministic_and_countable() {
        let primitives = TaggedPrimitives::new();
        let service_sign = KeyPair::new("servicePub", "servicePriv");

        let ct = primitives.encrypt("pubA", "secret").await.unwrap();
        let once = primitives
            .crypt_transform("tkAB", &ct, &service_sign)
            .await
            .unwrap();
        let twice = primitives
            .crypt_transform("tkBC", &once, &service_sign)
            .await
            .unwrap();

        assert_eq!(TaggedPrimitives::hops(&ct), 0);
        assert_eq!(TaggedPrimitives::hops(&once), 1);
        assert_eq!(TaggedPrimitives::hops(&twice), 2);
        assert_eq!(twice, "transformed:tkBC:transformed:tkAB:encrypted:pubA:secret");
    }

    #[tokio::test]
    async fn verify_matches_self_signed_identities() {
        let primitives = TaggedPrimitives::new();
        let sig = TaggedPrimitives::signature("c1", "body");
        assert!(primitives.verify("c1", &sig, "body").await.unwrap());
        assert!(!primitives.verify("c2", &sig, "body").await.unwrap());
        assert!(!primitives.verify("c1", &sig, "other").await.unwrap());
    }

    #[tokio::test]
    async fn keygen_counts_up() {
        let primitives = TaggedPrimitives::new();
        let first = primitives.sign_key_gen().await.unwrap();
        let second = primitives.sign_key_gen().await.unwrap();
        assert_eq!(first.pub_key, "signPub1");
        assert_eq!(second.pub_key, "signPub2");
    }
}
