//! Reference implementation of the cryptographic capabilities.
//!
//! Signing is plain Ed25519 over hex-encoded keys. Encryption uses the
//! sealed boxes from [`crate::sealed`]. Re-encryption is emulated at the
//! service boundary: a transform key is the delegator's secret key sealed
//! to this service's own key, so `crypt_transform` can unwrap it, decrypt
//! the ciphertext, and re-seal the plaintext for the delegatee without the
//! caller ever handling key material.

use async_trait::async_trait;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use keyrights_core::{CryptoError, KeyPair, PrePrimitives, SignKeyGen};
use serde::{Deserialize, Serialize};

use crate::sealed;

/// A transform key before sealing: the delegator's secret and the
/// delegatee's public key.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransformKey {
    from_priv_key: String,
    to_pub_key: String,
}

/// Primitives backed by X25519 sealed boxes and Ed25519 signatures.
///
/// Holds the service's own encryption key pair, under which transform
/// keys are sealed.
pub struct ReferencePrimitives {
    service_crypt: KeyPair,
}

impl ReferencePrimitives {
    /// Build primitives around an existing service encryption key pair.
    pub fn new(service_crypt: KeyPair) -> Self {
        Self { service_crypt }
    }

    /// Build primitives with a freshly generated service key pair.
    pub fn generate() -> Self {
        Self::new(sealed::crypt_key_gen())
    }
}

#[async_trait]
impl PrePrimitives for ReferencePrimitives {
    async fn crypt_key_gen(&self) -> Result<KeyPair, CryptoError> {
        Ok(sealed::crypt_key_gen())
    }

    async fn crypt_transform_key_gen(
        &self,
        key_pair: &KeyPair,
        target_pub_key: &str,
    ) -> Result<String, CryptoError> {
        let transform = TransformKey {
            from_priv_key: key_pair.priv_key.clone(),
            to_pub_key: target_pub_key.to_owned(),
        };
        let plaintext =
            serde_json::to_vec(&transform).map_err(|e| CryptoError::Transform(e.to_string()))?;
        sealed::seal(&self.service_crypt.pub_key, &plaintext)
    }

    async fn encrypt(&self, pub_key: &str, plaintext: &str) -> Result<String, CryptoError> {
        sealed::seal(pub_key, plaintext.as_bytes())
    }

    async fn decrypt(&self, key_pair: &KeyPair, ciphertext: &str) -> Result<String, CryptoError> {
        let bytes = sealed::unseal(&key_pair.priv_key, ciphertext)?;
        String::from_utf8(bytes).map_err(|e| CryptoError::Decryption(e.to_string()))
    }

    async fn crypt_transform(
        &self,
        transform_key: &str,
        ciphertext: &str,
        _sign_key_pair: &KeyPair,
    ) -> Result<String, CryptoError> {
        let unwrapped = sealed::unseal(&self.service_crypt.priv_key, transform_key)
            .map_err(|e| CryptoError::Transform(e.to_string()))?;
        let transform: TransformKey = serde_json::from_slice(&unwrapped)
            .map_err(|e| CryptoError::Transform(e.to_string()))?;
        let plaintext = sealed::unseal(&transform.from_priv_key, ciphertext)
            .map_err(|e| CryptoError::Transform(e.to_string()))?;
        sealed::seal(&transform.to_pub_key, &plaintext)
    }

    async fn sign(&self, key_pair: &KeyPair, message: &str) -> Result<String, CryptoError> {
        let seed: [u8; 32] = hex::decode(&key_pair.priv_key)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?
            .try_into()
            .map_err(|_| CryptoError::InvalidKey("expected 32-byte signing key".into()))?;
        let signing = SigningKey::from_bytes(&seed);
        let signature = signing.sign(message.as_bytes());
        Ok(hex::encode(signature.to_bytes()))
    }

    async fn verify(
        &self,
        pub_key: &str,
        signature: &str,
        message: &str,
    ) -> Result<bool, CryptoError> {
        // Malformed keys or signatures are verification failures, not
        // infrastructure errors: arbitrary client input lands here.
        let Ok(pub_bytes) = hex::decode(pub_key) else {
            return Ok(false);
        };
        let Ok(pub_bytes) = <[u8; 32]>::try_from(pub_bytes) else {
            return Ok(false);
        };
        let Ok(verifying) = VerifyingKey::from_bytes(&pub_bytes) else {
            return Ok(false);
        };
        let Ok(sig_bytes) = hex::decode(signature) else {
            return Ok(false);
        };
        let Ok(sig_bytes) = <[u8; 64]>::try_from(sig_bytes) else {
            return Ok(false);
        };
        let signature = Signature::from_bytes(&sig_bytes);
        Ok(verifying.verify(message.as_bytes(), &signature).is_ok())
    }
}

#[async_trait]
impl SignKeyGen for ReferencePrimitives {
    async fn sign_key_gen(&self) -> Result<KeyPair, CryptoError> {
        let signing = SigningKey::generate(&mut rand::thread_rng());
        Ok(KeyPair::new(
            hex::encode(signing.verifying_key().to_bytes()),
            hex::encode(signing.to_bytes()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primitives() -> ReferencePrimitives {
        ReferencePrimitives::generate()
    }

    #[tokio::test]
    async fn sign_verify_round_trip() {
        let p = primitives();
        let keys = p.sign_key_gen().await.unwrap();
        let sig = p.sign(&keys, "hello").await.unwrap();
        assert!(p.verify(&keys.pub_key, &sig, "hello").await.unwrap());
        assert!(!p.verify(&keys.pub_key, &sig, "tampered").await.unwrap());
    }

    #[tokio::test]
    async fn verify_rejects_garbage_without_error() {
        let p = primitives();
        assert!(!p.verify("not hex", "zz", "msg").await.unwrap());
        assert!(!p.verify("abcd", "abcd", "msg").await.unwrap());
    }

    #[tokio::test]
    async fn encrypt_decrypt_round_trip() {
        let p = primitives();
        let keys = p.crypt_key_gen().await.unwrap();
        let ct = p.encrypt(&keys.pub_key, "document key").await.unwrap();
        assert_eq!(p.decrypt(&keys, &ct).await.unwrap(), "document key");
    }

    #[tokio::test]
    async fn two_hop_transform_chain() {
        let p = primitives();
        let service_sign = p.sign_key_gen().await.unwrap();

        let a = p.crypt_key_gen().await.unwrap();
        let b = p.crypt_key_gen().await.unwrap();
        let c = p.crypt_key_gen().await.unwrap();

        let ct_a = p.encrypt(&a.pub_key, "shared secret").await.unwrap();
        let tk_ab = p.crypt_transform_key_gen(&a, &b.pub_key).await.unwrap();
        let tk_bc = p.crypt_transform_key_gen(&b, &c.pub_key).await.unwrap();

        let ct_b = p.crypt_transform(&tk_ab, &ct_a, &service_sign).await.unwrap();
        let ct_c = p.crypt_transform(&tk_bc, &ct_b, &service_sign).await.unwrap();

        assert_eq!(p.decrypt(&c, &ct_c).await.unwrap(), "shared secret");
        assert!(p.decrypt(&a, &ct_c).await.is_err());
    }

    #[tokio::test]
    async fn transform_with_wrong_service_key_fails() {
        let p = primitives();
        let other = ReferencePrimitives::generate();
        let service_sign = p.sign_key_gen().await.unwrap();

        let a = p.crypt_key_gen().await.unwrap();
        let b = p.crypt_key_gen().await.unwrap();
        let ct = p.encrypt(&a.pub_key, "x").await.unwrap();
        let tk = p.crypt_transform_key_gen(&a, &b.pub_key).await.unwrap();

        assert!(other.crypt_transform(&tk, &ct, &service_sign).await.is_err());
    }
}
