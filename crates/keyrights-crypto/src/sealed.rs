//! X25519 + ChaCha20-Poly1305 sealed boxes over hex-encoded strings.
//!
//! Wire layout of a sealed box: `hex(ephemeral_pub(32) || nonce(12) || ct)`.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use keyrights_core::{CryptoError, KeyPair};
use rand::RngCore;
use x25519_dalek::{EphemeralSecret, PublicKey, StaticSecret};

const KDF_CONTEXT: &str = "keyrights-crypto-v1-seal";
const PUB_LEN: usize = 32;
const NONCE_LEN: usize = 12;

fn decode_key(hex_key: &str) -> Result<[u8; 32], CryptoError> {
    let bytes = hex::decode(hex_key).map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
    bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidKey("expected 32 bytes".into()))
}

fn derive_key(shared: &[u8; 32], recipient_pub: &[u8; 32]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new_derive_key(KDF_CONTEXT);
    hasher.update(shared);
    hasher.update(recipient_pub);
    *hasher.finalize().as_bytes()
}

/// Generate a fresh X25519 key pair, hex-encoded.
pub fn crypt_key_gen() -> KeyPair {
    let mut seed = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut seed);
    let secret = StaticSecret::from(seed);
    let public = PublicKey::from(&secret);
    KeyPair::new(hex::encode(public.as_bytes()), hex::encode(seed))
}

/// Seal `plaintext` for the holder of `recipient_pub_hex`.
pub fn seal(recipient_pub_hex: &str, plaintext: &[u8]) -> Result<String, CryptoError> {
    let recipient_pub = decode_key(recipient_pub_hex)?;

    let ephemeral = EphemeralSecret::random_from_rng(rand::thread_rng());
    let ephemeral_pub = PublicKey::from(&ephemeral);
    let shared = ephemeral.diffie_hellman(&PublicKey::from(recipient_pub));
    let key = derive_key(shared.as_bytes(), &recipient_pub);

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut sealed = Vec::with_capacity(PUB_LEN + NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(ephemeral_pub.as_bytes());
    sealed.extend_from_slice(&nonce);
    sealed.extend_from_slice(&ciphertext);
    Ok(hex::encode(sealed))
}

/// Open a sealed box with the recipient's secret key.
pub fn unseal(recipient_priv_hex: &str, sealed_hex: &str) -> Result<Vec<u8>, CryptoError> {
    let sealed = hex::decode(sealed_hex).map_err(|e| CryptoError::Decryption(e.to_string()))?;
    if sealed.len() < PUB_LEN + NONCE_LEN {
        return Err(CryptoError::Decryption("sealed box too short".into()));
    }

    let mut ephemeral_pub = [0u8; PUB_LEN];
    ephemeral_pub.copy_from_slice(&sealed[..PUB_LEN]);
    let nonce = &sealed[PUB_LEN..PUB_LEN + NONCE_LEN];
    let ciphertext = &sealed[PUB_LEN + NONCE_LEN..];

    let secret = StaticSecret::from(decode_key(recipient_priv_hex)?);
    let recipient_pub = PublicKey::from(&secret);
    let shared = secret.diffie_hellman(&PublicKey::from(ephemeral_pub));
    let key = derive_key(shared.as_bytes(), recipient_pub.as_bytes());

    let cipher = ChaCha20Poly1305::new_from_slice(&key)
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::Decryption("sealed box authentication failed".into()))
}
