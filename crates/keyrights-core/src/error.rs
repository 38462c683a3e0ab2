//! Error types for the capability traits.

use thiserror::Error;

/// Errors raised by implementations of the cryptographic capabilities.
///
/// The engine treats these as opaque infrastructure failures: a failed
/// verify is a normal `Ok(false)`, not an error.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material could not be parsed or is the wrong size.
    #[error("invalid key material: {0}")]
    InvalidKey(String),

    /// Encryption failed.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key, corrupted ciphertext).
    #[error("decryption error: {0}")]
    Decryption(String),

    /// Signing failed.
    #[error("signing error: {0}")]
    Signing(String),

    /// A re-encryption transform failed.
    #[error("transform error: {0}")]
    Transform(String),
}
