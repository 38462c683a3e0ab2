//! # keyrights Crypto
//!
//! A reference implementation of the [`keyrights_core::PrePrimitives`]
//! and [`keyrights_core::SignKeyGen`] capabilities.
//!
//! ## What this is, and is not
//!
//! Signing identities are real Ed25519 key pairs; encryption is a real
//! X25519 + ChaCha20-Poly1305 sealed box. The re-encryption transform,
//! however, is *emulated at the service boundary*: a transform key wraps
//! the delegator's crypt secret to the service's own key, and
//! `crypt_transform` unwraps, decrypts, and re-encrypts inside this
//! crate. The engine's contract is unchanged - it never handles a
//! plaintext key - but the primitives host can. Substituting a true
//! proxy re-encryption scheme requires no engine changes.
//!
//! All key material and ciphertext crosses the capability boundary as
//! hex strings.

pub mod primitives;
pub mod sealed;

pub use primitives::ReferencePrimitives;
