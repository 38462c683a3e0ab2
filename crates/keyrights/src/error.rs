//! Error types for the engine.
//!
//! Domain variants carry the exact messages surfaced in per-action
//! results, so `to_string()` on an execution failure is the wire error.

use keyrights_core::CryptoError;
use keyrights_store::StoreError;
use thiserror::Error;

/// Errors raised while authenticating or executing actions.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request body is not a JSON array of action entries. Raised
    /// before any per-action result exists.
    #[error("malformed request body: {0}")]
    MalformedRequest(String),

    /// Account does not exist.
    #[error("Account does not exist")]
    AccountNotFound,

    /// Client does not exist.
    #[error("Client does not exist")]
    ClientNotFound,

    /// Group does not exist.
    #[error("Group does not exist")]
    GroupNotFound,

    /// Document does not exist.
    #[error("Document does not exist")]
    DocumentNotFound,

    /// Membership does not exist (group key retrieval).
    #[error("Membership does not exist")]
    MembershipNotFound,

    /// Admin promotion requires an existing membership row.
    #[error("No membership for account")]
    NoMembership,

    /// A document already exists under the generated signing key.
    #[error("Document already exists")]
    DocumentExists,

    /// Credential resolution found no usable path.
    #[error("No access")]
    NoAccess,

    /// Login requires the client's crypt public key.
    #[error("Client crypt public key missing")]
    MissingClientCryptKey,

    /// Storage failure, propagated as an execution error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Primitives failure, propagated as an execution error.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// A result payload failed to serialize.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
