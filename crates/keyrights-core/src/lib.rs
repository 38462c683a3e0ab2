//! # keyrights Core
//!
//! Pure types for the keyrights service: entity records, storage souls,
//! the action sum type, request/response envelopes, and the capability
//! traits for the cryptographic primitives.
//!
//! This crate contains no I/O and no cryptography of its own. The actual
//! primitives (proxy re-encryption, signing) live behind the
//! [`PrePrimitives`] and [`SignKeyGen`] traits and are supplied by the
//! embedding application.
//!
//! ## Key Types
//!
//! - [`AccountRecord`], [`ClientRecord`], [`GroupRecord`],
//!   [`MembershipRecord`], [`DocumentRecord`], [`GrantRecord`] - the
//!   persisted entities
//! - [`Soul`] - the hierarchical string key locating an entity in storage
//! - [`Action`] - the closed set of operations the service dispatches
//! - [`Request`] / [`Response`] - the transport-agnostic wire envelope

pub mod action;
pub mod error;
pub mod primitives;
pub mod records;
pub mod request;
pub mod soul;

pub use action::{
    Action, ActionEntry, ActionParseError, AddAdminToGroupPayload, AddMemberToGroupPayload,
    AddMemberToGroupResult, AuthorizeClientPayload, CreateDocumentPayload, CreateDocumentResult,
    CreateGroupPayload, DeauthorizeClientPayload, DecryptDocumentPayload, DecryptDocumentResult,
    EntityKind, GetKeyPairsPayload, GetKeyPairsResult, GetPubKeysPayload, GetPubKeysResult,
    GrantAccessPayload, InitializeAccountPayload, InitializeAccountResult, LoginPayload,
    LoginResult, RemoveAdminFromGroupPayload, RemoveMemberFromGroupPayload, RevokeAccessPayload,
    SignDocumentPayload, SignDocumentResult, UpdateDocumentPayload,
};
pub use error::CryptoError;
pub use primitives::{KeyPair, PrePrimitives, SignKeyGen};
pub use records::{
    AccountRecord, ClientRecord, DocumentRecord, GrantKind, GrantRecord, GroupRecord,
    MembershipRecord,
};
pub use request::{ActionResult, Request, Response};
pub use soul::Soul;
