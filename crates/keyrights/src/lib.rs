//! # keyrights
//!
//! The keyrights engine: capability-based access control and key
//! delegation over proxy re-encryption (PRE) key material.
//!
//! Accounts, clients, groups, and documents are tied together by
//! encrypted keys and one-way transform keys; every operation that
//! would use a secret key first passes an authorization check over the
//! account → membership → grant graph.
//!
//! ## Overview
//!
//! [`Service`] is the facade: it authenticates a signed request,
//! dispatches each contained action through its authorization predicate
//! and execution effect, and returns one result per action in request
//! order. The credential resolver ([`Service::get_credentials`] and
//! friends) walks the delegation graph to locate a document's key and
//! re-encrypt it for the requester through zero, one, or two transform
//! hops, without ever seeing a plaintext key.
//!
//! Storage and cryptography are collaborators behind traits:
//! [`keyrights_store::EntityStore`] for records,
//! [`keyrights_core::PrePrimitives`] and [`keyrights_core::SignKeyGen`]
//! for the primitives.

mod actions;
pub mod credentials;
pub mod error;
pub mod service;

pub use credentials::Credentials;
pub use error::{EngineError, Result};
pub use service::{AuthOutcome, Service};
