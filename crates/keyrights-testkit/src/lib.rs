//! # keyrights Testkit
//!
//! Testing utilities for the keyrights service.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **[`TaggedPrimitives`]**: a deterministic fake of the
//!   cryptographic capabilities that tags its inputs instead of
//!   encrypting, so tests can assert on exact key strings and count
//!   re-encryption hops
//! - **[`Fixture`]**: a [`keyrights::Service`] over an in-memory store
//!   plus helpers for building and signing requests
//! - **Generators**: proptest strategies for random delegation graphs
//!
//! ## Example
//!
//! ```rust,ignore
//! use keyrights_testkit::Fixture;
//! use serde_json::json;
//!
//! let fixture = Fixture::new();
//! fixture.bootstrap_account("a1", "c1").await;
//! let response = fixture
//!     .handle("c1", &[("GetPubKeys", json!({ "kind": "account", "id": "a1" }))])
//!     .await;
//! assert!(response.results[0].success);
//! ```

pub mod fixtures;
pub mod generators;
pub mod primitives;

pub use fixtures::Fixture;
pub use generators::{access_graph, AccessGraph};
pub use primitives::TaggedPrimitives;
