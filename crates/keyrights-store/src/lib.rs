//! # keyrights Store
//!
//! Entity storage for the keyrights service.
//!
//! ## Overview
//!
//! Storage is keyed JSON records behind the [`EntityStore`] trait: get,
//! put, delete by [`keyrights_core::Soul`], plus a prefix scan used to
//! enumerate a document's grants. [`Database`] layers typed per-entity
//! accessors on top of any adapter. [`SqliteStore`] is the persistent
//! backend; [`MemoryStore`] serves tests.
//!
//! The engine relies on per-record atomicity only. Multi-record
//! operations are issued as independent writes; there is no cross-record
//! transaction in the contract.

pub mod db;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use db::Database;
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::EntityStore;
