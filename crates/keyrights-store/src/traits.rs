//! The entity store trait: keyed record persistence.
//!
//! Implementations store opaque JSON strings per soul. Typing lives in
//! [`crate::Database`], so backends stay schema-free.

use async_trait::async_trait;
use keyrights_core::Soul;

use crate::error::Result;

/// Async keyed storage for entity records.
///
/// # Contract
///
/// - **Full-record writes**: `put` replaces the whole record; no entity
///   is ever partially written.
/// - **Per-record atomicity only**: callers issuing multiple writes get
///   no transaction across them.
/// - **Ordered scans**: `scan_prefix` returns records in lexicographic
///   soul order; grant resolution order depends on this.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Fetch the record stored at `soul`, if any.
    async fn get(&self, soul: &Soul) -> Result<Option<String>>;

    /// Store `record` at `soul`, replacing any existing record.
    async fn put(&self, soul: &Soul, record: &str) -> Result<()>;

    /// Delete the record at `soul`. Deleting a missing record is a no-op.
    async fn delete(&self, soul: &Soul) -> Result<()>;

    /// All records whose soul starts with `prefix`, in soul order.
    async fn scan_prefix(&self, prefix: &Soul) -> Result<Vec<(Soul, String)>>;
}
