//! Souls: hierarchical string keys locating entities in storage.
//!
//! The key layout is part of the storage contract: grant souls nest under
//! their document's soul so a single prefix scan returns every grant
//! attached to a document, in lexicographic order.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::records::GrantKind;

/// A storage key for a single entity record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Soul(String);

impl Soul {
    /// `/accounts/{accountId}`
    pub fn account(account_id: &str) -> Self {
        Self(format!("/accounts/{account_id}"))
    }

    /// `/clients/{clientId}`
    pub fn client(client_id: &str) -> Self {
        Self(format!("/clients/{client_id}"))
    }

    /// `/groups/{groupId}`
    pub fn group(group_id: &str) -> Self {
        Self(format!("/groups/{group_id}"))
    }

    /// `/groups/{groupId}/members/{accountId}`
    pub fn membership(group_id: &str, account_id: &str) -> Self {
        Self(format!("/groups/{group_id}/members/{account_id}"))
    }

    /// `/documents/{documentId}`
    pub fn document(document_id: &str) -> Self {
        Self(format!("/documents/{document_id}"))
    }

    /// `/documents/{documentId}/grants/{kind}/{granteeId}`
    pub fn grant(document_id: &str, kind: GrantKind, grantee_id: &str) -> Self {
        Self(format!(
            "/documents/{document_id}/grants/{kind}/{grantee_id}",
            kind = kind.as_str()
        ))
    }

    /// Prefix under which all of a document's grant souls live.
    pub fn document_grants_prefix(document_id: &str) -> Self {
        Self(format!("/documents/{document_id}/grants/"))
    }

    /// Wrap a raw key read back from a storage backend scan.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Soul {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Soul {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
