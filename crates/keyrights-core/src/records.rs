//! Persisted entity records.
//!
//! All identifiers and key material are opaque strings; an empty string
//! stands for "absent" throughout (the original wire format has no nulls).
//! Records are serialized as camelCase JSON, which is also the storage
//! format, so every field name here is wire-visible.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An account: the top-level identity that owns documents and groups.
///
/// Private keys are stored encrypted under the account's own crypt key;
/// the service can hold them without being able to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    pub id: String,
    pub crypt_pub_key: String,
    pub sign_pub_key: String,
    pub enc_crypt_priv_key: String,
    pub enc_sign_priv_key: String,
    /// The private root document created atomically with the account.
    pub root_document_id: String,
}

/// A client (device) acting on behalf of an account.
///
/// The client id doubles as its signing public key. A client may exist
/// unbound (`account_id` empty) between login and account authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub account_id: String,
    pub sign_pub_key: String,
    pub crypt_pub_key: String,
    /// Account-to-client re-encryption key, set when the client is bound.
    pub crypt_transform_key: String,
}

impl ClientRecord {
    /// Whether this client has been bound to an account.
    pub fn is_bound(&self) -> bool {
        !self.account_id.is_empty()
    }
}

/// A rights-management group. The group id is its signing public key.
///
/// The owning account is implicitly an admin and never has a membership
/// row of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: String,
    pub account_id: String,
    pub crypt_pub_key: String,
    pub enc_crypt_priv_key: String,
    pub enc_sign_priv_key: String,
}

/// An account's membership in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub group_id: String,
    pub account_id: String,
    /// Group-to-account re-encryption key.
    pub crypt_transform_key: String,
    pub can_sign: bool,
    /// The group's crypt private key re-encrypted for this member.
    /// Non-empty exactly when the member is an admin.
    pub enc_group_crypt_priv_key: String,
}

impl MembershipRecord {
    /// A member with no capabilities, the base for merge-style updates.
    pub fn empty(group_id: &str, account_id: &str) -> Self {
        Self {
            group_id: group_id.to_owned(),
            account_id: account_id.to_owned(),
            crypt_transform_key: String::new(),
            can_sign: false,
            enc_group_crypt_priv_key: String::new(),
        }
    }

    /// Admin status is marked by a non-empty encrypted group key.
    pub fn is_admin(&self) -> bool {
        !self.enc_group_crypt_priv_key.is_empty()
    }
}

/// A document: a signing identity plus encrypted key material. The
/// document id is its signing public key, generated once at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: String,
    /// The identity whose crypt key encrypts the document key.
    pub crypt_account_id: String,
    pub crypt_pub_key: String,
    pub enc_crypt_priv_key: String,
    pub creator_id: String,
    /// The document's own signing private key (the document *is* a
    /// signing identity).
    pub sign_priv_key: String,
}

/// Discriminates who a grant is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantKind {
    Account,
    Group,
}

impl GrantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantKind::Account => "account",
            GrantKind::Group => "group",
        }
    }
}

impl fmt::Display for GrantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A revocable access path from a document to an account or group.
///
/// At most one grant exists per (document, kind, grantee); deleting it
/// revokes exactly that path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRecord {
    pub document_id: String,
    /// The grantee: an account id or a group id, per `kind`.
    pub id: String,
    pub kind: GrantKind,
    /// The document key re-encrypted for the grantee.
    pub enc_crypt_priv_key: String,
    pub can_sign: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_serialize_camel_case() {
        let account = AccountRecord {
            id: "a1".into(),
            crypt_pub_key: "cp".into(),
            sign_pub_key: "sp".into(),
            enc_crypt_priv_key: "ecp".into(),
            enc_sign_priv_key: "esp".into(),
            root_document_id: "d1".into(),
        };
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["cryptPubKey"], "cp");
        assert_eq!(json["rootDocumentId"], "d1");
    }

    #[test]
    fn grant_kind_round_trips_lowercase() {
        assert_eq!(serde_json::to_string(&GrantKind::Account).unwrap(), "\"account\"");
        assert_eq!(
            serde_json::from_str::<GrantKind>("\"group\"").unwrap(),
            GrantKind::Group
        );
    }

    #[test]
    fn admin_is_marked_by_encrypted_group_key() {
        let mut membership = MembershipRecord::empty("g1", "a1");
        assert!(!membership.is_admin());
        membership.enc_group_crypt_priv_key = "encGroupKey".into();
        assert!(membership.is_admin());
    }
}
