//! The action catalog: one payload (and result) type per operation.
//!
//! The protocol's action set is fixed, so actions are a closed sum type
//! dispatched with a `match` rather than an open handler registry. Wire
//! entries arrive as `{ "type": ..., "payload": ... }` pairs; parsing an
//! entry distinguishes an unknown type from a malformed payload so the
//! service can report each precisely.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::records::GrantKind;

/// A raw wire entry, before the payload is given a concrete shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub payload: Value,
}

/// Failure to turn an [`ActionEntry`] into an [`Action`].
#[derive(Debug, Error)]
pub enum ActionParseError {
    #[error("invalid action type: {0}")]
    UnknownType(String),

    #[error("invalid payload for {kind}: {source}")]
    InvalidPayload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Entity kinds addressable by `GetPubKeys`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Account,
    Group,
    Document,
    Client,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeAccountPayload {
    pub account_id: String,
    pub crypt_pub_key: String,
    pub sign_pub_key: String,
    pub enc_crypt_priv_key: String,
    pub enc_sign_priv_key: String,
    /// Key material for the private root document. Falls back to the
    /// account fields when empty.
    #[serde(default)]
    pub root_doc_crypt_pub_key: String,
    #[serde(default)]
    pub root_doc_enc_crypt_priv_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeAccountResult {
    pub account_id: String,
    pub crypt_pub_key: String,
    pub sign_pub_key: String,
    pub enc_crypt_priv_key: String,
    pub enc_sign_priv_key: String,
    pub root_document_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub crypt_pub_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    /// Empty when the client is not yet bound to an account.
    pub account_id: String,
    pub root_document_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeClientPayload {
    pub account_id: String,
    pub client_id: String,
    /// Account-to-client re-encryption key.
    pub crypt_transform_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeauthorizeClientPayload {
    pub account_id: String,
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupPayload {
    pub group_id: String,
    pub account_id: String,
    pub crypt_pub_key: String,
    pub enc_crypt_priv_key: String,
    pub enc_sign_priv_key: String,
}

/// Partial update: only the fields present in the payload are applied
/// over the existing membership (or over named defaults when none
/// exists: not admin, no sign, no transform key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberToGroupPayload {
    pub group_id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypt_transform_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_sign: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberToGroupResult {
    pub group_id: String,
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypt_transform_key: Option<String>,
    pub can_sign: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveMemberFromGroupPayload {
    pub group_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddAdminToGroupPayload {
    pub group_id: String,
    pub account_id: String,
    /// The group's crypt private key re-encrypted for the new admin.
    pub enc_crypt_priv_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveAdminFromGroupPayload {
    pub group_id: String,
    pub account_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentPayload {
    pub crypt_account_id: String,
    pub creator_id: String,
    pub crypt_pub_key: String,
    pub enc_crypt_priv_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentResult {
    pub crypt_account_id: String,
    pub creator_id: String,
    pub crypt_pub_key: String,
    pub enc_crypt_priv_key: String,
    /// The freshly generated signing public key.
    pub document_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDocumentPayload {
    pub document_id: String,
    pub crypt_account_id: String,
    pub crypt_pub_key: String,
    pub enc_crypt_priv_key: String,
}

/// Partial update, merged like [`AddMemberToGroupPayload`] (defaults:
/// no sign, empty encrypted key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantAccessPayload {
    pub document_id: String,
    pub kind: GrantKind,
    /// The grantee account or group id.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enc_crypt_priv_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_sign: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeAccessPayload {
    pub document_id: String,
    pub kind: GrantKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptDocumentPayload {
    pub document_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecryptDocumentResult {
    pub document_id: String,
    /// The document key transformed all the way to the acting client.
    pub enc_crypt_priv_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignDocumentPayload {
    pub document_id: String,
    pub hashes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignDocumentResult {
    pub document_id: String,
    pub hashes: Vec<String>,
    /// One signature per hash, in order, by the document's own key.
    pub signatures: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPubKeysPayload {
    pub kind: EntityKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPubKeysResult {
    pub kind: EntityKind,
    pub id: String,
    pub crypt_pub_key: String,
    pub sign_pub_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetKeyPairsPayload {
    /// Only accounts and groups hold retrievable key pairs.
    pub kind: GrantKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetKeyPairsResult {
    pub kind: GrantKind,
    pub id: String,
    pub crypt_pub_key: String,
    /// Re-encrypted for the acting client's transform key.
    pub enc_crypt_priv_key: String,
    pub enc_sign_priv_key: String,
    pub sign_pub_key: String,
}

/// The closed set of operations the service dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    InitializeAccount(InitializeAccountPayload),
    Login(LoginPayload),
    AuthorizeClient(AuthorizeClientPayload),
    DeauthorizeClient(DeauthorizeClientPayload),
    CreateGroup(CreateGroupPayload),
    AddMemberToGroup(AddMemberToGroupPayload),
    RemoveMemberFromGroup(RemoveMemberFromGroupPayload),
    AddAdminToGroup(AddAdminToGroupPayload),
    RemoveAdminFromGroup(RemoveAdminFromGroupPayload),
    CreateDocument(CreateDocumentPayload),
    UpdateDocument(UpdateDocumentPayload),
    GrantAccess(GrantAccessPayload),
    RevokeAccess(RevokeAccessPayload),
    DecryptDocument(DecryptDocumentPayload),
    SignDocument(SignDocumentPayload),
    GetPubKeys(GetPubKeysPayload),
    GetKeyPairs(GetKeyPairsPayload),
}

fn parse<T: DeserializeOwned>(kind: &'static str, payload: &Value) -> Result<T, ActionParseError> {
    serde_json::from_value(payload.clone())
        .map_err(|source| ActionParseError::InvalidPayload { kind, source })
}

impl Action {
    /// Give a raw wire entry its concrete payload shape.
    pub fn from_entry(entry: &ActionEntry) -> Result<Self, ActionParseError> {
        let p = &entry.payload;
        Ok(match entry.kind.as_str() {
            "InitializeAccount" => Action::InitializeAccount(parse("InitializeAccount", p)?),
            "Login" => Action::Login(parse("Login", p)?),
            "AuthorizeClient" => Action::AuthorizeClient(parse("AuthorizeClient", p)?),
            "DeauthorizeClient" => Action::DeauthorizeClient(parse("DeauthorizeClient", p)?),
            "CreateGroup" => Action::CreateGroup(parse("CreateGroup", p)?),
            "AddMemberToGroup" => Action::AddMemberToGroup(parse("AddMemberToGroup", p)?),
            "RemoveMemberFromGroup" => {
                Action::RemoveMemberFromGroup(parse("RemoveMemberFromGroup", p)?)
            }
            "AddAdminToGroup" => Action::AddAdminToGroup(parse("AddAdminToGroup", p)?),
            "RemoveAdminFromGroup" => {
                Action::RemoveAdminFromGroup(parse("RemoveAdminFromGroup", p)?)
            }
            "CreateDocument" => Action::CreateDocument(parse("CreateDocument", p)?),
            "UpdateDocument" => Action::UpdateDocument(parse("UpdateDocument", p)?),
            "GrantAccess" => Action::GrantAccess(parse("GrantAccess", p)?),
            "RevokeAccess" => Action::RevokeAccess(parse("RevokeAccess", p)?),
            "DecryptDocument" => Action::DecryptDocument(parse("DecryptDocument", p)?),
            "SignDocument" => Action::SignDocument(parse("SignDocument", p)?),
            "GetPubKeys" => Action::GetPubKeys(parse("GetPubKeys", p)?),
            "GetKeyPairs" => Action::GetKeyPairs(parse("GetKeyPairs", p)?),
            other => return Err(ActionParseError::UnknownType(other.to_owned())),
        })
    }

    /// The wire tag for this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::InitializeAccount(_) => "InitializeAccount",
            Action::Login(_) => "Login",
            Action::AuthorizeClient(_) => "AuthorizeClient",
            Action::DeauthorizeClient(_) => "DeauthorizeClient",
            Action::CreateGroup(_) => "CreateGroup",
            Action::AddMemberToGroup(_) => "AddMemberToGroup",
            Action::RemoveMemberFromGroup(_) => "RemoveMemberFromGroup",
            Action::AddAdminToGroup(_) => "AddAdminToGroup",
            Action::RemoveAdminFromGroup(_) => "RemoveAdminFromGroup",
            Action::CreateDocument(_) => "CreateDocument",
            Action::UpdateDocument(_) => "UpdateDocument",
            Action::GrantAccess(_) => "GrantAccess",
            Action::RevokeAccess(_) => "RevokeAccess",
            Action::DecryptDocument(_) => "DecryptDocument",
            Action::SignDocument(_) => "SignDocument",
            Action::GetPubKeys(_) => "GetPubKeys",
            Action::GetKeyPairs(_) => "GetKeyPairs",
        }
    }
}
