//! Per-action authorization predicates and execution effects.
//!
//! The action set is closed, so dispatch is a single `match` pairing
//! each variant with its `authorize_*` and `execute_*` functions.
//! Executors return the serialized result payload; domain failures
//! surface as [`EngineError`] values whose messages are the wire error.

mod access;
mod account;
mod client;
mod document;
mod group;
mod keys;

use keyrights_core::Action;
use keyrights_store::EntityStore;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::service::Service;

/// The identity a request is acting under. `account_id` is empty for
/// verified-but-anonymous callers.
pub(crate) struct Acting<'a> {
    pub account_id: &'a str,
    pub client_id: &'a str,
}

impl Acting<'_> {
    pub(crate) fn is_authenticated(&self) -> bool {
        !self.account_id.is_empty()
    }
}

fn to_result<T: Serialize>(payload: &T) -> Result<Value> {
    Ok(serde_json::to_value(payload)?)
}

/// Whether `acting` may perform `action`.
pub(crate) async fn authorize<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    action: &Action,
) -> Result<bool> {
    match action {
        Action::InitializeAccount(p) => account::authorize_initialize(service, acting, p).await,
        Action::Login(_) => Ok(true),
        Action::AuthorizeClient(p) => client::authorize_authorize(service, acting, p).await,
        Action::DeauthorizeClient(p) => Ok(client::authorize_deauthorize(acting, p)),
        Action::CreateGroup(p) => Ok(group::authorize_create(acting, p)),
        Action::AddMemberToGroup(p) => group::authorize_admin_only(service, acting, &p.group_id).await,
        Action::RemoveMemberFromGroup(p) => group::authorize_remove_member(service, acting, p).await,
        Action::AddAdminToGroup(p) => group::authorize_admin_only(service, acting, &p.group_id).await,
        Action::RemoveAdminFromGroup(p) => {
            group::authorize_admin_only(service, acting, &p.group_id).await
        }
        Action::CreateDocument(p) => Ok(document::authorize_create(acting, p)),
        Action::UpdateDocument(p) => {
            document::authorize_read_access(service, acting, &p.document_id).await
        }
        Action::GrantAccess(p) => {
            document::authorize_read_access(service, acting, &p.document_id).await
        }
        Action::RevokeAccess(p) => {
            document::authorize_read_access(service, acting, &p.document_id).await
        }
        Action::DecryptDocument(p) => {
            document::authorize_read_access(service, acting, &p.document_id).await
        }
        Action::SignDocument(p) => document::authorize_sign(service, acting, p).await,
        Action::GetPubKeys(_) => Ok(acting.is_authenticated()),
        Action::GetKeyPairs(p) => keys::authorize_key_pairs(service, acting, p).await,
    }
}

/// Run `action`'s effect, returning the result payload.
pub(crate) async fn execute<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    action: &Action,
) -> Result<Value> {
    match action {
        Action::InitializeAccount(p) => account::execute_initialize(service, p).await,
        Action::Login(p) => account::execute_login(service, acting, p).await,
        Action::AuthorizeClient(p) => client::execute_authorize(service, p).await,
        Action::DeauthorizeClient(p) => client::execute_deauthorize(service, p).await,
        Action::CreateGroup(p) => group::execute_create(service, p).await,
        Action::AddMemberToGroup(p) => group::execute_add_member(service, p).await,
        Action::RemoveMemberFromGroup(p) => group::execute_remove_member(service, p).await,
        Action::AddAdminToGroup(p) => group::execute_add_admin(service, p).await,
        Action::RemoveAdminFromGroup(p) => group::execute_remove_admin(service, p).await,
        Action::CreateDocument(p) => document::execute_create(service, p).await,
        Action::UpdateDocument(p) => document::execute_update(service, p).await,
        Action::GrantAccess(p) => access::execute_grant(service, p).await,
        Action::RevokeAccess(p) => access::execute_revoke(service, p).await,
        Action::DecryptDocument(p) => document::execute_decrypt(service, acting, p).await,
        Action::SignDocument(p) => document::execute_sign(service, p).await,
        Action::GetPubKeys(p) => keys::execute_pub_keys(service, p).await,
        Action::GetKeyPairs(p) => keys::execute_key_pairs(service, acting, p).await,
    }
}
