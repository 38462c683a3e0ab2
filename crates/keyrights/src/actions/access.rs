//! Grant actions: `GrantAccess` and `RevokeAccess`.
//!
//! Both are gated on the acting account's read access to the document
//! (predicate shared in [`super::document`]).

use keyrights_core::{GrantAccessPayload, GrantRecord, RevokeAccessPayload};
use keyrights_store::EntityStore;
use serde_json::Value;

use super::to_result;
use crate::error::Result;
use crate::service::Service;

/// Merge-with-defaults upsert: fields absent from the payload keep
/// their existing values, or the named defaults when no grant exists:
/// empty encrypted key, no sign.
pub(super) async fn execute_grant<S: EntityStore>(
    service: &Service<S>,
    payload: &GrantAccessPayload,
) -> Result<Value> {
    let mut grant = service
        .db()
        .get_grant(&payload.document_id, payload.kind, &payload.id)
        .await?
        .unwrap_or(GrantRecord {
            document_id: payload.document_id.clone(),
            id: payload.id.clone(),
            kind: payload.kind,
            enc_crypt_priv_key: String::new(),
            can_sign: false,
        });

    if let Some(key) = &payload.enc_crypt_priv_key {
        grant.enc_crypt_priv_key = key.clone();
    }
    if let Some(can_sign) = payload.can_sign {
        grant.can_sign = can_sign;
    }
    service.db().put_grant(&grant).await?;

    to_result(payload)
}

/// Deleting a grant revokes exactly that path; other paths to the same
/// document are untouched.
pub(super) async fn execute_revoke<S: EntityStore>(
    service: &Service<S>,
    payload: &RevokeAccessPayload,
) -> Result<Value> {
    service
        .db()
        .delete_grant(&payload.document_id, payload.kind, &payload.id)
        .await?;
    to_result(payload)
}
