//! Group and membership actions.

use keyrights_core::{
    AddAdminToGroupPayload, AddMemberToGroupPayload, AddMemberToGroupResult, CreateGroupPayload,
    GroupRecord, MembershipRecord, RemoveAdminFromGroupPayload, RemoveMemberFromGroupPayload,
};
use keyrights_store::EntityStore;
use serde_json::Value;

use super::{to_result, Acting};
use crate::error::{EngineError, Result};
use crate::service::Service;

pub(super) fn authorize_create(acting: &Acting<'_>, payload: &CreateGroupPayload) -> bool {
    acting.is_authenticated() && payload.account_id == acting.account_id
}

pub(super) async fn execute_create<S: EntityStore>(
    service: &Service<S>,
    payload: &CreateGroupPayload,
) -> Result<Value> {
    service
        .db()
        .put_group(&GroupRecord {
            id: payload.group_id.clone(),
            account_id: payload.account_id.clone(),
            crypt_pub_key: payload.crypt_pub_key.clone(),
            enc_crypt_priv_key: payload.enc_crypt_priv_key.clone(),
            enc_sign_priv_key: payload.enc_sign_priv_key.clone(),
        })
        .await?;
    to_result(payload)
}

/// Shared predicate for the membership-mutation actions that only a
/// group admin may perform.
pub(super) async fn authorize_admin_only<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    group_id: &str,
) -> Result<bool> {
    if !acting.is_authenticated() {
        return Ok(false);
    }
    service.is_group_admin(group_id, acting.account_id).await
}

/// A member may remove itself; otherwise admin only.
pub(super) async fn authorize_remove_member<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &RemoveMemberFromGroupPayload,
) -> Result<bool> {
    if !acting.is_authenticated() {
        return Ok(false);
    }
    if payload.account_id == acting.account_id {
        return Ok(true);
    }
    service
        .is_group_admin(&payload.group_id, acting.account_id)
        .await
}

/// Merge-with-defaults upsert: fields absent from the payload keep
/// their existing values (admin key included), or the named defaults
/// when no row exists: no transform key, no sign, not admin.
pub(super) async fn execute_add_member<S: EntityStore>(
    service: &Service<S>,
    payload: &AddMemberToGroupPayload,
) -> Result<Value> {
    let mut membership = service
        .db()
        .get_membership(&payload.group_id, &payload.account_id)
        .await?
        .unwrap_or_else(|| MembershipRecord::empty(&payload.group_id, &payload.account_id));

    if let Some(key) = &payload.crypt_transform_key {
        membership.crypt_transform_key = key.clone();
    }
    if let Some(can_sign) = payload.can_sign {
        membership.can_sign = can_sign;
    }
    service.db().put_membership(&membership).await?;

    to_result(&AddMemberToGroupResult {
        group_id: payload.group_id.clone(),
        account_id: payload.account_id.clone(),
        crypt_transform_key: payload.crypt_transform_key.clone(),
        can_sign: payload.can_sign.unwrap_or(false),
    })
}

pub(super) async fn execute_remove_member<S: EntityStore>(
    service: &Service<S>,
    payload: &RemoveMemberFromGroupPayload,
) -> Result<Value> {
    service
        .db()
        .delete_membership(&payload.group_id, &payload.account_id)
        .await?;
    to_result(payload)
}

/// Promotion requires an existing membership row to attach the admin
/// key to.
pub(super) async fn execute_add_admin<S: EntityStore>(
    service: &Service<S>,
    payload: &AddAdminToGroupPayload,
) -> Result<Value> {
    let mut membership = service
        .db()
        .get_membership(&payload.group_id, &payload.account_id)
        .await?
        .ok_or(EngineError::NoMembership)?;

    membership.enc_group_crypt_priv_key = payload.enc_crypt_priv_key.clone();
    service.db().put_membership(&membership).await?;

    to_result(payload)
}

/// Clears the admin key; trivially succeeds when no membership exists,
/// so repeated demotion is idempotent.
pub(super) async fn execute_remove_admin<S: EntityStore>(
    service: &Service<S>,
    payload: &RemoveAdminFromGroupPayload,
) -> Result<Value> {
    if let Some(mut membership) = service
        .db()
        .get_membership(&payload.group_id, &payload.account_id)
        .await?
    {
        membership.enc_group_crypt_priv_key = String::new();
        service.db().put_membership(&membership).await?;
    }
    to_result(payload)
}
