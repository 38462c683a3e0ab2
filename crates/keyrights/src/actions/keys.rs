//! Key lookup actions: `GetPubKeys` and `GetKeyPairs`.

use keyrights_core::{
    EntityKind, GetKeyPairsPayload, GetKeyPairsResult, GetPubKeysPayload, GetPubKeysResult,
    GrantKind,
};
use keyrights_store::EntityStore;
use serde_json::Value;

use super::{to_result, Acting};
use crate::error::{EngineError, Result};
use crate::service::Service;

/// Any authenticated account may look up public keys.
pub(super) async fn execute_pub_keys<S: EntityStore>(
    service: &Service<S>,
    payload: &GetPubKeysPayload,
) -> Result<Value> {
    let (crypt_pub_key, sign_pub_key) = match payload.kind {
        EntityKind::Account => {
            let account = service
                .db()
                .get_account(&payload.id)
                .await?
                .ok_or(EngineError::AccountNotFound)?;
            (account.crypt_pub_key, account.sign_pub_key)
        }
        // A group's signing identity stays internal.
        EntityKind::Group => {
            let group = service
                .db()
                .get_group(&payload.id)
                .await?
                .ok_or(EngineError::GroupNotFound)?;
            (group.crypt_pub_key, String::new())
        }
        EntityKind::Document => {
            let document = service
                .db()
                .get_document(&payload.id)
                .await?
                .ok_or(EngineError::DocumentNotFound)?;
            (document.crypt_pub_key, document.id)
        }
        EntityKind::Client => {
            let client = service
                .db()
                .get_client(&payload.id)
                .await?
                .ok_or(EngineError::ClientNotFound)?;
            (client.crypt_pub_key, client.sign_pub_key)
        }
    };

    to_result(&GetPubKeysResult {
        kind: payload.kind,
        id: payload.id.clone(),
        crypt_pub_key,
        sign_pub_key,
    })
}

/// Own account only; group key pairs require admin standing.
pub(super) async fn authorize_key_pairs<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &GetKeyPairsPayload,
) -> Result<bool> {
    if !acting.is_authenticated() {
        return Ok(false);
    }
    match payload.kind {
        GrantKind::Account => Ok(payload.id == acting.account_id),
        GrantKind::Group => service.is_group_admin(&payload.id, acting.account_id).await,
    }
}

/// Re-encrypt the stored private keys for the acting client.
///
/// For a group, the source key material is the group's own encrypted
/// key when the acting account owns the group, else the admin
/// membership's copy.
pub(super) async fn execute_key_pairs<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &GetKeyPairsPayload,
) -> Result<Value> {
    let client = service
        .db()
        .get_client(acting.client_id)
        .await?
        .ok_or(EngineError::ClientNotFound)?;

    let result = match payload.kind {
        GrantKind::Account => {
            let account = service
                .db()
                .get_account(&payload.id)
                .await?
                .ok_or(EngineError::AccountNotFound)?;
            GetKeyPairsResult {
                kind: payload.kind,
                id: payload.id.clone(),
                crypt_pub_key: account.crypt_pub_key,
                enc_crypt_priv_key: service
                    .primitives()
                    .crypt_transform(
                        &client.crypt_transform_key,
                        &account.enc_crypt_priv_key,
                        service.sign_key_pair(),
                    )
                    .await?,
                enc_sign_priv_key: service
                    .primitives()
                    .crypt_transform(
                        &client.crypt_transform_key,
                        &account.enc_sign_priv_key,
                        service.sign_key_pair(),
                    )
                    .await?,
                sign_pub_key: account.sign_pub_key,
            }
        }
        GrantKind::Group => {
            let group = service
                .db()
                .get_group(&payload.id)
                .await?
                .ok_or(EngineError::GroupNotFound)?;
            let enc_crypt_priv_key = if group.account_id == acting.account_id {
                group.enc_crypt_priv_key
            } else {
                service
                    .db()
                    .get_membership(&payload.id, acting.account_id)
                    .await?
                    .ok_or(EngineError::MembershipNotFound)?
                    .enc_group_crypt_priv_key
            };
            GetKeyPairsResult {
                kind: payload.kind,
                id: payload.id.clone(),
                crypt_pub_key: group.crypt_pub_key,
                enc_crypt_priv_key: service
                    .primitives()
                    .crypt_transform(
                        &client.crypt_transform_key,
                        &enc_crypt_priv_key,
                        service.sign_key_pair(),
                    )
                    .await?,
                enc_sign_priv_key: String::new(),
                sign_pub_key: String::new(),
            }
        }
    };

    to_result(&result)
}
