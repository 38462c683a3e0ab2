//! Account bootstrap actions: `InitializeAccount` and `Login`.

use keyrights_core::{
    AccountRecord, ClientRecord, DocumentRecord, InitializeAccountPayload,
    InitializeAccountResult, LoginPayload, LoginResult,
};
use keyrights_store::EntityStore;
use serde_json::Value;

use super::{to_result, Acting};
use crate::error::{EngineError, Result};
use crate::service::Service;

/// The acting identity must be the target account id (established at
/// authentication), the acting client must exist and be unbound, and
/// the account must not exist yet.
pub(super) async fn authorize_initialize<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &InitializeAccountPayload,
) -> Result<bool> {
    if !acting.is_authenticated() || acting.account_id != payload.account_id {
        return Ok(false);
    }
    let Some(client) = service.db().get_client(acting.client_id).await? else {
        return Ok(false);
    };
    if client.is_bound() {
        return Ok(false);
    }
    Ok(service.db().get_account(&payload.account_id).await?.is_none())
}

/// Create the account and its private root document.
///
/// The two writes are independent; a crash between them leaves an
/// account whose root document id dangles. The account goes first so a
/// stored account always names the root document that was being minted.
pub(super) async fn execute_initialize<S: EntityStore>(
    service: &Service<S>,
    payload: &InitializeAccountPayload,
) -> Result<Value> {
    let root_doc_keys = service.sign_keygen().sign_key_gen().await?;

    service
        .db()
        .put_account(&AccountRecord {
            id: payload.account_id.clone(),
            crypt_pub_key: payload.crypt_pub_key.clone(),
            sign_pub_key: payload.sign_pub_key.clone(),
            enc_crypt_priv_key: payload.enc_crypt_priv_key.clone(),
            enc_sign_priv_key: payload.enc_sign_priv_key.clone(),
            root_document_id: root_doc_keys.pub_key.clone(),
        })
        .await?;

    // Root document key material defaults to the account's own when the
    // payload carries no dedicated root document keys.
    let crypt_pub_key = non_empty_or(&payload.root_doc_crypt_pub_key, &payload.crypt_pub_key);
    let enc_crypt_priv_key = non_empty_or(
        &payload.root_doc_enc_crypt_priv_key,
        &payload.enc_crypt_priv_key,
    );

    service
        .db()
        .put_document(&DocumentRecord {
            id: root_doc_keys.pub_key.clone(),
            crypt_account_id: payload.account_id.clone(),
            crypt_pub_key,
            enc_crypt_priv_key,
            creator_id: payload.account_id.clone(),
            sign_priv_key: root_doc_keys.priv_key,
        })
        .await?;

    to_result(&InitializeAccountResult {
        account_id: payload.account_id.clone(),
        crypt_pub_key: payload.crypt_pub_key.clone(),
        sign_pub_key: payload.sign_pub_key.clone(),
        enc_crypt_priv_key: payload.enc_crypt_priv_key.clone(),
        enc_sign_priv_key: payload.enc_sign_priv_key.clone(),
        root_document_id: root_doc_keys.pub_key,
    })
}

/// Upsert the client record and report its current account binding.
///
/// An existing record keeps its binding, transform key, and crypt key;
/// only the sign key is (re)pinned to the client id.
pub(super) async fn execute_login<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &LoginPayload,
) -> Result<Value> {
    if payload.crypt_pub_key.is_empty() {
        return Err(EngineError::MissingClientCryptKey);
    }

    let client = match service.db().get_client(acting.client_id).await? {
        Some(mut existing) => {
            existing.sign_pub_key = acting.client_id.to_owned();
            existing
        }
        None => ClientRecord {
            id: acting.client_id.to_owned(),
            account_id: String::new(),
            sign_pub_key: acting.client_id.to_owned(),
            crypt_pub_key: payload.crypt_pub_key.clone(),
            crypt_transform_key: String::new(),
        },
    };

    let account = if client.is_bound() {
        service.db().get_account(&client.account_id).await?
    } else {
        None
    };
    service.db().put_client(&client).await?;

    to_result(&LoginResult {
        account_id: client.account_id,
        root_document_id: account.map(|a| a.root_document_id).unwrap_or_default(),
    })
}

fn non_empty_or(preferred: &str, fallback: &str) -> String {
    if preferred.is_empty() {
        fallback.to_owned()
    } else {
        preferred.to_owned()
    }
}
