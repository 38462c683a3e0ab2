//! Document actions: creation, update, decryption, and signing.

use keyrights_core::{
    CreateDocumentPayload, CreateDocumentResult, DecryptDocumentPayload, DecryptDocumentResult,
    DocumentRecord, KeyPair, SignDocumentPayload, SignDocumentResult, UpdateDocumentPayload,
};
use keyrights_store::EntityStore;
use serde_json::Value;

use super::{to_result, Acting};
use crate::error::{EngineError, Result};
use crate::service::Service;

pub(super) fn authorize_create(acting: &Acting<'_>, payload: &CreateDocumentPayload) -> bool {
    acting.is_authenticated()
        && payload.crypt_account_id == acting.account_id
        && payload.creator_id == acting.account_id
}

/// Shared predicate for the actions gated on read access.
pub(super) async fn authorize_read_access<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    document_id: &str,
) -> Result<bool> {
    if !acting.is_authenticated() {
        return Ok(false);
    }
    service.has_read_access(acting.account_id, document_id).await
}

pub(super) async fn authorize_sign<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &SignDocumentPayload,
) -> Result<bool> {
    if !acting.is_authenticated() {
        return Ok(false);
    }
    service
        .has_sign_access(acting.account_id, &payload.document_id)
        .await
}

/// Mint a fresh signing identity for the document; its public key is
/// the document id.
pub(super) async fn execute_create<S: EntityStore>(
    service: &Service<S>,
    payload: &CreateDocumentPayload,
) -> Result<Value> {
    let sign_keys = service.sign_keygen().sign_key_gen().await?;

    if service.db().get_document(&sign_keys.pub_key).await?.is_some() {
        return Err(EngineError::DocumentExists);
    }

    service
        .db()
        .put_document(&DocumentRecord {
            id: sign_keys.pub_key.clone(),
            crypt_account_id: payload.crypt_account_id.clone(),
            crypt_pub_key: payload.crypt_pub_key.clone(),
            enc_crypt_priv_key: payload.enc_crypt_priv_key.clone(),
            creator_id: payload.creator_id.clone(),
            sign_priv_key: sign_keys.priv_key,
        })
        .await?;

    to_result(&CreateDocumentResult {
        crypt_account_id: payload.crypt_account_id.clone(),
        creator_id: payload.creator_id.clone(),
        crypt_pub_key: payload.crypt_pub_key.clone(),
        enc_crypt_priv_key: payload.enc_crypt_priv_key.clone(),
        document_id: sign_keys.pub_key,
    })
}

/// Replace the document's key material; creator and signing identity
/// are immutable.
pub(super) async fn execute_update<S: EntityStore>(
    service: &Service<S>,
    payload: &UpdateDocumentPayload,
) -> Result<Value> {
    let mut document = service
        .db()
        .get_document(&payload.document_id)
        .await?
        .ok_or(EngineError::DocumentNotFound)?;

    document.crypt_account_id = payload.crypt_account_id.clone();
    document.crypt_pub_key = payload.crypt_pub_key.clone();
    document.enc_crypt_priv_key = payload.enc_crypt_priv_key.clone();
    service.db().put_document(&document).await?;

    to_result(payload)
}

/// Resolve the document key transformed all the way to the acting
/// client.
pub(super) async fn execute_decrypt<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &DecryptDocumentPayload,
) -> Result<Value> {
    let enc_crypt_priv_key = service
        .client_document_decrypt_key(acting.client_id, &payload.document_id)
        .await?;
    if enc_crypt_priv_key.is_empty() {
        return Err(EngineError::NoAccess);
    }
    to_result(&DecryptDocumentResult {
        document_id: payload.document_id.clone(),
        enc_crypt_priv_key,
    })
}

/// Sign each submitted hash with the document's own signing key.
pub(super) async fn execute_sign<S: EntityStore>(
    service: &Service<S>,
    payload: &SignDocumentPayload,
) -> Result<Value> {
    let document = service
        .db()
        .get_document(&payload.document_id)
        .await?
        .ok_or(EngineError::DocumentNotFound)?;
    let sign_keys = KeyPair::new(document.id, document.sign_priv_key);

    let mut signatures = Vec::with_capacity(payload.hashes.len());
    for hash in &payload.hashes {
        signatures.push(service.primitives().sign(&sign_keys, hash).await?);
    }

    to_result(&SignDocumentResult {
        document_id: payload.document_id.clone(),
        hashes: payload.hashes.clone(),
        signatures,
    })
}
