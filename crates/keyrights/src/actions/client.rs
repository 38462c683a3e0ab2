//! Client binding actions: `AuthorizeClient` and `DeauthorizeClient`.

use keyrights_core::{AuthorizeClientPayload, DeauthorizeClientPayload};
use keyrights_store::EntityStore;
use serde_json::Value;

use super::{to_result, Acting};
use crate::error::{EngineError, Result};
use crate::service::Service;

/// The target client must be unbound or already bound to the acting
/// account, and the payload's account must be the acting account.
pub(super) async fn authorize_authorize<S: EntityStore>(
    service: &Service<S>,
    acting: &Acting<'_>,
    payload: &AuthorizeClientPayload,
) -> Result<bool> {
    if let Some(target) = service.db().get_client(&payload.client_id).await? {
        if target.is_bound() && target.account_id != acting.account_id {
            return Ok(false);
        }
    }
    Ok(payload.account_id == acting.account_id)
}

/// Bind the client to the account and record the account-to-client
/// transform key.
pub(super) async fn execute_authorize<S: EntityStore>(
    service: &Service<S>,
    payload: &AuthorizeClientPayload,
) -> Result<Value> {
    let mut client = service
        .db()
        .get_client(&payload.client_id)
        .await?
        .ok_or(EngineError::ClientNotFound)?;

    client.account_id = payload.account_id.clone();
    client.crypt_transform_key = payload.crypt_transform_key.clone();
    service.db().put_client(&client).await?;

    to_result(payload)
}

/// The acting account must match the payload's; an unauthenticated
/// caller may deauthorize its own client.
pub(super) fn authorize_deauthorize(
    acting: &Acting<'_>,
    payload: &DeauthorizeClientPayload,
) -> bool {
    if !acting.is_authenticated() {
        return acting.client_id == payload.client_id;
    }
    payload.account_id == acting.account_id
}

pub(super) async fn execute_deauthorize<S: EntityStore>(
    service: &Service<S>,
    payload: &DeauthorizeClientPayload,
) -> Result<Value> {
    service.db().delete_client(&payload.client_id).await?;
    to_result(payload)
}
