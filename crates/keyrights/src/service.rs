//! The service facade: authenticate a request, dispatch its actions.
//!
//! A request carries a signed, ordered batch of actions. Authentication
//! maps the signature to an acting account identity (or rejects the
//! whole batch); each action is then independently authorized and
//! executed, and one result per action is returned in request order.

use std::sync::Arc;

use keyrights_core::{
    Action, ActionEntry, ActionParseError, ActionResult, KeyPair, PrePrimitives, Request, Response,
    SignKeyGen,
};
use keyrights_store::{Database, EntityStore};
use tracing::{debug, warn};

use crate::actions::{self, Acting};
use crate::error::{EngineError, Result};

const AUTHENTICATION_ERROR: &str = "Authentication error";
const INVALID_ACTION_TYPE: &str = "Invalid action type";
const INVALID_ACTION_PAYLOAD: &str = "Invalid action payload";
const UNAUTHORIZED: &str = "Unauthorized";

/// Outcome of request authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Verified and acting as this account.
    Account(String),
    /// Verified, but not tied to any account (bootstrap or unbound
    /// client).
    Anonymous,
    /// Signature or bootstrap format invalid; no action is dispatched.
    Rejected,
}

/// The keyrights engine.
///
/// Stateless between requests except through the entity store. The
/// service's own signing key pair is required at construction; it is
/// handed to the primitives when initiating re-encryption transforms.
pub struct Service<S: EntityStore> {
    primitives: Arc<dyn PrePrimitives>,
    sign_keygen: Arc<dyn SignKeyGen>,
    db: Database<S>,
    sign_key_pair: KeyPair,
}

impl<S: EntityStore> Service<S> {
    pub fn new(
        primitives: Arc<dyn PrePrimitives>,
        sign_keygen: Arc<dyn SignKeyGen>,
        db: Database<S>,
        sign_key_pair: KeyPair,
    ) -> Self {
        Self {
            primitives,
            sign_keygen,
            db,
            sign_key_pair,
        }
    }

    /// The service database.
    pub fn db(&self) -> &Database<S> {
        &self.db
    }

    pub(crate) fn primitives(&self) -> &dyn PrePrimitives {
        self.primitives.as_ref()
    }

    pub(crate) fn sign_keygen(&self) -> &dyn SignKeyGen {
        self.sign_keygen.as_ref()
    }

    pub(crate) fn sign_key_pair(&self) -> &KeyPair {
        &self.sign_key_pair
    }

    /// Handle one request: authenticate, then dispatch each action in
    /// order. A rejection reports every action as an authentication
    /// failure; otherwise one action's failure does not block the rest.
    ///
    /// Errors only on a body that is not an action list, or on an
    /// infrastructure failure during authentication.
    pub async fn handle(&self, request: &Request) -> Result<Response> {
        let entries: Vec<ActionEntry> = serde_json::from_str(&request.body)
            .map_err(|e| EngineError::MalformedRequest(e.to_string()))?;

        let acting_account = match self.authenticate(request, &entries).await? {
            AuthOutcome::Rejected => {
                warn!(client_id = %request.client_id, "request failed authentication");
                let results = entries
                    .iter()
                    .map(|entry| {
                        ActionResult::fail(
                            entry.kind.clone(),
                            entry.payload.clone(),
                            AUTHENTICATION_ERROR,
                        )
                    })
                    .collect();
                return Ok(Response { results });
            }
            AuthOutcome::Account(account_id) => account_id,
            AuthOutcome::Anonymous => String::new(),
        };

        let mut results = Vec::with_capacity(entries.len());
        for entry in &entries {
            let acting = Acting {
                account_id: &acting_account,
                client_id: &request.client_id,
            };
            results.push(self.process_entry(&acting, entry).await);
        }
        Ok(Response { results })
    }

    /// Resolve the acting identity for a request.
    ///
    /// A client with no registered sign key may only bootstrap: a
    /// single-`Login` body verified against the client id itself. A
    /// registered client verifies against its recorded key; if unbound,
    /// a single leading `InitializeAccount` for a fresh account id
    /// yields that id as the newly bootstrapping identity.
    pub async fn authenticate(
        &self,
        request: &Request,
        entries: &[ActionEntry],
    ) -> Result<AuthOutcome> {
        let client = self
            .db
            .get_client(&request.client_id)
            .await?
            .filter(|c| !c.sign_pub_key.is_empty());
        let Some(client) = client else {
            return self.authenticate_bootstrap(request, entries).await;
        };

        let initialize_count = entries
            .iter()
            .filter(|e| e.kind == "InitializeAccount")
            .count();
        if initialize_count > 1 {
            return Ok(AuthOutcome::Rejected);
        }

        if !self
            .primitives
            .verify(&client.sign_pub_key, &request.signature, &request.body)
            .await?
        {
            return Ok(AuthOutcome::Rejected);
        }

        if client.is_bound() {
            return Ok(AuthOutcome::Account(client.account_id));
        }

        if initialize_count == 1 {
            // The bootstrap action must lead the batch.
            if entries[0].kind != "InitializeAccount" {
                return Ok(AuthOutcome::Rejected);
            }
            if let Ok(Action::InitializeAccount(payload)) = Action::from_entry(&entries[0]) {
                if self.db.get_account(&payload.account_id).await?.is_none() {
                    debug!(account_id = %payload.account_id, "account bootstrap identity");
                    return Ok(AuthOutcome::Account(payload.account_id));
                }
            }
        }

        Ok(AuthOutcome::Anonymous)
    }

    /// Authenticate a client with no registered sign key: exactly one
    /// `Login` action, self-signed with the client id.
    async fn authenticate_bootstrap(
        &self,
        request: &Request,
        entries: &[ActionEntry],
    ) -> Result<AuthOutcome> {
        if entries.len() != 1 || entries[0].kind != "Login" {
            return Ok(AuthOutcome::Rejected);
        }
        if self
            .primitives
            .verify(&request.client_id, &request.signature, &request.body)
            .await?
        {
            Ok(AuthOutcome::Anonymous)
        } else {
            Ok(AuthOutcome::Rejected)
        }
    }

    async fn process_entry(&self, acting: &Acting<'_>, entry: &ActionEntry) -> ActionResult {
        let action = match Action::from_entry(entry) {
            Ok(action) => action,
            Err(ActionParseError::UnknownType(_)) => {
                return ActionResult::fail(
                    entry.kind.clone(),
                    entry.payload.clone(),
                    INVALID_ACTION_TYPE,
                );
            }
            Err(ActionParseError::InvalidPayload { .. }) => {
                return ActionResult::fail(
                    entry.kind.clone(),
                    entry.payload.clone(),
                    INVALID_ACTION_PAYLOAD,
                );
            }
        };

        match actions::authorize(self, acting, &action).await {
            Ok(true) => {}
            Ok(false) => {
                debug!(kind = action.kind(), account_id = acting.account_id, "unauthorized");
                return ActionResult::fail(entry.kind.clone(), entry.payload.clone(), UNAUTHORIZED);
            }
            Err(error) => {
                return ActionResult::fail(
                    entry.kind.clone(),
                    entry.payload.clone(),
                    error.to_string(),
                );
            }
        }

        match actions::execute(self, acting, &action).await {
            Ok(payload) => ActionResult::ok(entry.kind.clone(), payload),
            Err(error) => {
                debug!(kind = action.kind(), %error, "action failed");
                ActionResult::fail(entry.kind.clone(), entry.payload.clone(), error.to_string())
            }
        }
    }
}
