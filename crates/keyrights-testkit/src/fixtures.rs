//! Service fixtures: a full engine over an in-memory store, with
//! request-building helpers.
//!
//! Client identities in fixture tests are plain strings used as both
//! halves of the signing pair, which is exactly what
//! [`TaggedPrimitives`] verification expects.

use std::sync::Arc;

use keyrights::Service;
use keyrights_core::{KeyPair, Request, Response};
use keyrights_store::{Database, MemoryStore};
use serde_json::{json, Value};

use crate::primitives::TaggedPrimitives;

/// A service over a memory store with tagged primitives.
pub struct Fixture {
    pub service: Service<MemoryStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let primitives = Arc::new(TaggedPrimitives::new());
        let service = Service::new(
            primitives.clone(),
            primitives,
            Database::new(MemoryStore::new()),
            KeyPair::new("servicePub", "servicePriv"),
        );
        Self { service }
    }

    /// The service database, for direct record setup and assertions.
    pub fn db(&self) -> &Database<MemoryStore> {
        self.service.db()
    }

    /// Serialize an ordered action list into a request body.
    pub fn body(entries: &[(&str, Value)]) -> String {
        let entries: Vec<Value> = entries
            .iter()
            .map(|(kind, payload)| json!({ "type": kind, "payload": payload }))
            .collect();
        serde_json::to_string(&entries).expect("action list serializes")
    }

    /// A request over `body` signed with the client's own identity.
    pub fn signed_request(client_id: &str, body: String) -> Request {
        Request {
            client_id: client_id.to_owned(),
            account_id: String::new(),
            signature: TaggedPrimitives::signature(client_id, &body),
            body,
        }
    }

    /// Build, sign, and handle a request for `client_id`.
    pub async fn handle(&self, client_id: &str, entries: &[(&str, Value)]) -> Response {
        let request = Self::signed_request(client_id, Self::body(entries));
        self.service
            .handle(&request)
            .await
            .expect("well-formed request")
    }

    /// Run the full bootstrap flow for an account on a fresh client:
    /// self-signed `Login`, then `InitializeAccount` plus
    /// `AuthorizeClient` in one batch. Returns the root document id.
    pub async fn bootstrap_account(&self, account_id: &str, client_id: &str) -> String {
        let login = self
            .handle(
                client_id,
                &[(
                    "Login",
                    json!({ "cryptPubKey": format!("{client_id}CryptPubKey") }),
                )],
            )
            .await;
        assert!(login.results[0].success, "login: {}", login.results[0].error);

        let bootstrap = self
            .handle(
                client_id,
                &[
                    (
                        "InitializeAccount",
                        json!({
                            "accountId": account_id,
                            "cryptPubKey": format!("{account_id}CryptPubKey"),
                            "signPubKey": format!("{account_id}SignPubKey"),
                            "encCryptPrivKey": format!("{account_id}EncCryptPrivKey"),
                            "encSignPrivKey": format!("{account_id}EncSignPrivKey"),
                        }),
                    ),
                    (
                        "AuthorizeClient",
                        json!({
                            "accountId": account_id,
                            "clientId": client_id,
                            "cryptTransformKey": format!("{account_id}To{client_id}TransformKey"),
                        }),
                    ),
                ],
            )
            .await;
        for result in &bootstrap.results {
            assert!(result.success, "{}: {}", result.kind, result.error);
        }

        bootstrap.results[0].payload["rootDocumentId"]
            .as_str()
            .expect("root document id in bootstrap result")
            .to_owned()
    }

    /// Create a document owned by `account_id` (already bootstrapped on
    /// `client_id`), returning the new document id.
    pub async fn create_document(&self, account_id: &str, client_id: &str) -> String {
        let response = self
            .handle(
                client_id,
                &[(
                    "CreateDocument",
                    json!({
                        "cryptAccountId": account_id,
                        "creatorId": account_id,
                        "cryptPubKey": "docCryptPubKey",
                        "encCryptPrivKey": format!("docKeyEncFor{account_id}"),
                    }),
                )],
            )
            .await;
        assert!(
            response.results[0].success,
            "create document: {}",
            response.results[0].error
        );
        response.results[0].payload["documentId"]
            .as_str()
            .expect("document id in create result")
            .to_owned()
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bootstrap_binds_client_and_mints_root_document() {
        let fixture = Fixture::new();
        let root = fixture.bootstrap_account("a1", "c1").await;

        let client = fixture.db().get_client("c1").await.unwrap().unwrap();
        assert_eq!(client.account_id, "a1");

        let account = fixture.db().get_account("a1").await.unwrap().unwrap();
        assert_eq!(account.root_document_id, root);
        assert!(fixture.db().get_document(&root).await.unwrap().is_some());
    }
}
