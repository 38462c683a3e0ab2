//! End-to-end tests through the service facade: signed requests in,
//! per-action results out.

use keyrights_testkit::{Fixture, TaggedPrimitives};
use serde_json::json;

#[tokio::test]
async fn account_bootstrap_then_share_and_decrypt() {
    let fixture = Fixture::new();

    let root = fixture.bootstrap_account("a1", "c1").await;
    fixture.bootstrap_account("a2", "c2").await;

    let document_id = fixture.create_document("a1", "c1").await;
    assert_ne!(document_id, root);

    // Before the grant, a2 cannot decrypt.
    let denied = fixture
        .handle("c2", &[("DecryptDocument", json!({ "documentId": document_id }))])
        .await;
    assert!(!denied.results[0].success);
    assert_eq!(denied.results[0].error, "Unauthorized");

    let granted = fixture
        .handle(
            "c1",
            &[(
                "GrantAccess",
                json!({
                    "documentId": document_id,
                    "kind": "account",
                    "id": "a2",
                    "encCryptPrivKey": "docKeyEncFora2",
                }),
            )],
        )
        .await;
    assert!(granted.results[0].success, "{}", granted.results[0].error);

    let decrypted = fixture
        .handle("c2", &[("DecryptDocument", json!({ "documentId": document_id }))])
        .await;
    assert!(decrypted.results[0].success, "{}", decrypted.results[0].error);

    // The grant key reaches the client through exactly one hop, via
    // a2's client transform key.
    let key = decrypted.results[0].payload["encCryptPrivKey"]
        .as_str()
        .unwrap();
    assert_eq!(key, "transformed:a2Toc2TransformKey:docKeyEncFora2");
    assert_eq!(TaggedPrimitives::hops(key), 1);
}

#[tokio::test]
async fn two_initialize_account_actions_reject_the_whole_request() {
    let fixture = Fixture::new();
    fixture
        .handle("c1", &[("Login", json!({ "cryptPubKey": "c1CryptPubKey" }))])
        .await;

    let init = |account: &str| {
        json!({
            "accountId": account,
            "cryptPubKey": "cp",
            "signPubKey": "sp",
            "encCryptPrivKey": "ecp",
            "encSignPrivKey": "esp",
        })
    };

    // Regardless of position in the list.
    for entries in [
        vec![("InitializeAccount", init("a1")), ("InitializeAccount", init("a2"))],
        vec![
            ("InitializeAccount", init("a1")),
            ("GetPubKeys", json!({ "kind": "account", "id": "a1" })),
            ("InitializeAccount", init("a2")),
        ],
    ] {
        let response = fixture.handle("c1", &entries).await;
        assert_eq!(response.results.len(), entries.len());
        for result in &response.results {
            assert!(!result.success);
            assert_eq!(result.error, "Authentication error");
        }
    }

    assert!(fixture.db().get_account("a1").await.unwrap().is_none());
}

#[tokio::test]
async fn initialize_account_must_lead_the_batch() {
    let fixture = Fixture::new();
    fixture
        .handle("c1", &[("Login", json!({ "cryptPubKey": "c1CryptPubKey" }))])
        .await;

    let response = fixture
        .handle(
            "c1",
            &[
                ("GetPubKeys", json!({ "kind": "account", "id": "a1" })),
                (
                    "InitializeAccount",
                    json!({
                        "accountId": "a1",
                        "cryptPubKey": "cp",
                        "signPubKey": "sp",
                        "encCryptPrivKey": "ecp",
                        "encSignPrivKey": "esp",
                    }),
                ),
            ],
        )
        .await;
    for result in &response.results {
        assert_eq!(result.error, "Authentication error");
    }
}

#[tokio::test]
async fn bad_signature_rejects_every_action() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;

    let body = Fixture::body(&[("GetPubKeys", json!({ "kind": "account", "id": "a1" }))]);
    let mut request = Fixture::signed_request("c1", body);
    request.signature = "signed:someoneElse:whatever".to_owned();

    let response = fixture.service.handle(&request).await.unwrap();
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].error, "Authentication error");
}

#[tokio::test]
async fn bootstrap_request_must_be_a_single_login() {
    let fixture = Fixture::new();

    // Unknown client sending anything but a lone Login is rejected.
    let response = fixture
        .handle(
            "cNew",
            &[
                ("Login", json!({ "cryptPubKey": "k" })),
                ("GetPubKeys", json!({ "kind": "account", "id": "a1" })),
            ],
        )
        .await;
    for result in &response.results {
        assert_eq!(result.error, "Authentication error");
    }
}

#[tokio::test]
async fn remove_admin_from_group_is_idempotent() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;
    fixture.bootstrap_account("a2", "c2").await;

    let setup = fixture
        .handle(
            "c1",
            &[
                (
                    "CreateGroup",
                    json!({
                        "groupId": "g1",
                        "accountId": "a1",
                        "cryptPubKey": "gcp",
                        "encCryptPrivKey": "gecp",
                        "encSignPrivKey": "gesp",
                    }),
                ),
                (
                    "AddMemberToGroup",
                    json!({ "groupId": "g1", "accountId": "a2", "cryptTransformKey": "g1Toa2" }),
                ),
                (
                    "AddAdminToGroup",
                    json!({ "groupId": "g1", "accountId": "a2", "encCryptPrivKey": "gKeyFora2" }),
                ),
            ],
        )
        .await;
    for result in &setup.results {
        assert!(result.success, "{}: {}", result.kind, result.error);
    }
    let membership = fixture.db().get_membership("g1", "a2").await.unwrap().unwrap();
    assert!(membership.is_admin());

    for _ in 0..2 {
        let response = fixture
            .handle(
                "c1",
                &[("RemoveAdminFromGroup", json!({ "groupId": "g1", "accountId": "a2" }))],
            )
            .await;
        assert!(response.results[0].success, "{}", response.results[0].error);

        let membership = fixture.db().get_membership("g1", "a2").await.unwrap().unwrap();
        assert!(!membership.is_admin());
        assert_eq!(membership.crypt_transform_key, "g1Toa2");
    }
}

#[tokio::test]
async fn add_admin_requires_existing_membership() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;

    let response = fixture
        .handle(
            "c1",
            &[
                (
                    "CreateGroup",
                    json!({
                        "groupId": "g1",
                        "accountId": "a1",
                        "cryptPubKey": "gcp",
                        "encCryptPrivKey": "gecp",
                        "encSignPrivKey": "gesp",
                    }),
                ),
                (
                    "AddAdminToGroup",
                    json!({ "groupId": "g1", "accountId": "a2", "encCryptPrivKey": "gKeyFora2" }),
                ),
            ],
        )
        .await;
    assert!(response.results[0].success);
    assert!(!response.results[1].success);
    assert_eq!(response.results[1].error, "No membership for account");
    assert!(fixture.db().get_membership("g1", "a2").await.unwrap().is_none());
}

#[tokio::test]
async fn revoking_one_path_leaves_other_accounts_untouched() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;
    fixture.bootstrap_account("a2", "c2").await;
    fixture.bootstrap_account("a3", "c3").await;
    let document_id = fixture.create_document("a1", "c1").await;

    let setup = fixture
        .handle(
            "c1",
            &[
                (
                    "GrantAccess",
                    json!({
                        "documentId": document_id,
                        "kind": "account",
                        "id": "a2",
                        "encCryptPrivKey": "docKeyEncFora2",
                    }),
                ),
                (
                    "GrantAccess",
                    json!({
                        "documentId": document_id,
                        "kind": "account",
                        "id": "a3",
                        "encCryptPrivKey": "docKeyEncFora3",
                    }),
                ),
            ],
        )
        .await;
    for result in &setup.results {
        assert!(result.success, "{}", result.error);
    }
    assert!(fixture.service.has_read_access("a2", &document_id).await.unwrap());
    assert!(fixture.service.has_read_access("a3", &document_id).await.unwrap());

    let revoked = fixture
        .handle(
            "c1",
            &[(
                "RevokeAccess",
                json!({ "documentId": document_id, "kind": "account", "id": "a2" }),
            )],
        )
        .await;
    assert!(revoked.results[0].success);

    assert!(!fixture.service.has_read_access("a2", &document_id).await.unwrap());
    assert!(fixture.service.has_read_access("a3", &document_id).await.unwrap());
    assert!(fixture.service.has_read_access("a1", &document_id).await.unwrap());
}

#[tokio::test]
async fn sign_document_signs_each_hash_with_the_document_key() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;
    let document_id = fixture.create_document("a1", "c1").await;
    let document = fixture.db().get_document(&document_id).await.unwrap().unwrap();

    let response = fixture
        .handle(
            "c1",
            &[(
                "SignDocument",
                json!({ "documentId": document_id, "hashes": ["h1", "h2"] }),
            )],
        )
        .await;
    assert!(response.results[0].success, "{}", response.results[0].error);

    let signatures = response.results[0].payload["signatures"].as_array().unwrap();
    assert_eq!(
        signatures[0],
        TaggedPrimitives::signature(&document.sign_priv_key, "h1")
    );
    assert_eq!(
        signatures[1],
        TaggedPrimitives::signature(&document.sign_priv_key, "h2")
    );
}

#[tokio::test]
async fn invalid_type_and_payload_fail_without_blocking_siblings() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;

    let response = fixture
        .handle(
            "c1",
            &[
                ("ReticulateSplines", json!({})),
                ("DecryptDocument", json!({ "documentId": 7 })),
                ("GetPubKeys", json!({ "kind": "account", "id": "a1" })),
            ],
        )
        .await;

    assert_eq!(response.results[0].error, "Invalid action type");
    assert_eq!(response.results[1].error, "Invalid action payload");
    assert!(response.results[2].success, "{}", response.results[2].error);
    assert_eq!(
        response.results[2].payload["cryptPubKey"],
        "a1CryptPubKey"
    );
}

#[tokio::test]
async fn anonymous_verified_caller_cannot_act() {
    let fixture = Fixture::new();
    // Logged in but never bound to an account.
    fixture
        .handle("c9", &[("Login", json!({ "cryptPubKey": "c9CryptPubKey" }))])
        .await;

    let response = fixture
        .handle(
            "c9",
            &[(
                "CreateGroup",
                json!({
                    "groupId": "g1",
                    "accountId": "",
                    "cryptPubKey": "gcp",
                    "encCryptPrivKey": "gecp",
                    "encSignPrivKey": "gesp",
                }),
            )],
        )
        .await;
    assert_eq!(response.results[0].error, "Unauthorized");
}

#[tokio::test]
async fn initialize_for_existing_account_falls_through_to_anonymous() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;

    // A different, unbound client tries to re-initialize a1.
    fixture
        .handle("c2", &[("Login", json!({ "cryptPubKey": "c2CryptPubKey" }))])
        .await;
    let response = fixture
        .handle(
            "c2",
            &[(
                "InitializeAccount",
                json!({
                    "accountId": "a1",
                    "cryptPubKey": "other",
                    "signPubKey": "other",
                    "encCryptPrivKey": "other",
                    "encSignPrivKey": "other",
                }),
            )],
        )
        .await;
    assert_eq!(response.results[0].error, "Unauthorized");

    // The original account record is untouched.
    let account = fixture.db().get_account("a1").await.unwrap().unwrap();
    assert_eq!(account.crypt_pub_key, "a1CryptPubKey");
}

#[tokio::test]
async fn login_reports_existing_binding_and_root_document() {
    let fixture = Fixture::new();
    let root = fixture.bootstrap_account("a1", "c1").await;

    let response = fixture
        .handle("c1", &[("Login", json!({ "cryptPubKey": "c1CryptPubKey" }))])
        .await;
    assert!(response.results[0].success);
    assert_eq!(response.results[0].payload["accountId"], "a1");
    assert_eq!(response.results[0].payload["rootDocumentId"], root);
}

#[tokio::test]
async fn deauthorize_client_drops_the_binding() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;

    let response = fixture
        .handle(
            "c1",
            &[("DeauthorizeClient", json!({ "accountId": "a1", "clientId": "c1" }))],
        )
        .await;
    assert!(response.results[0].success);
    assert!(fixture.db().get_client("c1").await.unwrap().is_none());
}

#[tokio::test]
async fn get_key_pairs_transforms_for_the_acting_client() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;

    let response = fixture
        .handle("c1", &[("GetKeyPairs", json!({ "kind": "account", "id": "a1" }))])
        .await;
    assert!(response.results[0].success, "{}", response.results[0].error);
    assert_eq!(
        response.results[0].payload["encCryptPrivKey"],
        "transformed:a1Toc1TransformKey:a1EncCryptPrivKey"
    );
    assert_eq!(
        response.results[0].payload["encSignPrivKey"],
        "transformed:a1Toc1TransformKey:a1EncSignPrivKey"
    );
}

#[tokio::test]
async fn get_key_pairs_for_group_uses_owner_or_admin_source() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;
    fixture.bootstrap_account("a2", "c2").await;

    let setup = fixture
        .handle(
            "c1",
            &[
                (
                    "CreateGroup",
                    json!({
                        "groupId": "g1",
                        "accountId": "a1",
                        "cryptPubKey": "gcp",
                        "encCryptPrivKey": "groupKeyEncFora1",
                        "encSignPrivKey": "gesp",
                    }),
                ),
                (
                    "AddMemberToGroup",
                    json!({ "groupId": "g1", "accountId": "a2", "cryptTransformKey": "g1Toa2" }),
                ),
                (
                    "AddAdminToGroup",
                    json!({ "groupId": "g1", "accountId": "a2", "encCryptPrivKey": "groupKeyEncFora2" }),
                ),
            ],
        )
        .await;
    for result in &setup.results {
        assert!(result.success, "{}: {}", result.kind, result.error);
    }

    // Owner: source is the group's own encrypted key.
    let owner = fixture
        .handle("c1", &[("GetKeyPairs", json!({ "kind": "group", "id": "g1" }))])
        .await;
    assert_eq!(
        owner.results[0].payload["encCryptPrivKey"],
        "transformed:a1Toc1TransformKey:groupKeyEncFora1"
    );

    // Admin member: source is the membership's admin copy.
    let admin = fixture
        .handle("c2", &[("GetKeyPairs", json!({ "kind": "group", "id": "g1" }))])
        .await;
    assert_eq!(
        admin.results[0].payload["encCryptPrivKey"],
        "transformed:a2Toc2TransformKey:groupKeyEncFora2"
    );
}

#[tokio::test]
async fn update_document_preserves_creator_and_signing_identity() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;
    fixture.bootstrap_account("a2", "c2").await;
    fixture.bootstrap_account("a3", "c3").await;
    let document_id = fixture.create_document("a1", "c1").await;
    let before = fixture.db().get_document(&document_id).await.unwrap().unwrap();

    let granted = fixture
        .handle(
            "c1",
            &[(
                "GrantAccess",
                json!({
                    "documentId": document_id,
                    "kind": "account",
                    "id": "a2",
                    "encCryptPrivKey": "docKeyEncFora2",
                }),
            )],
        )
        .await;
    assert!(granted.results[0].success, "{}", granted.results[0].error);

    let update = json!({
        "documentId": document_id,
        "cryptAccountId": "a2",
        "cryptPubKey": "rotatedCryptPubKey",
        "encCryptPrivKey": "docKeyEncFora2v2",
    });

    // No read access, no update.
    let denied = fixture
        .handle("c3", &[("UpdateDocument", update.clone())])
        .await;
    assert!(!denied.results[0].success);
    assert_eq!(denied.results[0].error, "Unauthorized");

    // A grantee may rotate the key material.
    let updated = fixture
        .handle("c2", &[("UpdateDocument", update)])
        .await;
    assert!(updated.results[0].success, "{}", updated.results[0].error);

    let after = fixture.db().get_document(&document_id).await.unwrap().unwrap();
    assert_eq!(after.crypt_account_id, "a2");
    assert_eq!(after.crypt_pub_key, "rotatedCryptPubKey");
    assert_eq!(after.enc_crypt_priv_key, "docKeyEncFora2v2");
    // Creator and signing identity survive the overwrite.
    assert_eq!(after.creator_id, "a1");
    assert_eq!(after.sign_priv_key, before.sign_priv_key);
}

#[tokio::test]
async fn bound_client_cannot_be_rebound_to_another_account() {
    let fixture = Fixture::new();
    fixture.bootstrap_account("a1", "c1").await;
    fixture.bootstrap_account("a2", "c2").await;

    let response = fixture
        .handle(
            "c2",
            &[(
                "AuthorizeClient",
                json!({
                    "accountId": "a2",
                    "clientId": "c1",
                    "cryptTransformKey": "a2Toc1TransformKey",
                }),
            )],
        )
        .await;
    assert!(!response.results[0].success);
    assert_eq!(response.results[0].error, "Unauthorized");

    let client = fixture.db().get_client("c1").await.unwrap().unwrap();
    assert_eq!(client.account_id, "a1");
    assert_eq!(client.crypt_transform_key, "a1Toc1TransformKey");
}

#[tokio::test]
async fn login_without_a_crypt_key_fails() {
    let fixture = Fixture::new();

    let response = fixture
        .handle("cNew", &[("Login", json!({ "cryptPubKey": "" }))])
        .await;
    assert!(!response.results[0].success);
    assert_eq!(
        response.results[0].error,
        "Client crypt public key missing"
    );
    // No client record is created for the failed login.
    assert!(fixture.db().get_client("cNew").await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_body_is_a_request_level_error() {
    let fixture = Fixture::new();
    let request = Fixture::signed_request("c1", "not json".to_owned());
    let error = fixture.service.handle(&request).await.unwrap_err();
    assert!(error.to_string().starts_with("malformed request body"));
}
