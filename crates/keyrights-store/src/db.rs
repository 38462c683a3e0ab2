//! Typed per-entity facade over an [`EntityStore`] adapter.
//!
//! Records are stored as JSON, one record per soul. Every put replaces
//! the full record for its key.

use std::sync::Arc;

use keyrights_core::{
    AccountRecord, ClientRecord, DocumentRecord, GrantKind, GrantRecord, GroupRecord,
    MembershipRecord, Soul,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Result, StoreError};
use crate::traits::EntityStore;

/// The service database: typed access to entity records.
pub struct Database<S: EntityStore> {
    store: Arc<S>,
}

impl<S: EntityStore> Clone for Database<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: EntityStore> Database<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The underlying adapter.
    pub fn store(&self) -> &S {
        &self.store
    }

    async fn get_record<T: DeserializeOwned>(&self, soul: &Soul) -> Result<Option<T>> {
        match self.store.get(soul).await? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| StoreError::InvalidRecord {
                    soul: soul.as_str().to_owned(),
                    message: e.to_string(),
                }),
        }
    }

    async fn put_record<T: Serialize>(&self, soul: &Soul, record: &T) -> Result<()> {
        let raw = serde_json::to_string(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.put(soul, &raw).await
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Option<AccountRecord>> {
        self.get_record(&Soul::account(account_id)).await
    }

    pub async fn put_account(&self, account: &AccountRecord) -> Result<()> {
        self.put_record(&Soul::account(&account.id), account).await
    }

    pub async fn delete_account(&self, account_id: &str) -> Result<()> {
        self.store.delete(&Soul::account(account_id)).await
    }

    pub async fn get_client(&self, client_id: &str) -> Result<Option<ClientRecord>> {
        self.get_record(&Soul::client(client_id)).await
    }

    pub async fn put_client(&self, client: &ClientRecord) -> Result<()> {
        self.put_record(&Soul::client(&client.id), client).await
    }

    pub async fn delete_client(&self, client_id: &str) -> Result<()> {
        self.store.delete(&Soul::client(client_id)).await
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Option<GroupRecord>> {
        self.get_record(&Soul::group(group_id)).await
    }

    pub async fn put_group(&self, group: &GroupRecord) -> Result<()> {
        self.put_record(&Soul::group(&group.id), group).await
    }

    pub async fn delete_group(&self, group_id: &str) -> Result<()> {
        self.store.delete(&Soul::group(group_id)).await
    }

    pub async fn get_membership(
        &self,
        group_id: &str,
        account_id: &str,
    ) -> Result<Option<MembershipRecord>> {
        self.get_record(&Soul::membership(group_id, account_id))
            .await
    }

    pub async fn put_membership(&self, membership: &MembershipRecord) -> Result<()> {
        self.put_record(
            &Soul::membership(&membership.group_id, &membership.account_id),
            membership,
        )
        .await
    }

    pub async fn delete_membership(&self, group_id: &str, account_id: &str) -> Result<()> {
        self.store
            .delete(&Soul::membership(group_id, account_id))
            .await
    }

    pub async fn get_document(&self, document_id: &str) -> Result<Option<DocumentRecord>> {
        self.get_record(&Soul::document(document_id)).await
    }

    pub async fn put_document(&self, document: &DocumentRecord) -> Result<()> {
        self.put_record(&Soul::document(&document.id), document)
            .await
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        self.store.delete(&Soul::document(document_id)).await
    }

    /// All grants attached to a document, in soul order (account grants
    /// before group grants).
    pub async fn document_grants(&self, document_id: &str) -> Result<Vec<GrantRecord>> {
        let prefix = Soul::document_grants_prefix(document_id);
        let scanned = self.store.scan_prefix(&prefix).await?;
        let mut grants = Vec::with_capacity(scanned.len());
        for (soul, raw) in scanned {
            let grant =
                serde_json::from_str(&raw).map_err(|e| StoreError::InvalidRecord {
                    soul: soul.as_str().to_owned(),
                    message: e.to_string(),
                })?;
            grants.push(grant);
        }
        Ok(grants)
    }

    pub async fn get_grant(
        &self,
        document_id: &str,
        kind: GrantKind,
        grantee_id: &str,
    ) -> Result<Option<GrantRecord>> {
        self.get_record(&Soul::grant(document_id, kind, grantee_id))
            .await
    }

    pub async fn put_grant(&self, grant: &GrantRecord) -> Result<()> {
        self.put_record(
            &Soul::grant(&grant.document_id, grant.kind, &grant.id),
            grant,
        )
        .await
    }

    pub async fn delete_grant(
        &self,
        document_id: &str,
        kind: GrantKind,
        grantee_id: &str,
    ) -> Result<()> {
        self.store
            .delete(&Soul::grant(document_id, kind, grantee_id))
            .await
    }
}
