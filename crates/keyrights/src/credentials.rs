//! The credential resolver: locating and re-encrypting document keys.
//!
//! Given an account and a document, resolution walks direct ownership,
//! then the document's grants in soul order (account grants before group
//! grants), short-circuiting on the first reachable path. The resolved
//! chain determines how many re-encryption hops the requester's key
//! needs: zero for the owner, zero for a direct grant at account level,
//! one for a grant reached through a group membership, and one more to
//! go from account to client.

use keyrights_core::{DocumentRecord, GrantKind, GrantRecord, MembershipRecord};
use keyrights_store::EntityStore;

use crate::error::Result;
use crate::service::Service;

/// A resolved path from an account to a document's key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// The account is the document's crypt account; the stored key is
    /// already encrypted for it.
    Owner { document: DocumentRecord },
    /// A direct account grant; the grant's key is already encrypted for
    /// the account.
    Granted {
        document: DocumentRecord,
        grant: GrantRecord,
    },
    /// A group grant reached via the account's membership; the grant's
    /// key needs one hop through the membership's transform key.
    ViaGroup {
        document: DocumentRecord,
        grant: GrantRecord,
        membership: MembershipRecord,
    },
}

impl Credentials {
    /// The resolved document.
    pub fn document(&self) -> &DocumentRecord {
        match self {
            Credentials::Owner { document }
            | Credentials::Granted { document, .. }
            | Credentials::ViaGroup { document, .. } => document,
        }
    }
}

impl<S: EntityStore> Service<S> {
    /// Resolve the best available path from `account_id` to the key
    /// material of `document_id`, or `None` if no path exists.
    pub async fn get_credentials(
        &self,
        account_id: &str,
        document_id: &str,
    ) -> Result<Option<Credentials>> {
        let Some(document) = self.db().get_document(document_id).await? else {
            return Ok(None);
        };

        if document.crypt_account_id == account_id {
            return Ok(Some(Credentials::Owner { document }));
        }

        // First matching path wins, in soul order.
        for grant in self.db().document_grants(document_id).await? {
            match grant.kind {
                GrantKind::Account => {
                    if grant.id == account_id {
                        return Ok(Some(Credentials::Granted { document, grant }));
                    }
                }
                GrantKind::Group => {
                    if let Some(membership) =
                        self.db().get_membership(&grant.id, account_id).await?
                    {
                        return Ok(Some(Credentials::ViaGroup {
                            document,
                            grant,
                            membership,
                        }));
                    }
                }
            }
        }

        Ok(None)
    }

    /// The document's encrypted key, transformed for `account_id`.
    /// Empty means no access.
    pub async fn account_document_decrypt_key(
        &self,
        account_id: &str,
        document_id: &str,
    ) -> Result<String> {
        match self.get_credentials(account_id, document_id).await? {
            None => Ok(String::new()),
            Some(Credentials::Owner { document }) => Ok(document.enc_crypt_priv_key),
            Some(Credentials::Granted { grant, .. }) => Ok(grant.enc_crypt_priv_key),
            Some(Credentials::ViaGroup {
                grant, membership, ..
            }) => {
                let key = self
                    .primitives()
                    .crypt_transform(
                        &membership.crypt_transform_key,
                        &grant.enc_crypt_priv_key,
                        self.sign_key_pair(),
                    )
                    .await?;
                Ok(key)
            }
        }
    }

    /// The document's encrypted key, transformed all the way to
    /// `client_id`: the account-level key plus one account-to-client
    /// hop. Empty means no access or an unbound client.
    pub async fn client_document_decrypt_key(
        &self,
        client_id: &str,
        document_id: &str,
    ) -> Result<String> {
        let Some(client) = self.db().get_client(client_id).await? else {
            return Ok(String::new());
        };
        if !client.is_bound() {
            return Ok(String::new());
        }

        let account_key = self
            .account_document_decrypt_key(&client.account_id, document_id)
            .await?;
        if account_key.is_empty() {
            return Ok(String::new());
        }

        let key = self
            .primitives()
            .crypt_transform(
                &client.crypt_transform_key,
                &account_key,
                self.sign_key_pair(),
            )
            .await?;
        Ok(key)
    }

    /// Whether `account_id` administers `group_id`: the owner, or a
    /// member holding the group's encrypted crypt key.
    pub async fn is_group_admin(&self, group_id: &str, account_id: &str) -> Result<bool> {
        let Some(group) = self.db().get_group(group_id).await? else {
            return Ok(false);
        };
        if group.account_id == account_id {
            return Ok(true);
        }
        let membership = self.db().get_membership(group_id, account_id).await?;
        Ok(membership.is_some_and(|m| m.is_admin()))
    }

    /// Whether `account_id` can read `document_id`.
    pub async fn has_read_access(&self, account_id: &str, document_id: &str) -> Result<bool> {
        let key = self
            .account_document_decrypt_key(account_id, document_id)
            .await?;
        Ok(!key.is_empty())
    }

    /// Whether `account_id` can sign for `document_id`. The creator
    /// always can; otherwise the resolved grant must carry `can_sign`,
    /// and a membership hop gates it per-member.
    pub async fn has_sign_access(&self, account_id: &str, document_id: &str) -> Result<bool> {
        let Some(credentials) = self.get_credentials(account_id, document_id).await? else {
            return Ok(false);
        };
        if credentials.document().creator_id == account_id {
            return Ok(true);
        }
        Ok(match credentials {
            Credentials::Owner { .. } => false,
            Credentials::Granted { grant, .. } => grant.can_sign,
            Credentials::ViaGroup {
                grant, membership, ..
            } => grant.can_sign && membership.can_sign,
        })
    }
}
