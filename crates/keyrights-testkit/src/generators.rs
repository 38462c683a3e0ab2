//! Proptest strategies for random delegation graphs.
//!
//! An [`AccessGraph`] describes one document and every path that could
//! reach it: the owning account, direct account grants, group grants,
//! and group memberships. Tests install the graph into a fixture and
//! compare the engine's resolution against the graph's own reachability
//! rule.

use keyrights_core::{DocumentRecord, GrantKind, GrantRecord, MembershipRecord};
use proptest::collection::vec;
use proptest::prelude::*;

use crate::fixtures::Fixture;

/// One document plus every access path in a small universe of accounts
/// and groups. Indexes name entities: account `i` is `a{i}`, group `j`
/// is `g{j}`.
#[derive(Debug, Clone)]
pub struct AccessGraph {
    /// Index of the document's crypt account.
    pub owner: usize,
    /// Per-account direct grant.
    pub account_grants: Vec<bool>,
    /// Per-group grant.
    pub group_grants: Vec<bool>,
    /// `memberships[group][account]`.
    pub memberships: Vec<Vec<bool>>,
}

impl AccessGraph {
    pub const DOCUMENT_ID: &'static str = "d0";

    pub fn account_id(index: usize) -> String {
        format!("a{index}")
    }

    pub fn group_id(index: usize) -> String {
        format!("g{index}")
    }

    pub fn accounts(&self) -> usize {
        self.account_grants.len()
    }

    /// Ground truth: ownership, a direct grant, or a granted group the
    /// account belongs to.
    pub fn expected_read_access(&self, account: usize) -> bool {
        if account == self.owner || self.account_grants[account] {
            return true;
        }
        self.group_grants
            .iter()
            .zip(&self.memberships)
            .any(|(granted, members)| *granted && members[account])
    }

    /// Write the graph's records into a fixture's store.
    pub async fn install(&self, fixture: &Fixture) {
        let db = fixture.db();
        let owner_id = Self::account_id(self.owner);

        db.put_document(&DocumentRecord {
            id: Self::DOCUMENT_ID.to_owned(),
            crypt_account_id: owner_id.clone(),
            crypt_pub_key: "docCryptPubKey".to_owned(),
            enc_crypt_priv_key: format!("docKeyEncFor{owner_id}"),
            creator_id: owner_id,
            sign_priv_key: "docSignPrivKey".to_owned(),
        })
        .await
        .expect("put document");

        for (index, granted) in self.account_grants.iter().enumerate() {
            if !granted {
                continue;
            }
            let grantee = Self::account_id(index);
            db.put_grant(&GrantRecord {
                document_id: Self::DOCUMENT_ID.to_owned(),
                id: grantee.clone(),
                kind: GrantKind::Account,
                enc_crypt_priv_key: format!("docKeyEncFor{grantee}"),
                can_sign: false,
            })
            .await
            .expect("put account grant");
        }

        for (group, granted) in self.group_grants.iter().enumerate() {
            let group_id = Self::group_id(group);
            if *granted {
                db.put_grant(&GrantRecord {
                    document_id: Self::DOCUMENT_ID.to_owned(),
                    id: group_id.clone(),
                    kind: GrantKind::Group,
                    enc_crypt_priv_key: format!("docKeyEncFor{group_id}"),
                    can_sign: false,
                })
                .await
                .expect("put group grant");
            }
            for (account, member) in self.memberships[group].iter().enumerate() {
                if !member {
                    continue;
                }
                let account_id = Self::account_id(account);
                db.put_membership(&MembershipRecord {
                    group_id: group_id.clone(),
                    account_id: account_id.clone(),
                    crypt_transform_key: format!("{group_id}To{account_id}TransformKey"),
                    can_sign: false,
                    enc_group_crypt_priv_key: String::new(),
                })
                .await
                .expect("put membership");
            }
        }
    }
}

/// Strategy over graphs with the given universe sizes.
pub fn access_graph(accounts: usize, groups: usize) -> impl Strategy<Value = AccessGraph> {
    (
        0..accounts,
        vec(any::<bool>(), accounts),
        vec(any::<bool>(), groups),
        vec(vec(any::<bool>(), accounts), groups),
    )
        .prop_map(
            |(owner, account_grants, group_grants, memberships)| AccessGraph {
                owner,
                account_grants,
                group_grants,
                memberships,
            },
        )
}
