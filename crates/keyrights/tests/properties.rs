//! Property test: engine read-access resolution agrees with graph
//! reachability over randomly generated delegation graphs.

use keyrights_testkit::{access_graph, AccessGraph, Fixture};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn read_access_matches_graph_reachability(graph in access_graph(4, 2)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("runtime");
        runtime.block_on(async {
            let fixture = Fixture::new();
            graph.install(&fixture).await;

            for account in 0..graph.accounts() {
                let account_id = AccessGraph::account_id(account);
                let actual = fixture
                    .service
                    .has_read_access(&account_id, AccessGraph::DOCUMENT_ID)
                    .await
                    .expect("resolution succeeds");
                prop_assert_eq!(
                    actual,
                    graph.expected_read_access(account),
                    "account {}",
                    account
                );

                // A bound client would sit exactly one hop further; an
                // account with no path yields an empty key.
                let key = fixture
                    .service
                    .account_document_decrypt_key(&account_id, AccessGraph::DOCUMENT_ID)
                    .await
                    .expect("resolution succeeds");
                prop_assert_eq!(key.is_empty(), !actual);
            }
            Ok(())
        })?;
    }
}
