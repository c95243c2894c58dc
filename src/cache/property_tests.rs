//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the key builder and read-through laws over
//! arbitrary inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::cache::{CacheBackend, CacheOutcome, EntryQuery, InMemoryCacheStore, ReadThrough, RegionCache};
use crate::error::AppError;
use crate::models::PageRequest;

// == Strategies ==
fn term_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9 -]{0,24}".prop_filter("non-blank", |s| !s.trim().is_empty())
}

fn page_strategy() -> impl Strategy<Value = PageRequest> {
    (0u32..50, 1u32..=100).prop_map(|(page, size)| PageRequest::new(page, size))
}

fn query_strategy() -> impl Strategy<Value = EntryQuery> {
    prop_oneof![
        (1i64..10_000).prop_map(EntryQuery::ById),
        page_strategy().prop_map(EntryQuery::All),
        (term_strategy(), page_strategy()).prop_map(|(term, page)| EntryQuery::Search { term, page }),
        (term_strategy(), page_strategy()).prop_map(|(owner, page)| EntryQuery::Owner { owner, page }),
        (1i64..10_000, page_strategy()).prop_map(|(user_id, page)| EntryQuery::User { user_id, page }),
        Just(EntryQuery::TotalCount),
        term_strategy().prop_map(EntryQuery::CountByOwner),
    ]
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Building a key twice for the same query yields the same key, and the
    // declarative key is the manual key under the auto prefix.
    #[test]
    fn prop_keys_are_deterministic(query in query_strategy()) {
        let manual = query.manual_key().unwrap();
        prop_assert_eq!(&manual, &query.clone().manual_key().unwrap());
        prop_assert!(manual.starts_with(query.tag()));

        let auto = query.auto_key().unwrap();
        prop_assert_eq!(auto, format!("auto-{}", manual));
    }

    // Distinct queries never share a manual key.
    #[test]
    fn prop_distinct_queries_distinct_keys(queries in prop::collection::vec(query_strategy(), 1..30)) {
        let mut seen = HashSet::new();
        let mut unique_queries = Vec::new();
        for query in queries {
            if !unique_queries.contains(&query) {
                unique_queries.push(query);
            }
        }
        for query in &unique_queries {
            seen.insert(query.manual_key().unwrap());
        }
        // Owner and term values are trimmed into keys, so compare against
        // the trimmed query set.
        let trimmed: HashSet<String> = unique_queries.iter().map(|q| format!("{:?}", normalize(q))).collect();
        prop_assert_eq!(seen.len(), trimmed.len());
    }

    // For any key not yet present, the second read is a hit that does not
    // invoke the loader and returns the same value.
    #[test]
    fn prop_read_through_loads_once(key in "[a-z]{1,8}-[0-9]{1,4}", value in any::<i64>()) {
        let rt = runtime();
        let store: Arc<dyn CacheBackend> = Arc::new(InMemoryCacheStore::new(["textEntries"], None));
        let accessor = ReadThrough::new(RegionCache::new(store, "textEntries"));
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let load = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, AppError>(value)
        };

        let (first, second) = rt.block_on(async {
            let first = accessor.fetch(&key, load).await.unwrap();
            let second = accessor.fetch(&key, load).await.unwrap();
            (first, second)
        });

        prop_assert_eq!(first.outcome, CacheOutcome::Miss);
        prop_assert_eq!(second.outcome, CacheOutcome::Hit);
        prop_assert_eq!(first.value, second.value);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

fn normalize(query: &EntryQuery) -> EntryQuery {
    match query {
        EntryQuery::Search { term, page } => EntryQuery::Search {
            term: term.trim().to_string(),
            page: *page,
        },
        EntryQuery::Owner { owner, page } => EntryQuery::Owner {
            owner: owner.trim().to_string(),
            page: *page,
        },
        EntryQuery::CountByOwner(owner) => EntryQuery::CountByOwner(owner.trim().to_string()),
        other => other.clone(),
    }
}
