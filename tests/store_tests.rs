//! Search-history store behavior against a real SQLite file.

use chrono::{TimeZone, Utc};
use futures::future::join_all;
use photoscroll::db::Store;

async fn temp_store() -> Store {
    let db_path =
        std::env::temp_dir().join(format!("photoscroll-store-test-{}.db", uuid::Uuid::new_v4()));
    Store::with_pool_options(&format!("sqlite:{}", db_path.display()), 8, 1)
        .await
        .expect("failed to open store")
}

#[tokio::test]
async fn concurrent_duplicates_create_one_row() {
    let store = temp_store().await;
    let now = Utc::now();

    let terms = ["Sunset", "sunset", "SUNSET", " sunset ", "SunSet"];
    let attempts = (0..20).map(|i| {
        let store = store.clone();
        let term = terms[i % terms.len()];
        async move { store.record_search_query(term, now).await }
    });

    let results = join_all(attempts).await;

    let created = results
        .into_iter()
        .map(|r| r.expect("insert failed"))
        .filter(|created| *created)
        .count();

    assert_eq!(created, 1);
    assert_eq!(store.search_query_count().await.unwrap(), 1);
}

#[tokio::test]
async fn concurrent_distinct_terms_all_land() {
    let store = temp_store().await;

    let attempts = (0..10).map(|i| {
        let store = store.clone();
        async move {
            store
                .record_search_query(&format!("term {i}"), Utc::now())
                .await
        }
    });

    for result in join_all(attempts).await {
        assert!(result.unwrap());
    }
    assert_eq!(store.search_query_count().await.unwrap(), 10);
}

#[tokio::test]
async fn first_casing_wins_and_lookup_ignores_case() {
    let store = temp_store().await;
    let now = Utc::now();

    assert!(store.record_search_query("  Golden Gate ", now).await.unwrap());
    assert!(!store.record_search_query("golden gate", now).await.unwrap());

    assert!(store.search_query_exists("GOLDEN GATE").await.unwrap());
    assert!(!store.search_query_exists("golden").await.unwrap());

    let all = store.list_search_queries().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].query_text, "Golden Gate");
}

#[tokio::test]
async fn non_ascii_terms_fold_case() {
    let store = temp_store().await;
    let now = Utc::now();

    assert!(store.record_search_query("ÉCLAIR", now).await.unwrap());
    assert!(!store.record_search_query("éclair", now).await.unwrap());
    assert!(store.search_query_exists("Éclair").await.unwrap());
}

#[tokio::test]
async fn list_orders_by_time_then_insertion() {
    let store = temp_store().await;
    let t1 = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
    let t2 = Utc.with_ymd_and_hms(2026, 3, 1, 10, 0, 0).unwrap();

    store.record_search_query("older", t1).await.unwrap();
    store.record_search_query("tie-first", t2).await.unwrap();
    store.record_search_query("tie-second", t2).await.unwrap();
    store.record_search_query("tie-third", t2).await.unwrap();

    let texts: Vec<String> = store
        .list_search_queries()
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.query_text)
        .collect();

    assert_eq!(texts, vec!["tie-first", "tie-second", "tie-third", "older"]);
}

#[tokio::test]
async fn timestamps_round_trip() {
    let store = temp_store().await;
    let at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 15).unwrap()
        + chrono::Duration::microseconds(123_456);

    store.record_search_query("tide", at).await.unwrap();

    let all = store.list_search_queries().await.unwrap();
    assert_eq!(all[0].search_time, at);
}

#[tokio::test]
async fn clear_removes_everything() {
    let store = temp_store().await;
    store.record_search_query("a", Utc::now()).await.unwrap();
    store.record_search_query("b", Utc::now()).await.unwrap();

    assert_eq!(store.clear_search_queries().await.unwrap(), 2);
    assert_eq!(store.search_query_count().await.unwrap(), 0);
    assert!(store.record_search_query("a", Utc::now()).await.unwrap());
}

#[tokio::test]
async fn ping_succeeds_on_open_store() {
    let store = temp_store().await;
    store.ping().await.unwrap();
}
