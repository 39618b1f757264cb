//! Reconciliation behavior against the in-memory mocks: the per-handle
//! state machine, per-item failure isolation, the guarded update, and
//! scheduler run modes. No network, no database.

use std::sync::Arc;
use std::time::Duration;

use brightdata_client::SnapshotOutcome;
use serde_json::json;
use snapshot_service::testing::{MockFetcher, MockStore};
use snapshot_service::{Reconciler, RunMode, Scheduler};
use supabase_client::BookmarkPatch;

const X_URL: &str = "https://x.com/alice/status/1";
const LINKEDIN_URL: &str = "https://www.linkedin.com/posts/bob_1";

#[tokio::test]
async fn pending_snapshot_leaves_bookmark_untouched() {
    let store = Arc::new(MockStore::new().with_pending("b1", X_URL, "h1"));
    let fetcher = MockFetcher::new().on_handle("h1", SnapshotOutcome::Pending);
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();

    assert_eq!(stats.listed, 1);
    assert_eq!(stats.pending, 1);
    assert!(store.applied().is_empty());
    assert_eq!(store.pending_ids(), vec!["b1".to_string()]);
}

#[tokio::test]
async fn unresolved_handle_is_idempotent_across_cycles() {
    let store = Arc::new(MockStore::new().with_pending("b1", X_URL, "h1"));
    let fetcher = MockFetcher::new().on_handle("h1", SnapshotOutcome::Pending);
    let reconciler = Reconciler::new(fetcher, store.clone());

    reconciler.run_cycle().await.unwrap();
    let second = reconciler.run_cycle().await.unwrap();

    assert_eq!(second.listed, 1);
    assert_eq!(second.pending, 1);
    assert!(store.applied().is_empty());
}

#[tokio::test]
async fn ready_x_snapshot_applies_content_and_clears_handle() {
    let store = Arc::new(MockStore::new().with_pending("b1", X_URL, "h1"));
    let fetcher = MockFetcher::new().on_handle(
        "h1",
        SnapshotOutcome::Ready(json!({
            "description": "hi",
            "photos": ["img.png"],
            "user_posted": "alice"
        })),
    );
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();
    assert_eq!(stats.resolved, 1);

    let applied = store.applied();
    assert_eq!(
        applied,
        vec![(
            "b1".to_string(),
            BookmarkPatch {
                description: Some("hi".to_string()),
                preview_image_url: Some("img.png".to_string()),
                social_profile_name: Some("alice".to_string()),
                ..BookmarkPatch::default()
            }
        )]
    );

    // Absent fields must not travel in the payload; the handle clear must.
    assert_eq!(
        serde_json::to_value(&applied[0].1).unwrap(),
        json!({
            "snapshot_id": null,
            "description": "hi",
            "preview_image_url": "img.png",
            "social_profile_name": "alice"
        })
    );

    assert!(store.pending_ids().is_empty());
}

#[tokio::test]
async fn ready_linkedin_snapshot_maps_linkedin_fields() {
    let store = Arc::new(MockStore::new().with_pending("b1", LINKEDIN_URL, "h1"));
    let fetcher = MockFetcher::new().on_handle(
        "h1",
        SnapshotOutcome::Ready(json!({
            "post_text": "post",
            "images": ["pic.jpg"],
            "user_id": "bob"
        })),
    );
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();
    assert_eq!(stats.resolved, 1);

    assert_eq!(
        serde_json::to_value(&store.applied()[0].1).unwrap(),
        json!({
            "snapshot_id": null,
            "description": "post",
            "preview_image_url": "pic.jpg",
            "social_profile_name": "bob"
        })
    );
}

#[tokio::test]
async fn provider_error_records_scrape_error_and_clears_handle() {
    let store = Arc::new(MockStore::new().with_pending("b1", X_URL, "h1"));
    let fetcher = MockFetcher::new().on_handle(
        "h1",
        SnapshotOutcome::ProviderError {
            message: "blocked".to_string(),
            code: Some("E1".to_string()),
        },
    );
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();
    assert_eq!(stats.failed_scrapes, 1);

    assert_eq!(
        serde_json::to_value(&store.applied()[0].1).unwrap(),
        json!({ "snapshot_id": null, "scrape_error": "blocked" })
    );
    assert!(store.pending_ids().is_empty());
}

#[tokio::test]
async fn empty_extraction_still_clears_handle() {
    let store = Arc::new(MockStore::new().with_pending("b1", X_URL, "h1"));
    let fetcher = MockFetcher::new().on_handle("h1", SnapshotOutcome::Ready(json!("")));
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();
    assert_eq!(stats.resolved, 1);

    assert_eq!(
        serde_json::to_value(&store.applied()[0].1).unwrap(),
        json!({ "snapshot_id": null })
    );
    assert!(store.pending_ids().is_empty());
}

#[tokio::test]
async fn resolved_bookmark_is_not_reprocessed() {
    let store = Arc::new(MockStore::new().with_pending("b1", X_URL, "h1"));
    let fetcher =
        MockFetcher::new().on_handle("h1", SnapshotOutcome::Ready(json!({ "text": "done" })));
    let reconciler = Reconciler::new(fetcher, store.clone());

    let first = reconciler.run_cycle().await.unwrap();
    assert_eq!(first.resolved, 1);

    let second = reconciler.run_cycle().await.unwrap();
    assert_eq!(second.listed, 0);
    assert_eq!(store.applied().len(), 1);
}

#[tokio::test]
async fn one_failing_item_does_not_stop_the_cycle() {
    // b1's handle is unregistered, so its fetch fails at transport level.
    let store = Arc::new(
        MockStore::new()
            .with_pending("b1", X_URL, "h-unreachable")
            .with_pending("b2", X_URL, "h2"),
    );
    let fetcher =
        MockFetcher::new().on_handle("h2", SnapshotOutcome::Ready(json!({ "text": "ok" })));
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();

    assert_eq!(stats.transport_errors, 1);
    assert_eq!(stats.resolved, 1);
    // The failed item keeps its handle and comes back next cycle.
    assert_eq!(store.pending_ids(), vec!["b1".to_string()]);
}

#[tokio::test]
async fn store_failure_keeps_handle_for_retry() {
    let store = Arc::new(
        MockStore::new()
            .with_pending("b1", X_URL, "h1")
            .failing_updates(),
    );
    let fetcher =
        MockFetcher::new().on_handle("h1", SnapshotOutcome::Ready(json!({ "text": "ok" })));
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();

    assert_eq!(stats.store_errors, 1);
    assert!(store.applied().is_empty());
    assert_eq!(store.pending_ids(), vec!["b1".to_string()]);
}

#[tokio::test]
async fn stale_guard_skips_handle_resolved_elsewhere() {
    let store = Arc::new(
        MockStore::new()
            .with_pending("b1", X_URL, "h1")
            .with_stale("b1"),
    );
    let fetcher =
        MockFetcher::new().on_handle("h1", SnapshotOutcome::Ready(json!({ "text": "ok" })));
    let reconciler = Reconciler::new(fetcher, store.clone());

    let stats = reconciler.run_cycle().await.unwrap();

    assert_eq!(stats.stale, 1);
    assert_eq!(stats.resolved, 0);
    assert!(store.applied().is_empty());
}

#[tokio::test(start_paused = true)]
async fn bounded_scheduler_stops_exactly_at_ceiling() {
    let store = Arc::new(MockStore::new());
    let reconciler = Reconciler::new(MockFetcher::new(), store.clone());
    let scheduler = Scheduler::new(
        Duration::from_millis(100),
        RunMode::Bounded {
            ceiling: Duration::from_millis(250),
        },
    );

    let started = tokio::time::Instant::now();
    scheduler.run(&reconciler).await.unwrap();

    // Cycles at t=0, 100, 200; the final sleep is truncated to 50ms so
    // the loop exits exactly at the ceiling.
    assert_eq!(store.list_calls(), 3);
    assert_eq!(started.elapsed(), Duration::from_millis(250));
}
