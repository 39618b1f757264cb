// Trait seams over the two external capabilities.
//
// The reconciler only sees these traits; the real HTTP clients implement
// them, and testing.rs provides in-memory mocks so full cycles run with
// no network and no database.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use brightdata_client::{SnapshotClient, SnapshotOutcome};
use supabase_client::{BookmarkPatch, BookmarkStoreClient, PendingBookmark, UpdateOutcome};

#[async_trait]
pub trait SnapshotFetcher: Send + Sync {
    /// Download the current state of one snapshot handle. A transport
    /// failure is an `Err`; the item is retried next cycle.
    async fn fetch(&self, handle: &str) -> Result<SnapshotOutcome>;
}

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Bookmarks that still carry an outstanding snapshot handle.
    async fn list_pending(&self) -> Result<Vec<PendingBookmark>>;

    /// Apply a patch to one bookmark, guarded on the handle still
    /// matching `expected_handle` (lost-update protection when multiple
    /// workers poll the same table).
    async fn apply(
        &self,
        id: &str,
        expected_handle: &str,
        patch: &BookmarkPatch,
    ) -> Result<UpdateOutcome>;
}

#[async_trait]
impl SnapshotFetcher for SnapshotClient {
    async fn fetch(&self, handle: &str) -> Result<SnapshotOutcome> {
        Ok(self.fetch_snapshot(handle).await?)
    }
}

#[async_trait]
impl BookmarkStore for BookmarkStoreClient {
    async fn list_pending(&self) -> Result<Vec<PendingBookmark>> {
        Ok(self.list_pending().await?)
    }

    async fn apply(
        &self,
        id: &str,
        expected_handle: &str,
        patch: &BookmarkPatch,
    ) -> Result<UpdateOutcome> {
        Ok(self.update_bookmark(id, expected_handle, patch).await?)
    }
}

// Also implemented for Arc so tests can keep a handle on a mock while the
// reconciler owns another.

#[async_trait]
impl<T: SnapshotFetcher + ?Sized> SnapshotFetcher for Arc<T> {
    async fn fetch(&self, handle: &str) -> Result<SnapshotOutcome> {
        (**self).fetch(handle).await
    }
}

#[async_trait]
impl<T: BookmarkStore + ?Sized> BookmarkStore for Arc<T> {
    async fn list_pending(&self) -> Result<Vec<PendingBookmark>> {
        (**self).list_pending().await
    }

    async fn apply(
        &self,
        id: &str,
        expected_handle: &str,
        patch: &BookmarkPatch,
    ) -> Result<UpdateOutcome> {
        (**self).apply(id, expected_handle, patch).await
    }
}
