//! One reconciliation cycle: list outstanding handles, resolve what the
//! provider has finished, leave the rest for the next pass.

use std::fmt;

use anyhow::Result;
use brightdata_client::{extract, ExtractedContent, Platform, SnapshotOutcome};
use supabase_client::{BookmarkPatch, PendingBookmark, UpdateOutcome};
use tracing::{debug, error, info, warn};

use crate::traits::{BookmarkStore, SnapshotFetcher};

/// Outcome tallies for one cycle.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CycleStats {
    /// Bookmarks that came back from the pending listing.
    pub listed: usize,
    /// Handles resolved with content applied.
    pub resolved: usize,
    /// Handles resolved with a provider-reported scrape failure recorded.
    pub failed_scrapes: usize,
    /// Handles still processing at the provider.
    pub pending: usize,
    /// Fetch calls that failed at the transport level; retried next cycle.
    pub transport_errors: usize,
    /// Store updates that failed; handle retained, retried next cycle.
    pub store_errors: usize,
    /// Guarded updates that matched no row (handle changed under us).
    pub stale: usize,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listed={} resolved={} failed_scrapes={} pending={} transport_errors={} store_errors={} stale={}",
            self.listed,
            self.resolved,
            self.failed_scrapes,
            self.pending,
            self.transport_errors,
            self.store_errors,
            self.stale,
        )
    }
}

/// How one bookmark's handle fared this cycle.
enum ItemOutcome {
    Pending,
    Resolved,
    ScrapeFailed,
    Stale,
    FetchFailed,
    StoreFailed,
}

pub struct Reconciler<F, S> {
    fetcher: F,
    store: S,
}

impl<F: SnapshotFetcher, S: BookmarkStore> Reconciler<F, S> {
    pub fn new(fetcher: F, store: S) -> Self {
        Self { fetcher, store }
    }

    /// One pass over every bookmark with an outstanding handle,
    /// sequentially. Only the listing call can fail the cycle; per-item
    /// failures are tallied and the loop keeps going.
    pub async fn run_cycle(&self) -> Result<CycleStats> {
        let pending = self.store.list_pending().await?;
        let mut stats = CycleStats {
            listed: pending.len(),
            ..CycleStats::default()
        };

        if pending.is_empty() {
            debug!("No pending snapshots");
            return Ok(stats);
        }

        info!(count = pending.len(), "Found bookmarks with pending snapshots");

        for bookmark in &pending {
            match self.reconcile_one(bookmark).await {
                ItemOutcome::Pending => stats.pending += 1,
                ItemOutcome::Resolved => stats.resolved += 1,
                ItemOutcome::ScrapeFailed => stats.failed_scrapes += 1,
                ItemOutcome::Stale => stats.stale += 1,
                ItemOutcome::FetchFailed => stats.transport_errors += 1,
                ItemOutcome::StoreFailed => stats.store_errors += 1,
            }
        }

        info!(%stats, "Reconciliation cycle complete");
        Ok(stats)
    }

    /// Resolve one bookmark's handle. Infallible: every failure mode is
    /// logged here with the bookmark id and handle, and reported as an
    /// outcome so one bad item never aborts the cycle.
    async fn reconcile_one(&self, bookmark: &PendingBookmark) -> ItemOutcome {
        let outcome = match self.fetcher.fetch(&bookmark.snapshot_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    bookmark_id = %bookmark.id,
                    handle = %bookmark.snapshot_id,
                    error = %e,
                    "Snapshot fetch failed, will retry next cycle"
                );
                return ItemOutcome::FetchFailed;
            }
        };

        let (patch, terminal) = match outcome {
            SnapshotOutcome::Pending => {
                debug!(
                    bookmark_id = %bookmark.id,
                    handle = %bookmark.snapshot_id,
                    "Snapshot still processing"
                );
                return ItemOutcome::Pending;
            }
            SnapshotOutcome::ProviderError { message, code } => {
                warn!(
                    bookmark_id = %bookmark.id,
                    handle = %bookmark.snapshot_id,
                    code = code.as_deref().unwrap_or("n/a"),
                    "Provider reported scrape failure: {message}"
                );
                (BookmarkPatch::scrape_failure(message), ItemOutcome::ScrapeFailed)
            }
            SnapshotOutcome::Ready(raw) => {
                let platform = Platform::from_url(&bookmark.url);
                let content = extract(&raw, platform);
                if content.is_empty() {
                    debug!(
                        bookmark_id = %bookmark.id,
                        "Nothing extracted, clearing handle only"
                    );
                } else {
                    debug!(
                        bookmark_id = %bookmark.id,
                        platform = ?platform,
                        content_len = content.content.len(),
                        has_image = content.preview_image_url.is_some(),
                        has_video = content.preview_video_url.is_some(),
                        "Extracted content"
                    );
                }
                (content_patch(content), ItemOutcome::Resolved)
            }
        };

        match self
            .store
            .apply(&bookmark.id, &bookmark.snapshot_id, &patch)
            .await
        {
            Ok(UpdateOutcome::Updated(_)) => {
                info!(
                    bookmark_id = %bookmark.id,
                    handle = %bookmark.snapshot_id,
                    "Updated bookmark, handle cleared"
                );
                terminal
            }
            Ok(UpdateOutcome::Stale) => {
                warn!(
                    bookmark_id = %bookmark.id,
                    handle = %bookmark.snapshot_id,
                    "Handle no longer matches, skipping (resolved elsewhere)"
                );
                ItemOutcome::Stale
            }
            Err(e) => {
                error!(
                    bookmark_id = %bookmark.id,
                    handle = %bookmark.snapshot_id,
                    error = %e,
                    "Bookmark update failed, handle retained for retry"
                );
                ItemOutcome::StoreFailed
            }
        }
    }
}

/// The handle-clear plus every non-empty extracted field, as one patch.
/// An all-empty extraction still clears the handle so the bookmark is
/// never reprocessed.
fn content_patch(content: ExtractedContent) -> BookmarkPatch {
    let description = if content.content.is_empty() {
        None
    } else {
        Some(content.content)
    };

    BookmarkPatch {
        snapshot_id: None,
        description,
        preview_image_url: content.preview_image_url,
        preview_video_url: content.preview_video_url,
        social_profile_name: content.social_profile_name,
        scrape_error: None,
    }
}
