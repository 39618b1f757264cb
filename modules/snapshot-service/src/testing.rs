// In-memory mocks for the two capability traits.
//
// MockFetcher — HashMap handle→outcome; unregistered handles fail,
// standing in for transport errors.
// MockStore — stateful pending set that behaves like the guarded
// PostgREST update: a terminal patch removes the row from the pending
// listing, and every applied patch is recorded for assertions.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use brightdata_client::SnapshotOutcome;
use supabase_client::{Bookmark, BookmarkPatch, PendingBookmark, UpdateOutcome};

use crate::traits::{BookmarkStore, SnapshotFetcher};

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockFetcher {
    outcomes: HashMap<String, SnapshotOutcome>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_handle(mut self, handle: &str, outcome: SnapshotOutcome) -> Self {
        self.outcomes.insert(handle.to_string(), outcome);
        self
    }
}

#[async_trait]
impl SnapshotFetcher for MockFetcher {
    async fn fetch(&self, handle: &str) -> Result<SnapshotOutcome> {
        match self.outcomes.get(handle) {
            Some(outcome) => Ok(outcome.clone()),
            None => bail!("transport failure fetching snapshot {handle}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockStore {
    state: Mutex<MockStoreState>,
    fail_updates: bool,
}

#[derive(Default)]
struct MockStoreState {
    pending: Vec<PendingBookmark>,
    stale_ids: HashSet<String>,
    applied: Vec<(String, BookmarkPatch)>,
    list_calls: usize,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pending(self, id: &str, url: &str, handle: &str) -> Self {
        self.state.lock().unwrap().pending.push(PendingBookmark {
            id: id.to_string(),
            url: url.to_string(),
            snapshot_id: handle.to_string(),
        });
        self
    }

    /// Updates for this id report `Stale`, as if another worker resolved
    /// the handle between the listing and the update.
    pub fn with_stale(self, id: &str) -> Self {
        self.state.lock().unwrap().stale_ids.insert(id.to_string());
        self
    }

    /// All update calls fail, simulating a store outage.
    pub fn failing_updates(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    /// Every `(bookmark_id, patch)` applied so far, in order.
    pub fn applied(&self) -> Vec<(String, BookmarkPatch)> {
        self.state.lock().unwrap().applied.clone()
    }

    pub fn pending_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .pending
            .iter()
            .map(|b| b.id.clone())
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.state.lock().unwrap().list_calls
    }
}

#[async_trait]
impl BookmarkStore for MockStore {
    async fn list_pending(&self) -> Result<Vec<PendingBookmark>> {
        let mut state = self.state.lock().unwrap();
        state.list_calls += 1;
        Ok(state.pending.clone())
    }

    async fn apply(
        &self,
        id: &str,
        expected_handle: &str,
        patch: &BookmarkPatch,
    ) -> Result<UpdateOutcome> {
        if self.fail_updates {
            bail!("store unavailable");
        }

        let mut state = self.state.lock().unwrap();
        if state.stale_ids.contains(id) {
            return Ok(UpdateOutcome::Stale);
        }

        let Some(pos) = state
            .pending
            .iter()
            .position(|b| b.id == id && b.snapshot_id == expected_handle)
        else {
            return Ok(UpdateOutcome::Stale);
        };

        // A cleared handle drops the row out of the pending listing.
        let row = if patch.snapshot_id.is_none() {
            state.pending.remove(pos)
        } else {
            state.pending[pos].clone()
        };

        state.applied.push((id.to_string(), patch.clone()));

        Ok(UpdateOutcome::Updated(Bookmark {
            id: row.id,
            url: row.url,
            snapshot_id: patch.snapshot_id.clone(),
            description: patch.description.clone(),
            preview_image_url: patch.preview_image_url.clone(),
            preview_video_url: patch.preview_video_url.clone(),
            social_profile_name: patch.social_profile_name.clone(),
            scrape_error: patch.scrape_error.clone(),
        }))
    }
}
