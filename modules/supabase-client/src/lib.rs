pub mod error;
pub mod types;

pub use error::{Result, SupabaseError};
pub use types::{Bookmark, BookmarkPatch, PendingBookmark, UpdateOutcome};

use std::time::Duration;

use reqwest::Method;

const BOOKMARKS_TABLE: &str = "bookmarks";

pub struct BookmarkStoreClient {
    client: reqwest::Client,
    base_url: String,
    service_role_key: String,
}

impl BookmarkStoreClient {
    pub fn new(project_ref: &str, service_role_key: String) -> Self {
        Self::with_base_url(
            format!("https://{project_ref}.supabase.co/rest/v1"),
            service_role_key,
        )
    }

    pub fn with_base_url(base_url: String, service_role_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key,
        }
    }

    /// PostgREST request with the standard auth headers. `Prefer` asks
    /// for the affected rows back so callers can see what was written.
    fn request(&self, method: Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Prefer", "return=representation")
    }

    /// All bookmarks whose snapshot handle is still outstanding.
    pub async fn list_pending(&self) -> Result<Vec<PendingBookmark>> {
        let url = format!("{}/{}", self.base_url, BOOKMARKS_TABLE);
        let resp = self
            .request(Method::GET, url)
            .query(&[
                ("snapshot_id", "not.is.null"),
                ("select", "id,url,snapshot_id"),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let pending: Vec<PendingBookmark> = resp.json().await?;
        if !pending.is_empty() {
            tracing::debug!(count = pending.len(), "Found bookmarks with snapshot handles");
        }
        Ok(pending)
    }

    /// Apply a partial update to one bookmark, guarded on the handle
    /// still matching `expected_handle`. The guard closes the lost-update
    /// race when multiple workers poll the same table: a row resolved by
    /// someone else no longer matches the filter and comes back `Stale`.
    pub async fn update_bookmark(
        &self,
        id: &str,
        expected_handle: &str,
        patch: &BookmarkPatch,
    ) -> Result<UpdateOutcome> {
        tracing::debug!(bookmark_id = id, "Updating bookmark");

        let url = format!("{}/{}", self.base_url, BOOKMARKS_TABLE);
        let resp = self
            .request(Method::PATCH, url)
            .query(&[
                ("id", format!("eq.{id}")),
                ("snapshot_id", format!("eq.{expected_handle}")),
            ])
            .json(patch)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let mut rows: Vec<Bookmark> = resp.json().await?;
        match rows.pop() {
            Some(row) => Ok(UpdateOutcome::Updated(row)),
            None => Ok(UpdateOutcome::Stale),
        }
    }
}
