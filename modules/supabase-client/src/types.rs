use serde::{Deserialize, Serialize};

/// A bookmark row as returned by PostgREST. Unknown columns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub url: String,
    pub snapshot_id: Option<String>,
    pub description: Option<String>,
    pub preview_image_url: Option<String>,
    pub preview_video_url: Option<String>,
    pub social_profile_name: Option<String>,
    pub scrape_error: Option<String>,
}

/// The projection the reconciliation cycle works from: rows that still
/// carry an outstanding snapshot handle.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingBookmark {
    pub id: String,
    pub url: String,
    pub snapshot_id: String,
}

/// Partial update for one bookmark row.
///
/// `snapshot_id` is always serialized — JSON `null` clears the
/// outstanding handle, and the clear must travel in the same PATCH as the
/// content fields so no reader ever sees one without the other. Every
/// other field is serialized only when present, so absent extraction
/// fields never overwrite stored values with null.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookmarkPatch {
    pub snapshot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_profile_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scrape_error: Option<String>,
}

impl BookmarkPatch {
    /// Clear the handle and record a provider-reported scrape failure.
    /// Content fields are left untouched.
    pub fn scrape_failure(message: impl Into<String>) -> Self {
        Self {
            scrape_error: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Result of a guarded update. PostgREST returns the updated rows; an
/// empty representation means no row matched the id + handle filter, i.e.
/// another worker already resolved this handle.
#[derive(Debug, Clone)]
pub enum UpdateOutcome {
    Updated(Bookmark),
    Stale,
}
