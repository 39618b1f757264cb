use serde_json::Value;

/// Provider-reported state of a snapshot result download.
///
/// Transport-level failures (network, timeouts, unexpected statuses) are
/// not represented here; the client surfaces those as errors and the
/// caller retries on its next polling cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    /// The scrape job is still running (HTTP 202).
    Pending,
    /// The job finished; carries the first result record of the dataset.
    Ready(Value),
    /// The provider scraped and failed. Terminal for this handle.
    ProviderError {
        message: String,
        code: Option<String>,
    },
}

/// The social platform a scraped URL belongs to. Closed set: adding a
/// platform means adding a variant and an extraction arm, checked at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    X,
    LinkedIn,
    Unknown,
}

impl Platform {
    /// Classify a bookmark URL. Everything that is not LinkedIn is
    /// scraped through the X dataset, so X is the default.
    pub fn from_url(url: &str) -> Self {
        if url.contains("linkedin.com") {
            Platform::LinkedIn
        } else {
            Platform::X
        }
    }
}

/// Normalized content pulled out of one raw provider record.
/// Transient: merged into the bookmark row, never stored as-is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedContent {
    pub content: String,
    pub preview_image_url: Option<String>,
    pub preview_video_url: Option<String>,
    pub social_profile_name: Option<String>,
}

impl ExtractedContent {
    /// True when there is nothing to merge into the bookmark.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
            && self.preview_image_url.is_none()
            && self.preview_video_url.is_none()
            && self.social_profile_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linkedin_urls_classify_as_linkedin() {
        assert_eq!(
            Platform::from_url("https://www.linkedin.com/posts/abc"),
            Platform::LinkedIn
        );
    }

    #[test]
    fn everything_else_classifies_as_x() {
        assert_eq!(Platform::from_url("https://x.com/alice/status/1"), Platform::X);
        assert_eq!(Platform::from_url("https://example.org/page"), Platform::X);
    }
}
