use thiserror::Error;

pub type Result<T> = std::result::Result<T, SupabaseError>;

#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl From<reqwest::Error> for SupabaseError {
    fn from(err: reqwest::Error) -> Self {
        SupabaseError::Network(err.to_string())
    }
}
