use thiserror::Error;

pub type Result<T> = std::result::Result<T, BrightdataError>;

#[derive(Debug, Error)]
pub enum BrightdataError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for BrightdataError {
    fn from(err: reqwest::Error) -> Self {
        BrightdataError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for BrightdataError {
    fn from(err: serde_json::Error) -> Self {
        BrightdataError::Parse(err.to_string())
    }
}
