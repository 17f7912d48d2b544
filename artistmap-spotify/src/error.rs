use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpotifyError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{url} returned {status}")]
    StatusError {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode response from {url}: {source}")]
    DecodeError {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Authentication failed: {0}")]
    AuthError(String),
}

pub type Result<T> = std::result::Result<T, SpotifyError>;
