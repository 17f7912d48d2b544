use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArtistMapError {
    #[error("Fetch failed: {0}")]
    SourceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl ArtistMapError {
    pub fn source_error<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ArtistMapError::SourceError(Box::new(error))
    }
}

pub type Result<T> = std::result::Result<T, ArtistMapError>;
