use thiserror::Error;

pub type Result<T> = std::result::Result<T, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid dataset from '{origin}': {message}")]
    Parse { origin: String, message: String },

    #[error("Stored data sources are malformed: {0}")]
    Store(#[from] serde_json::Error),

    #[error("Data source registry error: {0}")]
    Registry(String),
}
