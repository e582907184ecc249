use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid actor type: {0}")]
    InvalidActorType(String),

    #[error("Invalid actor status: {0}")]
    InvalidActorStatus(String),

    #[error("Invalid confidence rating: {0}")]
    InvalidConfidence(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crate::fetch::FetchError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
