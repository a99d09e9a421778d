use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevlogError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Feed request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Feed contains no games")]
    EmptyFeed,
    #[error("Page shell is missing mount point #{0}")]
    MissingMount(&'static str),
    #[error("{0}")]
    Other(String),
}

impl DevlogError {
    /// True for failures of the transport, status or parse step of a feed load.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            DevlogError::Network(_)
                | DevlogError::Status(_)
                | DevlogError::Io(_)
                | DevlogError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DevlogError>;
