use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdflowError {
    #[error("no order data found: expected {0}")]
    NotInitialized(String),

    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("placement '{placement}' not found in order '{order}'")]
    PlacementNotFound { order: String, placement: String },

    #[error("order source failed: {0}")]
    Source(String),

    #[error("invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdflowError>;
