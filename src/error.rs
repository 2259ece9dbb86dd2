use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Lookup failed: {0}")]
    Lookup(String),

    #[error("Chart creation rejected: {0}")]
    CreationRejected(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Invalid chart index: {0}")]
    InvalidIndex(usize),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DashboardError {
    pub fn lookup<S: Into<String>>(msg: S) -> Self {
        DashboardError::Lookup(msg.into())
    }

    pub fn creation_rejected<S: Into<String>>(msg: S) -> Self {
        DashboardError::CreationRejected(msg.into())
    }

    pub fn store<S: Into<String>>(msg: S) -> Self {
        DashboardError::Store(msg.into())
    }

    pub fn unexpected<S: Into<String>>(msg: S) -> Self {
        DashboardError::Unexpected(msg.into())
    }
}

/// Result type alias for dashboard operations
pub type DashboardResult<T> = Result<T, DashboardError>;
