use thiserror::Error;

/// Failure talking to the API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {body}")]
    Status { status: u16, body: String },

    #[error("project file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no route for {method} {path}")]
    NotFound { method: &'static str, path: String },
}

/// Failure of a repository list operation
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("no custom repository with id {0}")]
    UnknownId(String),

    #[error("repository index {index} out of range ({len} configured)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}
