use thiserror::Error;

/// Failures at the crate boundary. Layout itself never fails: unknown ids
/// and missing stores degrade to no-ops or empty output.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
