//! Failure type shared by every external collaborator.
//!
//! Each call to a source or model service returns `Result<_, ServiceError>`.
//! The pipeline never lets one of these escape: it collapses them into a
//! degraded value at the call site that issued the request.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model call failed: {0}")]
    Model(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("Upstream reported failure (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
