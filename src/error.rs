use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("missing required environment variable {name}")]
    MissingEnv { name: String },

    #[error("invalid token url: {0}")]
    InvalidTokenUrl(#[from] url::ParseError),

    #[error("provider timeout must be greater than zero")]
    ZeroTimeout,

    #[error("tls material error ({path}): {message}")]
    Tls { path: String, message: String },

    #[error("input decoding error: {message}")]
    InvalidRequestBody { message: String },

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider did not respond within {timeout:?}")]
    Timeout { timeout: Duration },
}
