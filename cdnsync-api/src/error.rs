//! Error types for the configuration API client.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur when talking to the configuration API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("{method} {url}: {status} {message}")]
    Status {
        method: String,
        url: String,
        status: u16,
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("could not decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// An object could not be turned into a request body.
    #[error("could not encode {what}: {source}")]
    Encode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unable to find the active version for service {0}")]
    NoActiveVersion(String),

    #[error("invalid API base URL {0}")]
    BaseUrl(String),

    #[error("the API key contains characters that cannot be sent in a header")]
    InvalidKey,
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
