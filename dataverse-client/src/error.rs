//! Error types for the Dataverse client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the Dataverse client.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw query-option strings must start with `?`. Raised before any
    /// network activity.
    #[error("invalid query options: {0}")]
    InvalidQueryOptions(String),

    /// The connection string could not be interpreted or selects an
    /// unsupported authentication flow.
    #[error("invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// The service answered with an OData error body.
    #[error("dataverse request failed ({code}): {message}")]
    Service { code: String, message: String },

    /// Network or protocol failure below the OData layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}
