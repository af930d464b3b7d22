//! Error types for the storage client.
//!
//! # Design
//! Only failures that leave the caller with no usable record are errors.
//! "No such entity" and "record mapped with defects" are ordinary outcomes
//! carried by `Mapped`, so callers can tell all four cases apart.

/// Errors returned by `HoloStorageClient` parse methods and `HoloStorage`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, I/O, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-2xx status that has no dedicated meaning.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The body is not JSON, or not the JSON shape the endpoint promises.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A downloaded hologram is not a well-formed GLB container.
    #[error("invalid hologram asset: {0}")]
    InvalidAsset(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}

/// Failure reported by a `Transport` implementation.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
