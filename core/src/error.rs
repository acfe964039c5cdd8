//! Error types for the community client.
//!
//! # Design
//! Application outcomes decoded from a response (`ErrorCode`) are values,
//! not errors, and are returned through `Ok`. `ApiError` covers only the
//! cases where no trustworthy outcome exists: the transport failed, the body
//! did not have the expected shape, or the caller misused the library.

use thiserror::Error;

/// Failures raised by the transport, the parser, and the managers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, IO or URL failure while executing a request.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body does not match the shape expected for the endpoint.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// A request body could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A request was built before `Session::init` was called.
    #[error("session not initialized")]
    NotInitialized,

    /// The operation exists on the manager but has no remote counterpart yet.
    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },
}

impl ApiError {
    /// `false` for `NotImplemented`, which marks a missing feature rather
    /// than something going wrong at runtime.
    pub fn is_fault(&self) -> bool {
        !matches!(self, ApiError::NotImplemented { .. })
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::MalformedPayload(e.to_string())
    }
}
