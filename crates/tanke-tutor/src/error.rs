//! Error types for the tutor crate.

use thiserror::Error;

/// Errors that can occur when calling the generative model.
///
/// The tutor client absorbs all of these into a fallback reply; Studio
/// generators propagate them so callers can show an error state.
#[derive(Error, Debug)]
pub enum TutorError {
    /// Model invocation failed (transport or non-success status).
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// Response body could not be parsed.
    #[error("failed to parse response: {0}")]
    ResponseParse(String),

    /// The response carried no usable candidate.
    #[error("model returned no {0}")]
    EmptyResponse(&'static str),

    /// Structured output did not satisfy the declared shape.
    #[error("invalid {tool} payload: {message}")]
    InvalidPayload {
        /// Studio tool that produced the payload.
        tool: &'static str,
        /// What was wrong with it.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type for tutor operations.
pub type Result<T> = std::result::Result<T, TutorError>;
