//! Error types for the progression engine.

use thiserror::Error;

/// Engine-specific errors.
///
/// These are usage or data errors. Tutor failures never surface here; the
/// tutor absorbs them into a fallback reply.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation was called before `initialize`.
    #[error("Engine not initialized")]
    NotInitialized,

    /// `initialize` was called on a running session.
    #[error("Engine already initialized")]
    AlreadyInitialized,

    /// Lock poisoned.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// Question bank error.
    #[error("Question bank error: {0}")]
    Core(#[from] tanke_core::CoreError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
