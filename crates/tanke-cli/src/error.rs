//! Error types for the CLI.

use thiserror::Error;

/// Errors surfaced by CLI commands and the REPL.
#[derive(Debug, Error)]
pub enum CliError {
    /// Question bank error.
    #[error("{0}")]
    Core(#[from] tanke_core::CoreError),

    /// Engine error.
    #[error("{0}")]
    Engine(#[from] tanke_engine::EngineError),

    /// Model or Studio error.
    #[error("{0}")]
    Tutor(#[from] tanke_tutor::TutorError),

    /// Line editor error.
    #[error("readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid base64 in a generated payload.
    #[error("invalid payload encoding: {0}")]
    Decode(#[from] base64::DecodeError),
}

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;
