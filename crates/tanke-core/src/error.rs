//! Error types for the core crate.

use tanke_models::Dimension;
use thiserror::Error;

/// Errors raised by question bank and configuration handling.
///
/// These indicate corrupted data or incorrect call sequencing and are not
/// meant to be recovered from at runtime.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A dimension has no questions, so no valid starting index exists.
    #[error("question bank has no questions for dimension {0}")]
    EmptyDimension(Dimension),

    /// Two items share an id.
    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(u32),

    /// Index past the end of a dimension's question list.
    #[error("question index {index} out of range for dimension {dimension} ({len} questions)")]
    QuestionOutOfRange {
        dimension: Dimension,
        index: usize,
        len: usize,
    },

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Bank file is not valid JSON.
    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::EmptyDimension(Dimension::WhatIf);
        assert_eq!(err.to_string(), "question bank has no questions for dimension 若何");

        let err = CoreError::QuestionOutOfRange {
            dimension: Dimension::What,
            index: 3,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "question index 3 out of range for dimension 是何 (3 questions)"
        );
    }
}
