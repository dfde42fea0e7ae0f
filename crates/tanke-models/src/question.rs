//! Question items of the chain.

use serde::{Deserialize, Serialize};

use crate::dimension::Dimension;

/// One question in the chain.
///
/// There is no ordinal field: the order of items within a dimension is the
/// order in which they appear in the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    /// Unique identifier.
    pub id: u32,

    /// Dimension this question belongs to.
    pub dimension: Dimension,

    /// Question text shown to the student.
    pub question: String,

    /// Short teaching context, e.g. "基础现象观察".
    pub context: String,
}

impl QuestionItem {
    /// Creates a new question item.
    pub fn new(
        id: u32,
        dimension: Dimension,
        question: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            id,
            dimension,
            question: question.into(),
            context: context.into(),
        }
    }
}
