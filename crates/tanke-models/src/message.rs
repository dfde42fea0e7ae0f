//! Transcript message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::status::LearningStatus;

/// Author of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The student.
    User,
    /// The tutor, including system-authored transition messages.
    Model,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// A single message in the session transcript.
///
/// Messages are immutable once appended. [`ChatMessage::model_with_analysis`]
/// is the constructor that attaches an `analysis`; the tutor ignores one on
/// a student message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author.
    pub role: Role,

    /// Text shown to the student.
    pub text: String,

    /// Hidden diagnosis attached to a tutor reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<LearningStatus>,

    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a student message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            analysis: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a tutor message without a diagnosis.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
            analysis: None,
            timestamp: Utc::now(),
        }
    }

    /// Create a tutor message with an optional diagnosis.
    pub fn model_with_analysis(text: impl Into<String>, analysis: Option<LearningStatus>) -> Self {
        Self {
            analysis,
            ..Self::model(text)
        }
    }
}
