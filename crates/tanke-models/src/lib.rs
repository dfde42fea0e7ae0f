//! Core data models for Tanke.
//!
//! This crate provides the fundamental data types shared by the question
//! bank, the tutor client and the progression engine: the five inquiry
//! dimensions, question items, transcript messages, mastery diagnoses and
//! scaffold resources.

pub mod dimension;
pub mod message;
pub mod question;
pub mod scaffold;
pub mod status;

// Re-export main types
pub use dimension::{Dimension, ParseDimensionError};
pub use message::{ChatMessage, Role};
pub use question::QuestionItem;
pub use scaffold::{NodeStatus, ResourceKind, ScaffoldResource};
pub use status::{InvalidStatus, LearningStatus, MAX_MASTERY};
