//! Core business logic for Tanke.
//!
//! This crate owns everything about the 5D question chain that does not
//! talk to the tutor model:
//!
//! - [`question_bank`]: the ordered, per-dimension question catalog
//! - [`diagnosis`]: extraction of the `<diagnosis>` block from tutor replies
//! - [`scaffold`]: supplementary resources and per-dimension recommendation
//! - [`knowledge_map`]: the per-dimension progress projection
//! - [`dashboard`]: lesson-plan rows for the teacher view
//! - [`config`]: environment variables and state directories

pub mod config;
pub mod dashboard;
pub mod diagnosis;
pub mod error;
pub mod knowledge_map;
pub mod question_bank;
pub mod scaffold;

pub use dashboard::{lesson_plan, LessonPlanRow, DEFAULT_PLAN_ROWS};
pub use diagnosis::{decode_status, extract, scan_block, Diagnosis, DiagnosisBlock, DiagnosisError};
pub use error::{CoreError, Result};
pub use knowledge_map::{DimensionNode, KnowledgeMap};
pub use question_bank::QuestionBank;
pub use scaffold::{default_catalog, recommend};
