//! Progression engine for the 5D question chain.
//!
//! The engine walks a student through the dimensions in order
//! (是何 → 为何 → 如何 → 若何 → 由何), keeps the transcript, and records the
//! latest diagnosis returned by the tutor.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tanke_core::QuestionBank;
//! use tanke_engine::ProgressionEngine;
//!
//! let engine = ProgressionEngine::new(Arc::new(QuestionBank::buoyancy()), tutor);
//! engine.initialize()?;
//! engine.submit_answer("木块和石块都受浮力").await?;
//! engine.advance()?;
//! ```

pub mod engine;
pub mod error;

pub use engine::{AdvanceOutcome, ProgressionEngine, ProgressionState, SubmitOutcome};
pub use error::{EngineError, Result};
