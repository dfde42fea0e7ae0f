//! Tutor and Studio clients for Tanke.
//!
//! This crate talks to Gemini through the [`GenerativeModel`] seam:
//! - [`TutorClient`] answers student turns and never fails, falling back
//!   to a fixed reply
//! - [`Studio`] generates quizzes, flashcards, slides, images, audio and games
//! - [`GeminiClient`] is the HTTP implementation of the seam
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tanke_tutor::{GeminiClient, Tutor, TutorClient};
//!
//! let model = Arc::new(GeminiClient::from_env()?);
//! let tutor = TutorClient::new(model);
//! let reply = tutor.ask(&transcript, "浮力的方向是怎样的？").await;
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod prompts;
pub mod studio;
pub mod tutor;

pub use client::{GeminiClient, GenerateRequest, GenerateResponse};
pub use config::ModelConfig;
pub use error::{Result, TutorError};
pub use model::GenerativeModel;
pub use studio::{
    decode_pcm16, score_quiz, Flashcard, GameOption, GameScenario, QuizQuestion, Slide, Studio,
};
pub use tutor::{Tutor, TutorClient, TutorReply, FALLBACK_REPLY};
