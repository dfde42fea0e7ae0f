//! Tanke CLI library.
//!
//! This crate provides the command-line interface, the teacher and Studio
//! commands, and the interactive learning REPL.

pub mod cli;
pub mod commands;
pub mod error;
pub mod repl;

pub use error::{CliError, Result};
