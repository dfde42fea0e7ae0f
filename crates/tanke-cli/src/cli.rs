//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tanke_core::config;
use tanke_models::Dimension;

/// 探课AI - 5D buoyancy question chain tutor
#[derive(Parser, Debug)]
#[command(name = "tanke")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "TANKE_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Load questions from a JSON file instead of the built-in bank
    #[arg(short, long, global = true)]
    pub bank: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive learning session
    Learn,

    /// Show the teacher dashboard lesson plan
    Teacher {
        /// Number of rows to show
        #[arg(short, long, default_value_t = tanke_core::DEFAULT_PLAN_ROWS)]
        limit: usize,
    },

    /// List the question bank
    Questions {
        /// Only show one dimension (code, label or 1-5)
        #[arg(short, long)]
        dimension: Option<Dimension>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Generate Studio material for a dimension
    Studio {
        /// Tool to run
        #[arg(value_enum)]
        tool: StudioTool,

        /// Dimension to focus on (code, label or 1-5)
        #[arg(short, long, default_value = "WHAT")]
        dimension: Dimension,

        /// Topic of the lesson
        #[arg(short, long, default_value = config::DEFAULT_TOPIC)]
        topic: String,

        /// Write image or audio bytes to this file (slides: the cover image)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Answer the quiz before the key is shown
        #[arg(long)]
        play: bool,
    },
}

/// Output format for list commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Studio tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StudioTool {
    Quiz,
    Flashcards,
    Slides,
    Game,
    Infographic,
    Audio,
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(config::state_dir)
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}
