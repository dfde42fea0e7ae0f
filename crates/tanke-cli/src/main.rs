//! Tanke CLI entry point.

use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tanke_core::QuestionBank;
use tanke_engine::ProgressionEngine;
use tanke_tutor::{GeminiClient, TutorClient};
use tracing_subscriber::{fmt, EnvFilter};

use tanke_cli::cli::{Cli, Commands};
use tanke_cli::commands;
use tanke_cli::repl::Repl;

fn main() {
    // Load .env.local if it exists (for GEMINI_API_KEY etc.)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let state_dir = cli.state_dir();

    let result = commands::load_bank(cli.bank.as_deref()).and_then(|bank| {
        let bank = Arc::new(bank);
        match cli.command {
            Some(Commands::Learn) | None => run_repl(&state_dir, bank),
            Some(cmd) => commands::execute(cmd, bank),
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_repl(state_dir: &Path, bank: Arc<QuestionBank>) -> tanke_cli::Result<()> {
    let model = Arc::new(GeminiClient::from_env()?);
    let tutor = Arc::new(TutorClient::new(model));
    let engine = ProgressionEngine::new(bank, tutor);

    let mut repl = Repl::new(engine, state_dir)?;
    repl.run()
}
