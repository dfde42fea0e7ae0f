//! Shared configuration for Tanke.
//!
//! Locates the state directory and reads the environment variables used by
//! the tutor and Studio clients.
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY`: API key for the generative model (required for network calls)
//! - `TANKE_TUTOR_MODEL`: model used for Socratic dialogue
//! - `TANKE_STUDIO_MODEL`: model used for structured Studio content
//! - `TANKE_GEMINI_BASE_URL`: override the API endpoint
//! - `TANKE_STATE_DIR`: override the base state directory (`~/.tanke`)

use std::path::{Path, PathBuf};

/// Environment variable holding the model API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable for the tutor model.
pub const TUTOR_MODEL_ENV: &str = "TANKE_TUTOR_MODEL";

/// Environment variable for the Studio model.
pub const STUDIO_MODEL_ENV: &str = "TANKE_STUDIO_MODEL";

/// Environment variable for the API base URL.
pub const BASE_URL_ENV: &str = "TANKE_GEMINI_BASE_URL";

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "TANKE_STATE_DIR";

/// Default model for tutoring turns.
pub const DEFAULT_TUTOR_MODEL: &str = "gemini-3-pro-preview";

/// Default model for structured Studio output.
pub const DEFAULT_STUDIO_MODEL: &str = "gemini-3-flash-preview";

/// Default model for image generation.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// Default model for speech synthesis.
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Topic every session is about.
pub const DEFAULT_TOPIC: &str = "水的浮力";

const DEFAULT_STATE_DIR: &str = ".tanke";
const HISTORY_FILE: &str = "repl_history.txt";

/// Get the Tanke state directory.
///
/// The state directory is determined by:
/// 1. `TANKE_STATE_DIR` environment variable if set
/// 2. `~/.tanke` if home directory is available
/// 3. `.tanke` in current directory as fallback
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// REPL history file inside `state_dir`.
pub fn history_file(state_dir: &Path) -> PathBuf {
    state_dir.join(HISTORY_FILE)
}

/// Create `state_dir` if missing.
pub fn ensure_state_dir(state_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(state_dir)
}

/// API key, if set and non-empty.
pub fn api_key() -> Option<String> {
    non_empty_env(API_KEY_ENV)
}

/// Tutor model from the environment, or the default.
pub fn tutor_model() -> String {
    non_empty_env(TUTOR_MODEL_ENV).unwrap_or_else(|| DEFAULT_TUTOR_MODEL.to_string())
}

/// Studio model from the environment, or the default.
pub fn studio_model() -> String {
    non_empty_env(STUDIO_MODEL_ENV).unwrap_or_else(|| DEFAULT_STUDIO_MODEL.to_string())
}

/// API base URL from the environment, or the default.
pub fn base_url() -> String {
    non_empty_env(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
