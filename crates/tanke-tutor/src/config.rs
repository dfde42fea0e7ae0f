//! Model configuration for tutor and Studio calls.

use serde::{Deserialize, Serialize};
use tanke_core::config;

/// Generation settings for one kind of request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "gemini-3-pro-preview").
    pub model: String,

    /// Temperature for response generation (0.0 to 2.0).
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional cap on generated tokens.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_output_tokens: Option<u32>,
}

fn default_temperature() -> f32 {
    0.6
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::tutor()
    }
}

impl ModelConfig {
    /// Create a configuration for the given model ID.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: default_temperature(),
            max_output_tokens: None,
        }
    }

    /// Configuration for Socratic dialogue, honoring `TANKE_TUTOR_MODEL`.
    pub fn tutor() -> Self {
        Self::new(config::tutor_model())
    }

    /// Configuration for structured Studio output, honoring `TANKE_STUDIO_MODEL`.
    pub fn studio() -> Self {
        Self::new(config::studio_model()).with_temperature(1.0)
    }

    /// Set the temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set the output token cap.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}
