//! The generative model seam.
//!
//! Everything that talks to the remote model goes through
//! [`GenerativeModel`], so tests can substitute a scripted implementation
//! for [`GeminiClient`](crate::client::GeminiClient).

use async_trait::async_trait;

use crate::client::{GenerateRequest, GenerateResponse};
use crate::error::Result;

/// A remote model that answers `generateContent` requests.
///
/// # Object Safety
///
/// This trait is object-safe for use with dynamic dispatch
/// (`Arc<dyn GenerativeModel>`).
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send one request to `model` and return the raw response.
    ///
    /// Implementations report transport failures and non-success statuses
    /// as errors; interpreting the candidates is left to the caller.
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse>;
}
