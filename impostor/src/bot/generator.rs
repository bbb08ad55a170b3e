//! The seam between the session driver and whatever produces automated
//! players' text.

use async_trait::async_trait;

use super::models::{GenerationRequest, GenerationResult};

/// Produces a clue, discussion line, or vote for an automated seat.
///
/// Implementations return raw text. Cleaning it up (first token, name
/// matching, fallbacks) is the caller's job, so a generator may be as
/// verbose or unreliable as it likes.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> GenerationResult<String>;
}
