//! Collaborator seams for text generation and reference material.
//!
//! The toolkit never talks to a model API directly; callers supply an
//! implementation of these traits. The core only consumes the returned
//! completion string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("text generation failed: {0}")]
    Upstream(String),
}

/// Produces one completion for a fully assembled prompt. Model identifiers
/// pass through unvalidated.
pub trait TextGenerator {
    fn generate(&self, prompt: &str, model: &str) -> Result<String, GenerationError>;
}

/// Optional supplier of auxiliary plain text for the selected grammar topics.
/// The returned text is concatenated into the prompt and otherwise opaque.
pub trait ReferenceSource {
    fn reference_text(&self, topics: &[String]) -> Option<String>;
}
