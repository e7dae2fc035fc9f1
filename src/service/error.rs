//! Error types for the analysis pipeline

use thiserror::Error;

use crate::service::llm::ReasoningError;
use crate::service::prompts::PromptError;

/// Error type shared by classification, detection and orchestration
///
/// Failures are propagated unchanged to the HTTP boundary; the pipeline never
/// returns partial results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AnalysisError {
    #[error("Prompt rendering failed: {0}")]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Reasoning(#[from] ReasoningError),
}
