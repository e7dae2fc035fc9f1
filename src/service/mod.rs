pub mod analysis;
pub mod classifier;
pub mod detector;
pub mod error;
pub mod indices;
pub mod llm;
pub mod prompts;
pub mod use_case;

#[cfg(test)]
pub mod testing;

pub use analysis::TextAnalysisService;
pub use classifier::SentenceClassifier;
pub use detector::ContradictionDetector;
pub use error::AnalysisError;
pub use llm::{LlmClient, RigReasoner};
pub use prompts::{PromptLibrary, PromptProvider};
pub use use_case::AnalyzeTextUseCase;
