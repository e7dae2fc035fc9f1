//! Application state and service initialization
//!
//! This module centralizes service construction and dependency injection so
//! that the server entry point only deals with HTTP concerns.

use std::sync::Arc;

use crate::model::{Config, ConfigError};
use crate::service::prompts::PromptError;
use crate::service::{
    AnalyzeTextUseCase, ContradictionDetector, LlmClient, PromptLibrary, PromptProvider,
    RigReasoner, SentenceClassifier, TextAnalysisService,
};

/// Application state containing the shared analysis use case
pub struct AppState {
    pub analyze_text: Arc<AnalyzeTextUseCase>,
}

impl AppState {
    /// Initialize all services and build application state
    ///
    /// This performs:
    /// 1. LLM client initialization (OpenAI or Azure OpenAI)
    /// 2. Prompt template loading (built-in or from `prompts_dir`)
    /// 3. Classifier and detector construction around one shared reasoner
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let llm_client = LlmClient::new(&config.backend).map_err(AppError::Llm)?;
        let llm_provider = llm_client.provider();
        let reasoner = Arc::new(RigReasoner::new(llm_client, &config.reasoning));

        let prompts: Arc<dyn PromptProvider> =
            Arc::new(PromptLibrary::load(config.prompts_dir.as_deref())?);

        let classifier = SentenceClassifier::new(
            Arc::clone(&reasoner),
            Arc::clone(&prompts),
            config.reasoning.max_output_tokens,
        );
        let detector = ContradictionDetector::new(
            reasoner,
            prompts,
            config.reasoning.max_output_tokens,
            config.analysis.max_concurrent_detections,
        );

        let service = TextAnalysisService::new(Arc::new(classifier), Arc::new(detector));
        let analyze_text = Arc::new(AnalyzeTextUseCase::new(
            service,
            config.analysis.category_inclusion,
        ));

        tracing::info!(
            provider = llm_provider,
            category_inclusion = ?config.analysis.category_inclusion,
            max_concurrent_detections = config.analysis.max_concurrent_detections,
            "Analysis services initialized"
        );

        Ok(Self { analyze_text })
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Missing or invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The LLM client could not be created
    #[error("LLM client initialization failed: {0}")]
    Llm(String),

    /// Prompt templates could not be loaded
    #[error("Prompt templates unavailable: {0}")]
    Prompts(#[from] PromptError),
}
