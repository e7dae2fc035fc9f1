//! Statement classification using LLM
//!
//! Groups statements into semantic categories. The model answers with 1-based
//! statement numbers which are resolved back to statement text here.

use std::sync::Arc;

use async_trait::async_trait;

use crate::model::extraction::ExtractedClassification;
use crate::model::{Category, ClassificationResult};
use crate::service::error::AnalysisError;
use crate::service::indices::{numbered_listing, resolve_indices};
use crate::service::llm::{ReasoningRequest, ReasoningTask, StructuredReasoner};
use crate::service::prompts::{CLASSIFICATION_TEMPLATE, PromptProvider, listing_params};

/// Groups statements into semantic categories
#[async_trait]
pub trait ClassifierAgent: Send + Sync {
    async fn classify(&self, statements: &[String]) -> Result<ClassificationResult, AnalysisError>;
}

/// Classifier backed by a structured reasoning backend
pub struct SentenceClassifier<R> {
    reasoner: Arc<R>,
    prompts: Arc<dyn PromptProvider>,
    max_output_tokens: u64,
}

impl<R: StructuredReasoner> SentenceClassifier<R> {
    pub fn new(reasoner: Arc<R>, prompts: Arc<dyn PromptProvider>, max_output_tokens: u64) -> Self {
        Self {
            reasoner,
            prompts,
            max_output_tokens,
        }
    }
}

#[async_trait]
impl<R: StructuredReasoner + 'static> ClassifierAgent for SentenceClassifier<R> {
    async fn classify(&self, statements: &[String]) -> Result<ClassificationResult, AnalysisError> {
        let params = listing_params(numbered_listing(statements));
        let system_prompt = self.prompts.system_prompt(CLASSIFICATION_TEMPLATE, &params)?;
        let user_prompt = self.prompts.user_prompt(CLASSIFICATION_TEMPLATE, &params)?;

        let request = ReasoningRequest::deterministic(
            ReasoningTask::Classification,
            system_prompt,
            user_prompt,
            self.max_output_tokens,
        );

        let extracted: ExtractedClassification = self.reasoner.extract(request).await?;
        let result = map_classification(extracted, statements);

        tracing::debug!(
            statements = statements.len(),
            categories = result.categories.len(),
            "Classified statements"
        );

        Ok(result)
    }
}

/// Convert the model's index-based categories into statement text
fn map_classification(
    extracted: ExtractedClassification,
    statements: &[String],
) -> ClassificationResult {
    let categories = extracted
        .categories
        .into_iter()
        .map(|category| {
            let resolved = resolve_indices(&category.phrases, statements);
            let dropped = category.phrases.len() - resolved.len();
            if dropped > 0 {
                tracing::debug!(
                    category = %category.name,
                    dropped = dropped,
                    "Dropped out-of-range statement indices"
                );
            }
            Category {
                name: category.name,
                statements: resolved,
            }
        })
        .collect();

    ClassificationResult { categories }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::extraction::UNNAMED_CATEGORY;
    use crate::service::llm::ReasoningError;
    use crate::service::prompts::PromptLibrary;
    use crate::service::testing::{NoPrompts, ScriptedReasoner};
    use serde_json::json;

    fn statements() -> Vec<String> {
        vec![
            "A supports X.".to_string(),
            "B opposes X.".to_string(),
            "C is neutral on Y.".to_string(),
        ]
    }

    fn classifier(reasoner: Arc<ScriptedReasoner>) -> SentenceClassifier<ScriptedReasoner> {
        SentenceClassifier::new(reasoner, Arc::new(PromptLibrary::builtin().unwrap()), 1024)
    }

    #[tokio::test]
    async fn test_resolves_categories_to_statement_text() {
        let reasoner = Arc::new(ScriptedReasoner::new().on_classification(json!({
            "categories": [
                { "name": "X", "phrases": [1, 2] },
                { "name": "Y", "phrases": [3] }
            ]
        })));

        let result = classifier(reasoner).classify(&statements()).await.unwrap();

        assert_eq!(
            result.categories,
            vec![
                Category {
                    name: "X".to_string(),
                    statements: vec!["A supports X.".to_string(), "B opposes X.".to_string()],
                },
                Category {
                    name: "Y".to_string(),
                    statements: vec!["C is neutral on Y.".to_string()],
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_out_of_range_indices_and_missing_names() {
        let reasoner = Arc::new(ScriptedReasoner::new().on_classification(json!({
            "categories": [
                { "phrases": [0, 2, 4] },
                { "name": "Empty", "phrases": [-1, 9] }
            ]
        })));

        let result = classifier(reasoner).classify(&statements()).await.unwrap();

        assert_eq!(result.categories.len(), 2);
        assert_eq!(result.categories[0].name, UNNAMED_CATEGORY);
        assert_eq!(result.categories[0].statements, vec!["B opposes X."]);
        assert_eq!(result.categories[1].name, "Empty");
        assert!(result.categories[1].statements.is_empty());
    }

    #[tokio::test]
    async fn test_request_is_deterministic_and_numbered() {
        let reasoner = Arc::new(
            ScriptedReasoner::new().on_classification(json!({ "categories": [] })),
        );

        classifier(Arc::clone(&reasoner))
            .classify(&statements())
            .await
            .unwrap();

        let requests = reasoner.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.task, ReasoningTask::Classification);
        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.max_output_tokens, 1024);
        assert!(
            request
                .user_prompt
                .contains("1. A supports X.\n2. B opposes X.\n3. C is neutral on Y.")
        );
        assert!(!request.system_prompt.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_response_is_an_error() {
        let reasoner = Arc::new(ScriptedReasoner::new().on_classification(json!({
            "categories": [{ "name": "X", "phrases": "1,2" }]
        })));

        let result = classifier(reasoner).classify(&statements()).await;

        assert!(matches!(
            result,
            Err(AnalysisError::Reasoning(ReasoningError::MalformedResponse(_)))
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_is_propagated() {
        let reasoner = Arc::new(
            ScriptedReasoner::new().failing(ReasoningTask::Classification, "unauthorized"),
        );

        let result = classifier(reasoner).classify(&statements()).await;

        match result {
            Err(AnalysisError::Reasoning(ReasoningError::Provider(message))) => {
                assert_eq!(message, "unauthorized")
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prompt_failure_skips_the_call() {
        let reasoner = Arc::new(ScriptedReasoner::new());
        let classifier = SentenceClassifier::new(Arc::clone(&reasoner), Arc::new(NoPrompts), 1024);

        let result = classifier.classify(&statements()).await;

        assert!(matches!(result, Err(AnalysisError::Prompt(_))));
        assert!(reasoner.requests().is_empty());
    }
}
