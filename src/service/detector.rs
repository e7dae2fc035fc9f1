//! Contradiction detection using LLM
//!
//! Checks each category with at least two statements for contradictions.
//! Categories are independent, so their calls run concurrently up to a
//! configured limit; results keep the classification order.

use std::sync::Arc;

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};

use crate::model::extraction::ExtractedContradictions;
use crate::model::{AnalysisResult, Category, CategoryResult, ClassificationResult, Contradiction};
use crate::service::error::AnalysisError;
use crate::service::indices::{numbered_listing, resolve_indices};
use crate::service::llm::{ReasoningRequest, ReasoningTask, StructuredReasoner};
use crate::service::prompts::{CONTRADICTION_TEMPLATE, PromptProvider, listing_params};

/// Fewest statements a category needs before it can hold a contradiction
pub const MIN_STATEMENTS_FOR_DETECTION: usize = 2;

/// Detects contradictions within classified categories
#[async_trait]
pub trait DetectorAgent: Send + Sync {
    async fn detect(
        &self,
        classification: &ClassificationResult,
    ) -> Result<AnalysisResult, AnalysisError>;
}

/// Detector backed by a structured reasoning backend
pub struct ContradictionDetector<R> {
    reasoner: Arc<R>,
    prompts: Arc<dyn PromptProvider>,
    max_output_tokens: u64,
    max_concurrency: usize,
}

impl<R: StructuredReasoner> ContradictionDetector<R> {
    pub fn new(
        reasoner: Arc<R>,
        prompts: Arc<dyn PromptProvider>,
        max_output_tokens: u64,
        max_concurrency: usize,
    ) -> Self {
        Self {
            reasoner,
            prompts,
            max_output_tokens,
            max_concurrency: max_concurrency.max(1),
        }
    }

    async fn detect_in_category(&self, category: &Category) -> Result<CategoryResult, AnalysisError> {
        let params = listing_params(numbered_listing(&category.statements));
        let system_prompt = self.prompts.system_prompt(CONTRADICTION_TEMPLATE, &params)?;
        let user_prompt = self.prompts.user_prompt(CONTRADICTION_TEMPLATE, &params)?;

        let request = ReasoningRequest::deterministic(
            ReasoningTask::ContradictionDetection,
            system_prompt,
            user_prompt,
            self.max_output_tokens,
        );

        let extracted: ExtractedContradictions = self.reasoner.extract(request).await?;

        let contradictions: Vec<Contradiction> = extracted
            .contradictions
            .into_iter()
            .map(|c| Contradiction {
                statements: resolve_indices(&c.statements, &category.statements),
                severity: c.severity.into(),
                comment: c.comment,
            })
            .collect();

        tracing::debug!(
            category = %category.name,
            statements = category.statements.len(),
            contradictions = contradictions.len(),
            "Checked category for contradictions"
        );

        Ok(CategoryResult {
            category_name: category.name.clone(),
            statements: category.statements.clone(),
            contradictions,
        })
    }
}

#[async_trait]
impl<R: StructuredReasoner + 'static> DetectorAgent for ContradictionDetector<R> {
    async fn detect(
        &self,
        classification: &ClassificationResult,
    ) -> Result<AnalysisResult, AnalysisError> {
        let analyzable: Vec<&Category> = classification
            .categories
            .iter()
            .filter(|category| {
                let enough = category.statements.len() >= MIN_STATEMENTS_FOR_DETECTION;
                if !enough {
                    tracing::debug!(
                        category = %category.name,
                        statements = category.statements.len(),
                        "Skipping category with too few statements"
                    );
                }
                enough
            })
            .collect();

        let calls: Vec<_> = analyzable
            .into_iter()
            .map(|category| self.detect_in_category(category))
            .collect();

        // `buffered` yields results in input order regardless of completion order
        let categories: Vec<CategoryResult> = stream::iter(calls)
            .buffered(self.max_concurrency)
            .try_collect()
            .await?;

        tracing::debug!(
            categories_total = classification.categories.len(),
            categories_analyzed = categories.len(),
            "Contradiction detection complete"
        );

        Ok(AnalysisResult { categories })
    }
}
