//! Analyze-text use case: maps requests and responses around the analysis service

use crate::model::{AnalysisRequest, AnalysisResponse, CategoryInclusion};
use crate::service::analysis::TextAnalysisService;
use crate::service::error::AnalysisError;

pub struct AnalyzeTextUseCase {
    service: TextAnalysisService,
    category_inclusion: CategoryInclusion,
}

impl AnalyzeTextUseCase {
    pub fn new(service: TextAnalysisService, category_inclusion: CategoryInclusion) -> Self {
        Self {
            service,
            category_inclusion,
        }
    }

    /// Analyze the request's sentences
    ///
    /// An empty sentence list yields an empty response without calling the model.
    pub async fn execute(&self, request: AnalysisRequest) -> Result<AnalysisResponse, AnalysisError> {
        if request.sentences.is_empty() {
            tracing::debug!("Empty sentence list, skipping analysis");
            return Ok(AnalysisResponse::empty());
        }

        let mut result = self.service.analyze(&request.sentences).await?;

        if self.category_inclusion == CategoryInclusion::WithContradictions {
            result.categories.retain(|category| category.has_contradictions());
        }

        Ok(result.into())
    }
}
