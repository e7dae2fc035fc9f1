//! Two-step text analysis: classification followed by contradiction detection

use std::sync::Arc;

use crate::model::AnalysisResult;
use crate::service::classifier::ClassifierAgent;
use crate::service::detector::DetectorAgent;
use crate::service::error::AnalysisError;

/// Orchestrates statement classification and contradiction detection
pub struct TextAnalysisService {
    classifier: Arc<dyn ClassifierAgent>,
    detector: Arc<dyn DetectorAgent>,
}

impl TextAnalysisService {
    pub fn new(classifier: Arc<dyn ClassifierAgent>, detector: Arc<dyn DetectorAgent>) -> Self {
        Self {
            classifier,
            detector,
        }
    }

    /// Classify statements, then check every category for contradictions
    ///
    /// The detector's result is returned as is.
    pub async fn analyze(&self, statements: &[String]) -> Result<AnalysisResult, AnalysisError> {
        let start_time = std::time::Instant::now();

        let classification = self.classifier.classify(statements).await?;
        let result = self.detector.detect(&classification).await?;

        tracing::info!(
            statements = statements.len(),
            categories_classified = classification.categories.len(),
            categories_analyzed = result.categories.len(),
            contradictions = result.contradiction_count(),
            elapsed_ms = start_time.elapsed().as_millis(),
            "Text analysis complete"
        );

        Ok(result)
    }
}
