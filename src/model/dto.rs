//! Request and response shapes exposed by the analysis endpoint

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{AnalysisResult, CategoryResult, Contradiction, Severity};

/// Statements to classify and check for contradictions
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AnalysisRequest {
    pub sentences: Vec<String>,
}

/// A detected contradiction between statements
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContradictionDto {
    /// Statements involved, in the order the model referenced them
    pub statements: Vec<String>,
    pub severity: Severity,
    /// Explanation of the conflict
    pub comment: String,
}

/// Contradictions detected within a category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryContradictionDto {
    pub category_name: String,
    /// All statements of the category
    pub statements: Vec<String>,
    pub contradictions: Vec<ContradictionDto>,
}

/// Analysis response grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResponse {
    pub categories: Vec<CategoryContradictionDto>,
}

impl AnalysisResponse {
    pub fn empty() -> Self {
        Self::default()
    }
}

impl From<Contradiction> for ContradictionDto {
    fn from(contradiction: Contradiction) -> Self {
        Self {
            statements: contradiction.statements,
            severity: contradiction.severity,
            comment: contradiction.comment,
        }
    }
}

impl From<CategoryResult> for CategoryContradictionDto {
    fn from(result: CategoryResult) -> Self {
        Self {
            category_name: result.category_name,
            statements: result.statements,
            contradictions: result.contradictions.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            categories: result.categories.into_iter().map(Into::into).collect(),
        }
    }
}
