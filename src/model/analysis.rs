//! Domain models for statement classification and contradiction analysis

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A semantic grouping of statements produced by the classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    /// Statements in the order the classifier listed their indices
    pub statements: Vec<String>,
}

/// Result of classifying a set of statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub categories: Vec<Category>,
}

/// Severity of a detected contradiction
///
/// Closed vocabulary: the reasoning backend must answer with one of these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Severe,
    Moderate,
}

/// A logical conflict between statements of the same category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contradiction {
    pub statements: Vec<String>,
    pub severity: Severity,
    pub comment: String,
}

/// Contradictions detected within one analyzed category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryResult {
    pub category_name: String,
    pub statements: Vec<String>,
    pub contradictions: Vec<Contradiction>,
}

impl CategoryResult {
    pub fn has_contradictions(&self) -> bool {
        !self.contradictions.is_empty()
    }
}

/// Full analysis result across all analyzed categories
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub categories: Vec<CategoryResult>,
}

impl AnalysisResult {
    /// Total number of contradictions across all categories
    pub fn contradiction_count(&self) -> usize {
        self.categories.iter().map(|c| c.contradictions.len()).sum()
    }
}
