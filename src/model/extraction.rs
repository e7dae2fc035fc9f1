//! LLM-extractable models for classification and contradiction detection
//!
//! Statements are referenced by their 1-based position in the numbered listing
//! sent with the prompt. Indices are kept signed so out-of-range answers
//! (zero or negative) still deserialize and can be dropped during resolution.

use std::fmt;

use schemars::JsonSchema;
use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::model::Severity;

/// Name given to categories the model returns without one
pub const UNNAMED_CATEGORY: &str = "Unnamed";

fn unnamed_category() -> String {
    UNNAMED_CATEGORY.to_string()
}

/// One statement index as returned by the model
///
/// Integers beyond the `i64` range saturate, so they stay out of range and are
/// dropped during resolution instead of failing the whole answer. JSON parses
/// such literals as floats; only whole floats of that magnitude are accepted.
struct StatementIndex(i64);

impl<'de> Deserialize<'de> for StatementIndex {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IndexVisitor;

        impl Visitor<'_> for IndexVisitor {
            type Value = StatementIndex;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an integer statement index")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(StatementIndex(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(StatementIndex(i64::try_from(v).unwrap_or(i64::MAX)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                // 2^63, the first magnitude `i64` cannot hold
                const LIMIT: f64 = 9_223_372_036_854_775_808.0;

                if v.is_finite() && v.fract() == 0.0 && v.abs() >= LIMIT {
                    Ok(StatementIndex(if v > 0.0 { i64::MAX } else { i64::MIN }))
                } else {
                    Err(E::invalid_type(de::Unexpected::Float(v), &self))
                }
            }
        }

        deserializer.deserialize_any(IndexVisitor)
    }
}

fn statement_indices<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<i64>, D::Error> {
    struct IndicesVisitor;

    impl<'de> Visitor<'de> for IndicesVisitor {
        type Value = Vec<i64>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a list of integer statement indices")
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut indices = Vec::with_capacity(seq.size_hint().unwrap_or(0));
            while let Some(StatementIndex(index)) = seq.next_element()? {
                indices.push(index);
            }
            Ok(indices)
        }
    }

    deserializer.deserialize_seq(IndicesVisitor)
}

/// LLM-extractable classification structure
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedClassification {
    pub categories: Vec<ExtractedCategory>,
}

/// A single category with the indices of its statements
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedCategory {
    #[serde(default = "unnamed_category")]
    pub name: String,
    #[serde(deserialize_with = "statement_indices")]
    #[schemars(with = "Vec<i64>")]
    pub phrases: Vec<i64>,
}

/// LLM-extractable contradiction structure for one category
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedContradictions {
    #[serde(alias = "التناقضات")]
    pub contradictions: Vec<ExtractedContradiction>,
}

/// A single contradiction referencing statements by index
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedContradiction {
    #[serde(alias = "إفادات", deserialize_with = "statement_indices")]
    #[schemars(with = "Vec<i64>")]
    pub statements: Vec<i64>,
    #[serde(alias = "severity_level", alias = "مستوى_التعارض")]
    pub severity: ExtractedSeverity,
    #[serde(alias = "تعليق")]
    pub comment: String,
}

/// Severity levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractedSeverity {
    #[serde(alias = "حاد")]
    Severe,
    #[serde(alias = "متوسط")]
    Moderate,
}

impl From<ExtractedSeverity> for Severity {
    fn from(severity: ExtractedSeverity) -> Self {
        match severity {
            ExtractedSeverity::Severe => Severity::Severe,
            ExtractedSeverity::Moderate => Severity::Moderate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_name_defaults_when_missing() {
        let parsed: ExtractedClassification =
            serde_json::from_value(json!({ "categories": [{ "phrases": [1, 2] }] })).unwrap();

        assert_eq!(parsed.categories[0].name, UNNAMED_CATEGORY);
        assert_eq!(parsed.categories[0].phrases, vec![1, 2]);
    }

    #[test]
    fn test_out_of_range_indices_still_parse() {
        let parsed: ExtractedClassification =
            serde_json::from_value(json!({ "categories": [{ "name": "x", "phrases": [0, -3, 99] }] }))
                .unwrap();

        assert_eq!(parsed.categories[0].phrases, vec![0, -3, 99]);
    }

    #[test]
    fn test_indices_beyond_i64_saturate() {
        let parsed: ExtractedContradictions = serde_json::from_str(
            r#"{"contradictions": [
                {"statements": [1, 99999999999999999999, -99999999999999999999, 18446744073709551615],
                 "severity": "moderate", "comment": "overflow"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            parsed.contradictions[0].statements,
            vec![1, i64::MAX, i64::MIN, i64::MAX]
        );
    }

    #[test]
    fn test_fractional_indices_are_rejected() {
        let result: Result<ExtractedClassification, _> =
            serde_json::from_value(json!({ "categories": [{ "name": "x", "phrases": [1.5] }] }));

        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let result: Result<ExtractedContradictions, _> = serde_json::from_value(json!({
            "contradictions": [
                { "statements": [1, 2], "severity": "minor", "comment": "slight tension" }
            ]
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_arabic_field_names_and_severity_accepted() {
        let parsed: ExtractedContradictions = serde_json::from_value(json!({
            "التناقضات": [
                { "إفادات": [1, 2], "مستوى_التعارض": "حاد", "تعليق": "موقفان متعارضان" },
                { "إفادات": [2, 3], "مستوى_التعارض": "متوسط", "تعليق": "اختلاف في المدة" }
            ]
        }))
        .unwrap();

        assert_eq!(parsed.contradictions.len(), 2);
        assert_eq!(parsed.contradictions[0].severity, ExtractedSeverity::Severe);
        assert_eq!(parsed.contradictions[1].severity, ExtractedSeverity::Moderate);
        assert_eq!(parsed.contradictions[1].statements, vec![2, 3]);
    }

    #[test]
    fn test_string_indices_are_rejected() {
        let result: Result<ExtractedContradictions, _> = serde_json::from_value(json!({
            "contradictions": [
                { "statements": ["1", "2"], "severity": "severe", "comment": "conflict" }
            ]
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_severity_maps_to_domain() {
        assert_eq!(Severity::from(ExtractedSeverity::Severe), Severity::Severe);
        assert_eq!(Severity::from(ExtractedSeverity::Moderate), Severity::Moderate);
    }
}
