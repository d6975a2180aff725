//! Categorization outcome value.
//!
//! # Invariants
//! - `confidence` lies in the closed interval `[0.0, 1.0]`.
//! - `reasoning` is never blank.

use crate::model::category::ParaCategory;
use crate::model::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Threshold used by [`CategorizationResult::is_confident`] callers by default.
pub const DEFAULT_CONFIDENT_THRESHOLD: f64 = 0.7;
/// Threshold used by [`CategorizationResult::should_auto_categorize`] callers by default.
pub const DEFAULT_AUTO_CATEGORIZE_THRESHOLD: f64 = 0.8;
/// Confidence assigned to fallback categorizations.
pub const UNCERTAIN_CONFIDENCE: f64 = 0.3;

/// Display bucket for a confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    #[serde(rename = "Very High")]
    VeryHigh,
    High,
    Medium,
    Low,
    #[serde(rename = "Very Low")]
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.9 {
            Self::VeryHigh
        } else if confidence >= 0.7 {
            Self::High
        } else if confidence >= 0.5 {
            Self::Medium
        } else if confidence >= 0.3 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryHigh => "Very High",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::VeryLow => "Very Low",
        }
    }
}

impl Display for ConfidenceLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Category decision with confidence and supporting metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CategorizationWire", into = "CategorizationWire")]
pub struct CategorizationResult {
    category: ParaCategory,
    confidence: f64,
    reasoning: String,
    suggested_tags: Vec<String>,
    requires_review: bool,
}

impl CategorizationResult {
    /// Creates a validated result.
    ///
    /// # Errors
    /// - `ConfidenceOutOfRange` when `confidence` is outside `[0, 1]` or NaN.
    /// - `EmptyReasoning` when `reasoning` is blank.
    pub fn new(
        category: ParaCategory,
        confidence: f64,
        reasoning: impl Into<String>,
        suggested_tags: Vec<String>,
        requires_review: bool,
    ) -> ModelResult<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ModelError::ConfidenceOutOfRange(confidence));
        }
        let reasoning = reasoning.into();
        if reasoning.trim().is_empty() {
            return Err(ModelError::EmptyReasoning);
        }

        Ok(Self {
            category,
            confidence,
            reasoning,
            suggested_tags,
            requires_review,
        })
    }

    /// Full-confidence result that needs no review.
    pub fn confident(
        category: ParaCategory,
        reasoning: impl Into<String>,
        suggested_tags: Vec<String>,
    ) -> ModelResult<Self> {
        Self::new(category, 1.0, reasoning, suggested_tags, false)
    }

    /// Low-confidence fallback result that always needs review.
    pub fn uncertain(
        category: ParaCategory,
        reasoning: impl Into<String>,
        suggested_tags: Vec<String>,
    ) -> ModelResult<Self> {
        Self::new(
            category,
            UNCERTAIN_CONFIDENCE,
            reasoning,
            suggested_tags,
            true,
        )
    }

    pub fn with_review(
        category: ParaCategory,
        confidence: f64,
        reasoning: impl Into<String>,
        suggested_tags: Vec<String>,
    ) -> ModelResult<Self> {
        Self::new(category, confidence, reasoning, suggested_tags, true)
    }

    pub fn category(&self) -> ParaCategory {
        self.category
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn suggested_tags(&self) -> &[String] {
        &self.suggested_tags
    }

    pub fn requires_review(&self) -> bool {
        self.requires_review
    }

    pub fn is_confident(&self, threshold: f64) -> bool {
        self.confidence >= threshold
    }

    /// High enough confidence and no review requested.
    pub fn should_auto_categorize(&self, threshold: f64) -> bool {
        self.confidence >= threshold && !self.requires_review
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }
}

#[derive(Serialize, Deserialize)]
struct CategorizationWire {
    category: ParaCategory,
    confidence: f64,
    reasoning: String,
    #[serde(default)]
    suggested_tags: Vec<String>,
    #[serde(default)]
    requires_review: bool,
    // Derived on output; ignored on input.
    #[serde(default, skip_deserializing)]
    confidence_level: Option<ConfidenceLevel>,
}

impl TryFrom<CategorizationWire> for CategorizationResult {
    type Error = ModelError;

    fn try_from(value: CategorizationWire) -> Result<Self, Self::Error> {
        Self::new(
            value.category,
            value.confidence,
            value.reasoning,
            value.suggested_tags,
            value.requires_review,
        )
    }
}

impl From<CategorizationResult> for CategorizationWire {
    fn from(value: CategorizationResult) -> Self {
        let confidence_level = Some(value.confidence_level());
        Self {
            category: value.category,
            confidence: value.confidence,
            reasoning: value.reasoning,
            suggested_tags: value.suggested_tags,
            requires_review: value.requires_review,
            confidence_level,
        }
    }
}
