//! PARA categorizer port and the baseline keyword categorizer.
//!
//! # Responsibility
//! - Define the classification contract the processing pipeline depends on.
//! - Provide a deterministic keyword-matching baseline implementation.
//!
//! # Invariants
//! - Categorizers are stateless across calls; the same input yields the same
//!   result.
//! - Batch classification is order-preserving with one result per input.
//! - User hints always dominate keyword matches; the project hint wins over
//!   the area hint.

use crate::model::categorization::CategorizationResult;
use crate::model::category::ParaCategory;
use crate::model::error::ModelError;
use crate::model::thought::{CategoryHints, Thought};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Keywords hinting at bounded, outcome-driven work.
pub const PROJECT_KEYWORDS: &[&str] = &[
    "deadline",
    "due",
    "complete by",
    "finish",
    "deliver",
    "project",
    "goal",
    "milestone",
    "task",
    "todo",
];

/// Keywords hinting at ongoing responsibilities.
pub const AREA_KEYWORDS: &[&str] = &[
    "maintain",
    "ongoing",
    "responsibility",
    "regular",
    "daily",
    "weekly",
    "routine",
    "habit",
];

const KEYWORD_CONFIDENCE: f64 = 0.4;

pub type CategorizerResult<T> = Result<T, CategorizerError>;

/// Optional caller context forwarded to categorizers.
///
/// The keyword baseline ignores it; model-backed categorizers may use it for
/// personalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserContext {
    entries: BTreeMap<String, String>,
}

impl UserContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Failure reported by a categorizer backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CategorizerError {
    /// Backend could not be reached or timed out.
    Unavailable(String),
    /// Backend answered with something unusable.
    InvalidOutput(String),
    /// Backend answer violated result invariants.
    Model(ModelError),
}

impl Display for CategorizerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(details) => write!(f, "categorizer unavailable: {details}"),
            Self::InvalidOutput(details) => write!(f, "invalid categorizer output: {details}"),
            Self::Model(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CategorizerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for CategorizerError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

/// Classification contract consumed by the processing pipeline.
///
/// Implementations must not share mutable state between calls.
pub trait Categorizer {
    /// Classifies raw title/content with optional user hints.
    fn classify_content(
        &self,
        title: &str,
        content: &str,
        hints: &CategoryHints,
        context: Option<&UserContext>,
    ) -> CategorizerResult<CategorizationResult>;

    /// Classifies one thought using its own text and hints.
    fn classify(
        &self,
        thought: &Thought,
        context: Option<&UserContext>,
    ) -> CategorizerResult<CategorizationResult> {
        self.classify_content(
            thought.title(),
            thought.content().as_str(),
            &thought.hints(),
            context,
        )
    }

    /// Classifies each thought independently, preserving input order.
    fn classify_batch(
        &self,
        thoughts: &[Thought],
        context: Option<&UserContext>,
    ) -> Vec<CategorizerResult<CategorizationResult>> {
        thoughts
            .iter()
            .map(|thought| self.classify(thought, context))
            .collect()
    }
}

impl<C: Categorizer + ?Sized> Categorizer for &C {
    fn classify_content(
        &self,
        title: &str,
        content: &str,
        hints: &CategoryHints,
        context: Option<&UserContext>,
    ) -> CategorizerResult<CategorizationResult> {
        (**self).classify_content(title, content, hints, context)
    }
}

/// Deterministic keyword-matching categorizer.
///
/// Placeholder for a model-backed classifier; decisions follow a strict
/// priority chain: project hint, area hint, project keywords, area keywords,
/// then a low-confidence `Resource` fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordCategorizer;

impl KeywordCategorizer {
    pub fn new() -> Self {
        Self
    }
}

impl Categorizer for KeywordCategorizer {
    fn classify_content(
        &self,
        title: &str,
        content: &str,
        hints: &CategoryHints,
        _context: Option<&UserContext>,
    ) -> CategorizerResult<CategorizationResult> {
        let hints = CategoryHints::new(hints.project_tag.clone(), hints.area_tag.clone());

        if let Some(project_tag) = hints.project_tag {
            return Ok(CategorizationResult::confident(
                ParaCategory::Project,
                format!("User explicitly tagged as project: {project_tag}"),
                vec![project_tag],
            )?);
        }

        if let Some(area_tag) = hints.area_tag {
            return Ok(CategorizationResult::confident(
                ParaCategory::Area,
                format!("User explicitly tagged as area: {area_tag}"),
                vec![area_tag],
            )?);
        }

        let combined = format!("{title} {content}").to_lowercase();

        if let Some(keyword) = first_match(&combined, PROJECT_KEYWORDS) {
            return Ok(CategorizationResult::with_review(
                ParaCategory::Project,
                KEYWORD_CONFIDENCE,
                format!("Contains project-related keyword `{keyword}` (basic detection)"),
                vec![],
            )?);
        }

        if let Some(keyword) = first_match(&combined, AREA_KEYWORDS) {
            return Ok(CategorizationResult::with_review(
                ParaCategory::Area,
                KEYWORD_CONFIDENCE,
                format!("Contains area-related keyword `{keyword}` (basic detection)"),
                vec![],
            )?);
        }

        Ok(CategorizationResult::uncertain(
            ParaCategory::Resource,
            "Defaulted to RESOURCE category. More sophisticated analysis is needed \
             for accurate categorization of unstructured content.",
            vec![],
        )?)
    }
}

fn first_match(text: &str, keywords: &[&'static str]) -> Option<&'static str> {
    keywords
        .iter()
        .copied()
        .find(|keyword| text.contains(keyword))
}
