//! Thought entity and its processing state machine.
//!
//! # Responsibility
//! - Hold one captured thought awaiting classification.
//! - Own the processing-status lifecycle (see [`ProcessingStatus`]).
//!
//! # Invariants
//! - `title` is never blank for a thought built through `new`/`restore`.
//! - `processed == true` exactly when status is `Completed` or `Skipped`.
//! - Transitions never mutate in place: each returns a new `Thought` and an
//!   illegal transition fails before producing anything.

use crate::model::content::{ContentText, DEFAULT_TRUNCATION_SUFFIX};
use crate::model::error::{ModelError, ModelResult, TransitionError};
use crate::model::ids::ThoughtId;
use crate::model::status::ProcessingStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional user-provided categorization hints.
///
/// Blank hints are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryHints {
    pub project_tag: Option<String>,
    pub area_tag: Option<String>,
}

impl CategoryHints {
    pub fn new(project_tag: Option<String>, area_tag: Option<String>) -> Self {
        Self {
            project_tag: non_blank(project_tag),
            area_tag: non_blank(area_tag),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.project_tag.is_none() && self.area_tag.is_none()
    }
}

/// Captured unit of free text awaiting classification.
///
/// All fields are read-only; every change produces a new `Thought` through a
/// transition method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThoughtRecord", into = "ThoughtRecord")]
pub struct Thought {
    id: ThoughtId,
    title: String,
    content: ContentText,
    created_at: DateTime<Utc>,
    processed: bool,
    status: ProcessingStatus,
    project_tag: Option<String>,
    area_tag: Option<String>,
}

impl Thought {
    /// Creates a new `Pending` thought with a generated ID.
    pub fn new(title: impl Into<String>, content: impl Into<ContentText>) -> ModelResult<Self> {
        Self::with_hints(title, content, CategoryHints::default())
    }

    /// Creates a new `Pending` thought carrying user hints.
    pub fn with_hints(
        title: impl Into<String>,
        content: impl Into<ContentText>,
        hints: CategoryHints,
    ) -> ModelResult<Self> {
        let thought = Self {
            id: ThoughtId::generate(),
            title: title.into(),
            content: content.into(),
            created_at: Utc::now(),
            processed: false,
            status: ProcessingStatus::Pending,
            project_tag: hints.project_tag,
            area_tag: hints.area_tag,
        };
        thought.validate()?;
        Ok(thought)
    }

    /// Rebuilds a thought from stored parts.
    ///
    /// Used by persistence adapters where identity already exists.
    pub fn restore(
        id: ThoughtId,
        title: impl Into<String>,
        content: impl Into<ContentText>,
        created_at: DateTime<Utc>,
        processed: bool,
        status: ProcessingStatus,
        hints: CategoryHints,
    ) -> ModelResult<Self> {
        let thought = Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at,
            processed,
            status,
            project_tag: hints.project_tag,
            area_tag: hints.area_tag,
        };
        thought.validate()?;
        Ok(thought)
    }

    /// Checks entity invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `InconsistentProcessedFlag` when `processed` disagrees with status.
    pub fn validate(&self) -> ModelResult<()> {
        if self.title.trim().is_empty() {
            return Err(ModelError::EmptyTitle);
        }
        if self.processed != processed_for(self.status) {
            return Err(ModelError::InconsistentProcessedFlag {
                status: self.status,
                processed: self.processed,
            });
        }
        Ok(())
    }

    pub fn id(&self) -> ThoughtId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &ContentText {
        &self.content
    }

    /// Free-text project hint supplied by the user, as captured.
    pub fn project_tag(&self) -> Option<&str> {
        self.project_tag.as_deref()
    }

    /// Free-text area hint supplied by the user, as captured.
    pub fn area_tag(&self) -> Option<&str> {
        self.area_tag.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn processed(&self) -> bool {
        self.processed
    }

    pub fn status(&self) -> ProcessingStatus {
        self.status
    }

    /// Applies one status transition and returns the resulting thought.
    ///
    /// # Errors
    /// - `TransitionError::Status` when the move is not in the table.
    pub fn transition(&self, target: ProcessingStatus) -> Result<Self, TransitionError> {
        if !self.status.can_transition_to(target) {
            return Err(TransitionError::Status {
                from: self.status,
                to: target,
            });
        }
        Ok(self.with_status(target))
    }

    pub fn mark_processing(&self) -> Result<Self, TransitionError> {
        self.transition(ProcessingStatus::Processing)
    }

    pub fn mark_completed(&self) -> Result<Self, TransitionError> {
        self.transition(ProcessingStatus::Completed)
    }

    pub fn mark_failed(&self) -> Result<Self, TransitionError> {
        self.transition(ProcessingStatus::Failed)
    }

    pub fn mark_skipped(&self) -> Result<Self, TransitionError> {
        self.transition(ProcessingStatus::Skipped)
    }

    /// Re-arms a failed thought as `Pending` for another processing attempt.
    pub fn reset_for_retry(&self) -> Result<Self, TransitionError> {
        if self.status != ProcessingStatus::Failed {
            return Err(TransitionError::Status {
                from: self.status,
                to: ProcessingStatus::Pending,
            });
        }
        Ok(self.with_status(ProcessingStatus::Pending))
    }

    pub fn hints(&self) -> CategoryHints {
        CategoryHints::new(self.project_tag.clone(), self.area_tag.clone())
    }

    pub fn has_user_tags(&self) -> bool {
        !self.hints().is_empty()
    }

    pub fn content_preview(&self, max_chars: usize) -> String {
        self.content
            .truncated(max_chars, DEFAULT_TRUNCATION_SUFFIX)
            .into_inner()
    }

    /// Bypasses validation so pipeline guards can be exercised.
    #[cfg(test)]
    pub(crate) fn with_unchecked_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    fn with_status(&self, status: ProcessingStatus) -> Self {
        Self {
            status,
            processed: processed_for(status),
            ..self.clone()
        }
    }
}

fn processed_for(status: ProcessingStatus) -> bool {
    matches!(
        status,
        ProcessingStatus::Completed | ProcessingStatus::Skipped
    )
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|tag| !tag.trim().is_empty())
}

#[derive(Serialize, Deserialize)]
struct ThoughtRecord {
    id: ThoughtId,
    title: String,
    content: ContentText,
    created_at: DateTime<Utc>,
    processed: bool,
    processing_status: ProcessingStatus,
    #[serde(default)]
    project_tag: Option<String>,
    #[serde(default)]
    area_tag: Option<String>,
}

impl TryFrom<ThoughtRecord> for Thought {
    type Error = ModelError;

    fn try_from(value: ThoughtRecord) -> Result<Self, Self::Error> {
        Self::restore(
            value.id,
            value.title,
            value.content,
            value.created_at,
            value.processed,
            value.processing_status,
            CategoryHints {
                project_tag: value.project_tag,
                area_tag: value.area_tag,
            },
        )
    }
}

impl From<Thought> for ThoughtRecord {
    fn from(value: Thought) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            created_at: value.created_at,
            processed: value.processed,
            processing_status: value.status,
            project_tag: value.project_tag,
            area_tag: value.area_tag,
        }
    }
}
