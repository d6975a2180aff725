//! Validation and transition errors shared by the domain model.
//!
//! # Invariants
//! - `TransitionError` always names both the source and the target state.
//! - Model errors never carry thought/resource content, only metadata.

use crate::model::category::ParaCategory;
use crate::model::status::ProcessingStatus;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ModelResult<T> = Result<T, ModelError>;

/// Illegal lifecycle move attempted on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    Status {
        from: ProcessingStatus,
        to: ProcessingStatus,
    },
    Category {
        from: ParaCategory,
        to: ParaCategory,
    },
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { from, to } => {
                write!(f, "cannot transition status from {from} to {to}")
            }
            Self::Category { from, to } => write!(
                f,
                "cannot transition category from {from} to {to}; check PARA transition rules"
            ),
        }
    }
}

impl Error for TransitionError {}

/// Domain validation error for entities and value objects.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Categorization reasoning is empty or whitespace-only.
    EmptyReasoning,
    /// Confidence score outside `[0.0, 1.0]` (or NaN).
    ConfidenceOutOfRange(f64),
    /// Tag does not match the normalized tag pattern.
    InvalidTag(String),
    /// Identifier text is not a valid non-nil UUID.
    InvalidId(String),
    UnknownStatus(String),
    UnknownCategory(String),
    /// `processed` flag disagrees with the stored status.
    InconsistentProcessedFlag {
        status: ProcessingStatus,
        processed: bool,
    },
    /// `updated_at` is earlier than `created_at`.
    UpdatedBeforeCreated,
    /// Archived resources cannot carry a deadline in the future.
    ArchivedWithFutureDeadline,
    Transition(TransitionError),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::EmptyReasoning => write!(f, "reasoning cannot be empty"),
            Self::ConfidenceOutOfRange(value) => {
                write!(f, "confidence must be between 0.0 and 1.0, got {value}")
            }
            Self::InvalidTag(tag) => write!(
                f,
                "invalid tag format: `{tag}`; tags must be alphanumeric with hyphens/underscores only"
            ),
            Self::InvalidId(value) => write!(f, "invalid identifier: `{value}`"),
            Self::UnknownStatus(value) => write!(
                f,
                "invalid processing status: `{value}`; valid statuses are: pending, processing, completed, failed, skipped"
            ),
            Self::UnknownCategory(value) => write!(
                f,
                "invalid PARA category: `{value}`; valid categories are: project, area, resource, archive"
            ),
            Self::InconsistentProcessedFlag { status, processed } => write!(
                f,
                "processed flag `{processed}` is inconsistent with status `{status}`"
            ),
            Self::UpdatedBeforeCreated => write!(f, "updated date cannot be before created date"),
            Self::ArchivedWithFutureDeadline => {
                write!(f, "archived resources cannot have future deadlines")
            }
            Self::Transition(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ModelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transition(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransitionError> for ModelError {
    fn from(value: TransitionError) -> Self {
        Self::Transition(value)
    }
}
