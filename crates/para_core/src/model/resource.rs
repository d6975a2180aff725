//! Resource entity produced by successful thought processing.
//!
//! # Responsibility
//! - Hold the classified, tagged artifact derived from a thought.
//! - Enforce PARA business rules on every construction and edit.
//!
//! # Invariants
//! - `title` is never blank.
//! - `updated_at >= created_at`.
//! - An `Archive` resource never carries a deadline in the future.
//! - Edits return new instances with `updated_at` refreshed; category edits
//!   must follow [`ParaCategory::can_transition_to`].

use crate::model::category::ParaCategory;
use crate::model::content::{ContentText, DEFAULT_TRUNCATION_SUFFIX};
use crate::model::error::{ModelError, ModelResult};
use crate::model::ids::{ResourceId, ThoughtId};
use crate::model::tags::ResourceTags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const SECONDS_PER_DAY: i64 = 86_400;

/// Input for [`Resource::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    pub title: String,
    pub content: ContentText,
    pub category: ParaCategory,
    pub tags: ResourceTags,
    /// Originating thought, if any.
    pub source_thought: Option<ThoughtId>,
    pub deadline: Option<DateTime<Utc>>,
}

impl NewResource {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<ContentText>,
        category: ParaCategory,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category,
            tags: ResourceTags::empty(),
            source_thought: None,
            deadline: None,
        }
    }
}

/// Immutable classified artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ResourceRecord", into = "ResourceRecord")]
pub struct Resource {
    id: ResourceId,
    title: String,
    content: ContentText,
    category: ParaCategory,
    tags: ResourceTags,
    source_thought: Option<ThoughtId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deadline: Option<DateTime<Utc>>,
}

impl Resource {
    /// Creates a resource with a generated ID and `created_at = updated_at = now`.
    pub fn create(input: NewResource) -> ModelResult<Self> {
        let now = Utc::now();
        let resource = Self {
            id: ResourceId::generate(),
            title: input.title,
            content: input.content,
            category: input.category,
            tags: input.tags,
            source_thought: input.source_thought,
            created_at: now,
            updated_at: now,
            deadline: input.deadline,
        };
        resource.validate()?;
        Ok(resource)
    }

    /// Rebuilds a resource from stored parts.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ResourceId,
        title: impl Into<String>,
        content: impl Into<ContentText>,
        category: ParaCategory,
        tags: ResourceTags,
        source_thought: Option<ThoughtId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        deadline: Option<DateTime<Utc>>,
    ) -> ModelResult<Self> {
        let resource = Self {
            id,
            title: title.into(),
            content: content.into(),
            category,
            tags,
            source_thought,
            created_at,
            updated_at,
            deadline,
        };
        resource.validate()?;
        Ok(resource)
    }

    /// Checks PARA business rules against the current clock.
    pub fn validate(&self) -> ModelResult<()> {
        if self.title.trim().is_empty() {
            return Err(ModelError::EmptyTitle);
        }
        if self.updated_at < self.created_at {
            return Err(ModelError::UpdatedBeforeCreated);
        }
        ensure_deadline_allowed(self.category, self.deadline, Utc::now())
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &ContentText {
        &self.content
    }

    pub fn category(&self) -> ParaCategory {
        self.category
    }

    pub fn tags(&self) -> &ResourceTags {
        &self.tags
    }

    pub fn source_thought(&self) -> Option<ThoughtId> {
        self.source_thought
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.deadline
    }

    pub fn with_content(&self, content: impl Into<ContentText>) -> ModelResult<Self> {
        self.edited(|next| next.content = content.into())
    }

    /// Moves the resource to another category.
    ///
    /// # Errors
    /// - `Transition` when the PARA table forbids the move.
    /// - `ArchivedWithFutureDeadline` when archiving a resource whose deadline
    ///   is still ahead.
    pub fn with_category(&self, category: ParaCategory) -> ModelResult<Self> {
        let category = self.category.transition_to(category)?;
        self.edited(|next| next.category = category)
    }

    pub fn archive(&self) -> ModelResult<Self> {
        self.with_category(ParaCategory::Archive)
    }

    pub fn with_tag(&self, tag: &str) -> ModelResult<Self> {
        let tags = self.tags.add(tag)?;
        self.edited(|next| next.tags = tags)
    }

    pub fn without_tag(&self, tag: &str) -> ModelResult<Self> {
        let tags = self.tags.remove(tag);
        self.edited(|next| next.tags = tags)
    }

    /// Replaces the full tag set.
    pub fn with_tags<I, S>(&self, tags: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tags = ResourceTags::create(tags)?;
        self.edited(|next| next.tags = tags)
    }

    /// Sets or clears the deadline.
    pub fn with_deadline(&self, deadline: Option<DateTime<Utc>>) -> ModelResult<Self> {
        self.edited(|next| next.deadline = deadline)
    }

    pub fn is_active(&self) -> bool {
        self.category.is_active()
    }

    pub fn is_overdue(&self) -> bool {
        self.deadline.is_some_and(|deadline| deadline < Utc::now())
    }

    /// Whole days until the deadline, floored; negative once overdue.
    pub fn days_until_deadline(&self) -> Option<i64> {
        self.deadline.map(|deadline| {
            (deadline - Utc::now())
                .num_seconds()
                .div_euclid(SECONDS_PER_DAY)
        })
    }

    pub fn has_source_thought(&self) -> bool {
        self.source_thought.is_some()
    }

    pub fn content_preview(&self, max_chars: usize) -> String {
        self.content
            .truncated(max_chars, DEFAULT_TRUNCATION_SUFFIX)
            .into_inner()
    }

    fn edited(&self, apply: impl FnOnce(&mut Self)) -> ModelResult<Self> {
        let mut next = self.clone();
        apply(&mut next);
        next.updated_at = Utc::now().max(next.created_at);
        next.validate()?;
        Ok(next)
    }
}

fn ensure_deadline_allowed(
    category: ParaCategory,
    deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ModelResult<()> {
    match deadline {
        Some(deadline) if category == ParaCategory::Archive && deadline > now => {
            Err(ModelError::ArchivedWithFutureDeadline)
        }
        _ => Ok(()),
    }
}

#[derive(Serialize, Deserialize)]
struct ResourceRecord {
    id: ResourceId,
    title: String,
    content: ContentText,
    category: ParaCategory,
    #[serde(default)]
    tags: ResourceTags,
    #[serde(default)]
    source_thought: Option<ThoughtId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    deadline: Option<DateTime<Utc>>,
}

impl TryFrom<ResourceRecord> for Resource {
    type Error = ModelError;

    fn try_from(value: ResourceRecord) -> Result<Self, Self::Error> {
        Self::restore(
            value.id,
            value.title,
            value.content,
            value.category,
            value.tags,
            value.source_thought,
            value.created_at,
            value.updated_at,
            value.deadline,
        )
    }
}

impl From<Resource> for ResourceRecord {
    fn from(value: Resource) -> Self {
        Self {
            id: value.id,
            title: value.title,
            content: value.content,
            category: value.category,
            tags: value.tags,
            source_thought: value.source_thought,
            created_at: value.created_at,
            updated_at: value.updated_at,
            deadline: value.deadline,
        }
    }
}
