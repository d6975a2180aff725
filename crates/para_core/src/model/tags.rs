//! Normalized resource tag set.
//!
//! # Responsibility
//! - Normalize raw labels (trim + lowercase) and drop blanks.
//! - Enforce one tag shape for every stored member.
//!
//! # Invariants
//! - Every member matches `^[a-z0-9]([a-z0-9_-]*[a-z0-9])?$`.
//! - The set is deduplicated and iterates in sorted order.
//! - All operations return new sets; a `ResourceTags` is never mutated.

use crate::model::error::{ModelError, ModelResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([a-z0-9_-]*[a-z0-9])?$").expect("valid tag regex"));

/// Immutable, validated set of resource tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ResourceTags {
    tags: BTreeSet<String>,
}

impl ResourceTags {
    /// Builds a tag set from raw labels.
    ///
    /// Blank labels are dropped silently; any other label that does not
    /// match the tag shape after normalization is rejected.
    pub fn create<I, S>(tags: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized = BTreeSet::new();
        for tag in tags {
            if let Some(value) = normalize_tag(tag.as_ref()) {
                validate_tag(&value)?;
                normalized.insert(value);
            }
        }
        Ok(Self { tags: normalized })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a delimited list such as `"work,productivity,notes"`.
    pub fn from_delimited(text: &str, separator: char) -> ModelResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::empty());
        }
        Self::create(text.split(separator))
    }

    pub fn add(&self, tag: &str) -> ModelResult<Self> {
        let Some(value) = normalize_tag(tag) else {
            return Ok(self.clone());
        };
        validate_tag(&value)?;
        let mut tags = self.tags.clone();
        tags.insert(value);
        Ok(Self { tags })
    }

    pub fn remove(&self, tag: &str) -> Self {
        let mut tags = self.tags.clone();
        if let Some(value) = normalize_tag(tag) {
            tags.remove(&value);
        }
        Self { tags }
    }

    pub fn union(&self, other: &ResourceTags) -> Self {
        Self {
            tags: self.tags.union(&other.tags).cloned().collect(),
        }
    }

    /// Case- and whitespace-insensitive membership check.
    pub fn contains(&self, tag: &str) -> bool {
        normalize_tag(tag).is_some_and(|value| self.tags.contains(&value))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterates tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.iter().cloned().collect()
    }

    pub fn join(&self, separator: &str) -> String {
        self.to_vec().join(separator)
    }
}

impl Display for ResourceTags {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.join(", "))
    }
}

impl TryFrom<Vec<String>> for ResourceTags {
    type Error = ModelError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::create(value)
    }
}

impl From<ResourceTags> for Vec<String> {
    fn from(value: ResourceTags) -> Self {
        value.tags.into_iter().collect()
    }
}

/// Trims and lowercases one label; blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Returns whether an already-normalized label has a valid tag shape.
pub fn is_valid_tag(tag: &str) -> bool {
    TAG_RE.is_match(tag)
}

fn validate_tag(tag: &str) -> ModelResult<()> {
    if is_valid_tag(tag) {
        Ok(())
    } else {
        Err(ModelError::InvalidTag(tag.to_string()))
    }
}
