//! Free-text content value.
//!
//! # Invariants
//! - Content has no length ceiling; truncation only happens in derived
//!   display views and never mutates the stored value.
//! - Lengths and truncation are measured in `char`s, not bytes.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Suffix appended by [`ContentText::truncated`] when content is cut.
pub const DEFAULT_TRUNCATION_SUFFIX: &str = "...";

/// Immutable wrapper over unbounded thought/resource text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentText(String);

impl ContentText {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-only content counts as empty.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn stripped(&self) -> Self {
        Self(self.0.trim().to_string())
    }

    /// Returns a display copy cut to at most `max_chars` characters.
    ///
    /// When the content is cut, `suffix` is appended inside the budget. If the
    /// budget cannot even hold the suffix, the suffix itself is cut.
    pub fn truncated(&self, max_chars: usize, suffix: &str) -> Self {
        if self.len() <= max_chars {
            return self.clone();
        }

        let suffix_len = suffix.chars().count();
        if max_chars <= suffix_len {
            return Self(suffix.chars().take(max_chars).collect());
        }

        let mut cut: String = self.0.chars().take(max_chars - suffix_len).collect();
        cut.push_str(suffix);
        Self(cut)
    }

    pub fn contains_text(&self, needle: &str, case_sensitive: bool) -> bool {
        if case_sensitive {
            self.0.contains(needle)
        } else {
            self.0.to_lowercase().contains(&needle.to_lowercase())
        }
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ContentText {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ContentText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContentText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
