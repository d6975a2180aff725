//! PARA category and its transition table.

use crate::model::error::{ModelError, TransitionError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Four-way PARA organizational category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParaCategory {
    /// Bounded, outcome-driven work with a deadline.
    Project,
    /// Ongoing responsibility to maintain.
    Area,
    /// Topic of ongoing interest or reference material.
    Resource,
    /// Inactive item from any other category.
    Archive,
}

impl ParaCategory {
    pub const ALL: [ParaCategory; 4] = [Self::Project, Self::Area, Self::Resource, Self::Archive];

    /// Stable lowercase string id.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Area => "area",
            Self::Resource => "resource",
            Self::Archive => "archive",
        }
    }

    /// User-facing short description.
    pub fn description(self) -> &'static str {
        match self {
            Self::Project => "Things with a deadline and specific outcome",
            Self::Area => "Ongoing responsibilities to maintain",
            Self::Resource => "Topics of ongoing interest",
            Self::Archive => "Inactive items from other categories",
        }
    }

    /// Directional transition table. No category transitions to itself.
    pub fn can_transition_to(self, target: ParaCategory) -> bool {
        matches!(
            (self, target),
            (Self::Project, Self::Archive)
                | (Self::Project, Self::Area)
                | (Self::Area, Self::Archive)
                | (Self::Resource, Self::Archive)
                | (Self::Archive, Self::Project)
                | (Self::Archive, Self::Area)
                | (Self::Archive, Self::Resource)
        )
    }

    /// Returns `target` when the move is legal.
    pub fn transition_to(self, target: ParaCategory) -> Result<ParaCategory, TransitionError> {
        if self.can_transition_to(target) {
            Ok(target)
        } else {
            Err(TransitionError::Category {
                from: self,
                to: target,
            })
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::Archive
    }

    pub fn requires_deadline(self) -> bool {
        self == Self::Project
    }

    pub fn allows_indefinite_duration(self) -> bool {
        matches!(self, Self::Area | Self::Resource)
    }
}

impl Display for ParaCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParaCategory {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "area" => Ok(Self::Area),
            "resource" => Ok(Self::Resource),
            "archive" => Ok(Self::Archive),
            _ => Err(ModelError::UnknownCategory(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ParaCategory;
    use crate::model::error::TransitionError;

    #[test]
    fn transition_table_matches_para_rules() {
        use ParaCategory::*;
        let legal = [
            (Project, Archive),
            (Project, Area),
            (Area, Archive),
            (Resource, Archive),
            (Archive, Project),
            (Archive, Area),
            (Archive, Resource),
        ];

        for from in ParaCategory::ALL {
            for to in ParaCategory::ALL {
                let expected = legal.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "unexpected transition verdict {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn transition_to_names_source_and_target() {
        let err = ParaCategory::Area
            .transition_to(ParaCategory::Project)
            .expect_err("area -> project is illegal");
        assert_eq!(
            err,
            TransitionError::Category {
                from: ParaCategory::Area,
                to: ParaCategory::Project,
            }
        );
        assert!(err.to_string().contains("area"));
        assert!(err.to_string().contains("project"));
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(
            " PROJECT ".parse::<ParaCategory>().expect("project parse"),
            ParaCategory::Project
        );
        let err = "inbox"
            .parse::<ParaCategory>()
            .expect_err("unknown category must fail");
        assert!(err.to_string().contains("valid categories"));
    }

    #[test]
    fn only_archive_is_inactive() {
        assert!(ParaCategory::Project.is_active());
        assert!(ParaCategory::Area.is_active());
        assert!(ParaCategory::Resource.is_active());
        assert!(!ParaCategory::Archive.is_active());
        assert!(ParaCategory::Project.requires_deadline());
        assert!(ParaCategory::Area.allows_indefinite_duration());
        assert!(!ParaCategory::Archive.allows_indefinite_duration());
    }
}
