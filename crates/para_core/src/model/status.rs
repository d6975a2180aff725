//! Thought processing lifecycle states.

use crate::model::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Processing state of a thought.
///
/// `Pending -> Processing -> {Completed, Failed}`, `Failed -> Processing`
/// for retries, and `Pending -> Skipped` for short-circuited input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Skipped,
}

impl ProcessingStatus {
    pub const ALL: [ProcessingStatus; 5] = [
        Self::Pending,
        Self::Processing,
        Self::Completed,
        Self::Failed,
        Self::Skipped,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }

    pub fn can_transition_to(self, target: ProcessingStatus) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Skipped)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Failed)
                | (Self::Failed, Self::Processing)
        )
    }

    /// Terminal states have no outgoing transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }

    /// Whether a thought in this state may (re)enter processing.
    pub fn accepts_processing(self) -> bool {
        matches!(self, Self::Pending | Self::Failed)
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "skipped" => Ok(Self::Skipped),
            _ => Err(ModelError::UnknownStatus(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ProcessingStatus;

    #[test]
    fn terminal_states_have_no_outgoing_transitions() {
        for from in [ProcessingStatus::Completed, ProcessingStatus::Skipped] {
            assert!(from.is_terminal());
            for to in ProcessingStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be illegal");
            }
        }
    }

    #[test]
    fn failed_can_retry_into_processing_only() {
        for to in ProcessingStatus::ALL {
            assert_eq!(
                ProcessingStatus::Failed.can_transition_to(to),
                to == ProcessingStatus::Processing
            );
        }
    }

    #[test]
    fn parses_display_form() {
        for status in ProcessingStatus::ALL {
            let parsed: ProcessingStatus = status.to_string().parse().expect("status parse");
            assert_eq!(parsed, status);
        }
        "done"
            .parse::<ProcessingStatus>()
            .expect_err("unknown status must fail");
    }
}
