//! Type-safe identifiers for thoughts and resources.
//!
//! # Invariants
//! - Identifiers wrap a random v4 UUID and are never nil.
//! - Equality and hashing depend only on the wrapped UUID.

use crate::model::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "Uuid", into = "Uuid")]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID, rejecting the nil value.
            pub fn from_uuid(value: Uuid) -> Result<Self, ModelError> {
                if value.is_nil() {
                    return Err(ModelError::InvalidId(value.to_string()));
                }
                Ok(Self(value))
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let parsed = Uuid::parse_str(value.trim())
                    .map_err(|_| ModelError::InvalidId(value.to_string()))?;
                Self::from_uuid(parsed)
            }
        }

        impl TryFrom<Uuid> for $name {
            type Error = ModelError;

            fn try_from(value: Uuid) -> Result<Self, Self::Error> {
                Self::from_uuid(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

entity_id!(
    /// Stable identifier of a captured thought.
    ThoughtId
);

entity_id!(
    /// Stable identifier of a synthesized resource.
    ResourceId
);
