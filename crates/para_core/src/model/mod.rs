//! Domain model for the thought-to-resource pipeline.
//!
//! # Responsibility
//! - Define identifiers, value objects and the two entities (thought, resource).
//! - Keep every lifecycle move a pure function returning a new value.
//!
//! # Invariants
//! - Entities are never mutated in place by core code.
//! - Illegal lifecycle moves fail with [`TransitionError`] naming both states.

pub mod categorization;
pub mod category;
pub mod content;
pub mod error;
pub mod ids;
pub mod resource;
pub mod status;
pub mod tags;
pub mod thought;

pub use categorization::{CategorizationResult, ConfidenceLevel};
pub use category::ParaCategory;
pub use content::ContentText;
pub use error::{ModelError, ModelResult, TransitionError};
pub use ids::{ResourceId, ThoughtId};
pub use resource::{NewResource, Resource};
pub use status::ProcessingStatus;
pub use tags::ResourceTags;
pub use thought::{CategoryHints, Thought};
