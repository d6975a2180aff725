//! Core domain logic for the PARA thought pipeline.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;

pub use config::{ConfigError, CoreConfig, LogLevel, LoggingConfig, ProcessingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    CategorizationResult, CategoryHints, ConfidenceLevel, ContentText, ModelError, ModelResult,
    NewResource, ParaCategory, ProcessingStatus, Resource, ResourceId, ResourceTags, Thought,
    ThoughtId, TransitionError,
};
pub use service::categorizer::{
    Categorizer, CategorizerError, CategorizerResult, KeywordCategorizer, UserContext,
};
pub use service::processing::{
    DuplicateCheck, NoDuplicateCheck, ProcessingError, ProcessingResult, ProcessingStatistics,
    ThoughtProcessor,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
