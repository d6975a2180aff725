//! Core use-case services.
//!
//! # Responsibility
//! - Define the categorizer port and its keyword baseline.
//! - Orchestrate thought processing into resources.

pub mod categorizer;
pub mod processing;
