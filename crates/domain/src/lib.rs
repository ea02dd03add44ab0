//! Shared domain types for the rotomcoach workspace: the error type, the
//! configuration tree, conversation content shapes, and the generation
//! event union consumed by the response aggregator.

pub mod chat;
pub mod config;
pub mod error;
pub mod gen;
pub mod tier;

pub use error::{Error, Result};
pub use tier::ProficiencyTier;
