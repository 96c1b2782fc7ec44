//! Shared types and pure business logic for Metrify
//!
//! This crate contains the parts of the system that do no I/O: the domain
//! models mirroring the persisted schema, the profitability consolidation
//! function, the tabular import contract, and input normalization helpers.

pub mod consolidation;
pub mod import;
pub mod models;
pub mod validation;

pub use consolidation::*;
pub use import::*;
pub use models::*;
pub use validation::*;
