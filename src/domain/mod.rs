//! Domain layer for the pattern lifecycle
//!
//! This module contains the lifecycle state model, value types, the
//! candidate aggregate, and the ports it depends on.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainResult, PatternError};
