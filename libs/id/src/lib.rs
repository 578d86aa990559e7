//! # berth-id
//!
//! Task and job identifiers for the berth scheduling core.
//!
//! ## Design Principles
//!
//! - Task IDs are opaque lookup keys; nothing is inferred from their contents
//! - Job keys have a canonical string form with strict parsing
//! - Both roundtrip through serde as plain strings
//!
//! ## Formats
//!
//! - `JobKey`: `{role}/{environment}/{name}`, e.g. `www-data/prod/hello`
//! - `TaskId`: any non-empty string without whitespace. Generated IDs follow
//!   `{role}-{environment}-{name}-{instance}-{uuid}`.

mod error;
mod types;

pub use error::IdError;
pub use types::*;
