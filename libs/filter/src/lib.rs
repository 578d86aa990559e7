//! Placement constraint evaluation.
//!
//! Answers one question: does a single constraint veto a single host for a
//! task? Combining the answers for many constraints and many hosts is up to
//! the scheduling loop.
//!
//! - [`AttributeAggregate`]: how many instances of the job already sit on
//!   hosts carrying a given attribute value.
//! - [`matcher`]: value and limit checks against observed attribute values.
//! - [`veto`]: the per-constraint verdict.
//!
//! # Invariants
//!
//! - Evaluation is pure: inputs are borrowed immutably and nothing is cached
//! - A malformed constraint is an error, never a veto

mod aggregate;
mod constraint;
mod error;
pub mod matcher;

pub use aggregate::{AttributeAggregate, EmptyAggregate, JobAttributeAggregate};
pub use constraint::veto;
pub use error::FilterError;
