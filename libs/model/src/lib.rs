//! # berth-model
//!
//! Data model shared by the placement filter and the reschedule calculator.
//!
//! ## Design Principles
//!
//! - Task records are read-only snapshots owned by the surrounding store
//! - Ancestry is a lookup key (`ancestor_id`), never an object reference
//! - Constraint bodies keep their wire shape; callers project them into a
//!   two-case sum type before evaluation
//!
//! ## Types
//!
//! - Task lifecycle: [`ScheduleStatus`], [`TaskEvent`], [`TaskConfig`], [`TaskRecord`]
//! - Placement: [`Attribute`], [`Constraint`], [`TaskConstraint`], [`ConstraintKind`]
//! - Verdicts: [`Veto`], [`VetoType`]

mod constraint;
mod error;
mod status;
mod task;
mod veto;

pub use constraint::*;
pub use error::ModelError;
pub use status::ScheduleStatus;
pub use task::*;
pub use veto::{Veto, VetoType};
