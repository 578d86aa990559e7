//! Host attributes and task placement constraints.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ModelError;

/// A named set of values reported by a host (e.g. `rack`, `pool`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub values: BTreeSet<String>,
}

impl Attribute {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Requires (or with `negated`, forbids) overlap with a set of values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueConstraint {
    #[serde(default)]
    pub negated: bool,
    pub values: BTreeSet<String>,
}

/// Caps how many instances of a job may share one attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LimitConstraint {
    pub limit: u32,
}

/// Constraint body as it arrives from job configuration.
///
/// Exactly one of `value` and `limit` is expected to be set. Use
/// [`TaskConstraint::kind`] to get at the populated case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskConstraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueConstraint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<LimitConstraint>,
}

/// The populated case of a [`TaskConstraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind<'a> {
    Value(&'a ValueConstraint),
    Limit(&'a LimitConstraint),
}

impl TaskConstraint {
    pub fn value<I, S>(negated: bool, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value: Some(ValueConstraint {
                negated,
                values: values.into_iter().map(Into::into).collect(),
            }),
            limit: None,
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self {
            value: None,
            limit: Some(LimitConstraint { limit }),
        }
    }

    /// Projects the union into its single populated case.
    ///
    /// `name` is only used to label the error.
    pub fn kind(&self, name: &str) -> Result<ConstraintKind<'_>, ModelError> {
        match (&self.value, &self.limit) {
            (Some(value), None) => Ok(ConstraintKind::Value(value)),
            (None, Some(limit)) => Ok(ConstraintKind::Limit(limit)),
            (Some(_), Some(_)) => Err(ModelError::MalformedConstraint {
                name: name.to_string(),
                detail: "both value and limit are set".to_string(),
            }),
            (None, None) => Err(ModelError::MalformedConstraint {
                name: name.to_string(),
                detail: "neither value nor limit is set".to_string(),
            }),
        }
    }
}

/// A placement constraint on the host attribute called `name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constraint {
    pub name: String,
    pub constraint: TaskConstraint,
}

impl Constraint {
    pub fn new(name: impl Into<String>, constraint: TaskConstraint) -> Self {
        Self {
            name: name.into(),
            constraint,
        }
    }

    /// Shorthand for [`TaskConstraint::kind`] labelled with this constraint's name.
    pub fn kind(&self) -> Result<ConstraintKind<'_>, ModelError> {
        self.constraint.kind(&self.name)
    }
}
