use serde::{Deserialize, Serialize};

/// Why a host was rejected for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VetoType {
    /// A value constraint did not match the host's attribute values.
    ConstraintMismatch,
    /// A limit constraint is exceeded, or cannot be checked on this host.
    UnsatisfiedLimit,
}

/// A negative placement verdict for one (task, host, constraint).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Veto {
    pub veto_type: VetoType,
    pub constraint_name: String,
}

impl Veto {
    pub fn constraint_mismatch(constraint_name: impl Into<String>) -> Self {
        Self {
            veto_type: VetoType::ConstraintMismatch,
            constraint_name: constraint_name.into(),
        }
    }

    pub fn unsatisfied_limit(constraint_name: impl Into<String>) -> Self {
        Self {
            veto_type: VetoType::UnsatisfiedLimit,
            constraint_name: constraint_name.into(),
        }
    }

    /// Human-readable explanation, suitable for surfacing to job owners.
    pub fn reason(&self) -> String {
        match self.veto_type {
            VetoType::ConstraintMismatch => {
                format!("Constraint not satisfied: {}", self.constraint_name)
            }
            VetoType::UnsatisfiedLimit => format!("Limit not satisfied: {}", self.constraint_name),
        }
    }
}

impl std::fmt::Display for Veto {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.reason())
    }
}
