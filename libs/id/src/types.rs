//! Typed identifiers for tasks and jobs.

use std::fmt;
use std::str::FromStr;

use crate::IdError;

// =============================================================================
// Job Key
// =============================================================================

/// Identifies a job: `{role}/{environment}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobKey {
    role: String,
    environment: String,
    name: String,
}

impl JobKey {
    /// Separator used in the canonical string form.
    pub const SEPARATOR: char = '/';

    /// Creates a job key, validating each component.
    pub fn new(
        role: impl Into<String>,
        environment: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, IdError> {
        let role = role.into();
        let environment = environment.into();
        let name = name.into();

        validate_component(&role)?;
        validate_component(&environment)?;
        validate_component(&name)?;

        Ok(Self {
            role,
            environment,
            name,
        })
    }

    /// Parses a job key from `role/environment/name`.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let mut parts = s.split(Self::SEPARATOR);
        let (Some(role), Some(environment), Some(name), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(IdError::InvalidFormat {
                message: format!("expected role/environment/name, got '{s}'"),
            });
        };

        Self::new(role, environment, name)
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

fn validate_component(component: &str) -> Result<(), IdError> {
    if component.is_empty() {
        return Err(IdError::Empty);
    }
    if let Some(found) = component
        .chars()
        .find(|c| *c == JobKey::SEPARATOR || c.is_whitespace())
    {
        return Err(IdError::InvalidCharacter {
            value: component.to_string(),
            found,
        });
    }
    Ok(())
}

impl fmt::Display for JobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.role, self.environment, self.name)
    }
}

impl FromStr for JobKey {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for JobKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for JobKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Task ID
// =============================================================================

/// Opaque identifier of one task incarnation.
///
/// A rescheduled task gets a fresh ID; the old one survives only as the new
/// task's ancestor reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(String);

impl TaskId {
    /// Parses a task ID. Rejects empty strings and whitespace.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if let Some(found) = s.chars().find(|c| c.is_whitespace()) {
            return Err(IdError::InvalidCharacter {
                value: s.to_string(),
                found,
            });
        }
        Ok(Self(s.to_string()))
    }

    /// Generates a fresh ID for an instance of `job`.
    #[must_use]
    pub fn generate(job: &JobKey, instance_id: u32) -> Self {
        Self(format!(
            "{}-{}-{}-{}-{}",
            job.role(),
            job.environment(),
            job.name(),
            instance_id,
            uuid::Uuid::new_v4()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
