//! Core data types for devtrack-lib.
//!
//! Identities are newtypes over their canonical string form so that two
//! spellings of the same id compare equal everywhere.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DevTrackError;

/// Canonical form of an identity: trimmed, ASCII lowercase.
#[must_use]
pub fn canonical_id(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

macro_rules! identity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(raw: impl AsRef<str>) -> Self {
                Self(canonical_id(raw.as_ref()))
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self::new(raw)
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::new(raw)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

identity!(
    /// Reference to a user, supplied by the upstream identity resolver.
    UserId
);
identity!(
    /// Project identity.
    ProjectId
);
identity!(
    /// Issue identity.
    IssueId
);

/// Issue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
    Archived,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::Open, Self::InProgress, Self::Closed, Self::Archived];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
            Self::Archived => "archived",
        }
    }

    /// Status counts as outstanding work.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Open | Self::InProgress)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DevTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "in-progress" | "inprogress" => Ok(Self::InProgress),
            "closed" => Ok(Self::Closed),
            "archived" => Ok(Self::Archived),
            other => Err(DevTrackError::InvalidStatus {
                status: other.to_string(),
            }),
        }
    }
}

/// Issue priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DevTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(DevTrackError::InvalidPriority {
                priority: other.to_string(),
            }),
        }
    }
}

/// A project groups issues and defines who may touch them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: ProjectId,

    pub name: String,

    /// Short uppercase code (2-10 chars, A-Z0-9).
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Always authorized, whether or not listed in `members`.
    pub owner: UserId,

    #[serde(default)]
    pub members: BTreeSet<UserId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Bumped by the store on every save.
    #[serde(default)]
    pub version: u64,
}

/// The primary issue entity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub id: IssueId,

    /// Title (1-500 chars).
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Status,

    #[serde(default)]
    pub priority: Priority,

    /// Owning project. Never changes after creation.
    pub project: ProjectId,

    /// Creating user. Never changes after creation.
    pub reporter: UserId,

    /// Insertion ordered, no duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assignees: Vec<UserId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub version: u64,
}

impl Issue {
    #[must_use]
    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        self.assignees.contains(user)
    }
}
