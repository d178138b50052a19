//! Error types for `devtrack-lib`.
//!
//! Every failure the lifecycle and authorization layer can produce is a
//! distinct variant so callers can map it to a response without string
//! matching.

use std::path::PathBuf;
use thiserror::Error;

use crate::model::Status;

/// Primary error type for devtrack-lib operations.
#[derive(Error, Debug)]
pub enum DevTrackError {
    // === Lookup Errors ===
    /// Issue with the specified ID was not found.
    #[error("Issue not found: {id}")]
    IssueNotFound { id: String },

    /// Project with the specified ID was not found.
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    // === Policy Errors ===
    /// The actor is not allowed to perform the action.
    #[error("Forbidden: {actor} may not {action}")]
    Forbidden { actor: String, action: String },

    /// Requested status is not reachable from the current status.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: Status, to: Status },

    /// Assignment target is not a member of the owning project.
    #[error("Assignee must be a project member: {assignee}")]
    AssigneeNotMember { assignee: String },

    /// The record changed since it was read.
    #[error("Version conflict on {id}: expected {expected}, found {found}")]
    VersionConflict {
        id: String,
        expected: u64,
        found: u64,
    },

    /// A project with this key already exists.
    #[error("Duplicate project key: {key}")]
    DuplicateKey { key: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// Invalid status value.
    #[error("Invalid status: {status}")]
    InvalidStatus { status: String },

    /// Invalid priority value.
    #[error("Invalid priority: {priority}")]
    InvalidPriority { priority: String },

    // === Storage Errors ===
    /// Failed to parse a line in the JSONL file.
    #[error("JSONL parse error at line {line}: {reason}")]
    JsonlParse { line: usize, reason: String },

    /// Generic storage error.
    #[error("Storage error: {0}")]
    Storage(String),

    /// File not found at the specified path.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// No `.devtrack` workspace was found.
    #[error("Not initialized: run 'dt init' first")]
    NotInitialized,

    /// Workspace already exists at the given path.
    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    // === Configuration Errors ===
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl DevTrackError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn forbidden(actor: impl Into<String>, action: impl Into<String>) -> Self {
        Self::Forbidden {
            actor: actor.into(),
            action: action.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::IssueNotFound { .. } => "NOT_FOUND",
            Self::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::AssigneeNotMember { .. } => "ASSIGNEE_NOT_MEMBER",
            Self::VersionConflict { .. } => "VERSION_CONFLICT",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
            Self::Validation { .. }
            | Self::ValidationErrors { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidPriority { .. } => "VALIDATION_ERROR",
            Self::NotInitialized | Self::AlreadyInitialized { .. } => "WORKSPACE_ERROR",
            Self::JsonlParse { .. }
            | Self::Storage(_)
            | Self::FileNotFound(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status a web front end should answer with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::IssueNotFound { .. } | Self::ProjectNotFound { .. } => 404,
            Self::Forbidden { .. } | Self::AssigneeNotMember { .. } => 403,
            Self::VersionConflict { .. }
            | Self::DuplicateKey { .. }
            | Self::AlreadyInitialized { .. } => 409,
            Self::InvalidTransition { .. }
            | Self::Validation { .. }
            | Self::ValidationErrors { .. }
            | Self::InvalidStatus { .. }
            | Self::InvalidPriority { .. }
            | Self::NotInitialized => 400,
            Self::JsonlParse { .. }
            | Self::Storage(_)
            | Self::FileNotFound(_)
            | Self::Config(_)
            | Self::Io(_)
            | Self::Json(_) => 500,
        }
    }
}

/// Result type using `DevTrackError`.
pub type Result<T> = std::result::Result<T, DevTrackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinguishable() {
        let errors = [
            DevTrackError::IssueNotFound { id: "x".into() },
            DevTrackError::ProjectNotFound { id: "x".into() },
            DevTrackError::forbidden("u", "view"),
            DevTrackError::InvalidTransition {
                from: Status::Open,
                to: Status::Closed,
            },
            DevTrackError::AssigneeNotMember {
                assignee: "u".into(),
            },
        ];
        let codes: std::collections::HashSet<&str> = errors.iter().map(DevTrackError::code).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(DevTrackError::IssueNotFound { id: "i".into() }.http_status(), 404);
        assert_eq!(DevTrackError::forbidden("u", "assign").http_status(), 403);
        assert_eq!(
            DevTrackError::InvalidTransition {
                from: Status::Closed,
                to: Status::Archived,
            }
            .http_status(),
            400
        );
        assert_eq!(
            DevTrackError::AssigneeNotMember {
                assignee: "u".into()
            }
            .http_status(),
            403
        );
    }

    #[test]
    fn test_single_validation_error_collapses() {
        let err = DevTrackError::from_validation_errors(vec![ValidationError::new(
            "title",
            "cannot be empty",
        )]);
        assert!(matches!(err, DevTrackError::Validation { ref field, .. } if field == "title"));
    }
}
