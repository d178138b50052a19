use devtrack_lib::membership::Membership;
use serde::Serialize;

use crate::error::DevTrackError;
use crate::model::{Project, UserId};

/// Project with the viewer's membership, for `project show`.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub viewer: UserId,
    pub membership: Membership,
}

impl ProjectDetails {
    #[must_use]
    pub fn new(project: Project, viewer: UserId) -> Self {
        let membership = Membership::of(&project, &viewer);
        Self {
            project,
            viewer,
            membership,
        }
    }
}

/// Body of a JSON error report.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

/// JSON error envelope: `{"error":{"code":..,"message":..}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
    pub error: ErrorBody,
}

impl ErrorOutput {
    #[must_use]
    pub fn from_error(err: &DevTrackError) -> Self {
        Self {
            error: ErrorBody {
                code: err.code(),
                message: err.to_string(),
            },
        }
    }

    /// Errors that did not come from the core (argument parsing, I/O at the
    /// edge) report as internal.
    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        err.downcast_ref::<DevTrackError>().map_or_else(
            || Self {
                error: ErrorBody {
                    code: "INTERNAL_ERROR",
                    message: format!("{err:#}"),
                },
            },
            Self::from_error,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectId, Status};
    use chrono::Utc;

    #[test]
    fn test_error_envelope() {
        let err = DevTrackError::InvalidTransition {
            from: Status::Closed,
            to: Status::Open,
        };
        let json = serde_json::to_value(ErrorOutput::from_error(&err)).unwrap();
        assert_eq!(json["error"]["code"], "INVALID_TRANSITION");
        assert_eq!(json["error"]["message"], "Invalid status transition: closed -> open");
    }

    #[test]
    fn test_anyhow_downcast() {
        let err = anyhow::Error::new(DevTrackError::IssueNotFound { id: "trk-x".into() });
        assert_eq!(ErrorOutput::from_anyhow(&err).error.code, "NOT_FOUND");

        let other = anyhow::anyhow!("boom");
        assert_eq!(ErrorOutput::from_anyhow(&other).error.code, "INTERNAL_ERROR");
    }

    #[test]
    fn test_project_details_flattened() {
        let now = Utc::now();
        let project = Project {
            id: ProjectId::new("prj-abcd"),
            name: "Tracker".into(),
            key: "TRK".into(),
            description: None,
            owner: UserId::new("olga"),
            members: [UserId::new("mike")].into_iter().collect(),
            created_at: now,
            updated_at: now,
            version: 0,
        };
        let json = serde_json::to_value(ProjectDetails::new(project, UserId::new("mike"))).unwrap();
        assert_eq!(json["key"], "TRK");
        assert_eq!(json["viewer"], "mike");
        assert_eq!(json["membership"]["isOwner"], false);
        assert_eq!(json["membership"]["isMember"], true);
        assert_eq!(json["membership"]["isAuthorized"], true);
    }
}
