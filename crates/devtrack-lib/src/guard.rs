//! Authorization guard.
//!
//! Each action is an OR over independent predicates on (project, issue,
//! actor). The guard never looks anything up; callers resolve the records
//! and report missing ones themselves.

use std::fmt;

use tracing::debug;

use crate::error::{DevTrackError, Result};
use crate::membership::{is_member, is_owner};
use crate::model::{Issue, Project, UserId};

/// Something an actor may attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read a project or one of its issues.
    View,
    /// Create an issue in a project.
    FileIssue,
    /// Move an issue along the status table.
    ChangeStatus,
    /// Add an assignee to an issue.
    Assign,
    /// Add members to a project.
    ManageMembers,
}

impl Action {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::FileIssue => "file issues in",
            Self::ChangeStatus => "change status of",
            Self::Assign => "assign",
            Self::ManageMembers => "manage members of",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn is_assignee(issue: &Issue, actor: &UserId) -> bool {
    issue.is_assigned_to(actor)
}

#[must_use]
pub fn is_reporter(issue: &Issue, actor: &UserId) -> bool {
    issue.reporter == *actor
}

/// Evaluate the rule for `action`.
///
/// A missing project makes the owner and member predicates false; a missing
/// issue makes the assignee and reporter predicates false.
#[must_use]
pub fn permits(
    action: Action,
    project: Option<&Project>,
    issue: Option<&Issue>,
    actor: &UserId,
) -> bool {
    let owner = project.is_some_and(|p| is_owner(p, actor));
    let member = || project.is_some_and(|p| is_member(p, actor));
    let assignee = || issue.is_some_and(|i| is_assignee(i, actor));
    let reporter = || issue.is_some_and(|i| is_reporter(i, actor));

    match action {
        Action::View | Action::FileIssue => owner || member(),
        Action::ChangeStatus => owner || assignee(),
        Action::Assign => owner || reporter(),
        Action::ManageMembers => owner,
    }
}

/// Require that `actor` may perform `action`.
///
/// # Errors
///
/// Returns `Forbidden` when the rule for `action` does not hold.
pub fn authorize(
    action: Action,
    project: Option<&Project>,
    issue: Option<&Issue>,
    actor: &UserId,
) -> Result<()> {
    if permits(action, project, issue, actor) {
        return Ok(());
    }

    let target = issue
        .map(|i| i.id.to_string())
        .or_else(|| project.map(|p| p.id.to_string()))
        .unwrap_or_default();
    debug!(%actor, %action, %target, "authorization denied");
    Err(DevTrackError::forbidden(
        actor.as_str(),
        format!("{action} {target}").trim_end().to_string(),
    ))
}
