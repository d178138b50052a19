//! Issue operations: create, view, list, status transition, assignment.
//!
//! Every operation resolves the owning project, applies the guard, then
//! reads or writes through the [`DocumentStore`]. Each mutation is one
//! read-modify-write; a concurrent writer surfaces as `VersionConflict`.

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{DevTrackError, Result};
use crate::guard::{Action, authorize};
use crate::lifecycle::check_transition;
use crate::model::{Issue, IssueId, Priority, Project, ProjectId, Status, UserId};
use crate::query::{IssuePage, IssueQuery, ListFilters, PageRequest};
use crate::store::DocumentStore;
use crate::validation::IssueValidator;

/// Fields for filing a new issue.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// Requested assignees; non-members are dropped.
    pub assignees: Vec<UserId>,
}

/// Result of a status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    pub id: IssueId,
    pub status: Status,
}

/// Result of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub id: IssueId,
    pub assignees: Vec<UserId>,
}

fn load_issue(store: &impl DocumentStore, id: &IssueId) -> Result<Issue> {
    store
        .find_issue(id)?
        .ok_or_else(|| DevTrackError::IssueNotFound { id: id.to_string() })
}

fn load_project(store: &impl DocumentStore, id: &ProjectId) -> Result<Project> {
    store
        .find_project(id)?
        .ok_or_else(|| DevTrackError::ProjectNotFound { id: id.to_string() })
}

/// File a new issue in `project_id` on behalf of `reporter`.
///
/// Requested assignees that are not project members are silently dropped,
/// as are duplicates.
///
/// # Errors
///
/// Returns `ProjectNotFound`, `Forbidden` if the reporter is neither owner
/// nor member, or a validation error for a blank or oversized title.
pub fn create_issue(
    store: &mut impl DocumentStore,
    project_id: &ProjectId,
    reporter: &UserId,
    new_issue: NewIssue,
) -> Result<Issue> {
    let project = load_project(store, project_id)?;
    authorize(Action::FileIssue, Some(&project), None, reporter)?;
    IssueValidator::validate(&new_issue.title, new_issue.description.as_deref())?;

    let mut assignees: Vec<UserId> = Vec::new();
    for candidate in new_issue.assignees {
        if project.members.contains(&candidate) && !assignees.contains(&candidate) {
            assignees.push(candidate);
        } else {
            debug!(assignee = %candidate, project = %project.id, "dropping requested assignee");
        }
    }

    let now = chrono::Utc::now();
    let issue = Issue {
        id: IssueId::new(""),
        title: new_issue.title.trim().to_string(),
        description: new_issue.description,
        status: Status::Open,
        priority: new_issue.priority.unwrap_or_default(),
        project: project.id.clone(),
        reporter: reporter.clone(),
        assignees,
        created_at: now,
        updated_at: now,
        version: 0,
    };

    let created = store.create_issue(&issue)?;
    info!(issue = %created.id, project = %project.id, reporter = %reporter, "issue created");
    Ok(created)
}

/// Fetch an issue the actor is allowed to see.
///
/// # Errors
///
/// Returns `IssueNotFound`, `ProjectNotFound`, or `Forbidden` unless the
/// actor is the project owner or a member.
pub fn view(store: &impl DocumentStore, issue_id: &IssueId, actor: &UserId) -> Result<Issue> {
    let issue = load_issue(store, issue_id)?;
    let project = load_project(store, &issue.project)?;
    authorize(Action::View, Some(&project), Some(&issue), actor)?;
    Ok(issue)
}

/// One page of a project's issues, newest first.
///
/// Callers check project access first; listing itself does not authorize.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list(
    store: &impl DocumentStore,
    project_id: &ProjectId,
    filters: ListFilters,
    page: PageRequest,
) -> Result<IssuePage> {
    let page = page.resolve();
    let query = IssueQuery::new(project_id.clone(), filters);

    let items = store.find_issues(&query, page.offset(), page.limit)?;
    let total = store.count_issues(&query)?;

    debug!(project = %project_id, total, page = page.page, limit = page.limit, "listed issues");
    Ok(IssuePage {
        items,
        total,
        page: page.page,
        limit: page.limit,
    })
}

/// Move an issue to `requested` along the transition table.
///
/// With `actor` supplied, only the project owner or a current assignee may
/// transition. Without an actor the caller has already authorized.
///
/// # Errors
///
/// Returns `IssueNotFound`, `InvalidTransition`, `Forbidden`, or
/// `VersionConflict` if the issue changed underneath.
pub fn transition(
    store: &mut impl DocumentStore,
    issue_id: &IssueId,
    requested: Status,
    actor: Option<&UserId>,
) -> Result<StatusChange> {
    let mut issue = load_issue(store, issue_id)?;
    let current = issue.status;
    check_transition(current, requested)?;

    if let Some(actor) = actor {
        let project = store.find_project(&issue.project)?;
        authorize(Action::ChangeStatus, project.as_ref(), Some(&issue), actor)?;
    }

    issue.status = requested;
    let saved = store.save_issue(&issue)?;
    info!(issue = %saved.id, from = %current, to = %requested, "status changed");

    Ok(StatusChange {
        id: saved.id,
        status: saved.status,
    })
}

/// Add `assignee` to an issue's assignee set.
///
/// Assigning someone already present is a no-op that returns the current
/// set without writing.
///
/// # Errors
///
/// Returns `IssueNotFound`, `ProjectNotFound`, `Forbidden` unless the actor
/// is the project owner or the issue's reporter, `AssigneeNotMember` if the
/// assignee is not in the project's member list, or `VersionConflict`.
pub fn assign(
    store: &mut impl DocumentStore,
    issue_id: &IssueId,
    assignee: &UserId,
    actor: &UserId,
) -> Result<Assignment> {
    let mut issue = load_issue(store, issue_id)?;
    let project = load_project(store, &issue.project)?;
    authorize(Action::Assign, Some(&project), Some(&issue), actor)?;

    if !project.members.contains(assignee) {
        return Err(DevTrackError::AssigneeNotMember {
            assignee: assignee.to_string(),
        });
    }

    if issue.is_assigned_to(assignee) {
        debug!(issue = %issue.id, %assignee, "already assigned");
        return Ok(Assignment {
            id: issue.id,
            assignees: issue.assignees,
        });
    }

    issue.assignees.push(assignee.clone());
    let saved = store.save_issue(&issue)?;
    info!(issue = %saved.id, %assignee, by = %actor, "issue assigned");

    Ok(Assignment {
        id: saved.id,
        assignees: saved.assignees,
    })
}
