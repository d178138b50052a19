//! Project operations: create, add member, list for a user, fetch.

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::error::{DevTrackError, Result};
use crate::guard::{Action, authorize};
use crate::model::{Project, ProjectId, UserId};
use crate::store::DocumentStore;
use crate::validation::ProjectValidator;

/// Fields for a new project.
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    pub name: String,
    /// Short uppercase key, also the issue ID prefix.
    pub key: String,
    pub description: Option<String>,
}

/// Create a project owned by `owner`. The member list starts empty.
///
/// # Errors
///
/// Returns a validation error for a blank name or malformed key, or
/// `DuplicateKey` if another project uses the key.
pub fn create_project(
    store: &mut impl DocumentStore,
    owner: &UserId,
    new_project: NewProject,
) -> Result<Project> {
    let key = new_project.key.trim().to_string();
    ProjectValidator::validate(&new_project.name, &key)?;

    let now = chrono::Utc::now();
    let project = Project {
        id: ProjectId::new(""),
        name: new_project.name.trim().to_string(),
        key,
        description: new_project.description.filter(|d| !d.trim().is_empty()),
        owner: owner.clone(),
        members: BTreeSet::new(),
        created_at: now,
        updated_at: now,
        version: 0,
    };

    let created = store.create_project(&project)?;
    info!(project = %created.id, key = %created.key, %owner, "project created");
    Ok(created)
}

/// Add `member` to a project. Only the owner may do this.
///
/// # Errors
///
/// Returns `ProjectNotFound`, `Forbidden`, or `VersionConflict`.
pub fn add_member(
    store: &mut impl DocumentStore,
    project_id: &ProjectId,
    actor: &UserId,
    member: &UserId,
) -> Result<Project> {
    let mut project = store
        .find_project(project_id)?
        .ok_or_else(|| DevTrackError::ProjectNotFound {
            id: project_id.to_string(),
        })?;
    authorize(Action::ManageMembers, Some(&project), None, actor)?;

    if member.is_empty() {
        return Err(DevTrackError::validation("member", "cannot be empty"));
    }
    if !project.members.insert(member.clone()) {
        debug!(project = %project.id, %member, "already a member");
        return Ok(project);
    }

    let saved = store.save_project(&project)?;
    info!(project = %saved.id, %member, "member added");
    Ok(saved)
}

/// Projects the user owns or belongs to, ordered by name.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn projects_for_user(store: &impl DocumentStore, user: &UserId) -> Result<Vec<Project>> {
    let mut projects = store.find_projects_for_user(user)?;
    projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.key.cmp(&b.key)));
    Ok(projects)
}

/// Fetch a project the actor may view.
///
/// # Errors
///
/// Returns `ProjectNotFound`, or `Forbidden` unless the actor is the owner
/// or a member.
pub fn get_project(store: &impl DocumentStore, project_id: &ProjectId, actor: &UserId) -> Result<Project> {
    let project = store
        .find_project(project_id)?
        .ok_or_else(|| DevTrackError::ProjectNotFound {
            id: project_id.to_string(),
        })?;
    authorize(Action::View, Some(&project), None, actor)?;
    Ok(project)
}

/// Resolve a project by ID or by key, then apply the view check.
///
/// Keys are matched case-insensitively.
///
/// # Errors
///
/// Same as [`get_project`].
pub fn resolve_project(store: &impl DocumentStore, id_or_key: &str, actor: &UserId) -> Result<Project> {
    let by_key = store.find_project_by_key(&id_or_key.trim().to_ascii_uppercase())?;
    let id = by_key.map_or_else(|| ProjectId::new(id_or_key), |p| p.id);
    get_project(store, &id, actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn user(name: &str) -> UserId {
        UserId::new(name)
    }

    fn new_project(name: &str, key: &str) -> NewProject {
        NewProject {
            name: name.to_string(),
            key: key.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_create_project() {
        let mut store = InMemoryStore::new();
        let project = create_project(&mut store, &user("Olga"), new_project("Tracker", "TRK")).unwrap();
        assert_eq!(project.owner, user("olga"));
        assert!(project.members.is_empty());
        assert_eq!(project.key, "TRK");
        assert_eq!(project.version, 0);
    }

    #[test]
    fn test_create_project_validation() {
        let mut store = InMemoryStore::new();
        let err = create_project(&mut store, &user("olga"), new_project("", "trk")).unwrap_err();
        assert!(matches!(err, DevTrackError::ValidationErrors { .. }));
        assert_eq!(store.project_count(), 0);
    }

    #[test]
    fn test_duplicate_key() {
        let mut store = InMemoryStore::new();
        create_project(&mut store, &user("olga"), new_project("Tracker", "TRK")).unwrap();
        let err = create_project(&mut store, &user("mike"), new_project("Other", "TRK")).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_KEY");
        assert_eq!(err.http_status(), 409);
    }

    #[test]
    fn test_add_member_owner_only() {
        let mut store = InMemoryStore::new();
        let project = create_project(&mut store, &user("olga"), new_project("Tracker", "TRK")).unwrap();

        let updated = add_member(&mut store, &project.id, &user("olga"), &user("mike")).unwrap();
        assert!(updated.members.contains(&user("mike")));
        assert_eq!(updated.version, 1);

        // members cannot add members
        let err = add_member(&mut store, &project.id, &user("mike"), &user("mona")).unwrap_err();
        assert!(matches!(err, DevTrackError::Forbidden { .. }));
    }

    #[test]
    fn test_add_existing_member_is_noop() {
        let mut store = InMemoryStore::new();
        let project = create_project(&mut store, &user("olga"), new_project("Tracker", "TRK")).unwrap();
        add_member(&mut store, &project.id, &user("olga"), &user("mike")).unwrap();
        let again = add_member(&mut store, &project.id, &user("olga"), &user("MIKE")).unwrap();
        assert_eq!(again.members.len(), 1);
        assert_eq!(again.version, 1);
    }

    #[test]
    fn test_add_member_missing_project() {
        let mut store = InMemoryStore::new();
        let err = add_member(&mut store, &ProjectId::new("prj-none"), &user("olga"), &user("mike")).unwrap_err();
        assert!(matches!(err, DevTrackError::ProjectNotFound { .. }));
    }

    #[test]
    fn test_projects_for_user_sorted_by_name() {
        let mut store = InMemoryStore::new();
        create_project(&mut store, &user("olga"), new_project("Zeta", "ZET")).unwrap();
        let alpha = create_project(&mut store, &user("mike"), new_project("Alpha", "ALP")).unwrap();
        create_project(&mut store, &user("mike"), new_project("Hidden", "HID")).unwrap();
        add_member(&mut store, &alpha.id, &user("mike"), &user("olga")).unwrap();

        let names: Vec<String> = projects_for_user(&store, &user("olga"))
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn test_get_project_access() {
        let mut store = InMemoryStore::new();
        let project = create_project(&mut store, &user("olga"), new_project("Tracker", "TRK")).unwrap();
        add_member(&mut store, &project.id, &user("olga"), &user("mike")).unwrap();

        assert!(get_project(&store, &project.id, &user("olga")).is_ok());
        assert!(get_project(&store, &project.id, &user("mike")).is_ok());
        let err = get_project(&store, &project.id, &user("ursula")).unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[test]
    fn test_resolve_by_key_or_id() {
        let mut store = InMemoryStore::new();
        let project = create_project(&mut store, &user("olga"), new_project("Tracker", "TRK")).unwrap();

        assert_eq!(resolve_project(&store, "trk", &user("olga")).unwrap().id, project.id);
        assert_eq!(resolve_project(&store, project.id.as_str(), &user("olga")).unwrap().id, project.id);
        let err = resolve_project(&store, "NOPE", &user("olga")).unwrap_err();
        assert!(matches!(err, DevTrackError::ProjectNotFound { .. }));
    }
}
