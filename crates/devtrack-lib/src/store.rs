//! Document store abstraction and its in-memory implementation.
//!
//! The lifecycle layer only talks to [`DocumentStore`]. [`InMemoryStore`]
//! keeps both collections in memory and persists them to a JSONL file.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{DevTrackError, Result};
use crate::jsonl;
use crate::model::{Issue, IssueId, Project, ProjectId, Status, UserId};
use crate::query::IssueQuery;
use crate::util::{PROJECT_ID_PREFIX, generate_id};

/// Issue count for one (project, status) group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub project: ProjectId,
    pub status: Status,
    pub count: usize,
}

/// Persistence operations over the Project and Issue collections.
///
/// `find_*` return copies. `save_*` write back a copy only if its `version`
/// still matches the stored record, then bump the version.
pub trait DocumentStore {
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_project(&self, id: &ProjectId) -> Result<Option<Project>>;

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_project_by_key(&self, key: &str) -> Result<Option<Project>>;

    /// Projects where `user` is the owner or a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_projects_for_user(&self, user: &UserId) -> Result<Vec<Project>>;

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_issue(&self, id: &IssueId) -> Result<Option<Issue>>;

    /// Matching issues, newest first, after skipping `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn find_issues(&self, query: &IssueQuery, offset: usize, limit: usize) -> Result<Vec<Issue>>;

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn count_issues(&self, query: &IssueQuery) -> Result<usize>;

    /// Issue counts grouped by (project, status) across `projects`.
    ///
    /// Groups with no issues are omitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn status_counts(&self, projects: &[ProjectId]) -> Result<Vec<StatusCount>>;

    /// Insert a project, generating its ID when empty.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if the key is taken.
    fn create_project(&mut self, project: &Project) -> Result<Project>;

    /// Insert an issue, generating its ID when empty.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` if the owning project is missing.
    fn create_issue(&mut self, issue: &Issue) -> Result<Issue>;

    /// # Errors
    ///
    /// Returns `ProjectNotFound` or `VersionConflict`.
    fn save_project(&mut self, project: &Project) -> Result<Project>;

    /// # Errors
    ///
    /// Returns `IssueNotFound` or `VersionConflict`.
    fn save_issue(&mut self, issue: &Issue) -> Result<Issue>;
}

/// In-memory document store.
///
/// All data lives in memory. Use `open()` to load from a JSONL file
/// and `save()` to persist back.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    projects: Vec<Project>,
    project_index: HashMap<ProjectId, usize>,
    issues: Vec<Issue>,
    issue_index: HashMap<IssueId, usize>,
    dirty_projects: HashSet<ProjectId>,
    dirty_issues: HashSet<IssueId>,
    /// Versions as last read from or written to the file.
    project_versions: HashMap<ProjectId, u64>,
    issue_versions: HashMap<IssueId, u64>,
    jsonl_path: Option<PathBuf>,
}

impl InMemoryStore {
    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open and load from a JSONL file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let loaded = jsonl::load(path)?;

        let records = loaded.projects.len() + loaded.issues.len();
        let mut store = Self::new();
        store.jsonl_path = Some(path.to_path_buf());
        for project in loaded.projects {
            store.insert_project(project);
        }
        for issue in loaded.issues {
            store.insert_issue(issue);
        }
        store.project_versions = store
            .projects
            .iter()
            .map(|p| (p.id.clone(), p.version))
            .collect();
        store.issue_versions = store
            .issues
            .iter()
            .map(|i| (i.id.clone(), i.version))
            .collect();

        let duplicates = records - store.projects.len() - store.issues.len();
        if duplicates > 0 {
            warn!(path = %path.display(), duplicates, "later records replaced earlier ones with the same ID");
        }
        debug!(
            path = %path.display(),
            projects = store.projects.len(),
            issues = store.issues.len(),
            "loaded store"
        );
        Ok(store)
    }

    /// Save to the file that was opened.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if no file path is set, or `Io` on write failure.
    pub fn save(&self) -> Result<()> {
        let path = self
            .jsonl_path
            .as_ref()
            .ok_or_else(|| DevTrackError::Storage("No file path set; use save_to()".to_string()))?;
        self.save_to(path)
    }

    /// Save to a specific file path.
    ///
    /// The file is re-read first. Records changed here are written over
    /// it; everything else keeps the file's copy, so records written by
    /// another store since this one loaded are preserved.
    ///
    /// # Errors
    ///
    /// Returns `VersionConflict` if a record changed here was also changed
    /// in the file, `DuplicateKey` if a project created here reuses a key
    /// created there, `JsonlParse` if the file is corrupt, or `Io` on
    /// write failure.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let on_disk = match jsonl::load(path) {
            Ok(loaded) => loaded,
            Err(DevTrackError::FileNotFound(_)) => jsonl::LoadedData::default(),
            Err(e) => return Err(e),
        };

        let mut merged = Self::new();
        for project in on_disk.projects {
            merged.insert_project(project);
        }
        for issue in on_disk.issues {
            merged.insert_issue(issue);
        }
        self.merge_projects_into(&mut merged)?;
        self.merge_issues_into(&mut merged)?;

        debug!(
            path = %path.display(),
            projects = merged.projects.len(),
            issues = merged.issues.len(),
            "writing store"
        );
        jsonl::save(path, &merged.projects, &merged.issues)
    }

    /// Check if any records have been modified.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.dirty_projects.is_empty() || !self.dirty_issues.is_empty()
    }

    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.dirty_projects.len() + self.dirty_issues.len()
    }

    /// Mark every change as persisted.
    pub fn clear_dirty(&mut self) {
        for id in self.dirty_projects.drain() {
            if let Some(&idx) = self.project_index.get(&id) {
                self.project_versions.insert(id, self.projects[idx].version);
            }
        }
        for id in self.dirty_issues.drain() {
            if let Some(&idx) = self.issue_index.get(&id) {
                self.issue_versions.insert(id, self.issues[idx].version);
            }
        }
    }

    #[must_use]
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    pub fn project_count(&self) -> usize {
        self.projects.len()
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Insert or replace by ID. A later record with the same ID wins.
    fn insert_project(&mut self, project: Project) {
        if let Some(&idx) = self.project_index.get(&project.id) {
            self.projects[idx] = project;
            return;
        }
        self.project_index
            .insert(project.id.clone(), self.projects.len());
        self.projects.push(project);
    }

    /// Insert or replace by ID. A later record with the same ID wins.
    fn insert_issue(&mut self, issue: Issue) {
        if let Some(&idx) = self.issue_index.get(&issue.id) {
            self.issues[idx] = issue;
            return;
        }
        self.issue_index.insert(issue.id.clone(), self.issues.len());
        self.issues.push(issue);
    }

    /// Overlay this store's projects onto `merged`, which holds the file.
    fn merge_projects_into(&self, merged: &mut Self) -> Result<()> {
        for project in &self.projects {
            let dirty = self.dirty_projects.contains(&project.id);
            let read_at = self.project_versions.get(&project.id).copied();
            match (merged.project(&project.id), read_at) {
                (Some(_), _) if !dirty => continue,
                (Some(theirs), Some(version)) if theirs.version != version => {
                    return Err(DevTrackError::VersionConflict {
                        id: project.id.to_string(),
                        expected: version,
                        found: theirs.version,
                    });
                }
                (Some(_), None) => {
                    return Err(DevTrackError::Storage(format!(
                        "Project ID collision: {}",
                        project.id
                    )));
                }
                _ => {}
            }
            if read_at.is_none()
                && merged
                    .projects
                    .iter()
                    .any(|p| p.key == project.key && p.id != project.id)
            {
                return Err(DevTrackError::DuplicateKey {
                    key: project.key.clone(),
                });
            }
            merged.insert_project(project.clone());
        }
        Ok(())
    }

    /// Overlay this store's issues onto `merged`, which holds the file.
    fn merge_issues_into(&self, merged: &mut Self) -> Result<()> {
        for issue in &self.issues {
            let dirty = self.dirty_issues.contains(&issue.id);
            let read_at = self.issue_versions.get(&issue.id).copied();
            match (merged.issue(&issue.id), read_at) {
                (Some(_), _) if !dirty => continue,
                (Some(theirs), Some(version)) if theirs.version != version => {
                    return Err(DevTrackError::VersionConflict {
                        id: issue.id.to_string(),
                        expected: version,
                        found: theirs.version,
                    });
                }
                (Some(_), None) => {
                    return Err(DevTrackError::Storage(format!(
                        "Issue ID collision: {}",
                        issue.id
                    )));
                }
                _ => {}
            }
            merged.insert_issue(issue.clone());
        }
        Ok(())
    }

    fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.project_index.get(id).map(|&idx| &self.projects[idx])
    }

    fn issue(&self, id: &IssueId) -> Option<&Issue> {
        self.issue_index.get(id).map(|&idx| &self.issues[idx])
    }

    /// Matching issues, newest created first; ties keep newest inserted first.
    fn matching_issues<'a>(&'a self, query: &'a IssueQuery) -> Vec<&'a Issue> {
        let mut matched: Vec<&Issue> = self
            .issues
            .iter()
            .rev()
            .filter(|issue| query.matches(issue))
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched
    }
}

impl DocumentStore for InMemoryStore {
    fn find_project(&self, id: &ProjectId) -> Result<Option<Project>> {
        Ok(self.project(id).cloned())
    }

    fn find_project_by_key(&self, key: &str) -> Result<Option<Project>> {
        Ok(self.projects.iter().find(|p| p.key == key).cloned())
    }

    fn find_projects_for_user(&self, user: &UserId) -> Result<Vec<Project>> {
        Ok(self
            .projects
            .iter()
            .filter(|p| p.owner == *user || p.members.contains(user))
            .cloned()
            .collect())
    }

    fn find_issue(&self, id: &IssueId) -> Result<Option<Issue>> {
        Ok(self.issue(id).cloned())
    }

    fn find_issues(&self, query: &IssueQuery, offset: usize, limit: usize) -> Result<Vec<Issue>> {
        Ok(self
            .matching_issues(query)
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    fn count_issues(&self, query: &IssueQuery) -> Result<usize> {
        Ok(self.issues.iter().filter(|issue| query.matches(issue)).count())
    }

    fn status_counts(&self, projects: &[ProjectId]) -> Result<Vec<StatusCount>> {
        let wanted: HashSet<&ProjectId> = projects.iter().collect();
        let mut groups: BTreeMap<(&ProjectId, Status), usize> = BTreeMap::new();
        for issue in self.issues.iter().filter(|i| wanted.contains(&i.project)) {
            *groups.entry((&issue.project, issue.status)).or_insert(0) += 1;
        }
        Ok(groups
            .into_iter()
            .map(|((project, status), count)| StatusCount {
                project: project.clone(),
                status,
                count,
            })
            .collect())
    }

    fn create_project(&mut self, project: &Project) -> Result<Project> {
        if self.projects.iter().any(|p| p.key == project.key) {
            return Err(DevTrackError::DuplicateKey {
                key: project.key.clone(),
            });
        }

        let mut new_project = project.clone();
        let now = Utc::now();

        if new_project.id.is_empty() {
            let generated = generate_id(
                PROJECT_ID_PREFIX,
                &new_project.key,
                new_project.owner.as_str(),
                now,
                self.projects.len(),
                |id| self.project_index.contains_key(&ProjectId::new(id)),
            );
            new_project.id = ProjectId::new(generated);
        } else if self.project_index.contains_key(&new_project.id) {
            return Err(DevTrackError::Storage(format!(
                "Project ID collision: {}",
                new_project.id
            )));
        }

        new_project.created_at = now;
        new_project.updated_at = now;
        new_project.version = 0;

        self.dirty_projects.insert(new_project.id.clone());
        self.insert_project(new_project.clone());
        Ok(new_project)
    }

    fn create_issue(&mut self, issue: &Issue) -> Result<Issue> {
        let prefix = self
            .project(&issue.project)
            .map(|p| p.key.to_ascii_lowercase())
            .ok_or_else(|| DevTrackError::ProjectNotFound {
                id: issue.project.to_string(),
            })?;

        let mut new_issue = issue.clone();
        let now = Utc::now();

        if new_issue.id.is_empty() {
            let generated = generate_id(
                &prefix,
                &new_issue.title,
                new_issue.reporter.as_str(),
                now,
                self.issues.len(),
                |id| self.issue_index.contains_key(&IssueId::new(id)),
            );
            new_issue.id = IssueId::new(generated);
        } else if self.issue_index.contains_key(&new_issue.id) {
            return Err(DevTrackError::Storage(format!(
                "Issue ID collision: {}",
                new_issue.id
            )));
        }

        new_issue.created_at = now;
        new_issue.updated_at = now;
        new_issue.version = 0;

        self.dirty_issues.insert(new_issue.id.clone());
        self.insert_issue(new_issue.clone());
        Ok(new_issue)
    }

    fn save_project(&mut self, project: &Project) -> Result<Project> {
        let idx = *self
            .project_index
            .get(&project.id)
            .ok_or_else(|| DevTrackError::ProjectNotFound {
                id: project.id.to_string(),
            })?;

        let stored = &mut self.projects[idx];
        if stored.version != project.version {
            return Err(DevTrackError::VersionConflict {
                id: project.id.to_string(),
                expected: project.version,
                found: stored.version,
            });
        }

        let mut updated = project.clone();
        updated.version = stored.version + 1;
        updated.updated_at = Utc::now();
        updated.created_at = stored.created_at;
        *stored = updated.clone();

        self.dirty_projects.insert(updated.id.clone());
        Ok(updated)
    }

    fn save_issue(&mut self, issue: &Issue) -> Result<Issue> {
        let idx = *self
            .issue_index
            .get(&issue.id)
            .ok_or_else(|| DevTrackError::IssueNotFound {
                id: issue.id.to_string(),
            })?;

        let stored = &mut self.issues[idx];
        if stored.version != issue.version {
            return Err(DevTrackError::VersionConflict {
                id: issue.id.to_string(),
                expected: issue.version,
                found: stored.version,
            });
        }

        let mut updated = issue.clone();
        updated.version = stored.version + 1;
        updated.updated_at = Utc::now();
        updated.created_at = stored.created_at;
        *stored = updated.clone();

        self.dirty_issues.insert(updated.id.clone());
        Ok(updated)
    }
}
