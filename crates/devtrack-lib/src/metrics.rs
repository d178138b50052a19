//! Dashboard metrics across a user's projects.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::model::{ProjectId, Status, UserId};
use crate::store::{DocumentStore, StatusCount};

/// Aggregated issue and project counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_issues: usize,
    pub open: usize,
    pub in_progress: usize,
    /// Closed issues.
    pub done: usize,
    pub archived: usize,
    /// Projects with at least one open or in-progress issue.
    pub projects_in_progress: usize,
    /// Projects with no active issues and at least one closed issue.
    pub projects_done: usize,
}

#[derive(Default)]
struct ProjectRollup {
    active: usize,
    closed: usize,
}

impl DashboardMetrics {
    /// Fold grouped status counts into totals and per-project rollups.
    #[must_use]
    pub fn from_counts(counts: &[StatusCount]) -> Self {
        let mut metrics = Self::default();
        let mut rollups: HashMap<&ProjectId, ProjectRollup> = HashMap::new();

        for group in counts {
            metrics.total_issues += group.count;
            match group.status {
                Status::Open => metrics.open += group.count,
                Status::InProgress => metrics.in_progress += group.count,
                Status::Closed => metrics.done += group.count,
                Status::Archived => metrics.archived += group.count,
            }

            let rollup = rollups.entry(&group.project).or_default();
            if group.status.is_active() {
                rollup.active += group.count;
            } else if group.status == Status::Closed {
                rollup.closed += group.count;
            }
        }

        for rollup in rollups.values() {
            if rollup.active > 0 {
                metrics.projects_in_progress += 1;
            } else if rollup.closed > 0 {
                metrics.projects_done += 1;
            }
        }

        metrics
    }
}

/// Metrics over every project the user owns or belongs to.
///
/// A user with no projects gets all-zero metrics.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn dashboard_metrics(store: &impl DocumentStore, user: &UserId) -> Result<DashboardMetrics> {
    let projects: Vec<ProjectId> = store
        .find_projects_for_user(user)?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if projects.is_empty() {
        debug!(%user, "no projects, empty dashboard");
        return Ok(DashboardMetrics::default());
    }

    let counts = store.status_counts(&projects)?;
    let metrics = DashboardMetrics::from_counts(&counts);
    debug!(%user, projects = projects.len(), total = metrics.total_issues, "dashboard computed");
    Ok(metrics)
}
