//! Query, filter and pagination types for issue listing.

use serde::Serialize;

use crate::model::{Issue, Priority, ProjectId, Status, UserId};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;

/// Optional equality filters for listing a project's issues.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    /// Matches when the user is among the assignees.
    pub assigned_to: Option<UserId>,
}

/// Equality query handed to the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    pub project: ProjectId,
    pub filters: ListFilters,
}

impl IssueQuery {
    #[must_use]
    pub fn new(project: ProjectId, filters: ListFilters) -> Self {
        Self { project, filters }
    }

    #[must_use]
    pub fn matches(&self, issue: &Issue) -> bool {
        if issue.project != self.project {
            return false;
        }
        if let Some(status) = self.filters.status {
            if issue.status != status {
                return false;
            }
        }
        if let Some(priority) = self.filters.priority {
            if issue.priority != priority {
                return false;
            }
        }
        if let Some(ref assignee) = self.filters.assigned_to {
            if !issue.is_assigned_to(assignee) {
                return false;
            }
        }
        true
    }
}

/// Raw page request as it arrives from a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PageRequest {
    #[must_use]
    pub const fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self { page, limit }
    }

    /// Page and limit after defaults and clamping.
    ///
    /// Page is at least 1. Limit is at most 100; a missing or non-positive
    /// limit means the default of 20.
    #[must_use]
    pub fn resolve(&self) -> Page {
        let page = match self.page {
            Some(p) if p >= 1 => usize::try_from(p).unwrap_or(usize::MAX),
            _ => DEFAULT_PAGE,
        };
        let limit = match self.limit {
            Some(l) if l >= 1 => usize::try_from(l).unwrap_or(usize::MAX).min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        Page { page, limit }
    }
}

/// A resolved, clamped page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: usize,
    pub limit: usize,
}

impl Page {
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of matching issues plus the total count.
#[derive(Debug, Clone, Serialize)]
pub struct IssuePage {
    pub items: Vec<Issue>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let page = PageRequest::default().resolve();
        assert_eq!(page, Page { page: 1, limit: 20 });
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let page = PageRequest::new(None, Some(200)).resolve();
        assert_eq!(page.limit, 100);
    }

    #[test]
    fn test_page_clamped_to_one() {
        assert_eq!(PageRequest::new(Some(0), None).resolve().page, 1);
        assert_eq!(PageRequest::new(Some(-4), None).resolve().page, 1);
    }

    #[test]
    fn test_non_positive_limit_uses_default() {
        assert_eq!(PageRequest::new(None, Some(0)).resolve().limit, 20);
        assert_eq!(PageRequest::new(None, Some(-1)).resolve().limit, 20);
    }

    #[test]
    fn test_huge_values_do_not_wrap() {
        let page = PageRequest::new(Some(i64::MAX), Some(i64::MAX)).resolve();
        assert_eq!(page.limit, 100);
        assert!(page.page > 1);
        assert!(page.offset() >= page.limit);
    }

    #[test]
    fn test_offset() {
        let page = PageRequest::new(Some(3), Some(25)).resolve();
        assert_eq!(page.offset(), 50);
    }
}
