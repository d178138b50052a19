//! Text formatting functions for `devtrack`.
//!
//! Provides plain text (non-ANSI) formatting for terminal output:
//! - Status icons (○ ◐ ✓ ⊘)
//! - Priority badges ([low], [high], ...)
//! - Issue and project line formatting
//!
//! Widths are measured in terminal columns, so wide characters in titles
//! and names line up.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::model::{Issue, Priority, Project, Status};
use devtrack_lib::DashboardMetrics;

/// Widest title shown on a single issue line.
pub const MAX_TITLE_WIDTH: usize = 72;

/// Status icon characters.
pub mod icons {
    /// Open issue - nobody working on it yet (hollow circle).
    pub const OPEN: &str = "○";
    /// In progress - active work (half-filled).
    pub const IN_PROGRESS: &str = "◐";
    /// Closed - completed (checkmark).
    pub const CLOSED: &str = "✓";
    /// Archived - kept for history only.
    pub const ARCHIVED: &str = "⊘";
}

/// Return the icon character for a status.
#[must_use]
pub const fn format_status_icon(status: &Status) -> &'static str {
    match status {
        Status::Open => icons::OPEN,
        Status::InProgress => icons::IN_PROGRESS,
        Status::Closed => icons::CLOSED,
        Status::Archived => icons::ARCHIVED,
    }
}

/// Format priority as a bracketed badge.
#[must_use]
pub fn format_priority(priority: &Priority) -> String {
    format!("[{}]", priority.as_str())
}

/// Cut `text` to at most `max` columns, marking the cut with `…`.
#[must_use]
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Pad `text` with spaces to `width` columns.
#[must_use]
pub fn pad_to_width(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(pad))
}

/// Format a single-line issue summary.
///
/// Format: `{icon} {id} {priority} {title}`
#[must_use]
pub fn format_issue_line(issue: &Issue) -> String {
    let mut line = format!(
        "{} {} {} {}",
        format_status_icon(&issue.status),
        issue.id,
        format_priority(&issue.priority),
        truncate_to_width(&issue.title, MAX_TITLE_WIDTH),
    );
    if !issue.assignees.is_empty() {
        let names: Vec<&str> = issue.assignees.iter().map(|a| a.as_str()).collect();
        line.push_str(&format!(" @{}", names.join(",")));
    }
    line
}

/// Format a project row with the key padded to `key_width` columns.
#[must_use]
pub fn format_project_line(project: &Project, key_width: usize) -> String {
    format!(
        "{} {} (owner {}, {} member{})",
        pad_to_width(&project.key, key_width),
        project.name,
        project.owner,
        project.members.len(),
        if project.members.len() == 1 { "" } else { "s" },
    )
}

/// Format dashboard metrics as aligned `label  value` rows.
#[must_use]
pub fn format_dashboard(metrics: &DashboardMetrics) -> Vec<String> {
    let rows = [
        ("Total issues", metrics.total_issues),
        ("Open", metrics.open),
        ("In progress", metrics.in_progress),
        ("Done", metrics.done),
        ("Archived", metrics.archived),
        ("Projects in progress", metrics.projects_in_progress),
        ("Projects done", metrics.projects_done),
    ];
    let label_width = rows.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    rows.iter()
        .map(|(label, value)| format!("{}  {value}", pad_to_width(label, label_width)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IssueId, ProjectId, UserId};
    use chrono::Utc;

    fn make_test_issue() -> Issue {
        Issue {
            id: IssueId::new("trk-test"),
            title: "Test title".to_string(),
            description: None,
            status: Status::Open,
            priority: Priority::Medium,
            project: ProjectId::new("prj-test"),
            reporter: UserId::new("olga"),
            assignees: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn test_status_icons() {
        assert_eq!(format_status_icon(&Status::Open), "○");
        assert_eq!(format_status_icon(&Status::InProgress), "◐");
        assert_eq!(format_status_icon(&Status::Closed), "✓");
        assert_eq!(format_status_icon(&Status::Archived), "⊘");
    }

    #[test]
    fn test_format_priority() {
        assert_eq!(format_priority(&Priority::Critical), "[critical]");
        assert_eq!(format_priority(&Priority::Low), "[low]");
    }

    #[test]
    fn test_format_issue_line_open() {
        let issue = make_test_issue();
        assert_eq!(format_issue_line(&issue), "○ trk-test [medium] Test title");
    }

    #[test]
    fn test_format_issue_line_with_assignees() {
        let mut issue = make_test_issue();
        issue.status = Status::InProgress;
        issue.assignees = vec![UserId::new("mike"), UserId::new("mona")];
        let line = format_issue_line(&issue);
        assert!(line.starts_with("◐"));
        assert!(line.ends_with("@mike,mona"));
    }

    #[test]
    fn test_truncate_counts_columns() {
        assert_eq!(truncate_to_width("short", 10), "short");
        assert_eq!(truncate_to_width("abcdefghij", 5), "abcd…");
        // each CJK character is two columns wide
        let cut = truncate_to_width("漢字漢字漢字", 7);
        assert_eq!(cut, "漢字漢…");
        assert!(cut.width() <= 7);
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("TRK", 5), "TRK  ");
        assert_eq!(pad_to_width("漢", 4), "漢  ");
        assert_eq!(pad_to_width("TOOLONG", 3), "TOOLONG");
    }

    #[test]
    fn test_dashboard_rows_aligned() {
        let rows = format_dashboard(&DashboardMetrics {
            total_issues: 4,
            ..Default::default()
        });
        assert_eq!(rows.len(), 7);
        assert!(rows[0].starts_with("Total issues "));
        assert!(rows[0].ends_with("  4"));
        let value_column = rows[0].len() - 1;
        assert!(rows.iter().all(|r| r.len() - 1 == value_column));
    }
}
