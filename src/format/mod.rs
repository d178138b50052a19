//! Output formatting for `devtrack`.
//!
//! Supports both human-readable text output and machine-parseable JSON.
//!
//! # JSON Output Types
//!
//! Most commands serialize core types directly. The wrappers here add
//! what the core does not carry:
//! - [`ProjectDetails`] - Project with the viewer's membership (project show)
//! - [`ErrorOutput`] - Error envelope printed on failure in JSON mode

mod output;
mod text;

pub use output::{ErrorBody, ErrorOutput, ProjectDetails};
pub use text::{
    format_dashboard, format_issue_line, format_priority, format_project_line, format_status_icon,
    pad_to_width, truncate_to_width,
};
