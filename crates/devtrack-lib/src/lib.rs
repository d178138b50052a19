//! `devtrack-lib`: issue lifecycle, authorization and aggregation core.
//!
//! Projects own issues; an issue moves `open -> in_progress -> closed` and
//! every mutation is checked against project ownership, membership,
//! assignment and reporter predicates. Data lives in a [`DocumentStore`];
//! the bundled [`InMemoryStore`] persists to a JSONL file.
//!
//! # Quick Start
//!
//! ```no_run
//! use devtrack_lib::{InMemoryStore, NewIssue, Status, UserId, issues};
//! use devtrack_lib::projects::{self, NewProject};
//!
//! let mut store = InMemoryStore::open("path/to/.devtrack/store.jsonl").unwrap();
//! let olga = UserId::new("olga");
//!
//! let project = projects::create_project(
//!     &mut store,
//!     &olga,
//!     NewProject { name: "Tracker".into(), key: "TRK".into(), description: None },
//! )
//! .unwrap();
//!
//! let issue = issues::create_issue(
//!     &mut store,
//!     &project.id,
//!     &olga,
//!     NewIssue { title: "Login fails".into(), ..Default::default() },
//! )
//! .unwrap();
//!
//! issues::transition(&mut store, &issue.id, Status::InProgress, Some(&olga)).unwrap();
//!
//! store.save().unwrap();
//! ```

pub mod error;
pub mod guard;
pub mod issues;
pub mod jsonl;
pub mod lifecycle;
pub mod membership;
pub mod metrics;
pub mod model;
pub mod projects;
pub mod query;
pub mod store;
pub mod util;
pub mod validation;

pub use error::{DevTrackError, Result};
pub use issues::{Assignment, NewIssue, StatusChange};
pub use metrics::DashboardMetrics;
pub use model::{Issue, IssueId, Priority, Project, ProjectId, Status, UserId};
pub use query::{IssuePage, ListFilters, PageRequest};
pub use store::{DocumentStore, InMemoryStore};
