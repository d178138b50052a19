//! Command implementations.
//!
//! Each command opens the store, runs one core operation as the resolved
//! actor, saves if anything changed, then prints the result.

pub mod completions;
pub mod dashboard;
pub mod init;
pub mod issue;
pub mod project;
