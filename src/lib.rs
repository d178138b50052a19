//! `devtrack` - command-line front end for `devtrack-lib`.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Workspace discovery and configuration
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - Tracing subscriber setup
//! - [`output`] - Output mode selection
//!
//! The lifecycle, authorization and storage core lives in `devtrack-lib`.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod output;

pub use devtrack_lib::{error, model};
pub use error::{DevTrackError, Result};
