//! Output mode selection.
//!
//! Commands print through an [`OutputContext`] so JSON mode stays a single
//! document on stdout while diagnostics go to stderr.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Where and how command results are printed.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    mode: OutputMode,
    quiet: bool,
}

impl OutputContext {
    #[must_use]
    pub const fn new(json: bool, quiet: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode, quiet }
    }

    #[must_use]
    pub const fn mode(&self) -> OutputMode {
        self.mode
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.mode, OutputMode::Json)
    }

    /// Print a value as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn json<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a line of text unless quiet.
    pub fn line(&self, text: impl std::fmt::Display) {
        if !self.quiet {
            println!("{text}");
        }
    }
}
