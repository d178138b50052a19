//! Command-line interface for `devtrack`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::CliOverrides;
use crate::format::ErrorOutput;
use crate::logging;
use crate::output::OutputContext;

/// `devtrack` (dt) - project issue tracker.
#[derive(Parser, Debug)]
#[command(name = "dt")]
#[command(
    author,
    version,
    about = "Project issue tracker with owner/member/assignee authorization",
    long_about = None,
    after_help = "Data lives in .devtrack/store.jsonl; the acting user comes from --actor, DEVTRACK_ACTOR, the config file, or $USER."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Act as this user
    #[arg(long, global = true, value_name = "ID")]
    pub actor: Option<String>,

    /// Path to the JSONL store
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            actor: self.actor.clone(),
            store: self.store.clone(),
        }
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a devtrack workspace in the current directory
    Init(InitArgs),

    /// Manage projects
    Project(ProjectCommand),

    /// Manage issues
    Issue(IssueCommand),

    /// Issue and project totals across your projects
    Dashboard,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Reinitialize, replacing any existing store with an empty one
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ProjectCommand {
    /// Project subcommand
    #[command(subcommand)]
    pub command: ProjectSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProjectSubcommand {
    /// Create a project owned by you
    Create(ProjectCreateArgs),

    /// List projects you own or belong to
    List,

    /// Show a project
    Show {
        /// Project key or ID
        project: String,
    },

    /// Add a member (owner only)
    AddMember {
        /// Project key or ID
        project: String,
        /// User to add
        member: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct ProjectCreateArgs {
    /// Project name
    pub name: String,

    /// Short key (2-10 chars, A-Z0-9), used as the issue ID prefix
    #[arg(long, short = 'k')]
    pub key: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(Args, Debug)]
pub struct IssueCommand {
    /// Issue subcommand
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// File a new issue
    Create(IssueCreateArgs),

    /// List a project's issues, newest first
    List(IssueListArgs),

    /// Show issue details
    Show {
        /// Issue ID
        id: String,
    },

    /// Change an issue's status (open -> in_progress -> closed)
    Status {
        /// Issue ID
        id: String,
        /// Target status
        status: String,
    },

    /// Assign a project member to an issue
    Assign {
        /// Issue ID
        id: String,
        /// Member to assign
        assignee: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct IssueCreateArgs {
    /// Project key or ID
    pub project: String,

    /// Issue title
    pub title: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Priority: low, medium, high, critical
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Assignee (repeatable); non-members are ignored
    #[arg(long = "assignee", short = 'a')]
    pub assignees: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct IssueListArgs {
    /// Project key or ID
    pub project: String,

    /// Filter by status
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Filter by priority
    #[arg(long, short = 'p')]
    pub priority: Option<String>,

    /// Only issues assigned to this user
    #[arg(long, conflicts_with = "mine")]
    pub assigned_to: Option<String>,

    /// Only issues assigned to you
    #[arg(long)]
    pub mine: bool,

    /// Page number (1-based)
    #[arg(long, allow_negative_numbers = true)]
    pub page: Option<i64>,

    /// Page size (default 20, max 100)
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Run a parsed command line.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run(cli: Cli) -> Result<()> {
    logging::init_logging(cli.verbose, cli.quiet, cli.log_json)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let ctx = OutputContext::new(cli.json, cli.quiet);
    let overrides = cli.overrides();

    match cli.command {
        Commands::Init(args) => commands::init::execute(&args, &ctx)?,
        Commands::Project(project) => commands::project::execute(project.command, &overrides, &ctx)?,
        Commands::Issue(issue) => commands::issue::execute(issue.command, &overrides, &ctx)?,
        Commands::Dashboard => commands::dashboard::execute(&overrides, &ctx)?,
        Commands::Completions(args) => commands::completions::execute(&args),
    }

    Ok(())
}

/// Print a failed command's error: a JSON envelope on stdout in JSON mode,
/// otherwise a message on stderr.
pub fn report_error(err: &anyhow::Error, json: bool) {
    if json {
        match serde_json::to_string(&ErrorOutput::from_anyhow(err)) {
            Ok(payload) => println!("{payload}"),
            Err(_) => eprintln!("Error: {err:#}"),
        }
    } else {
        eprintln!("Error: {err:#}");
    }
}
