//! Issue command implementations.

use std::str::FromStr;

use crate::cli::{IssueCreateArgs, IssueListArgs, IssueSubcommand};
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{format_issue_line, format_priority, format_status_icon};
use crate::model::{Issue, IssueId, Priority, Status, UserId};
use crate::output::OutputContext;
use devtrack_lib::{IssuePage, ListFilters, NewIssue, PageRequest, issues, projects};

/// Execute an issue subcommand.
///
/// # Errors
///
/// Returns an error if arguments fail to parse, the store cannot be opened,
/// or the operation is rejected.
pub fn execute(command: IssueSubcommand, cli: &CliOverrides, ctx: &OutputContext) -> Result<()> {
    let mut store_ctx = config::open_store_with_cli(cli)?;
    let actor = store_ctx.actor.clone();

    match command {
        IssueSubcommand::Create(args) => {
            let project_id = projects::resolve_project(&store_ctx.store, &args.project, &actor)?.id;
            let new_issue = build_new_issue(args)?;
            let issue = issues::create_issue(&mut store_ctx.store, &project_id, &actor, new_issue)?;
            store_ctx.flush()?;
            if ctx.is_json() {
                ctx.json(&issue)?;
            } else {
                ctx.line(format!("Created {}: {}", issue.id, issue.title));
            }
        }
        IssueSubcommand::List(args) => {
            let project_id = projects::resolve_project(&store_ctx.store, &args.project, &actor)?.id;
            let filters = build_filters(&args, &actor)?;
            let page = issues::list(
                &store_ctx.store,
                &project_id,
                filters,
                PageRequest::new(args.page, args.limit),
            )?;
            if ctx.is_json() {
                ctx.json(&page)?;
            } else {
                print_page(&page);
            }
        }
        IssueSubcommand::Show { id } => {
            let issue = issues::view(&store_ctx.store, &IssueId::new(id), &actor)?;
            if ctx.is_json() {
                ctx.json(&issue)?;
            } else {
                print_issue(&issue);
            }
        }
        IssueSubcommand::Status { id, status } => {
            let requested = Status::from_str(&status)?;
            let change = issues::transition(&mut store_ctx.store, &IssueId::new(id), requested, Some(&actor))?;
            store_ctx.flush()?;
            if ctx.is_json() {
                ctx.json(&change)?;
            } else {
                ctx.line(format!(
                    "{} {} -> {}",
                    format_status_icon(&change.status),
                    change.id,
                    change.status
                ));
            }
        }
        IssueSubcommand::Assign { id, assignee } => {
            let assignment = issues::assign(
                &mut store_ctx.store,
                &IssueId::new(id),
                &UserId::new(assignee),
                &actor,
            )?;
            store_ctx.flush()?;
            if ctx.is_json() {
                ctx.json(&assignment)?;
            } else {
                let names: Vec<&str> = assignment.assignees.iter().map(UserId::as_str).collect();
                ctx.line(format!("{} assigned to {}", assignment.id, names.join(", ")));
            }
        }
    }

    Ok(())
}

fn build_new_issue(args: IssueCreateArgs) -> Result<NewIssue> {
    let priority = args.priority.as_deref().map(Priority::from_str).transpose()?;
    Ok(NewIssue {
        title: args.title,
        description: args.description,
        priority,
        assignees: args.assignees.into_iter().map(UserId::from).collect(),
    })
}

/// Convert CLI args to list filters.
fn build_filters(args: &IssueListArgs, actor: &UserId) -> Result<ListFilters> {
    let status = args.status.as_deref().map(Status::from_str).transpose()?;
    let priority = args.priority.as_deref().map(Priority::from_str).transpose()?;
    let assigned_to = if args.mine {
        Some(actor.clone())
    } else {
        args.assigned_to.as_deref().map(UserId::new)
    };

    Ok(ListFilters {
        status,
        priority,
        assigned_to,
    })
}

fn print_page(page: &IssuePage) {
    if page.items.is_empty() {
        println!("No issues found.");
    } else {
        for issue in &page.items {
            println!("{}", format_issue_line(issue));
        }
    }
    println!(
        "\n{} of {} issue(s) (page {}, limit {})",
        page.items.len(),
        page.total,
        page.page,
        page.limit
    );
}

fn print_issue(issue: &Issue) {
    println!(
        "{} {} {} {}",
        format_status_icon(&issue.status),
        issue.id,
        format_priority(&issue.priority),
        issue.title
    );
    if let Some(description) = &issue.description {
        println!("\n{description}\n");
    }
    println!("Status:    {}", issue.status);
    println!("Project:   {}", issue.project);
    println!("Reporter:  {}", issue.reporter);
    if !issue.assignees.is_empty() {
        let names: Vec<&str> = issue.assignees.iter().map(UserId::as_str).collect();
        println!("Assignees: {}", names.join(", "));
    }
    println!("Created:   {}", issue.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("Updated:   {}", issue.updated_at.format("%Y-%m-%d %H:%M UTC"));
}
