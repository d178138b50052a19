//! Project command implementations.

use unicode_width::UnicodeWidthStr;

use crate::cli::{ProjectCreateArgs, ProjectSubcommand};
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{ProjectDetails, format_project_line};
use crate::model::UserId;
use crate::output::OutputContext;
use devtrack_lib::projects::{self, NewProject};

/// Execute a project subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be opened or the operation is
/// rejected.
pub fn execute(command: ProjectSubcommand, cli: &CliOverrides, ctx: &OutputContext) -> Result<()> {
    let mut store_ctx = config::open_store_with_cli(cli)?;
    let actor = store_ctx.actor.clone();

    match command {
        ProjectSubcommand::Create(args) => {
            let project = projects::create_project(&mut store_ctx.store, &actor, new_project(args))?;
            store_ctx.flush()?;
            if ctx.is_json() {
                ctx.json(&project)?;
            } else {
                ctx.line(format!(
                    "Created project {} ({}): {}",
                    project.key, project.id, project.name
                ));
            }
        }
        ProjectSubcommand::List => {
            let mine = projects::projects_for_user(&store_ctx.store, &actor)?;
            if ctx.is_json() {
                ctx.json(&mine)?;
            } else if mine.is_empty() {
                println!("No projects found.");
            } else {
                let key_width = mine.iter().map(|p| p.key.width()).max().unwrap_or(0);
                for project in &mine {
                    println!("{}", format_project_line(project, key_width));
                }
            }
        }
        ProjectSubcommand::Show { project } => {
            let project = projects::resolve_project(&store_ctx.store, &project, &actor)?;
            let details = ProjectDetails::new(project, actor);
            if ctx.is_json() {
                ctx.json(&details)?;
            } else {
                print_details(&details);
            }
        }
        ProjectSubcommand::AddMember { project, member } => {
            let project_id = projects::resolve_project(&store_ctx.store, &project, &actor)?.id;
            let updated = projects::add_member(&mut store_ctx.store, &project_id, &actor, &UserId::new(member))?;
            store_ctx.flush()?;
            if ctx.is_json() {
                ctx.json(&updated)?;
            } else {
                ctx.line(format!(
                    "{} members: {}",
                    updated.key,
                    join_users(updated.members.iter())
                ));
            }
        }
    }

    Ok(())
}

fn new_project(args: ProjectCreateArgs) -> NewProject {
    NewProject {
        name: args.name,
        key: args.key,
        description: args.description,
    }
}

fn join_users<'a>(users: impl Iterator<Item = &'a UserId>) -> String {
    let names: Vec<&str> = users.map(UserId::as_str).collect();
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

fn print_details(details: &ProjectDetails) {
    let project = &details.project;
    println!("{} {} ({})", project.key, project.name, project.id);
    if let Some(description) = &project.description {
        println!("\n{description}\n");
    }
    println!("Owner:   {}", project.owner);
    println!("Members: {}", join_users(project.members.iter()));
    let role = if details.membership.is_owner {
        "owner"
    } else if details.membership.is_member {
        "member"
    } else {
        "none"
    };
    println!("You:     {} ({role})", details.viewer);
}
