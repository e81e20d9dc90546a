use anyhow::Result;
use clap::Subcommand;

use crate::{
    collections::short_id, store::json_store::KeyValueStore, workspace::Workspace,
};

use super::{prompt::confirm, render};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    #[command(about = "List tasks, most recent first")]
    List,
    #[command(about = "Add a task. Blank text is ignored")]
    Add {
        #[arg(num_args = 0.., help = "Task text")]
        text: Vec<String>,
    },
    #[command(about = "Mark a task done, or not done again")]
    Toggle {
        #[arg(help = "Task id or a unique prefix of it")]
        id: String,
    },
    #[command(about = "Delete a task", alias = "delete")]
    Rm {
        #[arg(help = "Task id or a unique prefix of it")]
        id: String,
    },
    #[command(about = "Remove every completed task")]
    Clear {
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
}

/// Runs a single `tasks` subcommand against the persisted task list.
pub async fn process_task_command<S: KeyValueStore>(
    command: TaskCommand,
    workspace: &mut Workspace<S>,
) -> Result<()> {
    match command {
        TaskCommand::List => println!("{}", render::task_list(workspace.tasks())),
        TaskCommand::Add { text } => {
            if let Some(id) = workspace.add_task(&text.join(" ")).await? {
                println!("Added {}", short_id(&id));
            }
        }
        TaskCommand::Toggle { id } => {
            let task = workspace.toggle_task(&id).await?;
            let verb = if task.completed { "Completed" } else { "Reopened" };
            println!("{verb} \"{}\"", task.text);
        }
        TaskCommand::Rm { id } => {
            let task = workspace.delete_task(&id).await?;
            println!("Deleted \"{}\"", task.text);
        }
        TaskCommand::Clear { yes } => {
            let completed = workspace.tasks().completed_count();
            if completed == 0 {
                println!("No completed tasks to clear.");
            } else if confirm(
                &format!("Are you sure you want to remove all {completed} completed tasks?"),
                yes,
            )? {
                let removed = workspace.clear_completed().await?;
                println!("Removed {removed} completed tasks.");
            }
        }
    }
    Ok(())
}
