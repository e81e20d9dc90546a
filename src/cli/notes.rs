use anyhow::Result;
use clap::Subcommand;

use crate::{
    collections::{notes::EditTarget, short_id},
    store::json_store::KeyValueStore,
    workspace::Workspace,
};

use super::{prompt::confirm, render};

#[derive(Subcommand, Debug)]
pub enum NoteCommand {
    #[command(about = "List notes, most recently created first")]
    List,
    #[command(about = "Print a whole note")]
    Show {
        #[arg(help = "Note id or a unique prefix of it")]
        id: String,
    },
    #[command(about = "Create a note. A blank title becomes \"Untitled Note\"")]
    New {
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        content: String,
    },
    #[command(about = "Change the title or content of a note")]
    Edit {
        #[arg(help = "Note id or a unique prefix of it")]
        id: String,
        #[arg(short, long, help = "New title. Keeps the current one when left out")]
        title: Option<String>,
        #[arg(short, long, help = "New content. Keeps the current one when left out")]
        content: Option<String>,
    },
    #[command(about = "Delete a note", alias = "delete")]
    Rm {
        #[arg(help = "Note id or a unique prefix of it")]
        id: String,
        #[arg(short, long, help = "Don't ask for confirmation")]
        yes: bool,
    },
}

/// Runs a single `notes` subcommand against the persisted notes.
pub async fn process_note_command<S: KeyValueStore>(
    command: NoteCommand,
    workspace: &mut Workspace<S>,
) -> Result<()> {
    match command {
        NoteCommand::List => println!("{}", render::note_list(workspace.notes())),
        NoteCommand::Show { id } => println!("{}", render::note(workspace.find_note(&id)?)),
        NoteCommand::New { title, content } => {
            match workspace.save_note(EditTarget::New, &title, &content).await? {
                Some(id) => println!("Saved note {}", short_id(&id)),
                None => println!("Nothing to save."),
            }
        }
        NoteCommand::Edit { id, title, content } => {
            let note = workspace.find_note(&id)?.clone();
            let title = title.unwrap_or(note.title);
            let content = content.unwrap_or(note.content);
            if let Some(id) = workspace
                .save_note(EditTarget::Existing(note.id), &title, &content)
                .await?
            {
                println!("Saved note {}", short_id(&id));
            }
        }
        NoteCommand::Rm { id, yes } => {
            let note = workspace.find_note(&id)?.clone();
            if confirm(&format!("Delete \"{}\"?", note.title), yes)?
                && workspace.delete_note(note.id).await?
            {
                println!("Deleted \"{}\"", note.title);
            }
        }
    }
    Ok(())
}
