pub mod notes;
pub mod prompt;
pub mod render;
pub mod shell;
pub mod tasks;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use notes::{process_note_command, NoteCommand};
use tasks::{process_task_command, TaskCommand};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    app::start_app,
    dashboard::Dashboard,
    focus::config::{FocusArgs, FocusConfig},
    store::{json_store::JsonFileStore, persisted::Persisted, FOCUS_SESSIONS_KEY},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX, SHELL_PREFIX},
    },
    view::View,
    workspace::Workspace,
};

#[derive(Parser, Debug)]
#[command(name = "focusdesk", version, long_about = None)]
#[command(about = "Dashboard, tasks, notes and a focus timer in your terminal", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Enable verbose logging to stdout")]
    log: bool,
    #[command(flatten)]
    focus: FocusArgs,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Start the interactive application. This is the default")]
    App {
        #[arg(long, value_enum, default_value_t = View::Home, help = "View to open first")]
        view: View,
    },
    #[command(about = "Print the dashboard and exit")]
    Dashboard,
    #[command(about = "Manage tasks without opening the application")]
    Tasks {
        #[command(subcommand)]
        command: TaskCommand,
    },
    #[command(about = "Manage notes without opening the application")]
    Notes {
        #[command(subcommand)]
        command: NoteCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    if let Some(Commands::Notes {
        command: NoteCommand::Edit {
            title: None,
            content: None,
            ..
        },
    }) = &args.commands
    {
        Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "`notes edit` needs --title, --content or both",
            )
            .exit();
    }

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = match args.commands {
        None | Some(Commands::App { .. }) => SHELL_PREFIX,
        Some(_) => CLI_PREFIX,
    };
    enable_logging(prefix, &app_dir.join("logs"), logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let store = Arc::new(JsonFileStore::new(app_dir.join("store"))?);
    let config = FocusConfig::from(args.focus);

    match args.commands.unwrap_or(Commands::App {
        view: View::default(),
    }) {
        Commands::App { view } => start_app(store, view, config).await,
        Commands::Dashboard => print_dashboard(store).await,
        Commands::Tasks { command } => {
            let mut workspace = Workspace::load(store, Box::new(DefaultClock)).await?;
            process_task_command(command, &mut workspace).await
        }
        Commands::Notes { command } => {
            let mut workspace = Workspace::load(store, Box::new(DefaultClock)).await?;
            process_note_command(command, &mut workspace).await
        }
    }
}

async fn print_dashboard(store: Arc<JsonFileStore>) -> Result<()> {
    let sessions = Persisted::load(store.clone(), FOCUS_SESSIONS_KEY, 0u64).await?;
    let workspace = Workspace::load(store, Box::new(DefaultClock)).await?;
    let dashboard = Dashboard::new(
        workspace.tasks(),
        *sessions.get(),
        workspace.clock().local_time(),
    );
    println!("{}", render::dashboard(&dashboard));
    Ok(())
}
