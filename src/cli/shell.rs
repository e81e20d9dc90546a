use std::{collections::VecDeque, fmt::Display, io::Write};

use ansi_term::Colour;
use anyhow::{bail, Result};
use tokio::sync::mpsc;
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    collections::{
        notes::{EditTarget, Note},
        short_id,
    },
    dashboard::Dashboard,
    focus::{
        module::{SessionCommand, SessionEvent},
        session::Mode,
        FocusHandle,
    },
    store::json_store::KeyValueStore,
    utils::time::format_clock,
    view::{Router, View},
    workspace::Workspace,
};

use super::{prompt::parse_answer, render};

/// One line typed into the shell, already checked against the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand<'a> {
    Empty,
    Navigate(View),
    Help,
    Quit,
    List,
    Status,
    AddTask(&'a str),
    Toggle(&'a str),
    Remove(&'a str),
    Clear,
    NewNote,
    EditNote(&'a str),
    ShowNote(&'a str),
    Timer(SessionCommand),
}

impl<'a> ShellCommand<'a> {
    pub fn parse(view: View, line: &'a str) -> Result<ShellCommand<'a>> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));
        if word.is_empty() {
            return Ok(ShellCommand::Empty);
        }
        if let (Some(target), "") = (View::from_name(word), rest) {
            return Ok(ShellCommand::Navigate(target));
        }

        let id = || -> Result<&'a str> {
            if rest.is_empty() {
                bail!("`{word}` needs an id");
            }
            Ok(rest)
        };

        let command = match (view, word.to_ascii_lowercase().as_str()) {
            (_, "help" | "?") => ShellCommand::Help,
            (_, "quit" | "exit" | "q") => ShellCommand::Quit,
            (_, "status") => ShellCommand::Status,
            (View::Tasks | View::Notes, "list" | "ls") => ShellCommand::List,
            (View::Tasks, "add") => ShellCommand::AddTask(rest),
            (View::Tasks, "toggle" | "done") => ShellCommand::Toggle(id()?),
            (View::Tasks | View::Notes, "rm" | "delete") => ShellCommand::Remove(id()?),
            (View::Tasks, "clear") => ShellCommand::Clear,
            (View::Notes, "new") => ShellCommand::NewNote,
            (View::Notes, "edit") => ShellCommand::EditNote(id()?),
            (View::Notes, "show") => ShellCommand::ShowNote(id()?),
            (View::Focus, "start") => ShellCommand::Timer(SessionCommand::Start),
            (View::Focus, "pause") => ShellCommand::Timer(SessionCommand::Pause),
            (View::Focus, "toggle") => ShellCommand::Timer(SessionCommand::Toggle),
            (View::Focus, "reset") => ShellCommand::Timer(SessionCommand::Reset),
            (view, other) => {
                bail!("Unknown command `{other}` in {view}. Type `help` to see what works here.")
            }
        };
        Ok(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prompt {
    ClearCompleted,
    DeleteNote(Uuid),
    FocusDecision(Mode),
}

impl Prompt {
    fn question(&self) -> &'static str {
        match self {
            Prompt::ClearCompleted => "Are you sure you want to remove all completed tasks? [y/n]",
            Prompt::DeleteNote(_) => "Delete this note? [y/n]",
            Prompt::FocusDecision(Mode::Work) => "Focus session complete! Take a break? [y/n]",
            Prompt::FocusDecision(Mode::Break) => "Break over! Ready to focus again? [y/n]",
        }
    }
}

/// Line editor for a single note: one title line, then content lines until `.` or `!`.
#[derive(Debug)]
struct NoteEditor {
    target: EditTarget,
    current: Option<Note>,
    title: Option<String>,
    lines: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive front end. Owns the router and the workspace and talks to the focus timer
/// through its handle; the timer itself runs elsewhere and keeps going whatever view is
/// shown.
///
/// Questions (confirmations and timer decisions) are queued and answered one at a time. While
/// the note editor is open every line goes to the editor and queued questions wait.
pub struct Shell<S, W> {
    router: Router,
    workspace: Workspace<S>,
    focus: FocusHandle,
    prompts: VecDeque<Prompt>,
    editor: Option<NoteEditor>,
    out: W,
}

impl<S: KeyValueStore, W: Write> Shell<S, W> {
    pub fn new(workspace: Workspace<S>, focus: FocusHandle, view: View, out: W) -> Self {
        Self {
            router: Router::new(view),
            workspace,
            focus,
            prompts: VecDeque::new(),
            editor: None,
            out,
        }
    }

    fn say(&mut self, text: impl Display) {
        if let Err(e) = writeln!(self.out, "{text}") {
            warn!("Failed to write to the terminal {e:?}");
        }
    }

    fn show_cursor(&mut self) {
        let cursor = match (&self.editor, self.prompts.front()) {
            (Some(_), _) => "... ".to_string(),
            (None, Some(_)) => "y/n> ".to_string(),
            (None, None) => format!("{}> ", self.router.current()),
        };
        if let Err(e) = write!(self.out, "{cursor}").and_then(|_| self.out.flush()) {
            warn!("Failed to write to the terminal {e:?}");
        }
    }

    fn render_view(&mut self) {
        let view = self.router.current();
        let body = match view {
            View::Home => render::dashboard(&Dashboard::new(
                self.workspace.tasks(),
                self.focus.snapshot().sessions_completed,
                self.workspace.clock().local_time(),
            )),
            View::Tasks => render::task_list(self.workspace.tasks()),
            View::Notes => render::note_list(self.workspace.notes()),
            View::Focus => render::focus(&self.focus.snapshot()),
        };
        self.say(render::nav_bar(view));
        self.say("");
        self.say(body);
    }

    fn push_prompt(&mut self, prompt: Prompt) {
        self.prompts.push_back(prompt);
        if self.prompts.len() == 1 && self.editor.is_none() {
            self.say(prompt.question());
        }
    }

    fn ask_next_prompt(&mut self) {
        if self.editor.is_some() {
            return;
        }
        if let Some(prompt) = self.prompts.front().copied() {
            self.say(prompt.question());
        }
    }

    async fn answer(&mut self, prompt: Prompt, yes: bool) -> Result<()> {
        match (prompt, yes) {
            (Prompt::ClearCompleted, true) => {
                let removed = self.workspace.clear_completed().await?;
                self.say(format!("Removed {removed} completed tasks."));
            }
            (Prompt::ClearCompleted, false) => self.say("Kept completed tasks."),
            (Prompt::DeleteNote(id), true) => {
                if self.workspace.delete_note(id).await? {
                    self.say("Note deleted.");
                }
            }
            (Prompt::DeleteNote(_), false) => self.say("Kept the note."),
            (Prompt::FocusDecision(_), yes) => {
                self.focus.send(SessionCommand::Decide(yes)).await?;
            }
        }
        Ok(())
    }

    fn open_editor(&mut self, target: EditTarget, current: Option<Note>) {
        match &current {
            Some(note) => {
                self.say(render::note(note));
                self.say("");
                self.say(format!("Title (empty keeps \"{}\"):", note.title));
            }
            None => self.say("New note. Title:"),
        }
        self.editor = Some(NoteEditor {
            target,
            current,
            title: None,
            lines: vec![],
        });
    }

    async fn feed_editor(&mut self, mut editor: NoteEditor, line: &str) -> Result<()> {
        if editor.title.is_none() {
            editor.title = Some(line.trim().to_string());
            self.say("Content. Finish with a line holding only `.` to save, or `!` to discard:");
            self.editor = Some(editor);
            return Ok(());
        }
        match line.trim_end() {
            "." => self.save_editor(editor).await?,
            "!" => self.say("Discarded."),
            _ => {
                editor.lines.push(line.to_string());
                self.editor = Some(editor);
                return Ok(());
            }
        }
        self.ask_next_prompt();
        Ok(())
    }

    async fn save_editor(&mut self, editor: NoteEditor) -> Result<()> {
        let NoteEditor {
            target,
            current,
            title,
            lines,
        } = editor;
        let mut title = title.unwrap_or_default();
        let mut content = lines.join("\n");
        if let Some(current) = current {
            if title.is_empty() {
                title = current.title;
            }
            if lines.is_empty() {
                content = current.content;
            }
        }

        match self.workspace.save_note(target, &title, &content).await? {
            Some(id) => self.say(format!("Saved note {}.", short_id(&id))),
            None => self.say("Nothing to save."),
        }
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand<'_>) -> Result<Flow> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Quit => return Ok(Flow::Quit),
            ShellCommand::Navigate(view) => {
                self.router.select(view);
                self.render_view();
            }
            ShellCommand::List => self.render_view(),
            ShellCommand::Help => self.say(render::help(self.router.current())),
            ShellCommand::Status => self.say(render::focus(&self.focus.snapshot())),
            ShellCommand::AddTask(text) => {
                if let Some(id) = self.workspace.add_task(text).await? {
                    self.say(format!("Added {}.", short_id(&id)));
                }
            }
            ShellCommand::Toggle(id) => {
                let task = self.workspace.toggle_task(id).await?;
                let verb = if task.completed { "Completed" } else { "Reopened" };
                self.say(format!("{verb} \"{}\".", task.text));
            }
            ShellCommand::Remove(id) if self.router.current() == View::Notes => {
                let note = self.workspace.find_note(id)?.id;
                self.push_prompt(Prompt::DeleteNote(note));
            }
            ShellCommand::Remove(id) => {
                let task = self.workspace.delete_task(id).await?;
                self.say(format!("Deleted \"{}\".", task.text));
            }
            ShellCommand::Clear => {
                if self.workspace.tasks().completed_count() == 0 {
                    self.say("No completed tasks to clear.");
                } else {
                    self.push_prompt(Prompt::ClearCompleted);
                }
            }
            ShellCommand::NewNote => self.open_editor(EditTarget::New, None),
            ShellCommand::EditNote(id) => {
                let note = self.workspace.find_note(id)?.clone();
                self.open_editor(EditTarget::Existing(note.id), Some(note));
            }
            ShellCommand::ShowNote(id) => {
                let text = render::note(self.workspace.find_note(id)?);
                self.say(text);
            }
            ShellCommand::Timer(command) => {
                let snapshot = self.focus.send_and_observe(command).await?;
                self.say(render::focus(&snapshot));
            }
        }
        Ok(Flow::Continue)
    }

    /// Handles one line of input. Errors are meant for the user and leave the shell usable.
    pub async fn handle_line(&mut self, line: &str) -> Result<Flow> {
        if let Some(editor) = self.editor.take() {
            self.feed_editor(editor, line).await?;
            return Ok(Flow::Continue);
        }

        if let Some(prompt) = self.prompts.front().copied() {
            let Some(yes) = parse_answer(line) else {
                self.say(prompt.question());
                return Ok(Flow::Continue);
            };
            self.prompts.pop_front();
            let result = self.answer(prompt, yes).await;
            self.ask_next_prompt();
            result?;
            return Ok(Flow::Continue);
        }

        let command = ShellCommand::parse(self.router.current(), line)?;
        self.execute(command).await
    }

    fn on_focus_event(&mut self, event: SessionEvent) {
        debug!("Shell got {event:?}");
        match event {
            SessionEvent::Completed {
                mode: Mode::Work,
                sessions_completed,
            } => self.say(format!(
                "{} Focus sessions completed: {sessions_completed}",
                Colour::Yellow.bold().paint("Time!")
            )),
            SessionEvent::Completed {
                mode: Mode::Break, ..
            } => self.say(Colour::Green.bold().paint("Break finished.")),
            SessionEvent::DecisionRequested(mode) => self.push_prompt(Prompt::FocusDecision(mode)),
            SessionEvent::Resolved {
                accepted: true,
                mode,
            } => {
                let snapshot = self.focus.snapshot();
                self.say(format!(
                    "{} is ready at {}. `start` in the focus view when you are.",
                    mode.label(),
                    format_clock(snapshot.time_left)
                ));
            }
            SessionEvent::Resolved {
                accepted: false, ..
            } => self.say("The timer stays at 00:00. `reset` starts the interval over."),
        }
    }

    /// Executes the shell loop until `quit`, end of input or shutdown.
    pub async fn run(
        &mut self,
        mut input: impl Stream<Item = std::io::Result<String>> + Unpin,
        shutdown: &CancellationToken,
    ) -> Result<()> {
        self.render_view();
        self.show_cursor();
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    break;
                }
                line = input.next() => {
                    let Some(line) = line else {
                        debug!("Input closed");
                        break;
                    };
                    match self.handle_line(&line?).await {
                        Ok(Flow::Quit) => break,
                        Ok(Flow::Continue) => {}
                        Err(e) => {
                            debug!("Command failed {e:?}");
                            self.say(Colour::Red.paint(e.to_string()));
                        }
                    }
                    self.show_cursor();
                }
                event = self.focus.next_event() => {
                    let Some(event) = event else {
                        warn!("Focus timer stopped, closing the shell");
                        break;
                    };
                    self.on_focus_event(event);
                    self.show_cursor();
                }
            }
        }
        self.say("");
        Ok(())
    }
}

/// Stdin lines read on a plain thread. The thread blocks in `read_line` and is simply left
/// behind when the process exits.
pub fn stdin_lines() -> ReceiverStream<std::io::Result<String>> {
    let (sender, receiver) = mpsc::channel(8);
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    ReceiverStream::new(receiver)
}
