//! Plain-text rendering of every view. Functions return strings so the shell can write them
//! wherever its output goes.

use std::fmt::Write;

use ansi_term::{Colour, Style};

use crate::{
    collections::{
        notes::{Note, NoteList},
        short_id,
        tasks::TaskList,
    },
    dashboard::Dashboard,
    focus::session::{FocusSnapshot, Mode},
    utils::time::{format_clock, short_date},
    view::View,
};

const BAR_WIDTH: usize = 24;
const PREVIEW_LINES: usize = 3;

pub fn nav_bar(current: View) -> String {
    View::ALL
        .iter()
        .map(|view| {
            if *view == current {
                Style::new().bold().underline().paint(view.label()).to_string()
            } else {
                Colour::Fixed(245).paint(view.label()).to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", Style::new().bold().paint(dashboard.greeting));
    let _ = writeln!(out, "Here's your daily overview.");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} To Do    {} Done",
        Colour::Blue.bold().paint(dashboard.pending_tasks.to_string()),
        Colour::Green.bold().paint(dashboard.completed_tasks.to_string()),
    );
    let _ = writeln!(
        out,
        "{} Focus Sessions",
        Colour::Yellow.bold().paint(dashboard.focus_sessions.to_string()),
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Task Completion {} {}%",
        dashboard.completion_rate.bar(BAR_WIDTH),
        dashboard.completion_rate.rounded()
    );
    let _ = write!(out, "{}", dashboard.encouragement());
    out
}

pub fn task_list(tasks: &TaskList) -> String {
    if tasks.is_empty() {
        return "No tasks yet.\nUse `add <text>` to get started.".into();
    }
    let mut out = String::new();
    for task in tasks.iter() {
        let (mark, text) = if task.completed {
            (
                Colour::Green.paint("[x]").to_string(),
                Style::new().strikethrough().dimmed().paint(task.text.as_str()).to_string(),
            )
        } else {
            ("[ ]".to_string(), task.text.clone())
        };
        let _ = writeln!(out, "{} {mark} {text}", Colour::Fixed(245).paint(short_id(&task.id)));
    }
    let completed = tasks.completed_count();
    if completed > 0 {
        let _ = write!(out, "{completed} completed. `clear` removes them.");
    }
    out.trim_end().to_string()
}

pub fn note_list(notes: &NoteList) -> String {
    if notes.is_empty() {
        return "No notes yet.\nUse `new` to capture your first idea.".into();
    }
    let mut out = String::new();
    for note in notes.iter() {
        let _ = writeln!(
            out,
            "{} {}  {}",
            Colour::Fixed(245).paint(short_id(&note.id)),
            Style::new().bold().paint(note.title.as_str()),
            Colour::Fixed(245).paint(short_date(&note.updated_at.with_timezone(&chrono::Local))),
        );
        let preview = note
            .content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(PREVIEW_LINES)
            .collect::<Vec<_>>();
        if preview.is_empty() {
            let _ = writeln!(out, "    {}", Style::new().italic().dimmed().paint("No content"));
        }
        for line in preview {
            let _ = writeln!(out, "    {line}");
        }
    }
    out.trim_end().to_string()
}

pub fn note(note: &Note) -> String {
    format!(
        "{}\n{}\n\n{}",
        Style::new().bold().paint(note.title.as_str()),
        Colour::Fixed(245).paint(format!(
            "{} · updated {}",
            short_id(&note.id),
            note.updated_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        )),
        note.content
    )
}

pub fn focus(snapshot: &FocusSnapshot) -> String {
    let colour = match snapshot.mode {
        Mode::Work => Colour::Purple,
        Mode::Break => Colour::Green,
    };
    let hint = if snapshot.is_active {
        "Stay focused on your task. You can do this!".to_string()
    } else {
        match snapshot.mode {
            Mode::Work => format!(
                "Ready to start? {} minutes of pure focus.",
                snapshot.duration / 60
            ),
            Mode::Break => "Time to relax. Take a deep breath.".to_string(),
        }
    };
    let state = match (snapshot.pending, snapshot.is_active) {
        (Some(_), _) => "waiting for you",
        (None, true) => "running",
        (None, false) => "paused",
    };
    format!(
        "{}\n{} {} ({state})\n{}",
        colour.bold().paint(snapshot.mode.label()),
        Style::new().bold().paint(format_clock(snapshot.time_left)),
        colour.paint(snapshot.progress().bar(BAR_WIDTH)),
        hint
    )
}

pub fn help(view: View) -> String {
    let specific = match view {
        View::Home => "",
        View::Tasks => "  add <text>   toggle <id>   rm <id>   clear   list\n",
        View::Notes => "  new   edit <id>   show <id>   rm <id>   list\n",
        View::Focus => "  start   pause   toggle   reset   status\n",
    };
    format!(
        "Views: home  tasks  notes  focus\n{specific}  help   quit\nIds can be shortened to any unique prefix."
    )
}
