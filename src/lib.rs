//! Small personal productivity tool for the terminal: a dashboard, a task list, notes and a
//! pomodoro style focus timer. Everything is stored as plain JSON files under the
//! application directory.
//!

pub mod app;
pub mod cli;
pub mod collections;
pub mod dashboard;
pub mod focus;
pub mod shutdown;
pub mod store;
pub mod utils;
pub mod view;
pub mod workspace;
