//! Durable key/value mirror for application state.
//!  - Every key is a single JSON document inside the store directory.
//!  - Loading never fails on bad content: a missing or malformed document yields the default.
//!  - [persisted::Persisted] pairs a loaded value with its key so that every replacement is
//!    written through before it becomes visible.

pub mod json_store;
pub mod persisted;

pub const TASKS_KEY: &str = "tasks";
pub const NOTES_KEY: &str = "notes";
pub const FOCUS_SESSIONS_KEY: &str = "focus-sessions";
