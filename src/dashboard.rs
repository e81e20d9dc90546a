use chrono::{DateTime, Local};

use crate::{collections::tasks::TaskList, utils::percentage::Percentage, utils::time::greeting};

/// Numbers shown on the home view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dashboard {
    pub greeting: &'static str,
    pub pending_tasks: usize,
    pub completed_tasks: usize,
    pub focus_sessions: u64,
    pub completion_rate: Percentage,
}

impl Dashboard {
    pub fn new(tasks: &TaskList, focus_sessions: u64, now: DateTime<Local>) -> Self {
        Self {
            greeting: greeting(&now),
            pending_tasks: tasks.pending_count(),
            completed_tasks: tasks.completed_count(),
            focus_sessions,
            completion_rate: tasks.completion_rate(),
        }
    }

    pub fn encouragement(&self) -> &'static str {
        if self.completion_rate.rounded() == 100 {
            "All caught up! Great job."
        } else {
            "Keep going, you're doing great."
        }
    }
}
