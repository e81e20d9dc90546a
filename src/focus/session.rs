use std::fmt::Display;

use crate::utils::percentage::Percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Work,
    Break,
}

impl Mode {
    pub fn other(self) -> Mode {
        match self {
            Mode::Work => Mode::Break,
            Mode::Break => Mode::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Work => "Focus Time",
            Mode::Break => "Short Break",
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Work => write!(f, "work"),
            Mode::Break => write!(f, "break"),
        }
    }
}

/// Interval lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work: u32,
    pub rest: u32,
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work: 25 * 60,
            rest: 5 * 60,
        }
    }
}

impl Durations {
    pub fn for_mode(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Work => self.work,
            Mode::Break => self.rest,
        }
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The timer is not running, nothing changed.
    Idle,
    Counted { time_left: u32 },
    /// The interval for this mode just ran out. A decision is now pending.
    Completed(Mode),
}

/// Point-in-time view of the timer, plus the persisted counter for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusSnapshot {
    pub time_left: u32,
    pub is_active: bool,
    pub mode: Mode,
    pub pending: Option<Mode>,
    pub duration: u32,
    pub sessions_completed: u64,
}

impl FocusSnapshot {
    pub fn progress(&self) -> Percentage {
        Percentage::of(
            self.duration.saturating_sub(self.time_left) as usize,
            self.duration as usize,
        )
    }
}

/// Two-mode countdown. Nothing here touches time or io: ticks are fed in by
/// [FocusModule](super::module::FocusModule) and decisions come back through
/// [FocusSession::resolve].
///
/// Reaching zero parks the session in a pending state for the finished mode. While pending,
/// ticks and toggles are ignored until the decision arrives or the user resets.
#[derive(Debug, Clone)]
pub struct FocusSession {
    durations: Durations,
    time_left: u32,
    is_active: bool,
    mode: Mode,
    pending: Option<Mode>,
}

impl FocusSession {
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            time_left: durations.work,
            is_active: false,
            mode: Mode::Work,
            pending: None,
        }
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending(&self) -> Option<Mode> {
        self.pending
    }

    /// Running means the ticker should be armed.
    pub fn is_running(&self) -> bool {
        self.is_active && self.pending.is_none() && self.time_left > 0
    }

    pub fn toggle(&mut self) {
        if self.pending.is_some() {
            return;
        }
        if self.time_left == 0 {
            // A declined prompt leaves the clock at zero; starting again asks once more.
            self.is_active = false;
            self.pending = Some(self.mode);
            return;
        }
        self.is_active = !self.is_active;
    }

    pub fn reset(&mut self) {
        self.is_active = false;
        self.pending = None;
        self.time_left = self.durations.for_mode(self.mode);
    }

    pub fn tick(&mut self) -> Tick {
        if !self.is_running() {
            return Tick::Idle;
        }
        self.time_left -= 1;
        if self.time_left > 0 {
            return Tick::Counted {
                time_left: self.time_left,
            };
        }
        self.is_active = false;
        self.pending = Some(self.mode);
        Tick::Completed(self.mode)
    }

    /// Applies the user's answer to a pending completion. Returns false when nothing was
    /// pending.
    pub fn resolve(&mut self, accept: bool) -> bool {
        if self.pending.take().is_none() {
            return false;
        }
        self.is_active = false;
        if accept {
            self.mode = self.mode.other();
            self.time_left = self.durations.for_mode(self.mode);
        } else {
            self.time_left = 0;
        }
        true
    }

    pub fn snapshot(&self, sessions_completed: u64) -> FocusSnapshot {
        FocusSnapshot {
            time_left: self.time_left,
            is_active: self.is_active,
            mode: self.mode,
            pending: self.pending,
            duration: self.durations.for_mode(self.mode),
            sessions_completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Durations, FocusSession, Mode, Tick};

    fn short() -> Durations {
        Durations { work: 3, rest: 2 }
    }

    fn run_out(session: &mut FocusSession) -> Tick {
        let mut last = Tick::Idle;
        while session.is_running() {
            last = session.tick();
        }
        last
    }

    #[test]
    fn test_initial_state() {
        let session = FocusSession::new(Durations::default());

        assert_eq!(session.time_left(), 1500);
        assert_eq!(session.mode(), Mode::Work);
        assert!(!session.is_active());
        assert_eq!(session.pending(), None);
    }

    #[test]
    fn test_toggle_parity() {
        let mut session = FocusSession::new(short());
        for count in 1..=9 {
            session.toggle();
            assert_eq!(session.is_active(), count % 2 == 1);
        }
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut session = FocusSession::new(short());
        session.toggle();
        session.tick();
        session.reset();
        assert_eq!(session.time_left(), 3);
        assert!(!session.is_active());

        run_out_after_start(&mut session);
        session.resolve(true);
        session.toggle();
        session.tick();
        session.reset();
        assert_eq!(session.mode(), Mode::Break);
        assert_eq!(session.time_left(), 2);
        assert!(!session.is_active());
    }

    fn run_out_after_start(session: &mut FocusSession) -> Tick {
        session.toggle();
        run_out(session)
    }

    #[test]
    fn test_tick_only_when_active() {
        let mut session = FocusSession::new(short());

        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.time_left(), 3);

        session.toggle();
        assert_eq!(session.tick(), Tick::Counted { time_left: 2 });
        assert_eq!(session.tick(), Tick::Counted { time_left: 1 });
        assert_eq!(session.tick(), Tick::Completed(Mode::Work));
        assert_eq!(session.tick(), Tick::Idle);
        assert_eq!(session.time_left(), 0);
    }

    #[test]
    fn test_work_completion_accepted() {
        let mut session = FocusSession::new(short());

        assert_eq!(run_out_after_start(&mut session), Tick::Completed(Mode::Work));
        assert!(!session.is_active());
        assert_eq!(session.pending(), Some(Mode::Work));

        assert!(session.resolve(true));
        assert_eq!(session.mode(), Mode::Break);
        assert_eq!(session.time_left(), 2);
        assert!(!session.is_active());
        assert_eq!(session.pending(), None);
    }

    #[test]
    fn test_work_completion_declined() {
        let mut session = FocusSession::new(short());
        run_out_after_start(&mut session);

        assert!(session.resolve(false));
        assert_eq!(session.mode(), Mode::Work);
        assert_eq!(session.time_left(), 0);
        assert!(!session.is_active());
    }

    #[test]
    fn test_break_completion_accepted() {
        let mut session = FocusSession::new(short());
        run_out_after_start(&mut session);
        session.resolve(true);

        assert_eq!(run_out_after_start(&mut session), Tick::Completed(Mode::Break));
        session.resolve(true);

        assert_eq!(session.mode(), Mode::Work);
        assert_eq!(session.time_left(), 3);
    }

    #[test]
    fn test_toggle_while_pending_is_ignored() {
        let mut session = FocusSession::new(short());
        run_out_after_start(&mut session);

        session.toggle();

        assert!(!session.is_active());
        assert_eq!(session.pending(), Some(Mode::Work));
    }

    #[test]
    fn test_toggle_at_zero_asks_again() {
        let mut session = FocusSession::new(short());
        run_out_after_start(&mut session);
        session.resolve(false);

        session.toggle();

        assert!(!session.is_active());
        assert_eq!(session.pending(), Some(Mode::Work));
        session.resolve(true);
        assert_eq!(session.mode(), Mode::Break);
    }

    #[test]
    fn test_resolve_without_pending_is_noop() {
        let mut session = FocusSession::new(short());

        assert!(!session.resolve(true));
        assert_eq!(session.mode(), Mode::Work);
        assert_eq!(session.time_left(), 3);
    }

    #[test]
    fn test_reset_drops_pending_decision() {
        let mut session = FocusSession::new(short());
        run_out_after_start(&mut session);

        session.reset();

        assert_eq!(session.pending(), None);
        assert_eq!(session.time_left(), 3);
        assert!(!session.resolve(true));
    }

    #[test]
    fn test_snapshot_progress() {
        let mut session = FocusSession::new(Durations { work: 4, rest: 1 });
        session.toggle();
        session.tick();

        let snapshot = session.snapshot(2);

        assert_eq!(snapshot.progress().rounded(), 25);
        assert_eq!(snapshot.sessions_completed, 2);
        assert_eq!(snapshot.duration, 4);
    }
}
