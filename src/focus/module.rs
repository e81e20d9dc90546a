use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::{
    store::{json_store::KeyValueStore, persisted::Persisted},
    utils::clock::Clock,
};

use super::{
    config::DecisionPolicy,
    notifier::Notifier,
    session::{FocusSession, FocusSnapshot, Mode, Tick},
};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Toggle,
    Start,
    Pause,
    Reset,
    /// Answer to [SessionEvent::DecisionRequested].
    Decide(bool),
}

/// A [SessionCommand] on its way to the module. `reply` receives the snapshot taken right
/// after the command was applied.
#[derive(Debug)]
pub struct CommandRequest {
    pub(super) command: SessionCommand,
    pub(super) reply: Option<oneshot::Sender<FocusSnapshot>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Completed {
        mode: Mode,
        sessions_completed: u64,
    },
    DecisionRequested(Mode),
    Resolved {
        accepted: bool,
        mode: Mode,
    },
}

/// Owns the [FocusSession] and drives it in real time. Commands come in over a channel, events
/// go out over another one and the latest [FocusSnapshot] is always available on a watch.
///
/// The ticker is a single deadline that only exists while the session is running. It is
/// dropped whenever the session stops and re-armed a full interval ahead when it starts again.
pub struct FocusModule<S> {
    session: FocusSession,
    sessions_completed: Persisted<u64, S>,
    commands: mpsc::Receiver<CommandRequest>,
    events: mpsc::Sender<SessionEvent>,
    snapshot: watch::Sender<FocusSnapshot>,
    notifier: Box<dyn Notifier>,
    policy: DecisionPolicy,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> FocusModule<S> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: FocusSession,
        sessions_completed: Persisted<u64, S>,
        commands: mpsc::Receiver<CommandRequest>,
        events: mpsc::Sender<SessionEvent>,
        snapshot: watch::Sender<FocusSnapshot>,
        notifier: Box<dyn Notifier>,
        policy: DecisionPolicy,
        shutdown: CancellationToken,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            session,
            sessions_completed,
            commands,
            events,
            snapshot,
            notifier,
            policy,
            shutdown,
            clock,
        }
    }

    fn current_snapshot(&self) -> FocusSnapshot {
        self.session.snapshot(*self.sessions_completed.get())
    }

    fn publish(&self) {
        self.snapshot.send_replace(self.current_snapshot());
    }

    /// Snapshot goes out first so that whoever reacts to the event sees the state it describes.
    async fn emit(&self, event: SessionEvent) {
        self.publish();
        if let Err(e) = self.events.send(event).await {
            debug!("Nobody is listening for {:?}", e.0);
        }
    }

    async fn request_decision(&mut self, mode: Mode) {
        match self.policy {
            DecisionPolicy::Ask => self.emit(SessionEvent::DecisionRequested(mode)).await,
            DecisionPolicy::Accept => self.resolve(true).await,
            DecisionPolicy::Decline => self.resolve(false).await,
        }
    }

    async fn resolve(&mut self, accepted: bool) {
        if self.session.resolve(accepted) {
            info!("Decision for finished interval: accepted={accepted}, now in {}", self.session.mode());
            self.emit(SessionEvent::Resolved {
                accepted,
                mode: self.session.mode(),
            })
            .await;
        } else {
            debug!("Ignoring decision, nothing is pending");
        }
    }

    #[instrument(skip(self))]
    async fn complete(&mut self, mode: Mode) {
        if mode == Mode::Work {
            if let Err(e) = self.sessions_completed.update(|v| v + 1).await {
                error!("Failed to persist completed session count {e:?}");
            }
        }
        info!("Finished {mode} interval");
        self.notifier.notify(mode);

        self.emit(SessionEvent::Completed {
            mode,
            sessions_completed: *self.sessions_completed.get(),
        })
        .await;
        self.request_decision(mode).await;
    }

    async fn apply(&mut self, command: SessionCommand) {
        debug!("Applying {command:?}");
        let was_pending = self.session.pending().is_some();
        match command {
            SessionCommand::Toggle => self.session.toggle(),
            SessionCommand::Start if !self.session.is_active() => self.session.toggle(),
            SessionCommand::Pause if self.session.is_active() => self.session.toggle(),
            SessionCommand::Start | SessionCommand::Pause => {}
            SessionCommand::Reset => self.session.reset(),
            SessionCommand::Decide(accepted) => self.resolve(accepted).await,
        }

        if let (false, Some(mode)) = (was_pending, self.session.pending()) {
            // Starting a timer that sits at zero re-asks the question without counting again.
            self.request_decision(mode).await;
        }
    }

    /// Executes the timer event loop until shutdown or until every command sender is gone.
    pub async fn run(mut self) -> Result<()> {
        self.publish();
        let mut deadline: Option<tokio::time::Instant> = None;
        loop {
            deadline = match (self.session.is_running(), deadline) {
                (true, Some(at)) => Some(at),
                (true, None) => Some(self.clock.instant() + TICK_INTERVAL),
                (false, _) => None,
            };
            let tick_at = deadline.unwrap_or_else(|| self.clock.instant());

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    return Ok(())
                }
                command = self.commands.recv() => {
                    let Some(CommandRequest { command, reply }) = command else {
                        debug!("Command channel closed, stopping timer");
                        return Ok(())
                    };
                    self.apply(command).await;
                    if let Some(reply) = reply {
                        if reply.send(self.current_snapshot()).is_err() {
                            debug!("Nobody waited for the result of {command:?}");
                        }
                    }
                }
                _ = self.clock.sleep_until(tick_at), if deadline.is_some() => {
                    deadline = Some(tick_at + TICK_INTERVAL);
                    if let Tick::Completed(mode) = self.session.tick() {
                        self.complete(mode).await;
                    }
                }
            }
            self.publish();
        }
    }
}
