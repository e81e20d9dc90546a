//! Focus timer. [session::FocusSession] is the pure state machine, [module::FocusModule] runs it
//! against a real clock on its own task, and [FocusHandle] is how the rest of the application
//! talks to it. The module is started once by the application root and keeps running no
//! matter which view is on screen.

use anyhow::{anyhow, Result};
use config::FocusConfig;
use module::{CommandRequest, FocusModule, SessionCommand, SessionEvent};
use notifier::Notifier;
use session::{FocusSession, FocusSnapshot};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::{
    store::{json_store::KeyValueStore, persisted::Persisted, FOCUS_SESSIONS_KEY},
    utils::clock::Clock,
};

pub mod config;
pub mod module;
pub mod notifier;
pub mod session;

const CHANNEL_CAPACITY: usize = 16;

pub struct FocusHandle {
    commands: mpsc::Sender<CommandRequest>,
    events: mpsc::Receiver<SessionEvent>,
    snapshot: watch::Receiver<FocusSnapshot>,
}

impl FocusHandle {
    async fn request(
        &self,
        command: SessionCommand,
        reply: Option<oneshot::Sender<FocusSnapshot>>,
    ) -> Result<()> {
        self.commands
            .send(CommandRequest { command, reply })
            .await
            .map_err(|_| anyhow!("Focus timer is no longer running"))
    }

    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        self.request(command, None).await
    }

    /// Sends `command` and returns the state right after the module applied it. Ticks that
    /// land in between are not mistaken for the answer.
    pub async fn send_and_observe(&self, command: SessionCommand) -> Result<FocusSnapshot> {
        let (reply, answer) = oneshot::channel();
        self.request(command, Some(reply)).await?;
        answer
            .await
            .map_err(|_| anyhow!("Focus timer stopped before applying {command:?}"))
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    pub fn snapshot(&self) -> FocusSnapshot {
        *self.snapshot.borrow()
    }
}

/// Loads the persisted session counter and wires a [FocusModule] to a fresh [FocusHandle].
/// The module does nothing until its `run` future is polled.
pub async fn create_focus_module<S: KeyValueStore>(
    store: S,
    config: FocusConfig,
    notifier: Box<dyn Notifier>,
    shutdown: CancellationToken,
    clock: Box<dyn Clock>,
) -> Result<(FocusModule<S>, FocusHandle)> {
    let sessions_completed = Persisted::load(store, FOCUS_SESSIONS_KEY, 0u64).await?;
    let session = FocusSession::new(config.durations);

    let (command_sender, command_receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let (event_sender, event_receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let (snapshot_sender, snapshot_receiver) =
        watch::channel(session.snapshot(*sessions_completed.get()));

    let module = FocusModule::new(
        session,
        sessions_completed,
        command_receiver,
        event_sender,
        snapshot_sender,
        notifier,
        config.policy,
        shutdown,
        clock,
    );
    let handle = FocusHandle {
        commands: command_sender,
        events: event_receiver,
        snapshot: snapshot_receiver,
    };
    Ok((module, handle))
}
