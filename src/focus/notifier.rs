use std::{io::Write, process::Stdio};

use tracing::{debug, warn};

use super::session::Mode;

pub const COMPLETION_SOUND_URL: &str = "https://actions.google.com/sounds/v1/alarms/beep_short.ogg";

/// Side effect fired on every completed interval. Implementations must not block and must
/// swallow their own failures; the caller never looks at the outcome.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, finished: Mode);
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cue {
    Silent,
    Bell,
    Player { program: String, args: Vec<String> },
}

/// What a notification ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sounded {
    Nothing,
    Bell,
    Player,
}

/// Plays the completion clip through an external player, or rings the terminal bell where
/// no player is known.
pub struct SoundNotifier {
    cue: Cue,
}

impl SoundNotifier {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { cue: Cue::Silent };
        }
        cfg_if::cfg_if! {
            if #[cfg(unix)] {
                Self {
                    cue: Cue::Player {
                        program: "ffplay".into(),
                        args: ["-nodisp", "-autoexit", "-loglevel", "quiet", COMPLETION_SOUND_URL]
                            .map(String::from)
                            .to_vec(),
                    },
                }
            } else {
                Self { cue: Cue::Bell }
            }
        }
    }

    fn ring_bell() {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
            debug!("Couldn't ring the bell {e:?}");
        }
    }

    fn play(&self, finished: Mode) -> Sounded {
        let (program, args) = match &self.cue {
            Cue::Silent => return Sounded::Nothing,
            Cue::Bell => {
                Self::ring_bell();
                return Sounded::Bell;
            }
            Cue::Player { program, args } => (program, args),
        };
        let spawned = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(mut child) => {
                tokio::spawn(async move {
                    match child.wait().await {
                        Ok(status) if !status.success() => {
                            warn!("Sound player exited with {status}")
                        }
                        Ok(_) => debug!("Played sound for finished {finished} interval"),
                        Err(e) => warn!("Sound player failed {e:?}"),
                    }
                });
                Sounded::Player
            }
            Err(e) => {
                warn!("Failed to start {program}, falling back to bell: {e}");
                Self::ring_bell();
                Sounded::Bell
            }
        }
    }
}

impl Notifier for SoundNotifier {
    fn notify(&self, finished: Mode) {
        self.play(finished);
    }
}
