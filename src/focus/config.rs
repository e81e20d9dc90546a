use std::fmt::Display;

use clap::ValueEnum;

use super::session::Durations;

/// How a finished interval is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum DecisionPolicy {
    /// Ask the user and wait for the answer.
    #[default]
    Ask,
    /// Always move on to the next mode.
    Accept,
    /// Always stay in the finished mode with the clock at zero.
    Decline,
}

impl Display for DecisionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecisionPolicy::Ask => write!(f, "ask"),
            DecisionPolicy::Accept => write!(f, "accept"),
            DecisionPolicy::Decline => write!(f, "decline"),
        }
    }
}

#[derive(Debug, Clone, Copy, clap::Args)]
pub struct FocusArgs {
    #[arg(
        long = "work-minutes",
        global = true,
        default_value_t = 25,
        value_parser = clap::value_parser!(u32).range(1..=600),
        help = "Length of a focus interval"
    )]
    pub work_minutes: u32,
    #[arg(
        long = "break-minutes",
        global = true,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=600),
        help = "Length of a break"
    )]
    pub break_minutes: u32,
    #[arg(
        long = "on-complete",
        global = true,
        default_value_t = DecisionPolicy::Ask,
        help = "What happens when an interval ends. `ask` prompts in the shell"
    )]
    pub policy: DecisionPolicy,
    #[arg(long = "no-sound", global = true, help = "Don't play a sound when an interval ends")]
    pub no_sound: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusConfig {
    pub durations: Durations,
    pub policy: DecisionPolicy,
    pub sound: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            durations: Durations::default(),
            policy: DecisionPolicy::Ask,
            sound: true,
        }
    }
}

impl From<FocusArgs> for FocusConfig {
    fn from(value: FocusArgs) -> Self {
        Self {
            durations: Durations {
                work: value.work_minutes * 60,
                rest: value.break_minutes * 60,
            },
            policy: value.policy,
            sound: !value.no_sound,
        }
    }
}
