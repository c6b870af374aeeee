//! Transcript → command interpretation.
//!
//! Keywords are checked in a fixed precedence order and the first match
//! wins, so "stop navigating" is a stop and "hey vision, switch camera" is a
//! camera switch.

use super::state::Mode;
use crate::navigation::Destination;
use crate::stt::Transcript;

/// A recognized voice command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SwitchCamera,
    Stop,
    Wake,
    ConfirmDetection,
    /// "navigate …"; `None` when no known destination was mentioned.
    Navigate(Option<Destination>),
    /// Nothing actionable.
    Unrecognized,
}

/// Interprets transcripts against the configured wake phrases.
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    wake_phrases: Vec<String>,
}

impl CommandInterpreter {
    pub fn new<S: AsRef<str>>(wake_phrases: &[S]) -> Self {
        Self {
            wake_phrases: wake_phrases
                .iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Classify `transcript` given the current `mode`.
    pub fn interpret(&self, transcript: &Transcript, mode: Mode) -> Command {
        if transcript.contains("switch camera") {
            Command::SwitchCamera
        } else if transcript.contains("stop") {
            Command::Stop
        } else if transcript.contains_any(&self.wake_phrases) {
            Command::Wake
        } else if mode == Mode::AwaitingDetectionConfirm && transcript.contains("yes") {
            Command::ConfirmDetection
        } else if transcript.contains("navigate") {
            Command::Navigate(Destination::resolve(transcript))
        } else {
            Command::Unrecognized
        }
    }
}
