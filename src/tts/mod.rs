//! Speech output.
//!
//! * [`SpeechSynthesizer`]: host TTS engine (FIFO, reports completions).
//! * [`SpeechQueue`]: assigns [`UtteranceId`]s and keeps the completion
//!   action for each utterance until it finishes or is cancelled.

pub mod queue;
pub mod synthesizer;

pub use queue::SpeechQueue;
pub use synthesizer::{SpeechSynthesizer, UtteranceId};
