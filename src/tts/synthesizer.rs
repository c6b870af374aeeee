//! Text-to-speech engine interface.

use std::fmt;

/// Identifier assigned to each queued utterance.
///
/// Engines echo it back when the utterance finishes playing so the
/// [`SpeechQueue`](super::SpeechQueue) can run the matching completion action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A speech synthesis engine with an internal FIFO.
///
/// # Contract
///
/// - `speak` enqueues and returns immediately; utterances play in order.
/// - When an utterance finishes, the engine reports its id back to the
///   assistant (as `AssistantEvent::SpeechFinished`).
/// - `cancel` stops the current utterance and flushes the queue.  Engines may
///   still report ids of cancelled utterances; the queue ignores them.
pub trait SpeechSynthesizer: Send {
    fn speak(&mut self, id: UtteranceId, text: &str);

    fn cancel(&mut self);

    /// `true` while an utterance is playing or queued.
    fn is_speaking(&self) -> bool;

    /// Play the short alert chime used on wake.  Not queued, not reported.
    fn play_alert(&mut self) {}
}
