//! Speech output queue with per-utterance completion actions.
//!
//! Completion actions are plain data (`T`), not closures: the queue hands the
//! action back when the engine reports the utterance finished and the caller
//! decides what to do with it.  Cancelling drops every pending action, so an
//! action can never fire for an utterance that was cut off.

use std::collections::HashMap;

use super::synthesizer::{SpeechSynthesizer, UtteranceId};

/// Serializes spoken output and tracks completion actions.
pub struct SpeechQueue<T> {
    engine: Box<dyn SpeechSynthesizer>,
    next_id: u64,
    pending: HashMap<UtteranceId, T>,
}

impl<T> SpeechQueue<T> {
    pub fn new(engine: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            engine,
            next_id: 1,
            pending: HashMap::new(),
        }
    }

    /// Queue `text` with no completion action.
    pub fn say(&mut self, text: &str) -> UtteranceId {
        let id = self.allocate();
        log::debug!("tts: say {id}: {text}");
        self.engine.speak(id, text);
        id
    }

    /// Queue `text`; `then` is returned by [`finished`](Self::finished) once
    /// the engine reports this utterance done.
    pub fn say_then(&mut self, text: &str, then: T) -> UtteranceId {
        let id = self.allocate();
        log::debug!("tts: say {id} (with completion): {text}");
        self.pending.insert(id, then);
        self.engine.speak(id, text);
        id
    }

    /// Handle an engine completion report.
    ///
    /// Returns the action registered for `id`, at most once.  Unknown ids
    /// (no action, already consumed or cancelled) yield `None`.
    pub fn finished(&mut self, id: UtteranceId) -> Option<T> {
        self.pending.remove(&id)
    }

    /// Stop speaking now and drop all pending actions.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::debug!("tts: dropping {} pending completion(s)", self.pending.len());
        }
        self.pending.clear();
        self.engine.cancel();
    }

    pub fn is_speaking(&self) -> bool {
        self.engine.is_speaking()
    }

    pub fn play_alert(&mut self) {
        self.engine.play_alert();
    }

    /// Number of utterances still waiting on a completion action.
    pub fn pending_actions(&self) -> usize {
        self.pending.len()
    }

    fn allocate(&mut self) -> UtteranceId {
        let id = UtteranceId(self.next_id);
        self.next_id += 1;
        id
    }
}
