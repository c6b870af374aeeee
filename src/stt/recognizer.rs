//! Continuous speech recognizer interface and the listening session that
//! keeps it alive.
//!
//! A [`SpeechRecognizer`] is a thin handle on a host recognition service.  It
//! only knows how to start and stop; everything it hears comes back as
//! [`RecognizerEvent`]s delivered through the assistant's event channel.
//!
//! [`ListeningSession`] owns the recognizer and the user's *intent* to listen.
//! While that intent is set, a transient error or an end-of-session event
//! restarts the recognizer so the user perceives a single unbroken session.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Events and error codes
// ---------------------------------------------------------------------------

/// Events a recognizer reports back to the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    /// A final transcript (raw, not yet normalized).
    Result(String),
    /// The recognition service reported an error.
    Error(RecognitionErrorCode),
    /// The recognition session ended.
    End,
}

/// Error categories reported by the recognition service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionErrorCode {
    NoSpeech,
    Network,
    ServiceNotAllowed,
    Aborted,
    AudioCapture,
    NotAllowed,
    Other(String),
}

impl RecognitionErrorCode {
    /// Map a service error code (e.g. `"no-speech"`) to a category.
    ///
    /// ```
    /// use vision_assist::stt::RecognitionErrorCode;
    ///
    /// assert_eq!(RecognitionErrorCode::from_code("network"), RecognitionErrorCode::Network);
    /// assert!(RecognitionErrorCode::from_code("no-speech").is_transient());
    /// assert!(!RecognitionErrorCode::from_code("not-allowed").is_transient());
    /// ```
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Errors that are recovered by restarting the recognizer.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NoSpeech | Self::Network | Self::ServiceNotAllowed)
    }
}

/// Failure to start a recognizer session.
#[derive(Debug, Clone, Error)]
pub enum RecognizerError {
    /// The host has no speech recognition support.
    #[error("speech recognition is not supported")]
    Unsupported,

    /// The service refused to start (e.g. a session is already running).
    #[error("failed to start speech recognition: {0}")]
    Start(String),
}

// ---------------------------------------------------------------------------
// SpeechRecognizer trait
// ---------------------------------------------------------------------------

/// Handle on a continuous speech-to-text service.
///
/// Implementations deliver results asynchronously as [`RecognizerEvent`]s;
/// neither method blocks waiting for speech.
pub trait SpeechRecognizer: Send {
    /// Begin (or resume) a recognition session.
    fn start(&mut self) -> Result<(), RecognizerError>;

    /// End the current session.  Calling this when idle is a no-op.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// ListeningSession
// ---------------------------------------------------------------------------

/// Owns the recognizer and the intent to keep listening.
pub struct ListeningSession {
    recognizer: Box<dyn SpeechRecognizer>,
    listening: bool,
}

impl ListeningSession {
    pub fn new(recognizer: Box<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            listening: false,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Start listening.  Returns `false` when already listening.
    pub fn start(&mut self) -> bool {
        if self.listening {
            return false;
        }
        self.listening = true;
        self.launch();
        true
    }

    /// Stop listening and end the recognizer session.
    pub fn stop(&mut self) {
        self.listening = false;
        self.recognizer.stop();
    }

    /// React to a recognizer error.  Returns `true` if a restart was issued.
    pub fn on_error(&mut self, code: &RecognitionErrorCode) -> bool {
        if code.is_transient() && self.listening {
            log::debug!("stt: transient error {code:?}, restarting recognizer");
            self.launch();
            true
        } else {
            log::warn!("stt: recognizer error {code:?}");
            false
        }
    }

    /// React to the end of a recognizer session.  Returns `true` if a restart
    /// was issued.
    pub fn on_end(&mut self) -> bool {
        if self.listening {
            log::debug!("stt: session ended while listening, restarting");
            self.launch();
            true
        } else {
            false
        }
    }

    fn launch(&mut self) {
        if let Err(e) = self.recognizer.start() {
            log::warn!("stt: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
