//! Speech input adapter.
//!
//! ```text
//! host recognizer ──RecognizerEvent──▶ Assistant event loop
//!                                         │
//!        ┌────────────────────────────────┤
//!        ▼                                ▼
//!  ListeningSession                 Transcript::new
//!  (restart on end / transient      (trim + lowercase)
//!   error while listening)
//! ```

pub mod recognizer;
pub mod transcript;

pub use recognizer::{
    ListeningSession, RecognitionErrorCode, RecognizerError, RecognizerEvent, SpeechRecognizer,
};
pub use transcript::Transcript;
