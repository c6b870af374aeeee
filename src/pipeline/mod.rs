//! Assistant orchestration: modes, voice commands and the event loop.
//!
//! # Architecture
//!
//! ```text
//! RecognizerEvent ─┐
//! SpeechFinished  ─┼─▶ mpsc::Receiver<AssistantEvent>
//! DetectionFinished┘          │
//!                             ▼
//!                   Assistant::run()  ← single tokio task
//!                             │
//!                             ├─ Transcript → CommandInterpreter → Command
//!                             │      ├─ Wake            → AwaitingDetectionConfirm
//!                             │      ├─ ConfirmDetection → Detection
//!                             │      ├─ Navigate(dest)  → Navigation
//!                             │      ├─ SwitchCamera    → FrameSource::switch_facing
//!                             │      └─ Stop            → Idle
//!                             │
//!                             ├─ detection tick → DetectionLoop → spawn detect()
//!                             └─ navigation due → NavigationPlayer → SpeechQueue
//!
//! Display ◀── status / prompt / panels, written by transition handlers only
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use tokio::sync::mpsc;
//! use vision_assist::config::AppConfig;
//! use vision_assist::console::{ConsoleRecognizer, ConsoleSynthesizer, NoModelLoader, StillCamera};
//! use vision_assist::display::SharedDisplay;
//! use vision_assist::pipeline::{Assistant, Collaborators};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let (tx, rx) = mpsc::channel(64);
//!
//!     let collaborators = Collaborators {
//!         recognizer: Box::new(ConsoleRecognizer::new(&config.speech.language, tx.clone())),
//!         synthesizer: Box::new(ConsoleSynthesizer::new(&config.console, &config.speech.language, tx.clone())),
//!         camera: Box::new(StillCamera::new(&config.console)),
//!         display: Box::new(SharedDisplay::new()),
//!     };
//!
//!     let mut assistant = Assistant::new(&config, collaborators, tx);
//!     if let Err(e) = assistant.start(&NoModelLoader).await {
//!         log::error!("startup failed: {e}");
//!     }
//!     assistant.run(rx).await;
//! }
//! ```

pub mod command;
pub mod runner;
pub mod state;

pub use command::{Command, CommandInterpreter};
pub use runner::{Assistant, AssistantEvent, Collaborators, StartupError};
pub use state::{Mode, SessionContext};
