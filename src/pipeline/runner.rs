//! Assistant orchestrator: the mode/command state machine.
//!
//! [`Assistant`] owns every component and is driven by one tokio task:
//!
//! ```text
//!                   ┌──────────── AssistantEvent (mpsc) ────────────┐
//! recognizer ──────▶│ Recognizer(Result | Error | End)              │
//! synthesizer ─────▶│ SpeechFinished(id)                            │
//! inference task ──▶│ DetectionFinished { generation, result }      │
//!                   └───────────────────────┬───────────────────────┘
//!                                           ▼
//!                         Assistant::run()  tokio::select! {
//!                             event,
//!                             sleep_until(next detection tick),
//!                             sleep_until(next navigation step),
//!                         }
//! ```
//!
//! Timers are deadlines, not spawned tasks: cancelling one means clearing
//! the deadline, which happens synchronously inside a transition handler.
//! Completion callbacks are data ([`AfterSpeech`]) handed back by the
//! [`SpeechQueue`], so there are no callback chains.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::camera::{CameraError, CameraProvider, Facing, Frame, FrameSource};
use crate::config::AppConfig;
use crate::detect::{
    DetectError, Detection, DetectionLoop, Lighting, ModelLoader, ObjectDetector, TickPlan,
};
use crate::display::Display;
use crate::navigation::{NavAction, NavigationPlayer, NavigationScript, StepTicket};
use crate::stt::{ListeningSession, RecognizerEvent, SpeechRecognizer, Transcript};
use crate::tts::{SpeechQueue, SpeechSynthesizer, UtteranceId};

use super::command::{Command, CommandInterpreter};
use super::state::{Mode, SessionContext};

// ---------------------------------------------------------------------------
// User-facing text
// ---------------------------------------------------------------------------

const IDLE_STATUS: &str = "Say 'Hey Vision' to start";
const LOADING_STATUS: &str = "Loading AI models...";
const READY_STATUS: &str = "Models loaded. Say 'Hey Vision' to start.";
const MODEL_FAILED_STATUS: &str = "Error: Failed to load models.";
const MODEL_FAILED_SPEECH: &str =
    "An error occurred while loading the AI models. Please try again later.";
const CAMERA_DENIED_STATUS: &str = "Error: Camera access denied.";
const CAMERA_DENIED_SPEECH: &str =
    "Error: Camera access denied. Please grant permission to continue.";
const CAMERA_UNAVAILABLE_STATUS: &str = "Error: Camera unavailable.";
const CAMERA_UNAVAILABLE_SPEECH: &str = "Error: The camera is not available.";

const STOP_SPEECH: &str = "Stopping all functions. I am now in standby mode.";
const WAKE_SPEECH: &str = "Yes? Do you want to start detection?";
const CONFIRM_PROMPT: &str = "Say 'yes' to start detection.";
const START_DETECTION_SPEECH: &str = "Starting detection.";
const SWITCH_CAMERA_SPEECH: &str = "Switching camera.";
const CAMERA_SWITCHED_STATUS: &str = "Camera switched. Starting detection...";
const ASK_DESTINATION_SPEECH: &str =
    "Please specify a destination, like hospital, medical store, home, or garden.";
const ASK_DESTINATION_PROMPT: &str = "Please specify a destination.";
const NAVIGATION_COMPLETE_SPEECH: &str =
    "Navigation complete. I'm now waiting for your next command.";

const DETECTION_STATUS: &str = "Detection mode active.";
const DARK_STATUS: &str = "It's totally dark, can't detect anything.";
const LOW_LIGHT_STATUS: &str = "Low light detected. Trying to detect...";
const NO_OBJECTS_STATUS: &str = "No objects detected.";

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Everything that can wake the assistant's event loop.
#[derive(Debug)]
pub enum AssistantEvent {
    /// Output of the speech recognizer.
    Recognizer(RecognizerEvent),
    /// The synthesizer finished an utterance.
    SpeechFinished(UtteranceId),
    /// A spawned inference returned.
    DetectionFinished {
        generation: u64,
        frame_width: u32,
        result: Result<Vec<Detection>, DetectError>,
    },
    /// Stop the event loop.
    Shutdown,
}

/// What to do once a particular utterance has been spoken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterSpeech {
    ShowDetectionPrompt,
    StartDetection,
    NavigationStep(StepTicket),
}

/// Why [`Assistant::start`] could not bring the assistant up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    ModelLoad(#[from] DetectError),
}

/// Host-provided collaborators.
pub struct Collaborators {
    pub recognizer: Box<dyn SpeechRecognizer>,
    pub synthesizer: Box<dyn SpeechSynthesizer>,
    pub camera: Box<dyn CameraProvider>,
    pub display: Box<dyn Display>,
}

// ---------------------------------------------------------------------------
// Assistant
// ---------------------------------------------------------------------------

/// The voice-controlled assistant.
///
/// Create with [`Assistant::new`], bring up camera and model with
/// [`start`](Self::start), then drive it with [`run`](Self::run).
///
/// ```rust,no_run
/// use tokio::sync::mpsc;
/// use vision_assist::config::AppConfig;
/// use vision_assist::pipeline::{Assistant, Collaborators};
///
/// # async fn example(collaborators: Collaborators, loader: &dyn vision_assist::detect::ModelLoader) {
/// let (events_tx, events_rx) = mpsc::channel(64);
/// let mut assistant = Assistant::new(&AppConfig::default(), collaborators, events_tx);
/// if let Err(e) = assistant.start(loader).await {
///     log::error!("startup failed: {e}");
/// }
/// assistant.run(events_rx).await;
/// # }
/// ```
pub struct Assistant {
    session: SessionContext,
    interpreter: CommandInterpreter,
    listener: ListeningSession,
    speech: SpeechQueue<AfterSpeech>,
    frames: FrameSource,
    detector: Option<Arc<dyn ObjectDetector>>,
    inference_timeout: Duration,
    detection: DetectionLoop,
    navigation: NavigationPlayer,
    display: Box<dyn Display>,
    map_embed_url: String,
    events: mpsc::Sender<AssistantEvent>,
}

impl Assistant {
    /// Build an assistant.  `events` must feed the receiver later passed to
    /// [`run`](Self::run); inference results are posted through it.
    pub fn new(
        config: &AppConfig,
        collaborators: Collaborators,
        events: mpsc::Sender<AssistantEvent>,
    ) -> Self {
        let Collaborators {
            recognizer,
            synthesizer,
            camera,
            display,
        } = collaborators;

        Self {
            session: SessionContext::new(),
            interpreter: CommandInterpreter::new(&config.speech.wake_phrases),
            listener: ListeningSession::new(recognizer),
            speech: SpeechQueue::new(synthesizer),
            frames: FrameSource::new(camera, &config.camera),
            detector: None,
            inference_timeout: config.model.timeout(),
            detection: DetectionLoop::new(&config.detection),
            navigation: NavigationPlayer::new(config.navigation.step_delay()),
            display,
            map_embed_url: config.navigation.map_embed_url.clone(),
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.session.mode
    }

    pub fn is_ready(&self) -> bool {
        self.session.model_ready
    }

    pub fn is_listening(&self) -> bool {
        self.listener.is_listening()
    }

    pub fn is_detecting(&self) -> bool {
        self.detection.is_active()
    }

    pub fn is_navigating(&self) -> bool {
        self.navigation.is_active()
    }

    pub fn facing(&self) -> Facing {
        self.frames.facing()
    }

    // -----------------------------------------------------------------------
    // Startup
    // -----------------------------------------------------------------------

    /// Open the camera, load the model and start listening.
    ///
    /// Failures are shown and spoken before being returned; the assistant is
    /// left not ready and not listening.
    pub async fn start(&mut self, loader: &dyn ModelLoader) -> Result<(), StartupError> {
        if let Err(e) = self.frames.acquire().await {
            self.report_camera_error(&e);
            return Err(e.into());
        }

        self.display.set_loading(true);
        self.display.set_status(LOADING_STATUS);

        match loader.load().await {
            Ok(detector) => {
                self.detector = Some(detector);
                self.session.model_ready = true;
                self.display.set_loading(false);
                self.display.set_status(READY_STATUS);
                self.start_listening();
                Ok(())
            }
            Err(e) => {
                log::error!("assistant: failed to load detection model: {e}");
                self.display.set_loading(false);
                self.display.set_status(MODEL_FAILED_STATUS);
                self.speech.say(MODEL_FAILED_SPEECH);
                Err(e.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until [`AssistantEvent::Shutdown`] arrives or every sender is
    /// dropped.
    pub async fn run(mut self, mut events: mpsc::Receiver<AssistantEvent>) {
        loop {
            let tick_due = self.detection.next_tick();
            let step_due = self.navigation.deadline();

            tokio::select! {
                event = events.recv() => match event {
                    Some(AssistantEvent::Shutdown) | None => break,
                    Some(event) => self.handle_event(event).await,
                },
                _ = sleep_until_opt(tick_due) => self.on_detection_tick(),
                _ = sleep_until_opt(step_due) => self.on_navigation_due(),
            }
        }

        self.shutdown();
        log::info!("assistant: event loop finished");
    }

    /// Dispatch one event.
    pub async fn handle_event(&mut self, event: AssistantEvent) {
        match event {
            AssistantEvent::Recognizer(RecognizerEvent::Result(text)) => {
                self.handle_transcript(&text).await;
            }
            AssistantEvent::Recognizer(RecognizerEvent::Error(code)) => {
                self.listener.on_error(&code);
            }
            AssistantEvent::Recognizer(RecognizerEvent::End) => {
                self.listener.on_end();
            }
            AssistantEvent::SpeechFinished(id) => self.on_speech_finished(id),
            AssistantEvent::DetectionFinished {
                generation,
                frame_width,
                result,
            } => self.on_detection_finished(generation, frame_width, result),
            AssistantEvent::Shutdown => self.shutdown(),
        }
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Interpret one recognized utterance.  At most one mode transition.
    pub async fn handle_transcript(&mut self, raw: &str) {
        let Some(transcript) = Transcript::new(raw) else {
            return;
        };
        log::info!("heard: {transcript}");

        match self.interpreter.interpret(&transcript, self.session.mode) {
            Command::SwitchCamera => self.switch_camera().await,
            Command::Stop => self.stop_all(),
            Command::Wake => self.wake(),
            Command::ConfirmDetection => self.confirm_detection(),
            Command::Navigate(Some(destination)) => {
                self.speech
                    .say(&format!("Navigating to the nearest {}.", destination.name()));
                self.start_navigation(destination.name());
                self.display.show_prompt(None);
            }
            Command::Navigate(None) => {
                self.speech.say(ASK_DESTINATION_SPEECH);
                self.display.show_prompt(Some(ASK_DESTINATION_PROMPT));
            }
            Command::Unrecognized => {
                if self.session.mode == Mode::Idle {
                    self.display.set_status(IDLE_STATUS);
                }
            }
        }
    }

    /// Enter navigation mode and play the script for `destination`.
    ///
    /// Unknown destinations play a single apology step.
    pub fn start_navigation(&mut self, destination: &str) {
        log::info!("assistant: navigating to {destination}");
        self.stop_detection();

        self.session.mode = Mode::Navigation;
        self.display.show_map(Some(&self.map_embed_url));
        self.display.set_status(&format!("Navigating to {destination}."));

        let action = self.navigation.start(NavigationScript::for_name(destination));
        self.perform_navigation(action);
    }

    fn wake(&mut self) {
        log::debug!("assistant: wake phrase");
        self.speech.play_alert();
        self.speech
            .say_then(WAKE_SPEECH, AfterSpeech::ShowDetectionPrompt);
        self.session.mode = Mode::AwaitingDetectionConfirm;
    }

    fn confirm_detection(&mut self) {
        self.stop_navigation();
        self.session.mode = Mode::Detection;
        self.display.show_prompt(None);
        self.speech
            .say_then(START_DETECTION_SPEECH, AfterSpeech::StartDetection);
    }

    /// "stop": everything off, back to idle, and a fresh recognizer session
    /// listening for the wake phrase.  Idempotent.
    fn stop_all(&mut self) {
        log::info!("assistant: stopping all functions");
        self.stop_detection();
        self.stop_navigation();
        self.speech.cancel_all();
        self.speech.say(STOP_SPEECH);

        self.session.reset();
        self.display.set_status(IDLE_STATUS);
        self.display.show_prompt(None);
        self.display.clear_detections();

        self.listener.stop();
        self.start_listening();
    }

    async fn switch_camera(&mut self) {
        let was_detecting = self.detection.is_active();
        let was_listening = self.listener.is_listening();

        self.speech.say(SWITCH_CAMERA_SPEECH);
        self.detection.stop();
        if was_listening {
            self.listener.stop();
        }

        let switched = match self.frames.switch_facing().await {
            Ok(facing) => {
                log::info!("assistant: switched to {} camera", facing.label());
                true
            }
            Err(e) => {
                self.report_camera_error(&e);
                false
            }
        };

        // Without a stream the resumed loop idles until a later switch succeeds.
        if was_detecting && self.session.mode == Mode::Detection {
            if switched {
                self.display.set_status(CAMERA_SWITCHED_STATUS);
            }
            self.detection.start(Instant::now());
        }
        if was_listening {
            self.start_listening();
        }
    }

    // -----------------------------------------------------------------------
    // Detection
    // -----------------------------------------------------------------------

    fn start_detection(&mut self) {
        log::info!("assistant: starting detection");
        self.stop_navigation();
        self.display.show_detection_panel(true);
        self.display.clear_detections();
        self.display.set_status(DETECTION_STATUS);
        self.detection.start(Instant::now());
    }

    fn stop_detection(&mut self) {
        self.detection.stop();
        self.display.show_detection_panel(false);
    }

    /// Handle a due detection tick.
    pub fn on_detection_tick(&mut self) {
        let frame = self.frames.current_frame();
        let detector = self.detector.clone();
        let plan = self
            .detection
            .on_tick(Instant::now(), frame.as_ref(), self.session.model_ready && detector.is_some());

        match plan {
            TickPlan::Inactive | TickPlan::NotReady => {}
            TickPlan::Busy => log::debug!("detect: previous inference still running, skipping tick"),
            TickPlan::TooDark { brightness } => {
                log::debug!("detect: too dark (brightness {brightness:.1})");
                self.display.set_status(DARK_STATUS);
                self.display.clear_detections();
            }
            TickPlan::Infer {
                generation,
                lighting,
                brightness,
            } => {
                if lighting == Lighting::Low {
                    log::debug!("detect: low light (brightness {brightness:.1})");
                    self.display.set_status(LOW_LIGHT_STATUS);
                }
                if let (Some(detector), Some(frame)) = (detector, frame) {
                    let events = self.events.clone();
                    let timeout = self.inference_timeout;
                    tokio::spawn(async move {
                        let frame_width = frame.width();
                        let result = run_inference(detector, frame, timeout).await;
                        let _ = events
                            .send(AssistantEvent::DetectionFinished {
                                generation,
                                frame_width,
                                result,
                            })
                            .await;
                    });
                }
            }
        }
    }

    fn on_detection_finished(
        &mut self,
        generation: u64,
        frame_width: u32,
        result: Result<Vec<Detection>, DetectError>,
    ) {
        if !self.detection.finish(generation) {
            log::debug!("detect: dropping stale result for generation {generation}");
            return;
        }

        let detections = match result {
            Ok(detections) => detections,
            Err(e) => {
                log::error!("detect: {e}");
                return;
            }
        };

        self.display.clear_detections();
        if detections.is_empty() {
            self.display.set_status(NO_OBJECTS_STATUS);
            return;
        }
        self.display.set_status(DETECTION_STATUS);

        let reports = self.detection.describe(&detections, frame_width);
        self.display.render_detections(&reports);

        let busy = self.speech.is_speaking();
        if let Some(sentence) = self.detection.pick_announcement(&reports, busy, Instant::now()) {
            self.speech.say(&sentence);
        }
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    fn stop_navigation(&mut self) {
        self.navigation.stop();
        self.display.show_map(None);
    }

    /// Handle the navigation step deadline.
    pub fn on_navigation_due(&mut self) {
        if let Some(action) = self.navigation.on_due(Instant::now()) {
            self.perform_navigation(action);
        }
    }

    fn perform_navigation(&mut self, action: NavAction) {
        match action {
            NavAction::Speak { text, ticket } => {
                self.speech.say_then(text, AfterSpeech::NavigationStep(ticket));
            }
            NavAction::Complete => {
                log::info!("assistant: navigation complete");
                self.speech.say(NAVIGATION_COMPLETE_SPEECH);
                if self.session.mode == Mode::Navigation {
                    self.session.reset();
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Speech completions
    // -----------------------------------------------------------------------

    fn on_speech_finished(&mut self, id: UtteranceId) {
        match self.speech.finished(id) {
            Some(AfterSpeech::ShowDetectionPrompt) => {
                if self.session.mode == Mode::AwaitingDetectionConfirm {
                    self.display.show_prompt(Some(CONFIRM_PROMPT));
                }
            }
            Some(AfterSpeech::StartDetection) => {
                if self.session.mode == Mode::Detection {
                    self.start_detection();
                }
            }
            Some(AfterSpeech::NavigationStep(ticket)) => {
                self.navigation.step_spoken(ticket, Instant::now());
            }
            None => {}
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    fn start_listening(&mut self) {
        self.listener.start();
        self.display.set_listening(self.listener.is_listening());
    }

    fn report_camera_error(&mut self, error: &CameraError) {
        log::error!("camera: {error}");
        let (status, speech) = match error {
            CameraError::PermissionDenied => (CAMERA_DENIED_STATUS, CAMERA_DENIED_SPEECH),
            _ => (CAMERA_UNAVAILABLE_STATUS, CAMERA_UNAVAILABLE_SPEECH),
        };
        self.display.set_status(status);
        self.speech.say(speech);
    }

    fn shutdown(&mut self) {
        self.detection.stop();
        self.navigation.stop();
        self.listener.stop();
        self.speech.cancel_all();
        self.frames.release();
        self.display.set_listening(false);
    }
}

/// Run one inference on its own task so a panicking or stalled detector
/// still produces a result for its generation.
async fn run_inference(
    detector: Arc<dyn ObjectDetector>,
    frame: Frame,
    timeout: Duration,
) -> Result<Vec<Detection>, DetectError> {
    let mut inference = tokio::spawn(async move { detector.detect(&frame).await });

    match tokio::time::timeout(timeout, &mut inference).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => Err(DetectError::Inference(format!("detector task failed: {e}"))),
        Err(_) => {
            inference.abort();
            Err(DetectError::Timeout)
        }
    }
}

/// Sleep until `deadline`, or forever when there is none.
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
