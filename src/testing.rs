//! Test doubles for the host-provided collaborators.
//!
//! Every double is cheap to clone and all clones share state, so a test keeps
//! one handle for assertions and boxes another into the component under test.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::camera::{CameraError, CameraProvider, CameraRequest, CameraStream, Frame};
use crate::detect::{DetectError, Detection, ModelLoader, ObjectDetector};
use crate::pipeline::AssistantEvent;
use crate::stt::{RecognizerError, SpeechRecognizer};
use crate::tts::{SpeechSynthesizer, UtteranceId};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|p| p.into_inner())
}

// ---------------------------------------------------------------------------
// MockRecognizer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct RecognizerLog {
    starts: usize,
    stops: usize,
    fail_starts: bool,
}

/// Counts start/stop calls; can be told to fail starts.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    log: Arc<Mutex<RecognizerLog>>,
}

impl MockRecognizer {
    pub fn starts(&self) -> usize {
        lock(&self.log).starts
    }

    pub fn stops(&self) -> usize {
        lock(&self.log).stops
    }

    pub fn fail_starts(&self, fail: bool) {
        lock(&self.log).fail_starts = fail;
    }
}

impl SpeechRecognizer for MockRecognizer {
    fn start(&mut self) -> Result<(), RecognizerError> {
        let mut log = lock(&self.log);
        log.starts += 1;
        if log.fail_starts {
            return Err(RecognizerError::Start("already started".into()));
        }
        Ok(())
    }

    fn stop(&mut self) {
        lock(&self.log).stops += 1;
    }
}

// ---------------------------------------------------------------------------
// MockSynthesizer
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct SynthLog {
    spoken: Vec<(UtteranceId, String)>,
    cancels: usize,
    alerts: usize,
    speaking: bool,
}

/// Records utterances.  With [`auto_complete`](Self::auto_complete) every
/// utterance is reported finished through the assistant's channel as soon as
/// it is queued.
#[derive(Debug, Clone, Default)]
pub struct MockSynthesizer {
    log: Arc<Mutex<SynthLog>>,
    completions: Option<mpsc::Sender<AssistantEvent>>,
}

impl MockSynthesizer {
    pub fn auto_complete(events: mpsc::Sender<AssistantEvent>) -> Self {
        Self {
            log: Arc::default(),
            completions: Some(events),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        lock(&self.log).spoken.iter().map(|(_, t)| t.clone()).collect()
    }

    /// Id of the most recent utterance whose text equals `text`.
    pub fn id_of(&self, text: &str) -> Option<UtteranceId> {
        lock(&self.log)
            .spoken
            .iter()
            .rev()
            .find(|(_, t)| t == text)
            .map(|(id, _)| *id)
    }

    pub fn last_id(&self) -> Option<UtteranceId> {
        lock(&self.log).spoken.last().map(|(id, _)| *id)
    }

    pub fn cancels(&self) -> usize {
        lock(&self.log).cancels
    }

    pub fn alerts(&self) -> usize {
        lock(&self.log).alerts
    }

    pub fn set_speaking(&self, speaking: bool) {
        lock(&self.log).speaking = speaking;
    }
}

impl SpeechSynthesizer for MockSynthesizer {
    fn speak(&mut self, id: UtteranceId, text: &str) {
        lock(&self.log).spoken.push((id, text.to_string()));
        if let Some(tx) = &self.completions {
            let _ = tx.try_send(AssistantEvent::SpeechFinished(id));
        }
    }

    fn cancel(&mut self) {
        lock(&self.log).cancels += 1;
    }

    fn is_speaking(&self) -> bool {
        lock(&self.log).speaking
    }

    fn play_alert(&mut self) {
        lock(&self.log).alerts += 1;
    }
}

// ---------------------------------------------------------------------------
// MockCamera
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct CameraLog {
    frame: Option<Frame>,
    denied: bool,
    requests: Vec<CameraRequest>,
    stopped: usize,
}

/// Serves one shared frame; [`set_frame`](Self::set_frame) changes what every
/// open stream returns.
#[derive(Debug, Clone, Default)]
pub struct MockCamera {
    log: Arc<Mutex<CameraLog>>,
}

impl MockCamera {
    pub fn new(frame: Frame) -> Self {
        let camera = Self::default();
        camera.set_frame(frame);
        camera
    }

    /// A camera whose every open is refused.
    pub fn denied() -> Self {
        let camera = Self::default();
        lock(&camera.log).denied = true;
        camera
    }

    /// Refuse (or allow again) every following open.
    pub fn set_denied(&self, denied: bool) {
        lock(&self.log).denied = denied;
    }

    pub fn set_frame(&self, frame: Frame) {
        lock(&self.log).frame = Some(frame);
    }

    pub fn requests(&self) -> Vec<CameraRequest> {
        lock(&self.log).requests.clone()
    }

    pub fn stopped_streams(&self) -> usize {
        lock(&self.log).stopped
    }
}

#[async_trait]
impl CameraProvider for MockCamera {
    async fn open(&self, request: CameraRequest) -> Result<Box<dyn CameraStream>, CameraError> {
        let mut log = lock(&self.log);
        log.requests.push(request);
        if log.denied {
            return Err(CameraError::PermissionDenied);
        }
        Ok(Box::new(MockStream {
            log: Arc::clone(&self.log),
            stopped: false,
        }))
    }
}

struct MockStream {
    log: Arc<Mutex<CameraLog>>,
    stopped: bool,
}

impl CameraStream for MockStream {
    fn current_frame(&self) -> Option<Frame> {
        if self.stopped {
            return None;
        }
        lock(&self.log).frame.clone()
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            lock(&self.log).stopped += 1;
        }
    }
}

// ---------------------------------------------------------------------------
// MockDetector / MockLoader
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum DetectorBehavior {
    Respond(Result<Vec<Detection>, DetectError>),
    Panic,
    Hang,
}

/// Returns a configured response (or panics, or never returns) and counts
/// calls.
#[derive(Debug, Clone)]
pub struct MockDetector {
    behavior: Arc<Mutex<DetectorBehavior>>,
    calls: Arc<Mutex<usize>>,
}

impl MockDetector {
    pub fn ok(detections: Vec<Detection>) -> Self {
        Self {
            behavior: Arc::new(Mutex::new(DetectorBehavior::Respond(Ok(detections)))),
            calls: Arc::default(),
        }
    }

    pub fn respond(&self, response: Result<Vec<Detection>, DetectError>) {
        *lock(&self.behavior) = DetectorBehavior::Respond(response);
    }

    /// Every following call panics.
    pub fn panic_on_detect(&self) {
        *lock(&self.behavior) = DetectorBehavior::Panic;
    }

    /// Every following call never completes.
    pub fn hang_on_detect(&self) {
        *lock(&self.behavior) = DetectorBehavior::Hang;
    }

    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }
}

#[async_trait]
impl ObjectDetector for MockDetector {
    async fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        *lock(&self.calls) += 1;
        let behavior = lock(&self.behavior).clone();
        match behavior {
            DetectorBehavior::Respond(response) => response,
            DetectorBehavior::Panic => panic!("detector blew up"),
            DetectorBehavior::Hang => std::future::pending().await,
        }
    }
}

/// Hands out a [`MockDetector`] or fails.
pub struct MockLoader {
    detector: Option<MockDetector>,
}

impl MockLoader {
    pub fn ok(detector: MockDetector) -> Self {
        Self {
            detector: Some(detector),
        }
    }

    pub fn failing() -> Self {
        Self { detector: None }
    }
}

#[async_trait]
impl ModelLoader for MockLoader {
    async fn load(&self) -> Result<Arc<dyn ObjectDetector>, DetectError> {
        match &self.detector {
            Some(d) => Ok(Arc::new(d.clone())),
            None => Err(DetectError::Load("weights not found".into())),
        }
    }
}
