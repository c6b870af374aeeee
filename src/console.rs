//! Terminal stand-ins for the host collaborators.
//!
//! The binary runs the assistant against these:
//!
//! | Collaborator | Console version |
//! |---|---|
//! | speech recognizer | one stdin line per final transcript |
//! | speech synthesizer | prints to stdout, "finishes" after a words-per-minute delay |
//! | camera | a solid grey frame |
//! | detection model | [`NoModelLoader`] unless an HTTP endpoint is configured |
//!
//! Two stdin lines are control input rather than speech: `!end` simulates the
//! recognition session ending and `!error <code>` simulates a recognizer
//! error (`no-speech`, `network`, `not-allowed`, ...).  End of input shuts the
//! assistant down.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::camera::{CameraError, CameraProvider, CameraRequest, CameraStream, Frame};
use crate::config::ConsoleConfig;
use crate::detect::{DetectError, Detection, ModelLoader, ObjectDetector};
use crate::pipeline::AssistantEvent;
use crate::stt::{RecognitionErrorCode, RecognizerError, RecognizerEvent, SpeechRecognizer};
use crate::tts::{SpeechSynthesizer, UtteranceId};

// ---------------------------------------------------------------------------
// ConsoleRecognizer
// ---------------------------------------------------------------------------

/// Reads "speech" from stdin on a dedicated OS thread.
///
/// Input is taken to be in the configured recognition language; it is only
/// echoed back, there is no translation.
///
/// The thread is spawned on the first [`start`](SpeechRecognizer::start) and
/// lives until stdin closes.  Lines read while the recognizer is stopped are
/// discarded, like audio spoken while a microphone is off.
pub struct ConsoleRecognizer {
    language: String,
    active: Arc<AtomicBool>,
    events: mpsc::Sender<AssistantEvent>,
    reader: Option<std::thread::JoinHandle<()>>,
}

impl ConsoleRecognizer {
    pub fn new(language: &str, events: mpsc::Sender<AssistantEvent>) -> Self {
        Self {
            language: language.to_string(),
            active: Arc::new(AtomicBool::new(false)),
            events,
            reader: None,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn spawn_reader(&self) -> std::io::Result<std::thread::JoinHandle<()>> {
        let active = Arc::clone(&self.active);
        let tx = self.events.clone();

        std::thread::Builder::new()
            .name("console-recognizer".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for line in stdin.lock().lines() {
                    let line = match line {
                        Ok(line) => line,
                        Err(e) => {
                            log::error!("console-recognizer: stdin read failed: {e}");
                            break;
                        }
                    };
                    let Some(event) = parse_line(&line) else {
                        continue;
                    };
                    if !active.load(Ordering::Relaxed) {
                        log::debug!("console-recognizer: not listening, dropped {line:?}");
                        continue;
                    }
                    if tx.blocking_send(AssistantEvent::Recognizer(event)).is_err() {
                        return;
                    }
                }
                log::info!("console-recognizer: end of input");
                let _ = tx.blocking_send(AssistantEvent::Shutdown);
            })
    }
}

impl SpeechRecognizer for ConsoleRecognizer {
    fn start(&mut self) -> Result<(), RecognizerError> {
        if self.reader.is_none() {
            let handle = self
                .spawn_reader()
                .map_err(|e| RecognizerError::Start(e.to_string()))?;
            self.reader = Some(handle);
        }
        self.active.store(true, Ordering::Relaxed);
        println!("[listening, {}]", self.language);
        Ok(())
    }

    fn stop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
    }
}

/// Map one input line to a recognizer event.  Blank lines produce nothing.
fn parse_line(line: &str) -> Option<RecognizerEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if line == "!end" {
        return Some(RecognizerEvent::End);
    }
    if let Some(code) = line.strip_prefix("!error") {
        let code = code.trim();
        let code = if code.is_empty() { "aborted" } else { code };
        return Some(RecognizerEvent::Error(RecognitionErrorCode::from_code(code)));
    }
    Some(RecognizerEvent::Result(line.to_string()))
}

// ---------------------------------------------------------------------------
// ConsoleSynthesizer
// ---------------------------------------------------------------------------

/// Prints utterances and reports them finished after a simulated speaking
/// time, one after another.
pub struct ConsoleSynthesizer {
    language: String,
    words_per_minute: u32,
    events: mpsc::Sender<AssistantEvent>,
    /// Bumped by `cancel`; completions from an older epoch are dropped.
    epoch: Arc<AtomicU64>,
    queued: Arc<AtomicUsize>,
    busy_until: Arc<Mutex<Option<Instant>>>,
}

impl ConsoleSynthesizer {
    pub fn new(config: &ConsoleConfig, language: &str, events: mpsc::Sender<AssistantEvent>) -> Self {
        Self {
            language: language.to_string(),
            words_per_minute: config.words_per_minute.max(1),
            events,
            epoch: Arc::new(AtomicU64::new(0)),
            queued: Arc::new(AtomicUsize::new(0)),
            busy_until: Arc::new(Mutex::new(None)),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn speaking_time(&self, text: &str) -> Duration {
        let words = text.split_whitespace().count().max(1) as u64;
        Duration::from_millis(words * 60_000 / u64::from(self.words_per_minute))
    }

    /// Reserve the next slot in the FIFO and return when it ends.
    fn schedule(&self, text: &str) -> Instant {
        let mut busy = self.busy_until.lock().unwrap_or_else(|p| p.into_inner());
        let now = Instant::now();
        let begin = match *busy {
            Some(until) if until > now => until,
            _ => now,
        };
        let end = begin + self.speaking_time(text);
        *busy = Some(end);
        end
    }
}

impl SpeechSynthesizer for ConsoleSynthesizer {
    fn speak(&mut self, id: UtteranceId, text: &str) {
        println!("[speech {}] {text}", self.language);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            log::warn!("console-synthesizer: no runtime, {id} will not report completion");
            return;
        };

        let done_at = self.schedule(text);
        let epoch = self.epoch.load(Ordering::SeqCst);
        self.queued.fetch_add(1, Ordering::SeqCst);

        let current_epoch = Arc::clone(&self.epoch);
        let queued = Arc::clone(&self.queued);
        let tx = self.events.clone();
        handle.spawn(async move {
            tokio::time::sleep_until(done_at).await;
            if current_epoch.load(Ordering::SeqCst) != epoch {
                return;
            }
            queued.fetch_sub(1, Ordering::SeqCst);
            let _ = tx.send(AssistantEvent::SpeechFinished(id)).await;
        });
    }

    fn cancel(&mut self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.queued.store(0, Ordering::SeqCst);
        *self.busy_until.lock().unwrap_or_else(|p| p.into_inner()) = None;
    }

    fn is_speaking(&self) -> bool {
        self.queued.load(Ordering::SeqCst) > 0
    }

    fn play_alert(&mut self) {
        println!("[alert] *ding*");
    }
}

// ---------------------------------------------------------------------------
// StillCamera
// ---------------------------------------------------------------------------

/// A camera that always shows the same uniformly grey frame.
pub struct StillCamera {
    frame: Frame,
}

impl StillCamera {
    pub fn new(config: &ConsoleConfig) -> Self {
        let luma = config.frame_luma;
        Self {
            frame: Frame::solid(config.frame_width, config.frame_height, [luma, luma, luma]),
        }
    }
}

#[async_trait]
impl CameraProvider for StillCamera {
    async fn open(&self, request: CameraRequest) -> Result<Box<dyn CameraStream>, CameraError> {
        log::debug!(
            "console-camera: {} camera requested at {}x{}",
            request.facing.label(),
            request.ideal_width,
            request.ideal_height
        );
        Ok(Box::new(StillStream {
            frame: Some(self.frame.clone()),
        }))
    }
}

struct StillStream {
    frame: Option<Frame>,
}

impl CameraStream for StillStream {
    fn current_frame(&self) -> Option<Frame> {
        self.frame.clone()
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

// ---------------------------------------------------------------------------
// NoModelLoader
// ---------------------------------------------------------------------------

/// Loads [`NoModelDetector`], which sees nothing.
pub struct NoModelLoader;

#[async_trait]
impl ModelLoader for NoModelLoader {
    async fn load(&self) -> Result<Arc<dyn ObjectDetector>, DetectError> {
        log::warn!("no detection endpoint configured; objects will never be reported");
        Ok(Arc::new(NoModelDetector))
    }
}

pub struct NoModelDetector;

#[async_trait]
impl ObjectDetector for NoModelDetector {
    async fn detect(&self, _frame: &Frame) -> Result<Vec<Detection>, DetectError> {
        Ok(Vec::new())
    }
}
