//! Camera provider interface and the frame source that owns the live stream.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Frame;
use crate::config::CameraConfig;

// ---------------------------------------------------------------------------
// Facing
// ---------------------------------------------------------------------------

/// Which physical camera to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// User-facing camera.
    Front,
    /// Environment-facing camera.
    Back,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facing::Front => "front",
            Facing::Back => "back",
        }
    }
}

// ---------------------------------------------------------------------------
// CameraError
// ---------------------------------------------------------------------------

/// Errors from the camera subsystem.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    /// The user or platform refused camera access.
    #[error("camera access denied")]
    PermissionDenied,

    /// No camera matched the request or the device failed to open.
    #[error("camera unavailable: {0}")]
    Unavailable(String),

    /// A frame buffer had the wrong size.
    #[error("invalid frame: expected {expected} bytes, got {got}")]
    InvalidFrame { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Provider traits
// ---------------------------------------------------------------------------

/// Parameters for opening a camera stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraRequest {
    pub facing: Facing,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

/// Opens camera streams.  Opening may wait on a permission prompt.
#[async_trait]
pub trait CameraProvider: Send + Sync {
    async fn open(&self, request: CameraRequest) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// A live camera stream.
pub trait CameraStream: Send {
    /// The most recent frame, or `None` until the stream has data.
    fn current_frame(&self) -> Option<Frame>;

    /// Release the device.  Further calls to `current_frame` may return `None`.
    fn stop(&mut self);
}

// ---------------------------------------------------------------------------
// FrameSource
// ---------------------------------------------------------------------------

/// Exclusive owner of the active camera stream and the facing selection.
pub struct FrameSource {
    provider: Box<dyn CameraProvider>,
    stream: Option<Box<dyn CameraStream>>,
    facing: Facing,
    ideal_width: u32,
    ideal_height: u32,
}

impl FrameSource {
    pub fn new(provider: Box<dyn CameraProvider>, config: &CameraConfig) -> Self {
        Self {
            provider,
            stream: None,
            facing: config.facing,
            ideal_width: config.ideal_width,
            ideal_height: config.ideal_height,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    /// Open a stream for the current facing, replacing any existing one.
    pub async fn acquire(&mut self) -> Result<(), CameraError> {
        self.release();

        let request = CameraRequest {
            facing: self.facing,
            ideal_width: self.ideal_width,
            ideal_height: self.ideal_height,
        };
        log::debug!("camera: opening {} camera", self.facing.label());

        let stream = self.provider.open(request).await?;
        self.stream = Some(stream);
        log::info!("camera: {} camera ready", self.facing.label());
        Ok(())
    }

    /// Toggle front/back and reopen.  Returns the new facing.
    ///
    /// The facing stays toggled even if reopening fails, so a retry targets
    /// the camera the user asked for.
    pub async fn switch_facing(&mut self) -> Result<Facing, CameraError> {
        self.facing = self.facing.toggled();
        self.acquire().await?;
        Ok(self.facing)
    }

    pub fn current_frame(&self) -> Option<Frame> {
        self.stream.as_ref().and_then(|s| s.current_frame())
    }

    /// Stop and drop the current stream, if any.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
    }
}
