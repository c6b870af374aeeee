//! Object detection model interfaces.
//!
//! The assistant never implements inference itself.  A [`ModelLoader`]
//! produces a ready [`ObjectDetector`] once at startup; the detection loop
//! then calls [`ObjectDetector::detect`] from a spawned task, so the detector
//! is shared as `Arc<dyn ObjectDetector>`.

use std::sync::Arc;

use async_trait::async_trait;

use super::result::{DetectError, Detection};
use crate::camera::Frame;

/// A loaded, ready-to-use detection model.
#[async_trait]
pub trait ObjectDetector: Send + Sync {
    /// Detect objects in `frame`.  Boxes are in frame-pixel coordinates.
    async fn detect(&self, frame: &Frame) -> Result<Vec<Detection>, DetectError>;
}

/// Loads a detection model.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn ObjectDetector>, DetectError>;
}
