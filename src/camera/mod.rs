//! Camera capture.
//!
//! [`FrameSource`] is the only owner of the live stream.  The detection loop
//! reads frames through it; only the camera-switch command changes its
//! [`Facing`].

pub mod frame;
pub mod source;

pub use frame::Frame;
pub use source::{CameraError, CameraProvider, CameraRequest, CameraStream, Facing, FrameSource};
