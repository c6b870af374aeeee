//! Vision Assist: a voice-controlled visual assistant.
//!
//! The assistant listens continuously for voice commands, describes objects
//! in front of the camera (with a rough distance and direction) and narrates
//! scripted walking directions to a handful of fixed destinations.
//!
//! Speech recognition, speech synthesis, the camera, the detection model and
//! the screen are host-provided collaborators behind traits; [`console`]
//! supplies terminal versions of each for the bundled binary.

pub mod camera;
pub mod config;
pub mod console;
pub mod detect;
pub mod display;
pub mod navigation;
pub mod pipeline;
pub mod stt;
pub mod tts;

#[cfg(test)]
pub(crate) mod testing;
