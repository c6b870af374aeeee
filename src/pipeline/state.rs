//! Assistant mode and the per-process session context.
//!
//! [`Mode`] is the single current operating state.  Only the assistant's
//! transition handlers change it.
//!
//! ```text
//! Idle ──wake phrase──▶ AwaitingDetectionConfirm ──"yes"──▶ Detection
//!  ▲  ──"navigate <destination>"──────────────────────────▶ Navigation
//!  │                                                          │
//!  ├──────────── navigation complete ◀────────────────────────┘
//!  └──────────── "stop" (from any mode)
//! ```

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// Mutually exclusive operating state of the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Listening for the wake phrase or a direct command.
    #[default]
    Idle,

    /// Wake phrase heard; waiting for "yes" to start detection.
    AwaitingDetectionConfirm,

    /// The detection loop is running.
    Detection,

    /// A navigation script is playing.
    Navigation,
}

impl Mode {
    /// A short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Idle => "Idle",
            Mode::AwaitingDetectionConfirm => "Awaiting confirmation",
            Mode::Detection => "Detection",
            Mode::Navigation => "Navigation",
        }
    }

    /// `true` for the two modes that own a running component.
    ///
    /// ```
    /// use vision_assist::pipeline::Mode;
    ///
    /// assert!(!Mode::Idle.is_running());
    /// assert!(!Mode::AwaitingDetectionConfirm.is_running());
    /// assert!(Mode::Detection.is_running());
    /// assert!(Mode::Navigation.is_running());
    /// ```
    pub fn is_running(&self) -> bool {
        matches!(self, Mode::Detection | Mode::Navigation)
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Session-wide state owned by the assistant.
///
/// Created at startup; [`reset`](Self::reset) is the "stop" transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub mode: Mode,
    /// The detection model has loaded.
    pub model_ready: bool,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to idle.  Model readiness survives.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_mode_is_idle() {
        assert_eq!(Mode::default(), Mode::Idle);
        assert_eq!(SessionContext::new().mode, Mode::Idle);
    }

    #[test]
    fn labels() {
        assert_eq!(Mode::Idle.label(), "Idle");
        assert_eq!(Mode::AwaitingDetectionConfirm.label(), "Awaiting confirmation");
        assert_eq!(Mode::Detection.label(), "Detection");
        assert_eq!(Mode::Navigation.label(), "Navigation");
    }

    #[test]
    fn reset_returns_to_idle_and_keeps_model() {
        let mut ctx = SessionContext {
            mode: Mode::Navigation,
            model_ready: true,
        };
        ctx.reset();
        assert_eq!(ctx.mode, Mode::Idle);
        assert!(ctx.model_ready);
    }
}
