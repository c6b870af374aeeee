//! Display surface.
//!
//! The assistant only ever shows, hides and sets text on a handful of
//! widgets.  [`Display`] is that interface; [`SharedDisplay`] is an
//! in-memory implementation holding a [`DisplayState`] behind
//! `Arc<Mutex<…>>` that a UI (or a test) reads whenever it likes.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::detect::{BoundingBox, DetectionReport};

// ---------------------------------------------------------------------------
// Display trait
// ---------------------------------------------------------------------------

/// Everything the assistant can change on screen.
pub trait Display: Send {
    fn set_status(&mut self, text: &str);

    /// Animated "listening" indicator.
    fn set_listening(&mut self, active: bool);

    /// Confirmation prompt; `None` hides it.
    fn show_prompt(&mut self, text: Option<&str>);

    /// Detection info panel (list + overlay canvas).
    fn show_detection_panel(&mut self, visible: bool);

    /// Replace the detection list and overlay boxes.
    fn render_detections(&mut self, reports: &[DetectionReport]);

    fn clear_detections(&mut self) {
        self.render_detections(&[]);
    }

    /// Map panel with a static embed URL; `None` hides it.
    fn show_map(&mut self, embed_url: Option<&str>);

    fn set_loading(&mut self, loading: bool);
}

// ---------------------------------------------------------------------------
// DisplayState
// ---------------------------------------------------------------------------

/// One overlay box with its caption.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub bbox: BoundingBox,
    pub label: String,
}

/// Snapshot of everything on screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    pub status: String,
    pub listening: bool,
    pub prompt: Option<String>,
    pub detection_panel_visible: bool,
    /// One sentence per detection, in model order.
    pub detection_lines: Vec<String>,
    pub overlays: Vec<Overlay>,
    pub map_url: Option<String>,
    pub loading: bool,
}

// ---------------------------------------------------------------------------
// SharedDisplay
// ---------------------------------------------------------------------------

/// Cloneable handle on a [`DisplayState`].
///
/// Every clone sees the same state.  Locks are held only for the duration of
/// a single setter or [`snapshot`](Self::snapshot).
#[derive(Debug, Clone, Default)]
pub struct SharedDisplay {
    inner: Arc<Mutex<DisplayState>>,
}

impl SharedDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> DisplayState {
        self.state().clone()
    }

    fn state(&self) -> MutexGuard<'_, DisplayState> {
        // A panic while holding the lock cannot leave the plain-data state
        // half-written in a way that matters to readers.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Display for SharedDisplay {
    fn set_status(&mut self, text: &str) {
        let mut st = self.state();
        if st.status != text {
            log::info!("status: {text}");
            st.status = text.to_string();
        }
    }

    fn set_listening(&mut self, active: bool) {
        self.state().listening = active;
    }

    fn show_prompt(&mut self, text: Option<&str>) {
        self.state().prompt = text.map(str::to_string);
    }

    fn show_detection_panel(&mut self, visible: bool) {
        self.state().detection_panel_visible = visible;
    }

    fn render_detections(&mut self, reports: &[DetectionReport]) {
        let mut st = self.state();
        st.detection_lines = reports.iter().map(|r| r.sentence()).collect();
        st.overlays = reports
            .iter()
            .map(|r| Overlay {
                bbox: r.bbox,
                label: r.overlay_label(),
            })
            .collect();
    }

    fn show_map(&mut self, embed_url: Option<&str>) {
        self.state().map_url = embed_url.map(str::to_string);
    }

    fn set_loading(&mut self, loading: bool) {
        self.state().loading = loading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::Direction;

    #[test]
    fn clones_share_state() {
        let display = SharedDisplay::new();
        let mut writer = display.clone();

        writer.set_status("Detection mode active.");
        writer.show_prompt(Some("Say 'yes' to start detection."));
        writer.show_map(Some("https://example.org/map"));

        let st = display.snapshot();
        assert_eq!(st.status, "Detection mode active.");
        assert_eq!(st.prompt.as_deref(), Some("Say 'yes' to start detection."));
        assert_eq!(st.map_url.as_deref(), Some("https://example.org/map"));
    }

    #[test]
    fn render_and_clear_detections() {
        let mut display = SharedDisplay::new();
        let report = DetectionReport {
            class: "person".into(),
            score: 0.9,
            bbox: BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            distance_m: 2.5,
            direction: Direction::Left,
        };

        display.render_detections(&[report]);
        let st = display.snapshot();
        assert_eq!(
            st.detection_lines,
            vec!["A person is approximately 2.50 meters on your left."]
        );
        assert_eq!(st.overlays[0].label, "person (90%)");

        display.clear_detections();
        let st = display.snapshot();
        assert!(st.detection_lines.is_empty());
        assert!(st.overlays.is_empty());
    }

    #[test]
    fn shared_display_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedDisplay>();
    }
}
