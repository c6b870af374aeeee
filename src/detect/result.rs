//! Detection values produced by the model and the reports derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::Direction;

/// Axis-aligned box in frame-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Horizontal centre.
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// One object reported by the model for a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Class label, e.g. `"person"`.
    pub class: String,
    /// Confidence in `[0, 1]`.
    pub score: f32,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(class: impl Into<String>, score: f32, bbox: BoundingBox) -> Self {
        Self {
            class: class.into(),
            score,
            bbox,
        }
    }
}

/// A detection placed relative to the user, ready to render and speak.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub class: String,
    pub score: f32,
    pub bbox: BoundingBox,
    /// Estimated distance in meters, rounded to 2 decimals.
    pub distance_m: f32,
    pub direction: Direction,
}

impl DetectionReport {
    /// Sentence used both in the detection list and for speech.
    ///
    /// ```
    /// use vision_assist::detect::{BoundingBox, DetectionReport, Direction};
    ///
    /// let report = DetectionReport {
    ///     class: "chair".into(),
    ///     score: 0.8,
    ///     bbox: BoundingBox::new(0.0, 0.0, 10.0, 10.0),
    ///     distance_m: 1.5,
    ///     direction: Direction::Left,
    /// };
    /// assert_eq!(report.sentence(), "A chair is approximately 1.50 meters on your left.");
    /// ```
    pub fn sentence(&self) -> String {
        format!(
            "A {} is approximately {:.2} meters {}.",
            self.class,
            self.distance_m,
            self.direction.phrase()
        )
    }

    /// Short overlay caption, e.g. `person (87%)`.
    pub fn overlay_label(&self) -> String {
        format!("{} ({}%)", self.class, (self.score * 100.0).round() as i32)
    }
}

/// Errors from loading or running the detection model.
#[derive(Debug, Clone, Error)]
pub enum DetectError {
    /// The model could not be loaded.
    #[error("model load failed: {0}")]
    Load(String),

    /// Inference on a frame failed.
    #[error("inference failed: {0}")]
    Inference(String),

    /// Transport error talking to a remote backend.
    #[error("detection request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("detection request timed out")]
    Timeout,

    /// The backend response could not be parsed.
    #[error("failed to parse detection response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for DetectError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            DetectError::Timeout
        } else {
            DetectError::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(score: f32) -> DetectionReport {
        DetectionReport {
            class: "person".into(),
            score,
            bbox: BoundingBox::new(0.0, 0.0, 1.0, 1.0),
            distance_m: 2.25,
            direction: Direction::Ahead,
        }
    }

    #[test]
    fn sentence_formats_distance_with_two_decimals() {
        assert_eq!(
            report(0.5).sentence(),
            "A person is approximately 2.25 meters ahead."
        );
    }

    #[test]
    fn overlay_label_rounds_score_to_percent() {
        assert_eq!(report(0.874).overlay_label(), "person (87%)");
        assert_eq!(report(0.875).overlay_label(), "person (88%)");
        assert_eq!(report(1.0).overlay_label(), "person (100%)");
    }

    #[test]
    fn center_x_is_midpoint() {
        assert_eq!(BoundingBox::new(10.0, 0.0, 20.0, 5.0).center_x(), 20.0);
    }
}
