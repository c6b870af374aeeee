//! Distance and direction heuristics.
//!
//! Distance is a proxy, not a measurement: the wider a box is relative to
//! the frame, the closer the object is assumed to be.

use super::result::BoundingBox;

/// Horizontal position of an object relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Ahead,
    Right,
}

impl Direction {
    /// Spoken form, e.g. "on your left".
    pub fn phrase(self) -> &'static str {
        match self {
            Direction::Left => "on your left",
            Direction::Ahead => "ahead",
            Direction::Right => "on your right",
        }
    }
}

/// `max(0, max_distance * (1 - box_width / frame_width))`, rounded to 2
/// decimals.  A zero-width frame yields `max_distance`.
pub fn estimate_distance(box_width: f32, frame_width: f32, max_distance: f32) -> f32 {
    let ratio = if frame_width > 0.0 {
        box_width / frame_width
    } else {
        0.0
    };
    let distance = (max_distance * (1.0 - ratio)).max(0.0);
    (distance * 100.0).round() / 100.0
}

/// Left third / middle third / right third by box centre.
///
/// The exact boundaries `W/3` and `2W/3` count as [`Direction::Ahead`].
pub fn direction_of(bbox: &BoundingBox, frame_width: f32) -> Direction {
    let center = bbox.center_x();
    if center < frame_width / 3.0 {
        Direction::Left
    } else if center > frame_width * 2.0 / 3.0 {
        Direction::Right
    } else {
        Direction::Ahead
    }
}
