//! Frame brightness and lighting classification.

use crate::camera::Frame;

/// Average luma of an RGBA frame (BT.601 weights, alpha ignored).
///
/// Returns `0.0` for an empty frame.
///
/// ```
/// use vision_assist::camera::Frame;
/// use vision_assist::detect::average_luma;
///
/// let white = Frame::solid(2, 2, [255, 255, 255]);
/// assert!((average_luma(&white) - 255.0).abs() < 0.01);
/// ```
pub fn average_luma(frame: &Frame) -> f32 {
    let count = frame.pixel_count();
    if count == 0 {
        return 0.0;
    }
    let sum: f64 = frame
        .pixels()
        .chunks_exact(Frame::BYTES_PER_PIXEL)
        .map(|p| 0.299 * p[0] as f64 + 0.587 * p[1] as f64 + 0.114 * p[2] as f64)
        .sum();
    (sum / count as f64) as f32
}

/// Lighting condition of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lighting {
    /// Too dark to run the model.
    Dark,
    /// Model runs, but the user is warned.
    Low,
    Normal,
}

/// Luma thresholds separating [`Lighting`] classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingThresholds {
    /// Below this: [`Lighting::Dark`].
    pub dark: f32,
    /// Below this (and not dark): [`Lighting::Low`].
    pub low: f32,
}

impl Default for LightingThresholds {
    fn default() -> Self {
        Self {
            dark: 20.0,
            low: 50.0,
        }
    }
}

impl LightingThresholds {
    pub fn classify(&self, brightness: f32) -> Lighting {
        if brightness < self.dark {
            Lighting::Dark
        } else if brightness < self.low {
            Lighting::Low
        } else {
            Lighting::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn black_frame_is_zero() {
        assert_eq!(average_luma(&Frame::solid(8, 8, [0, 0, 0])), 0.0);
    }

    #[test]
    fn empty_frame_is_zero() {
        assert_eq!(average_luma(&Frame::solid(0, 0, [255, 255, 255])), 0.0);
    }

    #[test]
    fn channels_are_weighted() {
        let red = average_luma(&Frame::solid(2, 2, [100, 0, 0]));
        let green = average_luma(&Frame::solid(2, 2, [0, 100, 0]));
        let blue = average_luma(&Frame::solid(2, 2, [0, 0, 100]));
        assert!((red - 29.9).abs() < 0.01);
        assert!((green - 58.7).abs() < 0.01);
        assert!((blue - 11.4).abs() < 0.01);
    }

    #[test]
    fn mixed_frame_averages_over_pixels() {
        // One white pixel and one black pixel.
        let frame = Frame::from_rgba(2, 1, vec![255, 255, 255, 255, 0, 0, 0, 255]).unwrap();
        assert!((average_luma(&frame) - 127.5).abs() < 0.01);
    }

    #[test]
    fn classify_boundaries() {
        let t = LightingThresholds::default();
        assert_eq!(t.classify(0.0), Lighting::Dark);
        assert_eq!(t.classify(19.99), Lighting::Dark);
        assert_eq!(t.classify(20.0), Lighting::Low);
        assert_eq!(t.classify(49.99), Lighting::Low);
        assert_eq!(t.classify(50.0), Lighting::Normal);
        assert_eq!(t.classify(255.0), Lighting::Normal);
    }
}
