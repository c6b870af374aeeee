//! Video frames handed from the camera to the detection loop.

use std::sync::Arc;

use super::CameraError;

/// A single RGBA video frame.
///
/// Pixel data is reference-counted so a frame can be cloned cheaply into an
/// inference task while the camera keeps producing new ones.
#[derive(Clone)]
pub struct Frame {
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Frame {
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap tightly packed RGBA bytes.
    ///
    /// # Errors
    ///
    /// [`CameraError::InvalidFrame`] when `pixels.len() != width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, CameraError> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(CameraError::InvalidFrame {
                expected,
                got: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// A frame filled with a single opaque colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(count * Self::BYTES_PER_PIXEL);
        for _ in 0..count {
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        Self {
            width,
            height,
            pixels: pixels.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba_checks_length() {
        assert!(Frame::from_rgba(2, 2, vec![0; 16]).is_ok());
        let err = Frame::from_rgba(2, 2, vec![0; 12]).unwrap_err();
        assert!(matches!(err, CameraError::InvalidFrame { expected: 16, got: 12 }));
    }

    #[test]
    fn solid_fills_every_pixel() {
        let frame = Frame::solid(3, 2, [10, 20, 30]);
        assert_eq!(frame.pixel_count(), 6);
        assert_eq!(frame.pixels().len(), 24);
        assert!(frame.pixels().chunks(4).all(|p| p == [10, 20, 30, 255]));
    }

    #[test]
    fn clones_share_pixels() {
        let frame = Frame::solid(4, 4, [1, 2, 3]);
        let copy = frame.clone();
        assert!(std::ptr::eq(frame.pixels().as_ptr(), copy.pixels().as_ptr()));
    }
}
