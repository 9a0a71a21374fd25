//! Mapping from displayed canvas coordinates to image pixels.
//!
//! The canvas backing store is sized to the image, but CSS may scale the
//! element. Pointer events report offsets in displayed (CSS) pixels, so
//! each axis is scaled by `backing / displayed` before hit-testing.

use crate::types::{Dimensions, Point};

/// Backing and displayed size of the overlay canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Canvas backing width (image pixels).
    pub backing_width: f64,
    /// Canvas backing height (image pixels).
    pub backing_height: f64,
    /// Displayed width in CSS pixels.
    pub display_width: f64,
    /// Displayed height in CSS pixels.
    pub display_height: f64,
}

impl Viewport {
    /// Viewport for an image shown at the given CSS size.
    #[must_use]
    pub fn new(image: Dimensions, display_width: f64, display_height: f64) -> Self {
        Self {
            backing_width: f64::from(image.width),
            backing_height: f64::from(image.height),
            display_width,
            display_height,
        }
    }

    /// Convert an offset within the displayed element to image pixels.
    ///
    /// Returns `None` while the element has no layout size (hidden or
    /// not yet attached), since no meaningful scale exists.
    #[must_use]
    pub fn to_image(&self, x: f64, y: f64) -> Option<Point> {
        if self.display_width <= 0.0 || self.display_height <= 0.0 {
            return None;
        }
        Some(Point::new(
            x * self.backing_width / self.display_width,
            y * self.backing_height / self.display_height,
        ))
    }
}
