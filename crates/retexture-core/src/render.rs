//! Render plan for the segmentation overlay.
//!
//! The canvas is redrawn from scratch on every state change. This module
//! decides *what* each mask looks like; `retexture-io` turns the plan
//! into 2D context calls. Keeping the decision here lets it be tested
//! without a browser.
//!
//! Per drawable mask, in registry order:
//!
//! 1. If its class has an applied texture with a generated image, the
//!    image is drawn clipped to the polygon and stretched to the
//!    polygon's bounding box.
//! 2. Otherwise, if its class is hovered, the polygon is filled with the
//!    mask color at [`HIGHLIGHT_ALPHA`] and the class label is drawn
//!    just above the first vertex.
//! 3. The outline is always stroked in the mask color,
//!    [`OUTLINE_WIDTH`] pixels wide.

use crate::geometry::Bounds;
use crate::store::AppliedTextures;
use crate::types::{Mask, Point, Rgb};

/// Fill alpha for the hovered mask.
pub const HIGHLIGHT_ALPHA: f64 = 0.3;

/// Outline stroke width in image pixels.
pub const OUTLINE_WIDTH: f64 = 2.0;

/// Vertical offset of the hover label above the first vertex.
pub const LABEL_OFFSET: f64 = 5.0;

/// CSS font for the hover label.
pub const LABEL_FONT: &str = "14px Arial";

/// CSS color for the hover label.
pub const LABEL_COLOR: &str = "black";

/// How the interior of a mask is painted.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill<'a> {
    /// Interior left untouched.
    None,
    /// Translucent color fill plus a text label.
    Highlight {
        /// Fill color (drawn at `alpha`).
        color: Rgb,
        /// Fill opacity.
        alpha: f64,
        /// Label text (the mask class).
        label: &'a str,
        /// Baseline-left position of the label.
        anchor: Point,
    },
    /// Generated texture clipped to the polygon.
    Texture {
        /// Image URL to draw.
        url: &'a str,
        /// Destination rectangle the image is stretched to.
        bounds: Bounds,
        /// Store revision of the applied texture being drawn.
        revision: u64,
    },
}

/// Everything needed to draw one mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<'a> {
    /// Mask class.
    pub class: &'a str,
    /// Closed polygon vertices.
    pub points: &'a [Point],
    /// Interior treatment.
    pub fill: Fill<'a>,
    /// Outline color.
    pub outline: Rgb,
}

/// Build the render plan for the current state.
///
/// Masks with fewer than three points produce no layer.
#[must_use]
pub fn plan<'a>(
    masks: &'a [Mask],
    hovered: Option<&str>,
    textures: &'a AppliedTextures,
) -> Vec<Layer<'a>> {
    masks
        .iter()
        .filter_map(|mask| {
            let bounds = mask.bounds()?;
            let first = mask.points.first()?;

            let texture = textures
                .get(&mask.class)
                .and_then(|t| Some((t.generated_texture_url.as_deref()?, t.revision())));

            let fill = if let Some((url, revision)) = texture {
                Fill::Texture {
                    url,
                    bounds,
                    revision,
                }
            } else if hovered == Some(mask.class.as_str()) {
                Fill::Highlight {
                    color: mask.rgb_color,
                    alpha: HIGHLIGHT_ALPHA,
                    label: &mask.class,
                    anchor: Point::new(first.x, first.y - LABEL_OFFSET),
                }
            } else {
                Fill::None
            };

            Some(Layer {
                class: &mask.class,
                points: &mask.points,
                fill,
                outline: mask.rgb_color,
            })
        })
        .collect()
}
