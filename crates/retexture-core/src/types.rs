//! Shared types for a retexture session.
//!
//! Field names follow the backend's JSON so the same types are used for
//! decoding responses and for echoing segmentation data back in texture
//! generation requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{self, Bounds};

/// A 2D point in source-image pixel coordinates.
///
/// Serialized as a two-element `[x, y]` array, which is how the
/// segmentation service encodes polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f64; 2] {
    fn from(p: Point) -> Self {
        [p.x, p.y]
    }
}

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    /// CSS `rgb(r, g, b)` string.
    #[must_use]
    pub fn css(self) -> String {
        let [r, g, b] = self.0;
        format!("rgb({r}, {g}, {b})")
    }

    /// CSS `rgba(r, g, b, a)` string with the given alpha.
    #[must_use]
    pub fn css_alpha(self, alpha: f64) -> String {
        let [r, g, b] = self.0;
        format!("rgba({r}, {g}, {b}, {alpha})")
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// One segmented material region of the uploaded image.
///
/// `class` is the category label. It is not guaranteed unique across an
/// image (one class may have several polygons) but is the lookup key for
/// applied textures and catalog categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mask {
    /// Category label, e.g. `"seat"` or `"wood"`.
    pub class: String,
    /// Polygon vertices in image pixel space, in drawing order.
    pub points: Vec<Point>,
    /// Outline and highlight color.
    pub rgb_color: Rgb,
    /// Detection score attached by the segmentation service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Mask {
    /// Returns `true` if the mask has enough vertices to form an area.
    ///
    /// Masks that are not drawable are skipped by both rendering and
    /// hit-testing.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= geometry::MIN_POLYGON_POINTS
    }

    /// Whether `point` lies inside this mask's polygon.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        geometry::contains(point, &self.points)
    }

    /// Axis-aligned bounding box of the polygon, or `None` if the mask
    /// is not drawable.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        if self.is_drawable() {
            Bounds::of(&self.points)
        } else {
            None
        }
    }
}

/// A catalog material category correlating mask classes to textures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialCategory {
    /// Catalog identifier.
    pub id: i64,
    /// Display name, matched case-insensitively against mask classes.
    pub name: String,
}

impl MaterialCategory {
    /// Case-insensitive match of this category's name against a mask class.
    #[must_use]
    pub fn matches(&self, class: &str) -> bool {
        self.name.to_lowercase() == class.to_lowercase()
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The segmentation service's answer for one uploaded image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentationData {
    /// Mask polygons in the order returned by the service.
    pub masks: Vec<Mask>,
    /// Catalog categories detected in the image.
    #[serde(default)]
    pub material_categories: Vec<MaterialCategory>,
    /// Source image width as seen by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Source image height as seen by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Where the service stored the upload, relative to its origin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// A texture offered by the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    /// Catalog identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Texture category name (e.g. `"Wood"`).
    #[serde(default)]
    pub category: String,
    /// Free-form description, used to build the generation prompt.
    #[serde(default)]
    pub description: Option<String>,
    /// Preview image path, relative to the API origin.
    #[serde(default, alias = "previewImage")]
    pub preview_image_path: String,
    /// Thumbnail path, relative to the API origin.
    #[serde(default, alias = "thumbnail")]
    pub thumbnail_path: String,
    /// Explicit generation prompt, if the catalog provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Furniture part the texture was listed for (part queries only).
    #[serde(default, rename = "partName", skip_serializing_if = "Option::is_none")]
    pub part_name: Option<String>,
}

impl TextureDescriptor {
    /// The description, or an empty string when the catalog has none.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// A furniture type from the catalog (e.g. "Sofa").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureType {
    /// Catalog identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Grouping category.
    #[serde(default)]
    pub category: Option<String>,
}

/// A part of a furniture type (e.g. "Seat cushion").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurniturePart {
    /// Catalog identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Owning furniture type.
    #[serde(default)]
    pub furniture_type_id: Option<i64>,
}
