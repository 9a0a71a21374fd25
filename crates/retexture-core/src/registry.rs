//! The mask registry for the current image.
//!
//! Wraps the segmentation service's response. Read-only once loaded;
//! a new image replaces the whole registry.

use crate::types::{Dimensions, Mask, MaterialCategory, Point, SegmentationData};

/// Masks and material categories of the currently segmented image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskRegistry {
    data: SegmentationData,
}

impl MaskRegistry {
    /// Wrap a segmentation response.
    #[must_use]
    pub const fn new(data: SegmentationData) -> Self {
        Self { data }
    }

    /// All masks in service order, including non-drawable ones.
    #[must_use]
    pub fn masks(&self) -> &[Mask] {
        &self.data.masks
    }

    /// Material categories detected in the image.
    #[must_use]
    pub fn categories(&self) -> &[MaterialCategory] {
        &self.data.material_categories
    }

    /// The raw segmentation response, echoed back in generation requests.
    #[must_use]
    pub const fn segmentation_data(&self) -> &SegmentationData {
        &self.data
    }

    /// Returns `true` if no masks are loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.masks.is_empty()
    }

    /// Image size reported by the segmentation service, if any.
    #[must_use]
    pub fn reported_dimensions(&self) -> Option<Dimensions> {
        Some(Dimensions {
            width: self.data.width?,
            height: self.data.height?,
        })
    }

    /// First drawable mask, in registry order, containing `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&Mask> {
        self.data
            .masks
            .iter()
            .find(|m| m.is_drawable() && m.contains(point))
    }

    /// First drawable mask with the given class.
    #[must_use]
    pub fn mask_for_class(&self, class: &str) -> Option<&Mask> {
        self.drawable().find(|m| m.class == class)
    }

    /// Whether any drawable mask carries the given class.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.mask_for_class(class).is_some()
    }

    /// The catalog category whose name matches `class`, ignoring case.
    #[must_use]
    pub fn category_for(&self, class: &str) -> Option<&MaterialCategory> {
        self.data
            .material_categories
            .iter()
            .find(|c| c.matches(class))
    }

    /// Distinct classes of drawable masks in first-appearance order.
    #[must_use]
    pub fn classes(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for mask in self.drawable() {
            if !seen.contains(&mask.class.as_str()) {
                seen.push(&mask.class);
            }
        }
        seen
    }

    fn drawable(&self) -> impl Iterator<Item = &Mask> {
        self.data.masks.iter().filter(|m| m.is_drawable())
    }
}
