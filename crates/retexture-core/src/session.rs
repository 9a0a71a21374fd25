//! Interaction state for one texturing session.
//!
//! [`Session`] owns the mask registry, the applied-texture store, and
//! the hover/selection state, and is the only thing that mutates them.
//! Pointer positions go in (already converted to image pixels);
//! [`HoverChange`] and [`Selection`] values come out for the caller to
//! forward to its collaborators.
//!
//! Anything asynchronous (segmentation, option listing, generation,
//! texture decode) is bracketed by a ticket issued here. A ticket carries
//! the session epoch it was issued in, and the epoch advances whenever the
//! image changes, so a response that arrives after the user moved on is
//! recognised as stale and dropped instead of mutating the new session.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::api::GenerateTextureRequest;
use crate::registry::MaskRegistry;
use crate::render::{self, Layer};
use crate::store::AppliedTextures;
use crate::types::{Dimensions, Mask, MaterialCategory, Point, SegmentationData, TextureDescriptor};

/// Errors from session transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A texture was chosen while no mask was selected.
    #[error("select a part of the image before choosing a texture")]
    NoSelection,

    /// The class does not exist in the current registry.
    #[error("no mask with class {0:?} in the current image")]
    UnknownClass(String),

    /// The result belongs to an earlier image or a superseded request.
    #[error("result belongs to a superseded request")]
    Stale,
}

/// The hover target changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverChange {
    /// Newly hovered class, or `None` when the pointer left every mask.
    pub class: Option<String>,
    /// Material category whose name matches the class, if any.
    pub category: Option<MaterialCategory>,
}

/// A mask was selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The selected mask.
    pub mask: Mask,
    /// Material category whose name matches the class, if any. Texture
    /// options are only fetched when this is present.
    pub category: Option<MaterialCategory>,
    /// Hover change caused by the selection, if the hover target moved.
    pub hover: Option<HoverChange>,
}

/// Identifies one texture-options request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionsTicket {
    epoch: u64,
    seq: u64,
}

/// Identifies one in-flight texture generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
    class: String,
    seq: u64,
}

impl GenerationTicket {
    /// Class the texture is being generated for.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }
}

/// Identifies one texture image load for the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    epoch: u64,
    class: String,
    revision: u64,
}

impl LoadTicket {
    /// Class whose texture is loading.
    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Session epoch the load was issued in.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Store revision the load was planned from.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Registry, store, hover, and selection for the current image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    epoch: u64,
    dimensions: Option<Dimensions>,
    registry: MaskRegistry,
    textures: AppliedTextures,
    hovered: Option<String>,
    selected: Option<Mask>,
    /// Latest generation request per class.
    pending: BTreeMap<String, u64>,
    next_request: u64,
    options_seq: u64,
}

impl Session {
    /// An empty session with no image.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch. Advances on every image change.
    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Whether an image has been loaded (segmented or not).
    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.dimensions.is_some()
    }

    /// Pixel size of the current image.
    #[must_use]
    pub const fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    /// Masks of the current image.
    #[must_use]
    pub const fn registry(&self) -> &MaskRegistry {
        &self.registry
    }

    /// Textures applied in this session.
    #[must_use]
    pub const fn textures(&self) -> &AppliedTextures {
        &self.textures
    }

    /// Currently hovered class.
    #[must_use]
    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    /// Currently selected mask.
    #[must_use]
    pub const fn selected(&self) -> Option<&Mask> {
        self.selected.as_ref()
    }

    fn advance_epoch(&mut self, dimensions: Option<Dimensions>) -> u64 {
        self.epoch += 1;
        self.dimensions = dimensions;
        self.registry = MaskRegistry::default();
        self.textures.clear();
        self.hovered = None;
        self.selected = None;
        self.pending.clear();
        self.epoch
    }

    /// Start a session for a freshly uploaded image.
    ///
    /// Everything from the previous image is dropped. The registry stays
    /// empty until [`load_segmentation`](Self::load_segmentation) is
    /// called with the returned epoch.
    pub fn begin_image(&mut self, dimensions: Dimensions) -> u64 {
        self.advance_epoch(Some(dimensions))
    }

    /// Install the segmentation result for the image started at `epoch`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Stale`] if another image was started (or
    /// the session cleared) after `epoch`.
    pub fn load_segmentation(
        &mut self,
        epoch: u64,
        data: SegmentationData,
    ) -> Result<(), SessionError> {
        if epoch != self.epoch {
            return Err(SessionError::Stale);
        }
        let registry = MaskRegistry::new(data);
        if self.dimensions.is_none() {
            self.dimensions = registry.reported_dimensions();
        }
        self.registry = registry;
        Ok(())
    }

    /// Adopt the size the browser reports for the displayed image.
    ///
    /// The browser honors EXIF orientation, so a rotated JPEG can display
    /// with swapped axes relative to its header. Ignored without an image
    /// or for a zero size. Returns `true` if the size changed.
    pub fn adopt_displayed_dimensions(&mut self, dimensions: Dimensions) -> bool {
        if self.dimensions.is_none()
            || dimensions.width == 0
            || dimensions.height == 0
            || self.dimensions == Some(dimensions)
        {
            return false;
        }
        self.dimensions = Some(dimensions);
        true
    }

    /// Replace the whole session with a new segmentation result.
    ///
    /// Shorthand for [`begin_image`](Self::begin_image) followed by
    /// [`load_segmentation`](Self::load_segmentation), for callers that
    /// already hold the response. Image dimensions are taken from the
    /// response. Returns the new epoch.
    pub fn reset(&mut self, data: SegmentationData) -> u64 {
        let registry = MaskRegistry::new(data);
        let epoch = self.advance_epoch(registry.reported_dimensions());
        self.registry = registry;
        epoch
    }

    /// Return to the no-image state.
    pub fn clear(&mut self) {
        self.advance_epoch(None);
    }

    /// Class of the first mask containing `point`.
    #[must_use]
    pub fn hit_class(&self, point: Point) -> Option<&str> {
        self.registry.hit_test(point).map(|m| m.class.as_str())
    }

    /// Set the hover target directly (mask chips use this).
    ///
    /// Returns the change, or `None` if the target is unchanged.
    pub fn hover_class(&mut self, class: Option<&str>) -> Option<HoverChange> {
        let class = class.filter(|c| self.registry.has_class(c));
        if self.hovered.as_deref() == class {
            return None;
        }
        self.hovered = class.map(str::to_owned);
        Some(HoverChange {
            class: self.hovered.clone(),
            category: class.and_then(|c| self.registry.category_for(c).cloned()),
        })
    }

    /// Pointer moved to `point` (image pixels).
    pub fn pointer_move(&mut self, point: Point) -> Option<HoverChange> {
        let class = self.hit_class(point).map(str::to_owned);
        self.hover_class(class.as_deref())
    }

    /// Pointer left the canvas.
    pub fn pointer_leave(&mut self) -> Option<HoverChange> {
        self.hover_class(None)
    }

    /// Pointer clicked at `point` (image pixels).
    ///
    /// Returns `None` (and leaves the selection alone) when the click
    /// misses every mask.
    pub fn click(&mut self, point: Point) -> Option<Selection> {
        let mask = self.registry.hit_test(point)?.clone();
        Some(self.select(mask))
    }

    /// Select the first mask of `class` (mask chips use this).
    pub fn select_class(&mut self, class: &str) -> Option<Selection> {
        let mask = self.registry.mask_for_class(class)?.clone();
        Some(self.select(mask))
    }

    fn select(&mut self, mask: Mask) -> Selection {
        let hover = self.hover_class(Some(&mask.class));
        let category = self.registry.category_for(&mask.class).cloned();
        self.selected = Some(mask.clone());
        Selection {
            mask,
            category,
            hover,
        }
    }

    /// Issue a ticket for a texture-options request. Any earlier ticket
    /// stops being current.
    pub fn begin_options_request(&mut self) -> OptionsTicket {
        self.options_seq += 1;
        OptionsTicket {
            epoch: self.epoch,
            seq: self.options_seq,
        }
    }

    /// Whether the response for `ticket` should still be shown.
    #[must_use]
    pub const fn is_options_current(&self, ticket: &OptionsTicket) -> bool {
        ticket.epoch == self.epoch && ticket.seq == self.options_seq
    }

    /// Start applying `texture` to the selected mask.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSelection`] if no mask is selected.
    pub fn begin_texture_application(
        &mut self,
        texture: &TextureDescriptor,
    ) -> Result<(GenerationTicket, GenerateTextureRequest), SessionError> {
        let mask = self.selected.clone().ok_or(SessionError::NoSelection)?;
        self.begin_texture_application_for(texture, &mask)
    }

    /// Start applying `texture` to `mask`.
    ///
    /// A newer request for the same class supersedes this one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownClass`] if `mask` has fewer than
    /// three points or the registry has no drawable mask of that class.
    pub fn begin_texture_application_for(
        &mut self,
        texture: &TextureDescriptor,
        mask: &Mask,
    ) -> Result<(GenerationTicket, GenerateTextureRequest), SessionError> {
        if !mask.is_drawable() || !self.registry.has_class(&mask.class) {
            return Err(SessionError::UnknownClass(mask.class.clone()));
        }
        self.next_request += 1;
        self.pending.insert(mask.class.clone(), self.next_request);

        let request =
            GenerateTextureRequest::new(self.registry.segmentation_data(), mask, texture);
        let ticket = GenerationTicket {
            epoch: self.epoch,
            class: mask.class.clone(),
            seq: self.next_request,
        };
        Ok((ticket, request))
    }

    fn is_pending(&self, ticket: &GenerationTicket) -> bool {
        ticket.epoch == self.epoch && self.pending.get(&ticket.class) == Some(&ticket.seq)
    }

    /// Record a successful generation.
    ///
    /// Returns the store revision of the new entry.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Stale`] if the image changed or a newer
    /// request for the same class was started since `ticket` was issued.
    pub fn complete_texture_application(
        &mut self,
        ticket: &GenerationTicket,
        texture: Rc<TextureDescriptor>,
        generated_texture_url: String,
    ) -> Result<u64, SessionError> {
        if !self.is_pending(ticket) {
            return Err(SessionError::Stale);
        }
        self.pending.remove(&ticket.class);
        Ok(self
            .textures
            .apply(&ticket.class, texture, Some(generated_texture_url)))
    }

    /// Drop a failed generation without touching the store.
    ///
    /// Returns `true` if the ticket was still current.
    pub fn abandon_texture_application(&mut self, ticket: &GenerationTicket) -> bool {
        if self.is_pending(ticket) {
            self.pending.remove(&ticket.class);
            true
        } else {
            false
        }
    }

    /// Whether any generation request is in flight.
    #[must_use]
    pub fn is_generating(&self) -> bool {
        !self.pending.is_empty()
    }

    /// The render plan for the current state.
    #[must_use]
    pub fn render_plan(&self) -> Vec<Layer<'_>> {
        render::plan(self.registry.masks(), self.hovered(), &self.textures)
    }

    /// Ticket for loading the texture image drawn at `revision` for `class`.
    #[must_use]
    pub fn load_ticket(&self, class: &str, revision: u64) -> LoadTicket {
        LoadTicket {
            epoch: self.epoch,
            class: class.to_owned(),
            revision,
        }
    }

    /// Whether a finished load should trigger a redraw: same image, and
    /// the class still maps to the revision the load was started for.
    #[must_use]
    pub fn is_load_current(&self, ticket: &LoadTicket) -> bool {
        ticket.epoch == self.epoch
            && self
                .textures
                .get(&ticket.class)
                .is_some_and(|t| t.revision() == ticket.revision)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    fn mask(class: &str, points: &[(f64, f64)]) -> Mask {
        Mask {
            class: class.to_owned(),
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            rgb_color: Rgb([10, 20, 30]),
            confidence: None,
        }
    }

    fn data() -> SegmentationData {
        SegmentationData {
            masks: vec![
                mask("seat", &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]),
                mask("fabric", &[(20.0, 0.0), (30.0, 0.0), (30.0, 10.0), (20.0, 10.0)]),
            ],
            material_categories: vec![MaterialCategory {
                id: 7,
                name: "Fabric".into(),
            }],
            width: Some(40),
            height: Some(20),
            image_path: None,
        }
    }

    fn texture(id: i64) -> Rc<TextureDescriptor> {
        Rc::new(TextureDescriptor {
            id,
            name: format!("T{id}"),
            category: "Fabric".into(),
            description: Some("soft weave".into()),
            preview_image_path: String::new(),
            thumbnail_path: String::new(),
            prompt: None,
            part_name: None,
        })
    }

    fn loaded() -> Session {
        let mut session = Session::new();
        session.reset(data());
        session
    }

    #[test]
    fn reset_takes_reported_dimensions() {
        let session = loaded();
        assert!(session.has_image());
        assert_eq!(
            session.dimensions(),
            Some(Dimensions {
                width: 40,
                height: 20
            })
        );
    }

    #[test]
    fn pointer_move_reports_only_changes() {
        let mut session = loaded();
        let change = session.pointer_move(Point::new(5.0, 5.0)).unwrap();
        assert_eq!(change.class.as_deref(), Some("seat"));
        assert!(change.category.is_none());
        assert!(session.pointer_move(Point::new(6.0, 6.0)).is_none());

        let change = session.pointer_move(Point::new(25.0, 5.0)).unwrap();
        assert_eq!(change.class.as_deref(), Some("fabric"));
        assert_eq!(change.category.map(|c| c.id), Some(7));

        let change = session.pointer_move(Point::new(100.0, 100.0)).unwrap();
        assert_eq!(change.class, None);
    }

    #[test]
    fn pointer_leave_clears_hover() {
        let mut session = loaded();
        session.pointer_move(Point::new(5.0, 5.0));
        assert!(session.pointer_leave().is_some());
        assert_eq!(session.hovered(), None);
        assert!(session.pointer_leave().is_none());
    }

    #[test]
    fn click_selects_and_hovers() {
        let mut session = loaded();
        let selection = session.click(Point::new(25.0, 5.0)).unwrap();
        assert_eq!(selection.mask.class, "fabric");
        assert_eq!(selection.category.map(|c| c.name), Some("Fabric".into()));
        assert_eq!(
            selection.hover.and_then(|h| h.class).as_deref(),
            Some("fabric")
        );
        assert_eq!(session.hovered(), Some("fabric"));
        assert_eq!(session.selected().map(|m| m.class.as_str()), Some("fabric"));
    }

    #[test]
    fn click_on_empty_space_keeps_selection() {
        let mut session = loaded();
        session.click(Point::new(5.0, 5.0));
        assert!(session.click(Point::new(100.0, 100.0)).is_none());
        assert_eq!(session.selected().map(|m| m.class.as_str()), Some("seat"));
    }

    #[test]
    fn chip_selection_uses_class() {
        let mut session = loaded();
        assert!(session.select_class("fabric").is_some());
        assert!(session.select_class("leg").is_none());
        assert_eq!(session.selected().map(|m| m.class.as_str()), Some("fabric"));
    }

    #[test]
    fn texture_without_selection_fails() {
        let mut session = loaded();
        assert_eq!(
            session.begin_texture_application(&texture(1)).unwrap_err(),
            SessionError::NoSelection
        );
        assert!(!session.is_generating());
    }

    #[test]
    fn texture_for_unknown_class_fails() {
        let mut session = loaded();
        let stray = mask("leg", &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            session
                .begin_texture_application_for(&texture(1), &stray)
                .unwrap_err(),
            SessionError::UnknownClass("leg".into())
        );
    }

    #[test]
    fn completion_writes_store() {
        let mut session = loaded();
        session.click(Point::new(5.0, 5.0));
        let (ticket, request) = session.begin_texture_application(&texture(1)).unwrap();
        assert_eq!(ticket.class(), "seat");
        assert_eq!(request.mask_class, "seat");
        assert!(session.is_generating());

        session
            .complete_texture_application(&ticket, texture(1), "http://x/t.png".into())
            .unwrap();
        assert!(!session.is_generating());
        assert_eq!(
            session
                .textures()
                .get("seat")
                .and_then(|t| t.generated_texture_url.as_deref()),
            Some("http://x/t.png")
        );
    }

    #[test]
    fn superseded_generation_is_stale() {
        let mut session = loaded();
        session.click(Point::new(5.0, 5.0));
        let (first, _) = session.begin_texture_application(&texture(1)).unwrap();
        let (second, _) = session.begin_texture_application(&texture(2)).unwrap();

        assert_eq!(
            session.complete_texture_application(&first, texture(1), "a".into()),
            Err(SessionError::Stale)
        );
        session
            .complete_texture_application(&second, texture(2), "b".into())
            .unwrap();
        assert_eq!(
            session.textures().get("seat").map(|t| t.texture.id),
            Some(2)
        );
    }

    #[test]
    fn generation_from_previous_image_is_stale() {
        let mut session = loaded();
        session.click(Point::new(5.0, 5.0));
        let (ticket, _) = session.begin_texture_application(&texture(1)).unwrap();
        session.reset(data());
        assert_eq!(
            session.complete_texture_application(&ticket, texture(1), "a".into()),
            Err(SessionError::Stale)
        );
        assert!(session.textures().is_empty());
    }

    #[test]
    fn abandon_leaves_store_untouched() {
        let mut session = loaded();
        session.click(Point::new(5.0, 5.0));
        let (ticket, _) = session.begin_texture_application(&texture(1)).unwrap();
        assert!(session.abandon_texture_application(&ticket));
        assert!(!session.abandon_texture_application(&ticket));
        assert!(session.textures().is_empty());
        assert!(!session.is_generating());
    }

    #[test]
    fn segmentation_for_old_epoch_is_rejected() {
        let mut session = Session::new();
        let dims = Dimensions {
            width: 40,
            height: 20,
        };
        let first = session.begin_image(dims);
        let second = session.begin_image(dims);
        assert_eq!(
            session.load_segmentation(first, data()),
            Err(SessionError::Stale)
        );
        assert!(session.registry().is_empty());
        session.load_segmentation(second, data()).unwrap();
        assert_eq!(session.registry().masks().len(), 2);
    }

    #[test]
    fn only_latest_options_request_is_current() {
        let mut session = loaded();
        let a = session.begin_options_request();
        let b = session.begin_options_request();
        assert!(!session.is_options_current(&a));
        assert!(session.is_options_current(&b));
        session.reset(data());
        assert!(!session.is_options_current(&b));
    }

    #[test]
    fn load_ticket_tracks_revision() {
        let mut session = loaded();
        session.click(Point::new(5.0, 5.0));
        let (t1, _) = session.begin_texture_application(&texture(1)).unwrap();
        let r1 = session
            .complete_texture_application(&t1, texture(1), "a".into())
            .unwrap();
        let load = session.load_ticket("seat", r1);
        assert!(session.is_load_current(&load));

        let (t2, _) = session.begin_texture_application(&texture(2)).unwrap();
        session
            .complete_texture_application(&t2, texture(2), "b".into())
            .unwrap();
        assert!(!session.is_load_current(&load));
    }

    #[test]
    fn clear_drops_image() {
        let mut session = loaded();
        session.pointer_move(Point::new(5.0, 5.0));
        session.clear();
        assert!(!session.has_image());
        assert!(session.registry().is_empty());
        assert_eq!(session.hovered(), None);
        assert!(session.render_plan().is_empty());
    }

    fn with_degenerate_leg() -> Session {
        let mut data = data();
        data.masks.push(mask("leg", &[(0.0, 0.0), (1.0, 1.0)]));
        data.masks.insert(0, mask("fabric", &[(50.0, 50.0), (60.0, 60.0)]));
        let mut session = Session::new();
        session.reset(data);
        session
    }

    #[test]
    fn two_point_class_is_absent() {
        let mut session = with_degenerate_leg();
        assert_eq!(session.registry().classes(), vec!["fabric", "seat"]);
        assert!(session.select_class("leg").is_none());
        assert!(session.hover_class(Some("leg")).is_none());
        assert_eq!(session.hovered(), None);

        let leg = mask("leg", &[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(
            session.begin_texture_application_for(&texture(1), &leg).err(),
            Some(SessionError::UnknownClass("leg".into()))
        );
        assert!(session.textures().is_empty());
        assert!(!session.is_generating());
    }

    #[test]
    fn class_selection_picks_drawable_polygon() {
        let mut session = with_degenerate_leg();
        let selection = session.select_class("fabric").unwrap();
        assert_eq!(selection.mask.points.len(), 4);
        let (_, request) = session.begin_texture_application(&texture(1)).unwrap();
        assert_eq!(request.segmented_parts["fabric"].mask_data.points.len(), 4);
    }

    #[test]
    fn displayed_size_replaces_header_size() {
        let mut session = Session::new();
        session.begin_image(Dimensions {
            width: 40,
            height: 30,
        });
        let rotated = Dimensions {
            width: 30,
            height: 40,
        };
        assert!(session.adopt_displayed_dimensions(rotated));
        assert_eq!(session.dimensions(), Some(rotated));
        assert!(!session.adopt_displayed_dimensions(rotated));
        assert!(!session.adopt_displayed_dimensions(Dimensions {
            width: 0,
            height: 40
        }));
        assert_eq!(session.dimensions(), Some(rotated));
    }

    #[test]
    fn displayed_size_needs_an_image() {
        let mut session = Session::new();
        assert!(!session.adopt_displayed_dimensions(Dimensions {
            width: 30,
            height: 40
        }));
        assert_eq!(session.dimensions(), None);
    }
}
