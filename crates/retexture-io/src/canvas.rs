//! Drawing the segmentation overlay on a 2D canvas.
//!
//! [`draw`] executes a render plan from `retexture-core` with full
//! clear-and-redraw semantics. Texture images are decoded asynchronously
//! by [`load_image`] and kept in a [`TextureCache`] keyed by URL; a layer
//! whose image is not cached yet is drawn outline-only and reported back
//! so the caller can start the load.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use std::collections::{HashMap, HashSet};

use retexture_core::render::{self, Fill, Layer};
use retexture_core::{Dimensions, LoadTicket, Point};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Path2d};

/// Errors that can occur while drawing or loading textures.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    /// The element has no 2D context (or is not a canvas).
    #[error("2D canvas context unavailable")]
    NoContext,

    /// No element with the given id, or it has the wrong type.
    #[error("element not found: {0}")]
    NotFound(String),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for CanvasError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Look up a canvas element by DOM id.
///
/// # Errors
///
/// Returns [`CanvasError::NoContext`] if no element with that id exists
/// or it is not a `<canvas>`.
pub fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, CanvasError> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or(CanvasError::NoContext)
}

/// Natural (orientation-corrected) pixel size of an `<img>` element.
///
/// # Errors
///
/// Returns [`CanvasError::NotFound`] if no image with that id exists, and
/// [`CanvasError::JsError`] if it has not decoded yet.
pub fn natural_size(id: &str) -> Result<Dimensions, CanvasError> {
    let image = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
        .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        .ok_or_else(|| CanvasError::NotFound(id.to_owned()))?;
    let (width, height) = (image.natural_width(), image.natural_height());
    if width == 0 || height == 0 {
        return Err(CanvasError::JsError(format!("image {id} has no size yet")));
    }
    Ok(Dimensions { width, height })
}

/// The 2D rendering context of `canvas`.
///
/// # Errors
///
/// Returns [`CanvasError`] if the context cannot be obtained.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, CanvasError> {
    canvas
        .get_context("2d")?
        .ok_or(CanvasError::NoContext)?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| CanvasError::NoContext)
}

/// Closed path through `points`. Callers only pass drawable polygons.
fn polygon_path(points: &[Point]) -> Result<Path2d, CanvasError> {
    let path = Path2d::new()?;
    if let Some((first, rest)) = points.split_first() {
        path.move_to(first.x, first.y);
        for p in rest {
            path.line_to(p.x, p.y);
        }
        path.close_path();
    }
    Ok(path)
}

/// A texture layer whose image was not in the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTexture {
    /// Mask class of the layer.
    pub class: String,
    /// Image URL to load.
    pub url: String,
    /// Store revision the layer was planned from.
    pub revision: u64,
}

/// Decoded texture images plus the loads currently in flight.
///
/// Holds at most one image per mask class: a newer revision for a class
/// replaces the older image. A load that failed is remembered by ticket
/// and not retried until the class is re-textured or the epoch changes.
#[derive(Debug)]
pub struct TextureCache<I = HtmlImageElement> {
    epoch: u64,
    ready: HashMap<String, CachedImage<I>>,
    in_flight: HashSet<LoadTicket>,
    failed: HashSet<LoadTicket>,
}

#[derive(Debug)]
struct CachedImage<I> {
    url: String,
    revision: u64,
    image: I,
}

impl<I> Default for TextureCache<I> {
    fn default() -> Self {
        Self {
            epoch: 0,
            ready: HashMap::new(),
            in_flight: HashSet::new(),
            failed: HashSet::new(),
        }
    }
}

impl<I> TextureCache<I> {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The decoded image for `class`, if it was loaded from `url`.
    #[must_use]
    pub fn get(&self, class: &str, url: &str) -> Option<&I> {
        self.ready
            .get(class)
            .filter(|cached| cached.url == url)
            .map(|cached| &cached.image)
    }

    /// Record the start of a load. Returns `false` if the same load is
    /// already running or has already failed.
    pub fn begin_load(&mut self, ticket: LoadTicket) -> bool {
        if self.failed.contains(&ticket) {
            return false;
        }
        self.in_flight.insert(ticket)
    }

    /// Record a finished load.
    ///
    /// A loaded image replaces the class's previous image unless that one
    /// came from a newer revision. `None` marks the ticket as failed.
    pub fn finish_load(&mut self, ticket: &LoadTicket, url: String, image: Option<I>) {
        self.in_flight.remove(ticket);
        if ticket.epoch() != self.epoch {
            return;
        }
        let Some(image) = image else {
            self.failed.insert(ticket.clone());
            return;
        };
        let newer_cached = self
            .ready
            .get(ticket.class())
            .is_some_and(|cached| cached.revision > ticket.revision());
        if !newer_cached {
            self.ready.insert(
                ticket.class().to_owned(),
                CachedImage {
                    url,
                    revision: ticket.revision(),
                    image,
                },
            );
        }
    }

    /// Number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ready.len()
    }

    /// Returns `true` if no image is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty()
    }

    /// Drop every cached image if the session epoch moved on.
    pub fn sync_epoch(&mut self, epoch: u64) {
        if self.epoch != epoch {
            self.ready.clear();
            self.in_flight.clear();
            self.failed.clear();
            self.epoch = epoch;
        }
    }
}

/// Clear the canvas and draw every layer.
///
/// Returns the texture layers that were drawn outline-only because their
/// image is not decoded yet.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if a drawing call fails.
pub fn draw(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    layers: &[Layer<'_>],
    cache: &TextureCache,
) -> Result<Vec<MissingTexture>, CanvasError> {
    ctx.clear_rect(0.0, 0.0, width, height);
    let mut missing = Vec::new();

    for layer in layers {
        let path = polygon_path(layer.points)?;

        match layer.fill {
            Fill::Texture {
                url,
                bounds,
                revision,
            } => {
                if let Some(image) = cache.get(layer.class, url) {
                    ctx.save();
                    ctx.clip_with_path_2d(&path);
                    let drawn = ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        image,
                        bounds.min_x,
                        bounds.min_y,
                        bounds.width(),
                        bounds.height(),
                    );
                    ctx.restore();
                    drawn?;
                } else {
                    missing.push(MissingTexture {
                        class: layer.class.to_owned(),
                        url: url.to_owned(),
                        revision,
                    });
                }
            }
            Fill::Highlight {
                color,
                alpha,
                label,
                anchor,
            } => {
                ctx.set_fill_style_str(&color.css_alpha(alpha));
                ctx.fill_with_path_2d(&path);
                ctx.set_fill_style_str(render::LABEL_COLOR);
                ctx.set_font(render::LABEL_FONT);
                ctx.fill_text(label, anchor.x, anchor.y)?;
            }
            Fill::None => {}
        }

        ctx.set_stroke_style_str(&layer.outline.css());
        ctx.set_line_width(render::OUTLINE_WIDTH);
        ctx.stroke_with_path(&path);
    }

    Ok(missing)
}

/// Fetch and decode an image.
///
/// The image is requested with `crossOrigin = "anonymous"` so the canvas
/// stays exportable when textures come from the API origin.
///
/// # Errors
///
/// Returns [`CanvasError::JsError`] if the image fails to load or decode.
pub async fn load_image(url: &str) -> Result<HtmlImageElement, CanvasError> {
    let image = HtmlImageElement::new()?;
    if !url.starts_with("data:") && !url.starts_with("blob:") {
        image.set_cross_origin(Some("anonymous"));
    }
    image.set_src(url);
    JsFuture::from(image.decode()).await?;
    Ok(image)
}
