//! The uploaded photo with the interactive mask overlay on top.
//!
//! The overlay `<canvas>` has the image's pixel size as its backing store
//! and is stretched over the `<img>` by CSS. Pointer offsets are mapped
//! back to image pixels through [`Viewport`] before hit-testing. Once the
//! `<img>` has loaded, its natural size replaces the header-derived one.
//!
//! Redraws are driven by an effect that reads the session signal, so any
//! session write (hover, selection, applied texture, new image) repaints
//! the overlay. Texture images that are not decoded yet are loaded in the
//! background; a finished load bumps a local redraw counter only while
//! its [`LoadTicket`](retexture_core::LoadTicket) is still current.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::html::point_interaction::InteractionElementOffset;
use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use retexture_core::{HoverChange, Point, Selection, Session, Viewport};

use crate::canvas::{self, TextureCache};

/// DOM id of the overlay canvas (the export panel reads it back).
pub const CANVAS_ID: &str = "segmentation-canvas";

/// DOM id of the displayed photo.
const IMAGE_ID: &str = "segmentation-image";

/// Props for the [`SegmentationCanvas`] component.
#[derive(Props, Clone, PartialEq)]
pub struct SegmentationCanvasProps {
    /// Session state shared with the rest of the app.
    session: Signal<Session>,
    /// URL of the uploaded image.
    image_url: String,
    /// Called whenever the hovered mask changes.
    on_hover: EventHandler<HoverChange>,
    /// Called when a mask is clicked.
    on_select: EventHandler<Selection>,
}

/// Map a mouse event to image pixels.
fn event_point(session: Signal<Session>, evt: &MouseEvent) -> Option<Point> {
    let dims = session.peek().dimensions()?;
    let canvas = canvas::canvas_by_id(CANVAS_ID).ok()?;
    let rect = canvas.get_bounding_client_rect();
    let offset = evt.element_coordinates();
    Viewport::new(dims, rect.width(), rect.height()).to_image(offset.x, offset.y)
}

/// Image plus mask overlay with hover highlighting and click selection.
#[component]
pub fn SegmentationCanvas(props: SegmentationCanvasProps) -> Element {
    let mut session = props.session;
    let on_hover = props.on_hover;
    let on_select = props.on_select;
    let cache: Rc<RefCell<TextureCache>> = use_hook(|| Rc::new(RefCell::new(TextureCache::new())));
    let mut redraw = use_signal(|| 0u64);

    {
        let cache = Rc::clone(&cache);
        use_effect(move || {
            // Subscribe to texture load completions.
            let _ = redraw();
            let state = session.read();
            let Some(dims) = state.dimensions() else {
                return;
            };

            let ctx = match canvas::canvas_by_id(CANVAS_ID).and_then(|c| canvas::context_2d(&c)) {
                Ok(ctx) => ctx,
                Err(e) => {
                    warn!("overlay canvas unavailable: {e}");
                    return;
                }
            };

            cache.borrow_mut().sync_epoch(state.epoch());
            let plan = state.render_plan();
            let drawn = canvas::draw(
                &ctx,
                f64::from(dims.width),
                f64::from(dims.height),
                &plan,
                &cache.borrow(),
            );
            let missing = match drawn {
                Ok(missing) => missing,
                Err(e) => {
                    warn!("overlay redraw failed: {e}");
                    return;
                }
            };

            for texture in missing {
                let ticket = state.load_ticket(&texture.class, texture.revision);
                if !cache.borrow_mut().begin_load(ticket.clone()) {
                    continue;
                }
                let cache = Rc::clone(&cache);
                spawn(async move {
                    let image = match canvas::load_image(&texture.url).await {
                        Ok(image) => Some(image),
                        Err(e) => {
                            warn!(class = %texture.class, "texture image failed to load: {e}");
                            None
                        }
                    };
                    let loaded = image.is_some();
                    cache.borrow_mut().finish_load(&ticket, texture.url, image);
                    if loaded && session.peek().is_load_current(&ticket) {
                        redraw += 1;
                    } else if loaded {
                        debug!(class = %ticket.class(), "dropping superseded texture load");
                    }
                });
            }
        });
    }

    let (width, height) = session
        .read()
        .dimensions()
        .map_or((0, 0), |d| (d.width, d.height));

    rsx! {
        div { class: "segmentation-view relative inline-block max-w-full",
            img {
                id: IMAGE_ID,
                src: "{props.image_url}",
                class: "block max-w-full h-auto rounded",
                alt: "Uploaded furniture",
                // The browser applies EXIF orientation, so the displayed
                // size wins over the size read from the file header.
                onload: move |_| {
                    match canvas::natural_size(IMAGE_ID) {
                        Ok(dims) => {
                            let changed = session.write().adopt_displayed_dimensions(dims);
                            if changed {
                                debug!(width = dims.width, height = dims.height, "overlay resized to displayed image");
                            }
                        }
                        Err(e) => warn!("could not read image size: {e}"),
                    }
                },
            }
            canvas {
                id: CANVAS_ID,
                width: "{width}",
                height: "{height}",
                class: "absolute inset-0 w-full h-full cursor-pointer",
                onmousemove: move |evt| {
                    let Some(point) = event_point(session, &evt) else {
                        return;
                    };
                    let changed = {
                        let state = session.peek();
                        state.hit_class(point) != state.hovered()
                    };
                    if !changed {
                        return;
                    }
                    // Release the write guard before handlers run.
                    let change = session.write().pointer_move(point);
                    if let Some(change) = change {
                        on_hover.call(change);
                    }
                },
                onmouseleave: move |_| {
                    if session.peek().hovered().is_none() {
                        return;
                    }
                    let change = session.write().pointer_leave();
                    if let Some(change) = change {
                        on_hover.call(change);
                    }
                },
                onclick: move |evt| {
                    let Some(point) = event_point(session, &evt) else {
                        return;
                    };
                    let selection = session.write().click(point);
                    if let Some(selection) = selection {
                        if let Some(ref change) = selection.hover {
                            on_hover.call(change.clone());
                        }
                        on_select.call(selection);
                    }
                },
            }
        }
    }
}
