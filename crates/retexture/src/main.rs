use std::rc::Rc;

use dioxus::logger::tracing::{debug, info, warn};
use dioxus::prelude::*;
use retexture_core::{
    ClientConfig, HoverChange, ImageUpload, MaterialCategory, Selection, Session,
    TextureDescriptor, TextureQuery, WorkflowStep,
};
use retexture_io::{
    ApiClient, ExportPanel, FileUpload, MaskChips, ProgressBar, SegmentationCanvas, TexturePanel,
    raster,
};

fn main() {
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the session and the UI state around it, and wires the upload,
/// segmentation canvas, mask chips, texture panel and export components
/// to the backend client.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    let client = use_context_provider(|| Rc::new(ApiClient::new(ClientConfig::from_build_env())));

    // --- Application state ---
    let mut session = use_signal(Session::new);
    let mut image_url = use_signal(|| Option::<String>::None);
    let mut file_name = use_signal(String::new);
    let mut segmenting = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut hovered_material = use_signal(|| Option::<MaterialCategory>::None);
    let mut options = use_signal(Vec::<Rc<TextureDescriptor>>::new);
    let mut options_loading = use_signal(|| false);
    let mut options_error = use_signal(|| Option::<String>::None);
    let mut generation_error = use_signal(|| Option::<String>::None);

    use_drop(move || {
        if let Some(ref url) = *image_url.peek() {
            raster::revoke_object_url(url);
        }
    });

    let mut reset_ui = move || {
        if let Some(ref prev) = image_url.take() {
            raster::revoke_object_url(prev);
        }
        hovered_material.set(None);
        options.set(Vec::new());
        options_loading.set(false);
        options_error.set(None);
        generation_error.set(None);
    };

    // --- Upload -> segmentation ---
    let on_upload = {
        let client = Rc::clone(&client);
        move |upload: ImageUpload| {
            reset_ui();
            error.set(None);
            match raster::bytes_to_object_url(&upload.bytes, upload.mime_type()) {
                Ok(url) => image_url.set(Some(url)),
                Err(e) => {
                    warn!("could not display upload: {e}");
                    error.set(Some(format!("Could not display image: {e}")));
                    return;
                }
            }

            // A newer upload bumps the epoch, so this task's result is
            // dropped if the user moves on before it arrives.
            let epoch = session.write().begin_image(upload.dimensions);
            file_name.set(upload.name.clone());
            segmenting.set(true);
            info!(name = %upload.name, bytes = upload.bytes.len(), "segmenting upload");

            let client = Rc::clone(&client);
            spawn(async move {
                let result = client
                    .segment(&upload.name, &upload.bytes, upload.mime_type())
                    .await;
                if session.peek().epoch() != epoch {
                    debug!("dropping segmentation for a replaced image");
                    return;
                }
                segmenting.set(false);

                match result {
                    Ok(data) => {
                        let masks = data.masks.len();
                        let loaded = session.write().load_segmentation(epoch, data);
                        match loaded {
                            Ok(()) => info!(masks, "segmentation loaded"),
                            Err(e) => debug!("segmentation not applied: {e}"),
                        }
                    }
                    Err(e) => {
                        warn!("segmentation failed: {e}");
                        error.set(Some(format!("Segmentation failed: {e}")));
                        session.write().clear();
                        reset_ui();
                    }
                }
            });
        }
    };

    // --- Texture options ---
    let mut fetch_options = {
        let client = Rc::clone(&client);
        move |query: TextureQuery| {
            let ticket = session.write().begin_options_request();
            options_loading.set(true);
            options_error.set(None);
            debug!(?query, "fetching texture options");

            let client = Rc::clone(&client);
            spawn(async move {
                let result = client.texture_options(&query).await;
                if !session.peek().is_options_current(&ticket) {
                    debug!("dropping superseded texture options");
                    return;
                }
                options_loading.set(false);
                match result {
                    Ok(list) => options.set(list.into_iter().map(Rc::new).collect()),
                    Err(e) => {
                        warn!("texture options failed: {e}");
                        options.set(Vec::new());
                        options_error.set(Some(format!("Could not load textures: {e}")));
                    }
                }
            });
        }
    };

    let on_hover = use_callback(move |change: HoverChange| {
        hovered_material.set(change.category);
    });

    let on_select = {
        let mut fetch_options = fetch_options.clone();
        use_callback(move |selection: Selection| {
            generation_error.set(None);
            match selection.category {
                Some(category) => fetch_options(TextureQuery::Material(category.name)),
                None => debug!(
                    class = %selection.mask.class,
                    "no material category for mask; keeping current options"
                ),
            }
        })
    };

    let on_part_query = move |query: TextureQuery| fetch_options(query);

    // --- Texture generation ---
    let on_texture_select = {
        let client = Rc::clone(&client);
        move |texture: Rc<TextureDescriptor>| {
            let begun = session.write().begin_texture_application(&texture);
            let (ticket, request) = match begun {
                Ok(started) => started,
                Err(e) => {
                    warn!("cannot apply texture: {e}");
                    generation_error.set(Some(e.to_string()));
                    return;
                }
            };
            generation_error.set(None);
            info!(class = %ticket.class(), texture = %texture.name, "generating texture");

            let client = Rc::clone(&client);
            spawn(async move {
                match client.generate_texture(&request).await {
                    Ok(url) => {
                        let applied =
                            session
                                .write()
                                .complete_texture_application(&ticket, texture, url);
                        match applied {
                            Ok(revision) => {
                                info!(class = %ticket.class(), revision, "texture applied");
                            }
                            Err(e) => debug!(class = %ticket.class(), "dropping generated texture: {e}"),
                        }
                    }
                    Err(e) => {
                        if session.write().abandon_texture_application(&ticket) {
                            warn!(class = %ticket.class(), "texture generation failed: {e}");
                            generation_error.set(Some(format!("Texture generation failed: {e}")));
                        }
                    }
                }
            });
        }
    };

    let on_start_over = move |_| {
        session.write().clear();
        segmenting.set(false);
        error.set(None);
        reset_ui();
    };

    // --- Derived view state ---
    let (step, selected_class, applied_texture_id, has_textures, has_masks, generating) = {
        let state = session.read();
        let selected_class = state.selected().map(|m| m.class.clone());
        let applied_texture_id = selected_class
            .as_deref()
            .and_then(|class| state.textures().get(class))
            .map(|applied| applied.texture.id);
        (
            WorkflowStep::current(&state, segmenting()),
            selected_class,
            applied_texture_id,
            !state.textures().is_empty(),
            !state.registry().classes().is_empty(),
            state.is_generating(),
        )
    };

    let panel_error = generation_error().or_else(|| options_error());

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/app.css") }

        div { class: "app",
            header { class: "app-header",
                h1 { "retexture" }
                p { class: "muted",
                    "Segment a furniture photo and try AI-generated textures on each part"
                }
            }

            ProgressBar { current: step }

            div { class: "app-main",
                // Left column: image and masks
                div { class: "app-column",
                    if let Some(url) = image_url() {
                        SegmentationCanvas {
                            session,
                            image_url: url,
                            on_hover,
                            on_select,
                        }
                        if segmenting() {
                            p { class: "status animate-pulse", "Segmenting..." }
                        } else if has_masks {
                            MaskChips { session, on_hover, on_select }
                        } else {
                            p { class: "muted", "No parts were detected in this image." }
                        }
                        button { class: "btn-secondary", onclick: on_start_over, "Start over" }
                    } else {
                        FileUpload { on_upload, disabled: segmenting() }
                    }

                    if let Some(ref err) = error() {
                        div { class: "error-box",
                            p { "{err}" }
                        }
                    }
                }

                // Right column: textures and export
                div { class: "app-sidebar",
                    if has_masks {
                        TexturePanel {
                            hovered_material: hovered_material(),
                            selected_class,
                            options: options(),
                            loading: options_loading(),
                            error: panel_error,
                            generating,
                            applied_texture_id,
                            on_texture_select,
                            on_part_query,
                        }
                    }
                    ExportPanel {
                        image_url: image_url(),
                        file_name: file_name(),
                        has_textures,
                    }
                }
            }
        }
    }
}
