//! Download of the textured result.

use dioxus::logger::tracing::{info, warn};
use dioxus::prelude::*;

use super::segmentation_canvas::CANVAS_ID;
use crate::{canvas, download, raster};

/// Props for the [`ExportPanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ExportPanelProps {
    /// URL of the uploaded image. `None` disables the button.
    image_url: Option<String>,
    /// Name of the uploaded file, used to derive the download name.
    file_name: String,
    /// Whether any texture has been applied yet.
    has_textures: bool,
}

/// "Download Result" button.
///
/// Composites the photo and the overlay canvas into a PNG and downloads it.
#[component]
pub fn ExportPanel(props: ExportPanelProps) -> Element {
    let mut export_error = use_signal(|| Option::<String>::None);
    let mut exporting = use_signal(|| false);

    let enabled = props.image_url.is_some() && props.has_textures && !exporting();

    let on_click = {
        let image_url = props.image_url.clone();
        let file_name = props.file_name.clone();
        move |_| {
            let Some(image_url) = image_url.clone() else {
                return;
            };
            let download_name = download::result_filename(&file_name);
            exporting.set(true);
            export_error.set(None);
            spawn(async move {
                let result = match canvas::canvas_by_id(CANVAS_ID) {
                    Ok(overlay) => raster::composite_png(&image_url, &overlay)
                        .await
                        .map_err(|e| e.to_string()),
                    Err(e) => Err(e.to_string()),
                };
                let outcome = result.and_then(|data_url| {
                    download::download_url(&data_url, &download_name).map_err(|e| e.to_string())
                });
                match outcome {
                    Ok(()) => {
                        info!(file = %download_name, "result downloaded");
                        export_error.set(None);
                    }
                    Err(e) => {
                        warn!("download failed: {e}");
                        export_error.set(Some(format!("Download failed: {e}")));
                    }
                }
                exporting.set(false);
            });
        }
    };

    rsx! {
        div { class: "space-y-3",
            if let Some(ref err) = export_error() {
                p { class: "text-[var(--text-error)] text-sm", "{err}" }
            }
            button {
                class: if enabled { "btn-primary px-4 py-2 rounded text-white font-medium" } else { "btn-disabled px-4 py-2 rounded cursor-not-allowed" },
                disabled: !enabled,
                onclick: on_click,
                if exporting() { "Preparing..." } else { "Download Result" }
            }
        }
    }
}
