//! Upload zone with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::logger::tracing::{debug, warn};
use dioxus::prelude::*;
use retexture_core::ImageUpload;
use retexture_core::upload::{self, ACCEPT_ATTRIBUTE};

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the validated image after a successful selection.
    on_upload: EventHandler<ImageUpload>,
    /// Disable the picker (while a segmentation is running).
    #[props(default)]
    disabled: bool,
}

/// A drag-and-drop zone with a file picker button.
///
/// Accepts PNG and JPEG images up to 10 MB. The file is validated and
/// its header probed for dimensions before `on_upload` fires; problems
/// are shown inline.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut filename = use_signal(|| Option::<String>::None);
    let mut error = use_signal(|| Option::<String>::None);
    let disabled = props.disabled;

    // Shared by the picker and drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        if disabled {
            return;
        }
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        if !upload::has_allowed_extension(&name) {
            error.set(Some(format!("Unsupported file type: {name}")));
            return;
        }
        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                error.set(Some(format!("Failed to read file: {e}")));
                return;
            }
        };
        match upload::validate(&name, bytes) {
            Ok(image) => {
                debug!(
                    name = %image.name,
                    width = image.dimensions.width,
                    height = image.dimensions.height,
                    "image selected"
                );
                filename.set(Some(name));
                error.set(None);
                props.on_upload.call(image);
            }
            Err(e) => {
                warn!(%name, "rejected upload: {e}");
                error.set(Some(e.to_string()));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let border_class = if dragging() {
        "border-[var(--border-accent)] bg-[var(--surface-active)]"
    } else {
        "border-[var(--border-muted)] bg-[var(--surface)]"
    };

    rsx! {
        div {
            class: "upload-zone border-2 border-dashed rounded-lg p-6 text-center transition-colors {border_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            if let Some(ref name) = filename() {
                p { class: "text-[var(--text-success)] mb-2",
                    "Loaded: {name}"
                }
            }

            if let Some(ref err) = error() {
                p { class: "text-[var(--text-error)] mb-2",
                    "{err}"
                }
            }

            p { class: "text-[var(--text-secondary)] mb-3",
                "Drop a furniture photo here or "
            }

            label {
                class: "btn-primary inline-block px-4 py-2 rounded cursor-pointer text-white font-medium transition-colors",
                input {
                    r#type: "file",
                    accept: ACCEPT_ATTRIBUTE,
                    class: "hidden",
                    disabled,
                    onchange: handle_files,
                }
                "Choose File"
            }

            p { class: "text-[var(--muted)] text-sm mt-2",
                "PNG or JPEG, up to 10 MB"
            }
        }
    }
}
