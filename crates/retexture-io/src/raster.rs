//! Object URLs for uploaded images and the composited result PNG.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{BlobPropertyBag, HtmlCanvasElement};

use crate::canvas::{self, CanvasError};

/// Errors that can occur while creating object URLs or compositing.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The base image could not be loaded.
    #[error("failed to load image: {0}")]
    Load(#[from] CanvasError),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Wrap raw image bytes in a Blob and return an object URL for `<img src>`.
///
/// The returned URL must be revoked via [`revoke_object_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn bytes_to_object_url(bytes: &[u8], mime_type: &str) -> Result<String, RasterError> {
    let uint8_array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&uint8_array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    Ok(web_sys::Url::create_object_url_with_blob(&blob)?)
}

/// Revoke a URL created by [`bytes_to_object_url`].
///
/// Best-effort: the URL may already have been revoked.
pub fn revoke_object_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}

/// Draw the base image with the overlay canvas on top and encode the
/// result as a PNG `data:` URL.
///
/// The output has the overlay's backing size, which matches the image.
///
/// # Errors
///
/// Returns [`RasterError`] if the base image fails to load or any
/// canvas call fails (including a tainted canvas).
pub async fn composite_png(
    base_image_url: &str,
    overlay: &HtmlCanvasElement,
) -> Result<String, RasterError> {
    let base = canvas::load_image(base_image_url).await?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RasterError::JsError("no document".into()))?;
    let output: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|e| RasterError::JsError(format!("failed to cast element: {e:?}")))?;
    output.set_width(overlay.width());
    output.set_height(overlay.height());

    let ctx = canvas::context_2d(&output)?;
    let (w, h) = (f64::from(overlay.width()), f64::from(overlay.height()));
    ctx.draw_image_with_html_image_element_and_dw_and_dh(&base, 0.0, 0.0, w, h)?;
    ctx.draw_image_with_html_canvas_element(overlay, 0.0, 0.0)?;

    Ok(output.to_data_url_with_type("image/png")?)
}
