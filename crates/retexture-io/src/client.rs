//! HTTP client for the segmentation/texture backend.
//!
//! Thin `gloo-net` wrapper: each method issues one fetch and hands the
//! `(status, body)` pair to [`retexture_core::api::interpret_response`].
//! No retries and no timeouts; callers decide what a failure means.

use gloo_net::http::{Request, Response};
use retexture_core::api::{
    self, ApiError, DataList, GenerateTextureRequest, GeneratedTexture, TextureQuery,
};
use retexture_core::{
    ClientConfig, FurniturePart, FurnitureType, SegmentationData, TextureDescriptor,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{BlobPropertyBag, FormData};

fn transport(err: impl std::fmt::Display) -> ApiError {
    ApiError::Transport(err.to_string())
}

fn js_transport(value: &JsValue) -> ApiError {
    ApiError::Transport(format!("{value:?}"))
}

async fn read_envelope<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    api::interpret_response(status, &body)
}

/// Client for the backend at [`ClientConfig::api_base`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiClient {
    config: ClientConfig,
}

impl ApiClient {
    /// Create a client for the given backend.
    #[must_use]
    pub const fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// The backend configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve a catalog asset path (preview, thumbnail) to a full URL.
    #[must_use]
    pub fn asset_url(&self, path: &str) -> String {
        self.config.asset_url(path)
    }

    /// Upload an image for segmentation.
    ///
    /// Sent as `multipart/form-data` with the image in the `file` field.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the backend
    /// rejects the image.
    pub async fn segment(
        &self,
        file_name: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<SegmentationData, ApiError> {
        let parts = js_sys::Array::new();
        parts.push(&js_sys::Uint8Array::from(bytes));
        let opts = BlobPropertyBag::new();
        opts.set_type(mime_type);
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)
            .map_err(|e| js_transport(&e))?;

        let form = FormData::new().map_err(|e| js_transport(&e))?;
        form.append_with_blob_and_filename(api::SEGMENT_FILE_FIELD, &blob, file_name)
            .map_err(|e| js_transport(&e))?;

        let response = Request::post(&self.config.endpoint(api::SEGMENT_PATH))
            .body(form)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        read_envelope(response).await
    }

    /// List catalog textures matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn texture_options(
        &self,
        query: &TextureQuery,
    ) -> Result<Vec<TextureDescriptor>, ApiError> {
        let params = query.params();
        let response = Request::get(&self.config.endpoint(api::TEXTURE_OPTIONS_PATH))
            .query(params.iter().map(|(k, v)| (*k, v.as_str())))
            .send()
            .await
            .map_err(transport)?;
        let list: DataList<TextureDescriptor> = read_envelope(response).await?;
        Ok(list.data)
    }

    /// Generate a texture for one mask.
    ///
    /// Returns the URL of the generated image (usually a `data:` URL).
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or generation is
    /// rejected.
    pub async fn generate_texture(
        &self,
        request: &GenerateTextureRequest,
    ) -> Result<String, ApiError> {
        let response = Request::post(&self.config.endpoint(api::GENERATE_TEXTURE_PATH))
            .json(request)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        let generated: GeneratedTexture = read_envelope(response).await?;
        Ok(generated.generated_texture)
    }

    /// List furniture types in the catalog.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn furniture_types(&self) -> Result<Vec<FurnitureType>, ApiError> {
        let response = Request::get(&self.config.endpoint(api::FURNITURE_TYPES_PATH))
            .send()
            .await
            .map_err(transport)?;
        let list: DataList<FurnitureType> = read_envelope(response).await?;
        Ok(list.data)
    }

    /// List the parts of one furniture type.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails.
    pub async fn furniture_parts(
        &self,
        furniture_type_id: i64,
    ) -> Result<Vec<FurniturePart>, ApiError> {
        let id = furniture_type_id.to_string();
        let response = Request::get(&self.config.endpoint(api::FURNITURE_PARTS_PATH))
            .query([("furniture_type_id", id.as_str())])
            .send()
            .await
            .map_err(transport)?;
        let list: DataList<FurniturePart> = read_envelope(response).await?;
        Ok(list.data)
    }
}
