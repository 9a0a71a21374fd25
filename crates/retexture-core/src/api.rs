//! Wire types for the segmentation/texture backend.
//!
//! Every endpoint answers with a JSON envelope carrying a `success`
//! flag and, on failure, an `error` message. The payload sits beside the
//! flag: at the top level for `/api/segment`, under `data` for catalog
//! listings, and as `generatedTexture` for `/api/generate-texture`.
//!
//! The HTTP transport lives in `retexture-io`; this module only builds
//! request bodies and interprets `(status, body)` pairs so that both
//! halves can be tested on the host.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{Mask, SegmentationData, TextureDescriptor};

/// Segmentation upload endpoint (multipart, field [`SEGMENT_FILE_FIELD`]).
pub const SEGMENT_PATH: &str = "/api/segment";
/// Texture catalog query endpoint.
pub const TEXTURE_OPTIONS_PATH: &str = "/api/texture-options";
/// Texture generation endpoint (JSON body).
pub const GENERATE_TEXTURE_PATH: &str = "/api/generate-texture";
/// Furniture type listing endpoint.
pub const FURNITURE_TYPES_PATH: &str = "/api/furniture-types";
/// Furniture part listing endpoint.
pub const FURNITURE_PARTS_PATH: &str = "/api/furniture-parts";

/// Multipart form field carrying the uploaded image.
pub const SEGMENT_FILE_FIELD: &str = "file";

/// Errors returned by backend calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (network down, CORS, ...).
    #[error("network error: {0}")]
    Transport(String),

    /// A non-2xx response without a readable envelope.
    #[error("server responded with HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The backend reported `success: false`.
    #[error("{0}")]
    Backend(String),

    /// The response body was not the expected JSON shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Longest body excerpt kept in [`ApiError::Status`].
const MAX_BODY_EXCERPT: usize = 200;

#[derive(Deserialize)]
struct EnvelopeStatus {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// `{ "data": [...] }` payload of catalog listings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataList<T> {
    /// Listed items.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Payload of `/api/generate-texture`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GeneratedTexture {
    /// URL of the generated image (usually a `data:image/png;base64,...` URL).
    #[serde(rename = "generatedTexture")]
    pub generated_texture: String,
    /// Server-side path where the texture was saved.
    #[serde(default, rename = "texturePath")]
    pub texture_path: Option<String>,
}

/// Interpret an HTTP response from the backend.
///
/// A readable envelope decides the outcome regardless of the status code
/// (the backend pairs `success: false` with 4xx/5xx). Only when the body
/// is not JSON does the status code produce [`ApiError::Status`].
///
/// # Errors
///
/// Returns [`ApiError::Backend`] when the envelope reports failure,
/// [`ApiError::Status`] for an unreadable non-2xx response, and
/// [`ApiError::Decode`] when the payload does not match `T`.
pub fn interpret_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            if (200..300).contains(&status) {
                return Err(ApiError::Decode(e.to_string()));
            }
            return Err(ApiError::Status {
                status,
                body: excerpt(body),
            });
        }
    };

    let envelope =
        EnvelopeStatus::deserialize(&value).map_err(|e| ApiError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(ApiError::Backend(
            envelope
                .error
                .unwrap_or_else(|| format!("request failed (HTTP {status})")),
        ));
    }

    T::deserialize(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_EXCERPT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_owned(),
    }
}

/// Query for `/api/texture-options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureQuery {
    /// Textures whose category name matches a material, ignoring case.
    Material(String),
    /// Textures compatible with a furniture part.
    Part {
        /// Furniture type identifier.
        furniture_type_id: i64,
        /// Part identifier.
        part_id: i64,
    },
}

impl TextureQuery {
    /// URL query parameters for this query.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Material(name) => vec![("material_type", name.clone())],
            Self::Part {
                furniture_type_id,
                part_id,
            } => vec![
                ("furniture_type_id", furniture_type_id.to_string()),
                ("part_id", part_id.to_string()),
            ],
        }
    }
}

/// Prompt used when the catalog texture carries none.
#[must_use]
pub fn default_prompt(mask_class: &str, description: &str) -> String {
    format!("Generate a seamless texture for {mask_class} with these characteristics: {description}")
}

/// One entry of the `segmentedParts` map sent with a generation request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentedPart {
    /// The mask class.
    pub id: String,
    /// The chosen catalog texture.
    pub texture: TextureDescriptor,
    /// The mask being textured.
    pub mask_data: Mask,
    /// Texture description.
    pub texture_description: String,
    /// Generation prompt.
    pub prompt: String,
}

/// JSON body of `POST /api/generate-texture`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTextureRequest {
    /// The full segmentation response for the current image.
    pub segmentation_data: SegmentationData,
    /// Texture description.
    pub texture_description: String,
    /// Class of the mask to texture.
    pub mask_class: String,
    /// Generation prompt.
    pub prompt: String,
    /// Structured per-part data keyed by mask class.
    pub segmented_parts: BTreeMap<String, SegmentedPart>,
}

impl GenerateTextureRequest {
    /// Build the request for applying `texture` to `mask`.
    ///
    /// The prompt is the texture's own prompt if it has one, otherwise
    /// [`default_prompt`].
    #[must_use]
    pub fn new(segmentation: &SegmentationData, mask: &Mask, texture: &TextureDescriptor) -> Self {
        let description = texture.description().to_owned();
        let prompt = texture
            .prompt
            .clone()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| default_prompt(&mask.class, &description));

        let part = SegmentedPart {
            id: mask.class.clone(),
            texture: texture.clone(),
            mask_data: mask.clone(),
            texture_description: description.clone(),
            prompt: prompt.clone(),
        };

        Self {
            segmentation_data: segmentation.clone(),
            texture_description: description,
            mask_class: mask.class.clone(),
            prompt,
            segmented_parts: BTreeMap::from([(mask.class.clone(), part)]),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::{FurnitureType, MaterialCategory, Point, Rgb};

    fn seat() -> Mask {
        Mask {
            class: "seat".into(),
            points: vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0),
            ],
            rgb_color: Rgb([255, 0, 0]),
            confidence: None,
        }
    }

    fn oak(prompt: Option<&str>) -> TextureDescriptor {
        TextureDescriptor {
            id: 4,
            name: "Oak".into(),
            category: "Wood".into(),
            description: Some("warm oak grain".into()),
            preview_image_path: "/textures/oak.png".into(),
            thumbnail_path: "/textures/oak_t.png".into(),
            prompt: prompt.map(str::to_owned),
            part_name: None,
        }
    }

    #[test]
    fn segment_response_decodes_top_level_payload() {
        let body = json!({
            "success": true,
            "width": 640,
            "height": 480,
            "masks": [{"class": "seat", "points": [[0,0],[10,0],[10,10],[0,10]], "rgb_color": [255,0,0]}],
            "material_categories": [{"id": 1, "name": "Fabric"}],
            "image_path": "uploads/abc.png"
        })
        .to_string();
        let data: SegmentationData = interpret_response(200, &body).unwrap();
        assert_eq!(data.masks.len(), 1);
        assert_eq!(
            data.material_categories,
            vec![MaterialCategory {
                id: 1,
                name: "Fabric".into()
            }]
        );
        assert_eq!(data.image_path.as_deref(), Some("uploads/abc.png"));
    }

    #[test]
    fn backend_failure_uses_error_message() {
        let body = r#"{"success": false, "error": "Mask not found"}"#;
        let err = interpret_response::<GeneratedTexture>(404, body).unwrap_err();
        assert_eq!(err, ApiError::Backend("Mask not found".into()));
    }

    #[test]
    fn backend_failure_without_message_mentions_status() {
        let err = interpret_response::<GeneratedTexture>(500, r#"{"success": false}"#).unwrap_err();
        assert_eq!(err, ApiError::Backend("request failed (HTTP 500)".into()));
    }

    #[test]
    fn missing_success_flag_is_a_failure() {
        let err =
            interpret_response::<GeneratedTexture>(200, r#"{"generatedTexture": "x"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Backend(_)));
    }

    #[test]
    fn non_json_error_page_maps_to_status() {
        let err = interpret_response::<GeneratedTexture>(502, "<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                body: "<html>Bad Gateway</html>".into()
            }
        );
    }

    #[test]
    fn non_json_success_is_a_decode_error() {
        let err = interpret_response::<GeneratedTexture>(200, "ok").unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn wrong_payload_shape_is_a_decode_error() {
        let err = interpret_response::<GeneratedTexture>(200, r#"{"success": true}"#).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn status_excerpt_is_truncated() {
        let body = "x".repeat(1000);
        match interpret_response::<GeneratedTexture>(500, &body).unwrap_err() {
            ApiError::Status { body, .. } => assert_eq!(body.len(), MAX_BODY_EXCERPT + 3),
            other => unreachable!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn catalog_listing_decodes_data() {
        let body = r#"{"success": true, "data": [{"id": 2, "name": "Sofa", "category": "Seating"}]}"#;
        let list: DataList<FurnitureType> = interpret_response(200, body).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].name, "Sofa");
    }

    #[test]
    fn generated_texture_decodes() {
        let body = r#"{"success": true, "generatedTexture": "http://x/tex.png", "texturePath": "static/t.png"}"#;
        let generated: GeneratedTexture = interpret_response(200, body).unwrap();
        assert_eq!(generated.generated_texture, "http://x/tex.png");
        assert_eq!(generated.texture_path.as_deref(), Some("static/t.png"));
    }

    #[test]
    fn material_query_params() {
        assert_eq!(
            TextureQuery::Material("Wood".into()).params(),
            vec![("material_type", "Wood".to_owned())]
        );
    }

    #[test]
    fn part_query_params() {
        let q = TextureQuery::Part {
            furniture_type_id: 3,
            part_id: 11,
        };
        assert_eq!(
            q.params(),
            vec![
                ("furniture_type_id", "3".to_owned()),
                ("part_id", "11".to_owned())
            ]
        );
    }

    #[test]
    fn generate_request_uses_default_prompt() {
        let seg = SegmentationData {
            masks: vec![seat()],
            ..SegmentationData::default()
        };
        let req = GenerateTextureRequest::new(&seg, &seat(), &oak(None));
        assert_eq!(
            req.prompt,
            "Generate a seamless texture for seat with these characteristics: warm oak grain"
        );
        assert_eq!(req.mask_class, "seat");
        assert_eq!(req.texture_description, "warm oak grain");
    }

    #[test]
    fn generate_request_prefers_catalog_prompt() {
        let seg = SegmentationData::default();
        let req = GenerateTextureRequest::new(&seg, &seat(), &oak(Some("oak planks, top down")));
        assert_eq!(req.prompt, "oak planks, top down");
    }

    #[test]
    fn generate_request_serializes_camel_case() {
        let seg = SegmentationData {
            masks: vec![seat()],
            ..SegmentationData::default()
        };
        let value = serde_json::to_value(GenerateTextureRequest::new(&seg, &seat(), &oak(None))).unwrap();
        assert_eq!(value["maskClass"], "seat");
        assert_eq!(value["segmentationData"]["masks"][0]["class"], "seat");
        assert_eq!(value["segmentedParts"]["seat"]["id"], "seat");
        assert_eq!(value["segmentedParts"]["seat"]["maskData"]["rgb_color"], json!([255, 0, 0]));
        assert_eq!(value["segmentedParts"]["seat"]["textureDescription"], "warm oak grain");
        assert_eq!(value["segmentedParts"]["seat"]["texture"]["preview_image_path"], "/textures/oak.png");
    }
}
