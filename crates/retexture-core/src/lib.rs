//! retexture-core: Pure segmentation session logic (sans-IO).
//!
//! Holds everything about a texturing session that does not touch the
//! browser: the mask data model, polygon hit-testing, the mask registry,
//! the applied-texture store, the render plan the canvas executes, the
//! pointer interaction state machine, workflow step tracking, upload
//! validation, and the JSON wire types exchanged with the
//! segmentation/texture backend.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! values and returns structured data. All browser interaction (fetch,
//! canvas drawing, object URLs) lives in `retexture-io`.

pub mod api;
pub mod config;
pub mod geometry;
pub mod registry;
pub mod render;
pub mod session;
pub mod step;
pub mod store;
pub mod types;
pub mod upload;
pub mod viewport;

pub use api::{ApiError, GenerateTextureRequest, TextureQuery};
pub use config::ClientConfig;
pub use geometry::Bounds;
pub use registry::MaskRegistry;
pub use render::{Fill, Layer};
pub use session::{
    GenerationTicket, HoverChange, LoadTicket, OptionsTicket, Selection, Session, SessionError,
};
pub use step::WorkflowStep;
pub use store::{AppliedTexture, AppliedTextures};
pub use types::{
    Dimensions, FurniturePart, FurnitureType, Mask, MaterialCategory, Point, Rgb,
    SegmentationData, TextureDescriptor,
};
pub use upload::{ImageUpload, UploadError};
pub use viewport::Viewport;
