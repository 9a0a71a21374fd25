//! retexture-io: Browser I/O and Dioxus component library.
//!
//! Talks to the segmentation/texture backend over `fetch`, draws the
//! mask overlay on a 2D canvas, manages object URLs and downloads, and
//! provides the UI components of the retexture web application.

pub mod canvas;
pub mod client;
pub mod components;
pub mod download;
pub mod raster;

pub use client::ApiClient;
pub use components::{
    ExportPanel, FileUpload, MaskChips, ProgressBar, SegmentationCanvas, TexturePanel,
};
