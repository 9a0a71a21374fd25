//! Dioxus UI components for retexture.
//!
//! Provides the upload zone, the segmentation canvas with its mask
//! overlay, mask chips, the texture panel, the workflow progress bar,
//! and the result download button.

mod export;
mod mask_chips;
mod progress;
mod segmentation_canvas;
mod texture_panel;
mod upload;

pub use export::ExportPanel;
pub use mask_chips::MaskChips;
pub use progress::ProgressBar;
pub use segmentation_canvas::{CANVAS_ID, SegmentationCanvas};
pub use texture_panel::TexturePanel;
pub use upload::FileUpload;
