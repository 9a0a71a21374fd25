//! Workflow steps shown in the progress bar.

use std::fmt;

use crate::session::Session;

/// One step of the upload -> segment -> texture -> download workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkflowStep {
    /// No image yet.
    Upload,
    /// Image uploaded, segmentation pending.
    Segment,
    /// Masks available, no texture applied yet.
    Generate,
    /// At least one texture applied; the result can be downloaded.
    Download,
}

impl WorkflowStep {
    /// All steps in workflow order.
    pub const ALL: [Self; 4] = [Self::Upload, Self::Segment, Self::Generate, Self::Download];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload Image",
            Self::Segment => "Segment Parts",
            Self::Generate => "Generate Textures",
            Self::Download => "Download Result",
        }
    }

    /// Zero-based position in [`ALL`](Self::ALL).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The step the user is currently on.
    #[must_use]
    pub fn current(session: &Session, segmenting: bool) -> Self {
        if !session.has_image() {
            Self::Upload
        } else if segmenting || session.registry().is_empty() {
            Self::Segment
        } else if session.textures().is_empty() {
            Self::Generate
        } else {
            Self::Download
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::types::{Dimensions, Mask, Point, Rgb, SegmentationData, TextureDescriptor};

    #[test]
    fn all_is_in_index_order() {
        for (i, step) in WorkflowStep::ALL.into_iter().enumerate() {
            assert_eq!(step.index(), i, "{step} out of order");
        }
    }

    #[test]
    fn labels_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for step in WorkflowStep::ALL {
            assert!(seen.insert(step.label()), "duplicate label {step}");
        }
    }

    #[test]
    fn current_step_follows_session() {
        let mut session = Session::new();
        assert_eq!(WorkflowStep::current(&session, false), WorkflowStep::Upload);

        let epoch = session.begin_image(Dimensions {
            width: 10,
            height: 10,
        });
        assert_eq!(WorkflowStep::current(&session, true), WorkflowStep::Segment);

        session
            .load_segmentation(
                epoch,
                SegmentationData {
                    masks: vec![Mask {
                        class: "seat".into(),
                        points: vec![
                            Point::new(0.0, 0.0),
                            Point::new(10.0, 0.0),
                            Point::new(10.0, 10.0),
                        ],
                        rgb_color: Rgb([1, 2, 3]),
                        confidence: None,
                    }],
                    ..SegmentationData::default()
                },
            )
            .unwrap();
        assert_eq!(WorkflowStep::current(&session, false), WorkflowStep::Generate);

        session.select_class("seat").unwrap();
        let texture = Rc::new(TextureDescriptor {
            id: 1,
            name: "Oak".into(),
            category: "Wood".into(),
            description: None,
            preview_image_path: String::new(),
            thumbnail_path: String::new(),
            prompt: None,
            part_name: None,
        });
        let (ticket, _) = session.begin_texture_application(&texture).unwrap();
        session
            .complete_texture_application(&ticket, texture, "data:,".into())
            .unwrap();
        assert_eq!(WorkflowStep::current(&session, false), WorkflowStep::Download);
    }
}
