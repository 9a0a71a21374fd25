//! Workflow progress bar.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdImage, LdUpload, LdWand};
use retexture_core::WorkflowStep;

/// Props for the [`ProgressBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ProgressBarProps {
    /// The step the user is on.
    current: WorkflowStep,
}

/// Four workflow steps; earlier steps are marked completed.
#[component]
pub fn ProgressBar(props: ProgressBarProps) -> Element {
    let current = props.current;
    #[allow(clippy::cast_precision_loss)]
    let percent = current.index() as f64 / (WorkflowStep::ALL.len() - 1) as f64 * 100.0;

    rsx! {
        div { class: "progress mb-6",
            div { class: "progress-track",
                div { class: "progress-fill", style: "width: {percent}%;" }
            }
            ol { class: "flex justify-between",
                for step in WorkflowStep::ALL {
                    li {
                        key: "{step.index()}",
                        class: if step < current {
                            "progress-step completed"
                        } else if step == current {
                            "progress-step active"
                        } else {
                            "progress-step"
                        },
                        span { class: "progress-icon",
                            match step {
                                WorkflowStep::Upload => rsx! { Icon { width: 20, height: 20, icon: LdUpload } },
                                WorkflowStep::Segment => rsx! { Icon { width: 20, height: 20, icon: LdImage } },
                                WorkflowStep::Generate => rsx! { Icon { width: 20, height: 20, icon: LdWand } },
                                WorkflowStep::Download => rsx! { Icon { width: 20, height: 20, icon: LdDownload } },
                            }
                        }
                        span { class: "text-sm", "{step}" }
                    }
                }
            }
        }
    }
}
