//! One button per mask class, tinted with the mask color.

use dioxus::prelude::*;
use retexture_core::{HoverChange, Selection, Session};

/// Chip background alpha while hovered.
const HOVER_ALPHA: f64 = 0.3;
/// Chip background alpha otherwise.
const IDLE_ALPHA: f64 = 0.1;

struct Chip {
    class: String,
    background: String,
    border: String,
    textured: bool,
    selected: bool,
}

/// Props for the [`MaskChips`] component.
#[derive(Props, Clone, PartialEq)]
pub struct MaskChipsProps {
    /// Session state shared with the canvas.
    session: Signal<Session>,
    /// Called whenever the hovered mask changes.
    on_hover: EventHandler<HoverChange>,
    /// Called when a chip is clicked.
    on_select: EventHandler<Selection>,
}

/// Row of mask chips mirroring the canvas hover and selection.
///
/// Classes with an applied texture carry a check mark.
#[component]
pub fn MaskChips(props: MaskChipsProps) -> Element {
    let mut session = props.session;
    let on_hover = props.on_hover;
    let on_select = props.on_select;

    let chips: Vec<Chip> = {
        let state = session.read();
        let hovered = state.hovered();
        let selected = state.selected().map(|m| m.class.as_str());
        state
            .registry()
            .classes()
            .into_iter()
            .filter_map(|class| {
                let color = state.registry().mask_for_class(class)?.rgb_color;
                let alpha = if hovered == Some(class) {
                    HOVER_ALPHA
                } else {
                    IDLE_ALPHA
                };
                Some(Chip {
                    class: class.to_owned(),
                    background: color.css_alpha(alpha),
                    border: color.css(),
                    textured: state.textures().contains(class),
                    selected: selected == Some(class),
                })
            })
            .collect()
    };

    if chips.is_empty() {
        return rsx! {};
    }

    rsx! {
        div { class: "mask-chips flex flex-wrap gap-2",
            for Chip { class, background, border, textured, selected } in chips {
                button {
                    key: "{class}",
                    class: if selected { "mask-chip mask-chip-selected" } else { "mask-chip" },
                    style: "background-color: {background}; border-color: {border};",
                    onmouseenter: {
                        let class = class.clone();
                        move |_| {
                            let change = session.write().hover_class(Some(&class));
                            if let Some(change) = change {
                                on_hover.call(change);
                            }
                        }
                    },
                    onmouseleave: move |_| {
                        let change = session.write().hover_class(None);
                        if let Some(change) = change {
                            on_hover.call(change);
                        }
                    },
                    onclick: {
                        let class = class.clone();
                        move |_| {
                            let selection = session.write().select_class(&class);
                            if let Some(selection) = selection {
                                if let Some(ref change) = selection.hover {
                                    on_hover.call(change.clone());
                                }
                                on_select.call(selection);
                            }
                        }
                    },
                    "{class}"
                    if textured {
                        span { class: "ml-1", "✓" }
                    }
                }
            }
        }
    }
}
