//! Texture options for the selected mask, plus catalog browsing by
//! furniture type and part.

use std::rc::Rc;

use dioxus::prelude::*;
use retexture_core::{MaterialCategory, TextureDescriptor, TextureQuery};

use crate::client::ApiClient;

/// Props for the [`TexturePanel`] component.
#[derive(Props, Clone, PartialEq)]
pub struct TexturePanelProps {
    /// Material category of the hovered mask, if it has one.
    hovered_material: Option<MaterialCategory>,
    /// Class of the selected mask.
    selected_class: Option<String>,
    /// Options to choose from.
    options: Vec<Rc<TextureDescriptor>>,
    /// An options request is in flight.
    #[props(default)]
    loading: bool,
    /// Why the last options request failed.
    #[props(default)]
    error: Option<String>,
    /// A generation is in flight.
    #[props(default)]
    generating: bool,
    /// Catalog id of the texture applied to the selected class.
    #[props(default)]
    applied_texture_id: Option<i64>,
    /// Called when the user picks a texture.
    on_texture_select: EventHandler<Rc<TextureDescriptor>>,
    /// Called when the user picks a furniture type and part.
    on_part_query: EventHandler<TextureQuery>,
}

/// Side panel listing texture options.
///
/// The furniture type and part selectors load from the catalog on
/// demand; choosing both asks the parent to list textures for that part.
#[component]
pub fn TexturePanel(props: TexturePanelProps) -> Element {
    let client = use_context::<Rc<ApiClient>>();
    let mut furniture_type = use_signal(|| Option::<i64>::None);
    let mut part = use_signal(|| Option::<i64>::None);

    let types = {
        let client = Rc::clone(&client);
        use_resource(move || {
            let client = Rc::clone(&client);
            async move { client.furniture_types().await }
        })
    };

    let parts = {
        let client = Rc::clone(&client);
        use_resource(move || {
            let client = Rc::clone(&client);
            let type_id = furniture_type();
            async move {
                match type_id {
                    Some(id) => client.furniture_parts(id).await,
                    None => Ok(Vec::new()),
                }
            }
        })
    };

    let on_part_query = props.on_part_query;
    let on_type_change = move |evt: FormEvent| {
        furniture_type.set(evt.value().parse().ok());
        part.set(None);
    };
    let on_part_change = move |evt: FormEvent| {
        let part_id: Option<i64> = evt.value().parse().ok();
        part.set(part_id);
        if let (Some(furniture_type_id), Some(part_id)) = (furniture_type(), part_id) {
            on_part_query.call(TextureQuery::Part {
                furniture_type_id,
                part_id,
            });
        }
    };

    let can_apply = props.selected_class.is_some() && !props.generating;
    let on_texture_select = props.on_texture_select;

    rsx! {
        div { class: "texture-panel space-y-4",
            h3 { class: "text-lg font-semibold text-[var(--text-heading)]", "Textures" }

            if let Some(ref material) = props.hovered_material {
                p { class: "text-sm text-[var(--text-secondary)]", "Material: {material}" }
            }
            if let Some(ref class) = props.selected_class {
                p { class: "text-sm", "Selected part: {class}" }
            } else {
                p { class: "text-sm text-[var(--muted)]",
                    "Click a part of the image to see matching textures."
                }
            }

            div { class: "flex flex-col gap-2",
                select {
                    class: "catalog-select",
                    onchange: on_type_change,
                    option { value: "", "Furniture type" }
                    match &*types.read() {
                        Some(Ok(list)) => rsx! {
                            for ty in list.iter() {
                                option {
                                    key: "{ty.id}",
                                    value: "{ty.id}",
                                    selected: furniture_type() == Some(ty.id),
                                    "{ty.name}"
                                }
                            }
                        },
                        Some(Err(e)) => rsx! {
                            option { disabled: true, "Catalog unavailable: {e}" }
                        },
                        None => rsx! {},
                    }
                }
                select {
                    class: "catalog-select",
                    disabled: furniture_type().is_none(),
                    onchange: on_part_change,
                    option { value: "", "Part" }
                    if let Some(Ok(list)) = &*parts.read() {
                        for p in list.iter() {
                            option {
                                key: "{p.id}",
                                value: "{p.id}",
                                selected: part() == Some(p.id),
                                "{p.name}"
                            }
                        }
                    }
                }
            }

            if props.generating {
                p { class: "text-[var(--text-secondary)] animate-pulse", "Generating texture..." }
            }
            if let Some(ref err) = props.error {
                p { class: "text-[var(--text-error)] text-sm", "{err}" }
            }

            if props.loading {
                p { class: "text-[var(--text-secondary)] animate-pulse", "Loading textures..." }
            } else if props.options.is_empty() {
                p { class: "text-sm text-[var(--muted)]", "No textures to show." }
            } else {
                div { class: "texture-grid grid grid-cols-2 gap-3",
                    for texture in props.options.iter().cloned() {
                        button {
                            key: "{texture.id}",
                            class: if props.applied_texture_id == Some(texture.id) { "texture-card applied" } else { "texture-card" },
                            disabled: !can_apply,
                            title: texture.description().to_owned(),
                            onclick: {
                                let texture = Rc::clone(&texture);
                                move |_| on_texture_select.call(Rc::clone(&texture))
                            },
                            img {
                                src: client.asset_url(if texture.thumbnail_path.is_empty() {
                                    &texture.preview_image_path
                                } else {
                                    &texture.thumbnail_path
                                }),
                                alt: "{texture.name}",
                                class: "w-full h-24 object-cover rounded",
                            }
                            p { class: "font-medium text-sm mt-1", "{texture.name}" }
                            if let Some(ref part_name) = texture.part_name {
                                p { class: "text-xs text-[var(--muted)]", "{part_name}" }
                            }
                        }
                    }
                }
            }
        }
    }
}
