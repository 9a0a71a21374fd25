//! Applied-texture store: mask class -> chosen texture.
//!
//! One entry per class. Applying a texture to a class that already has
//! one replaces it (last write wins). Entries are never removed
//! individually; the whole store is cleared when a new image is loaded.
//!
//! Every write bumps a store-wide revision counter and stamps the entry
//! with it, so an asynchronous consumer (the canvas texture loader) can
//! tell whether the entry it started working on has since been replaced.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::types::TextureDescriptor;

/// A texture applied to one mask class.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedTexture {
    /// The catalog texture the user chose.
    pub texture: Rc<TextureDescriptor>,
    /// URL (often a `data:` URL) of the generated texture image.
    pub generated_texture_url: Option<String>,
    revision: u64,
}

impl AppliedTexture {
    /// Revision stamp assigned when this entry was written.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}

/// Mapping from mask class to its applied texture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppliedTextures {
    entries: BTreeMap<String, AppliedTexture>,
    last_revision: u64,
}

impl AppliedTextures {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write (or overwrite) the entry for `class`.
    ///
    /// Returns the revision stamped on the new entry.
    pub fn apply(
        &mut self,
        class: &str,
        texture: Rc<TextureDescriptor>,
        generated_texture_url: Option<String>,
    ) -> u64 {
        self.last_revision += 1;
        self.entries.insert(
            class.to_owned(),
            AppliedTexture {
                texture,
                generated_texture_url,
                revision: self.last_revision,
            },
        );
        self.last_revision
    }

    /// The entry for `class`, if any.
    #[must_use]
    pub fn get(&self, class: &str) -> Option<&AppliedTexture> {
        self.entries.get(class)
    }

    /// Whether `class` has an applied texture.
    #[must_use]
    pub fn contains(&self, class: &str) -> bool {
        self.entries.contains_key(class)
    }

    /// Number of classes with an applied texture.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no textures are applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in class order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AppliedTexture)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Remove every entry.
    ///
    /// The revision counter keeps counting so stamps stay unique across
    /// image sessions.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
