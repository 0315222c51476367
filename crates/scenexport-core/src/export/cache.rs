//! Per-export identity caches guaranteeing exactly-once export

use super::mesh::{PrimKey, PrimitiveTemplate};
use super::texture::TextureMapType;
use crate::scene::{GeometryId, MaterialId, TextureFilter, TextureId, TextureWrap};
use std::collections::HashMap;
use std::hash::Hash;

/// Maps a structural key to the index of the glTF object emitted for it
#[derive(Debug)]
pub struct IdentityCache<K> {
    entries: HashMap<K, usize>,
    hits: usize,
}

impl<K> Default for IdentityCache<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            hits: 0,
        }
    }
}

impl<K: Eq + Hash> IdentityCache<K> {
    /// Index previously recorded for `key`, counting the hit
    pub fn lookup(&mut self, key: &K) -> Option<usize> {
        let found = self.entries.get(key).copied();
        if found.is_some() {
            self.hits += 1;
        }
        found
    }

    pub fn record(&mut self, key: K, index: usize) {
        self.entries.insert(key, index);
    }

    pub fn hits(&self) -> usize {
        self.hits
    }
}

/// Every cache of one export call; never shared between calls
#[derive(Debug, Default)]
pub(crate) struct ExportCaches {
    pub meshes: IdentityCache<PrimKey>,
    /// Encoded submeshes per geometry, `None` for empty submeshes
    pub geometry_primitives: HashMap<GeometryId, Vec<Option<PrimitiveTemplate>>>,
    pub materials: IdentityCache<Option<MaterialId>>,
    pub textures: IdentityCache<(Option<TextureId>, TextureMapType)>,
    pub images: IdentityCache<(TextureId, TextureMapType)>,
    pub samplers: IdentityCache<(TextureWrap, TextureFilter)>,
}

impl ExportCaches {
    pub fn total_hits(&self) -> usize {
        self.meshes.hits()
            + self.materials.hits()
            + self.textures.hits()
            + self.images.hits()
            + self.samplers.hits()
    }
}
