//! Geometry baked upstream from non-standard renderers

use super::{EntityId, GeometryId, MaterialId, Renderer};
use serde::{Deserialize, Serialize};

/// A temporary mesh attached to an entity for the duration of one export
///
/// Skinned meshes, terrain and similar renderers are flattened to plain
/// geometry by the caller. The exporter treats the owner as if it carried a
/// regular renderer for this geometry, even though the geometry has no asset
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakedMesh {
    pub owner: EntityId,
    pub geometry: GeometryId,
    #[serde(default)]
    pub material: Option<MaterialId>,
}

impl BakedMesh {
    pub fn new(owner: EntityId, geometry: GeometryId, material: Option<MaterialId>) -> Self {
        Self {
            owner,
            geometry,
            material,
        }
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new(self.geometry, vec![self.material])
    }
}
