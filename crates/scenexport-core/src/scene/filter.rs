//! Selection of the subtrees an export call visits

use super::{EntityId, Scene};
use serde::{Deserialize, Serialize};

/// What one export call produces
///
/// `WholeScene` exports everything except dynamic entities, which are exported
/// on their own. `Dynamic` exports the subtree rooted at one dynamic entity and
/// skips any other dynamic entity found below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportTarget {
    #[default]
    WholeScene,
    Dynamic(EntityId),
}

impl ExportTarget {
    /// Whether a root handed to the exporter is exported
    pub fn admits_root(&self, scene: &Scene, id: EntityId) -> bool {
        let Ok(entity) = scene.entity(id) else {
            return false;
        };
        let selected = match *self {
            Self::WholeScene => !entity.dynamic,
            Self::Dynamic(target) => id == target,
        };
        selected && Self::exportable(scene, id)
    }

    /// Whether a child met during traversal is exported
    pub fn admits_child(&self, scene: &Scene, id: EntityId) -> bool {
        let Ok(entity) = scene.entity(id) else {
            return false;
        };
        let selected = match *self {
            Self::WholeScene => !entity.dynamic,
            Self::Dynamic(target) => !entity.dynamic || id == target,
        };
        selected && Self::exportable(scene, id)
    }

    fn exportable(scene: &Scene, id: EntityId) -> bool {
        scene.is_active_in_hierarchy(id) && scene.entity(id).is_ok_and(|e| !e.custom_render)
    }
}
