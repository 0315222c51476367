//! Level of Detail (LOD) groups and export-time visibility resolution

use super::{EntityId, ExportTarget, Scene};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Alternative renderers for one logical object, finest level first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LodGroup {
    #[serde(default = "enabled")]
    pub enabled: bool,
    /// Renderer-bearing entities per level
    pub levels: Vec<Vec<EntityId>>,
}

fn enabled() -> bool {
    true
}

impl LodGroup {
    pub fn new(levels: Vec<Vec<EntityId>>) -> Self {
        Self {
            enabled: true,
            levels,
        }
    }
}

/// Which LOD level survives an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LodPolicy {
    /// Keep the first, most detailed level
    #[default]
    Highest,
    /// Keep the last, cheapest level
    Lowest,
}

impl LodPolicy {
    fn kept_level(self, level_count: usize) -> usize {
        match self {
            Self::Highest => 0,
            Self::Lowest => level_count - 1,
        }
    }
}

/// Scoped visibility change for every LOD group an export will visit
///
/// Renderers of the discarded levels are disabled when the guard is created and
/// enabled again when it is dropped, whether the export succeeded or not. The
/// guard derefs to the scene so the exporter reads the adjusted state.
pub struct LodVisibilityGuard<'a> {
    scene: &'a mut Scene,
    disabled: Vec<EntityId>,
}

impl<'a> LodVisibilityGuard<'a> {
    pub fn apply(
        scene: &'a mut Scene,
        roots: &[EntityId],
        target: &ExportTarget,
        policy: LodPolicy,
    ) -> Self {
        let groups: Vec<_> = visited(scene, roots, target)
            .into_iter()
            .filter_map(|id| scene.entity(id).ok()?.lod_group.clone())
            .filter(|group| group.enabled && !group.levels.is_empty())
            .collect();

        let mut guard = Self {
            scene,
            disabled: Vec::new(),
        };
        for group in &groups {
            guard.resolve(group, policy);
        }
        if !guard.disabled.is_empty() {
            tracing::debug!("LOD resolution disabled {} renderers", guard.disabled.len());
        }
        guard
    }

    fn resolve(&mut self, group: &LodGroup, policy: LodPolicy) {
        let kept = policy.kept_level(group.levels.len());

        for (level, renderers) in group.levels.iter().enumerate() {
            if level == kept {
                continue;
            }
            for &id in renderers {
                if let Some(renderer) = self.renderer_mut(id) {
                    if renderer.enabled {
                        renderer.enabled = false;
                        self.disabled.push(id);
                    }
                }
            }
        }

        // A renderer shared with the kept level must stay visible
        for &id in &group.levels[kept] {
            if let Some(pos) = self.disabled.iter().position(|&d| d == id) {
                self.disabled.remove(pos);
                if let Some(renderer) = self.renderer_mut(id) {
                    renderer.enabled = true;
                }
            }
        }
    }

    fn renderer_mut(&mut self, id: EntityId) -> Option<&mut super::Renderer> {
        self.scene.entity_mut(id).ok()?.renderer.as_mut()
    }

    /// Renderers currently hidden by this guard
    pub fn disabled(&self) -> &[EntityId] {
        &self.disabled
    }
}

impl Deref for LodVisibilityGuard<'_> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        self.scene
    }
}

impl Drop for LodVisibilityGuard<'_> {
    fn drop(&mut self) {
        for id in std::mem::take(&mut self.disabled) {
            if let Some(renderer) = self.renderer_mut(id) {
                renderer.enabled = true;
            }
        }
    }
}

/// Entities reachable from `roots` that the target admits, depth first
fn visited(scene: &Scene, roots: &[EntityId], target: &ExportTarget) -> Vec<EntityId> {
    let mut out = Vec::new();
    let mut stack: Vec<EntityId> = roots
        .iter()
        .rev()
        .copied()
        .filter(|&id| target.admits_root(scene, id))
        .collect();

    while let Some(id) = stack.pop() {
        out.push(id);
        if let Ok(entity) = scene.entity(id) {
            stack.extend(
                entity
                    .children
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&child| target.admits_child(scene, child)),
            );
        }
    }
    out
}
