//! Scene graph walk: entities to glTF nodes
//!
//! Children are split into primitives, which are folded into the parent's
//! mesh, and nodes, which are exported recursively. A parent is always pushed
//! before its children, so node indices follow a pre-order walk.

use super::camera::export_camera;
use super::convert;
use super::light::export_light;
use super::mesh::Renderable;
use super::session::ExportSession;
use crate::document::{self, Node};
use crate::scene::{Entity, EntityId};
use crate::Result;

impl ExportSession<'_> {
    /// Export the admitted roots as the document's default scene
    pub fn export_scene_roots(&mut self, name: &str, roots: &[EntityId]) -> Result<usize> {
        let scene = self.scene;
        let mut nodes = Vec::with_capacity(roots.len());
        for &root in roots {
            if !self.target.admits_root(scene, root) {
                tracing::debug!("Skipping root {} for target {:?}", root, self.target);
                continue;
            }
            nodes.push(self.export_node(root)?);
        }

        self.root.scenes.push(document::Scene {
            name: Some(name.to_string()),
            nodes,
        });
        let index = self.root.scenes.len() - 1;
        self.root.scene = Some(index);
        Ok(index)
    }

    pub fn export_node(&mut self, id: EntityId) -> Result<usize> {
        let scene = self.scene;
        let entity = scene.entity(id)?;

        let mut node = Node {
            name: Some(entity.name.clone()),
            ..Default::default()
        };

        if let Some(camera) = entity.camera.filter(|c| c.enabled) {
            self.root.cameras.push(export_camera(&entity.name, &camera));
            node.camera = Some(self.root.cameras.len() - 1);
        }

        match entity.light.filter(|l| l.enabled) {
            Some(light) => {
                let light = self.root.push_light(export_light(&entity.name, &light));
                node.set_light(light);
                convert::apply_transform(&mut node, &convert::light_corrected(&entity.transform));
            }
            None => convert::apply_transform(&mut node, &entity.transform),
        }

        self.root.nodes.push(node);
        let index = self.root.nodes.len() - 1;

        let (primitives, children) = self.split_children(id, entity)?;
        if !primitives.is_empty() {
            self.root.nodes[index].mesh = self.export_mesh(&entity.name, &primitives)?;
        }

        let mut child_nodes = Vec::with_capacity(children.len());
        for child in children {
            child_nodes.push(self.export_node(child)?);
        }
        self.root.nodes[index].children = child_nodes;

        Ok(index)
    }

    /// The entity's own geometry: a baked override or a renderable renderer
    ///
    /// Regular renderers only count when enabled, non-empty and backed by a
    /// project asset; baked geometry only needs vertices.
    fn renderable(&self, id: EntityId) -> Result<Option<Renderable>> {
        let scene = self.scene;
        let (renderer, baked) = match self.baked.get(&id) {
            Some(renderer) => (renderer, true),
            None => match &scene.entity(id)?.renderer {
                Some(renderer) if renderer.enabled => (renderer, false),
                _ => return Ok(None),
            },
        };

        let geometry = scene.geometry(renderer.geometry)?;
        if geometry.vertex_count() == 0 || !(baked || geometry.has_asset_path()) {
            return Ok(None);
        }

        Ok(Some(Renderable {
            entity: id,
            geometry: renderer.geometry,
            materials: renderer.materials.clone(),
        }))
    }

    /// Leaf child with identity transform and a single-material renderable
    fn primitive_child(&self, id: EntityId, child: &Entity) -> Result<Option<Renderable>> {
        if !child.children.is_empty()
            || !child.transform.is_identity()
            || child.camera.is_some()
            || child.light.is_some()
        {
            return Ok(None);
        }
        Ok(self
            .renderable(id)?
            .filter(|renderable| renderable.materials.len() == 1))
    }

    fn split_children(
        &self,
        id: EntityId,
        entity: &Entity,
    ) -> Result<(Vec<Renderable>, Vec<EntityId>)> {
        let scene = self.scene;
        let mut primitives: Vec<Renderable> = self.renderable(id)?.into_iter().collect();
        let parent_has_geometry = !primitives.is_empty();

        let mut nodes = Vec::with_capacity(entity.children.len());
        for &child_id in &entity.children {
            if !self.target.admits_child(scene, child_id) {
                continue;
            }
            let child = scene.entity(child_id)?;
            let folded = if parent_has_geometry {
                self.primitive_child(child_id, child)?
            } else {
                None
            };
            match folded {
                Some(renderable) => primitives.push(renderable),
                None => nodes.push(child_id),
            }
        }
        Ok((primitives, nodes))
    }
}
