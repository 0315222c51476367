//! Mesh and primitive export
//!
//! A glTF mesh is built from one or more renderables: the node's own renderer
//! plus any children folded in as extra primitives. Vertex streams are encoded
//! once per geometry; later uses only re-bind materials.

use super::accessor;
use super::convert;
use super::session::ExportSession;
use crate::document::{self, MODE_TRIANGLES};
use crate::scene::{EntityId, Geometry, GeometryId, MaterialId};
use crate::{Error, Result};
use std::collections::BTreeMap;

/// A geometry drawn with a material list, as seen by the mesh exporter
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    pub entity: EntityId,
    pub geometry: GeometryId,
    pub materials: Vec<Option<MaterialId>>,
}

impl Renderable {
    pub fn key(&self) -> PrimKey {
        PrimKey {
            geometry: self.geometry,
            materials: self.materials.clone(),
        }
    }
}

/// Mesh identity: geometry plus the ordered material list it is drawn with
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimKey {
    pub geometry: GeometryId,
    pub materials: Vec<Option<MaterialId>>,
}

/// Encoded submesh without a material binding
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveTemplate {
    pub attributes: BTreeMap<String, usize>,
    pub indices: usize,
}

impl PrimitiveTemplate {
    fn bind(&self, material: Option<usize>) -> document::Primitive {
        document::Primitive {
            attributes: self.attributes.clone(),
            indices: Some(self.indices),
            material,
            mode: MODE_TRIANGLES,
        }
    }
}

fn validate(geometry: &Geometry) -> Result<()> {
    let vertices = geometry.vertex_count();
    let streams = [
        ("normals", geometry.normals.len()),
        ("tangents", geometry.tangents.len()),
        ("uv0", geometry.uv0.len()),
        ("uv1", geometry.uv1.len()),
        ("colors", geometry.colors.len()),
    ];
    for (stream, len) in streams {
        if len != 0 && len != vertices {
            return Err(Error::InvalidArgument(format!(
                "geometry '{}' has {len} {stream} for {vertices} vertices",
                geometry.name
            )));
        }
    }

    for (submesh, triangles) in geometry.submeshes.iter().enumerate() {
        if triangles.len() % 3 != 0 {
            return Err(Error::InvalidArgument(format!(
                "geometry '{}' submesh {submesh} has {} indices, not a multiple of 3",
                geometry.name,
                triangles.len()
            )));
        }
        if let Some(&bad) = triangles.iter().find(|&&i| i as usize >= vertices) {
            return Err(Error::InvalidArgument(format!(
                "geometry '{}' submesh {submesh} references vertex {bad} of {vertices}",
                geometry.name
            )));
        }
    }
    Ok(())
}

impl ExportSession<'_> {
    /// Export the mesh drawn by `renderables`, reusing an identical earlier mesh
    ///
    /// Returns `None` when every submesh is empty, in which case no mesh is
    /// added to the document.
    pub fn export_mesh(&mut self, name: &str, renderables: &[Renderable]) -> Result<Option<usize>> {
        if let Some(existing) = self.existing_mesh(renderables) {
            tracing::debug!("Reusing mesh {} for '{}'", existing, name);
            return Ok(Some(existing));
        }

        let mut primitives = Vec::new();
        for renderable in renderables {
            primitives.extend(self.export_primitives(renderable)?);
        }
        if primitives.is_empty() {
            tracing::debug!("Skipping mesh for '{}': no triangles", name);
            return Ok(None);
        }

        self.root.meshes.push(document::Mesh {
            name: Some(name.to_string()),
            primitives,
        });
        let index = self.root.meshes.len() - 1;
        for renderable in renderables {
            self.caches.meshes.record(renderable.key(), index);
        }
        Ok(Some(index))
    }

    /// Mesh already exported for exactly this set of keys
    fn existing_mesh(&mut self, renderables: &[Renderable]) -> Option<usize> {
        let mut existing = None;
        for renderable in renderables {
            let found = self.caches.meshes.lookup(&renderable.key())?;
            if existing.is_some_and(|index| index != found) {
                return None;
            }
            existing = Some(found);
        }
        existing
    }

    /// One primitive per non-empty submesh, with material carry-over
    ///
    /// Submeshes past the end of the material list reuse the material of the
    /// last non-empty submesh that had one.
    fn export_primitives(&mut self, renderable: &Renderable) -> Result<Vec<document::Primitive>> {
        let templates = self.geometry_templates(renderable.geometry)?;

        let mut primitives = Vec::with_capacity(templates.len());
        let mut carried = None;
        for (submesh, template) in templates.iter().enumerate() {
            let Some(template) = template else {
                continue;
            };
            let material = match renderable.materials.get(submesh) {
                Some(&material) => {
                    let index = self.export_material(material)?;
                    carried = Some(index);
                    Some(index)
                }
                None => carried,
            };
            primitives.push(template.bind(material));
        }
        Ok(primitives)
    }

    /// Encoded submeshes of a geometry, encoding the streams on first use
    fn geometry_templates(&mut self, id: GeometryId) -> Result<Vec<Option<PrimitiveTemplate>>> {
        if let Some(templates) = self.caches.geometry_primitives.get(&id) {
            return Ok(templates.clone());
        }

        let scene = self.scene;
        let geometry = scene.geometry(id)?;
        let templates = self.encode_geometry(geometry)?;
        self.caches.geometry_primitives.insert(id, templates.clone());
        Ok(templates)
    }

    fn encode_geometry(&mut self, geometry: &Geometry) -> Result<Vec<Option<PrimitiveTemplate>>> {
        validate(geometry)?;

        let mut attributes = BTreeMap::new();
        let position = accessor::encode_vec3(&convert::vectors(&geometry.positions))?;
        attributes.insert("POSITION".to_string(), self.push_accessor(position));

        if !geometry.normals.is_empty() {
            let normals = accessor::encode_vec3(&convert::vectors(&geometry.normals))?;
            attributes.insert("NORMAL".to_string(), self.push_accessor(normals));
        }
        if !geometry.tangents.is_empty() {
            let tangents = accessor::encode_vec4(&convert::tangents(&geometry.tangents))?;
            attributes.insert("TANGENT".to_string(), self.push_accessor(tangents));
        }
        if !geometry.uv0.is_empty() {
            let uv = accessor::encode_vec2(&convert::tex_coords(&geometry.uv0))?;
            attributes.insert("TEXCOORD_0".to_string(), self.push_accessor(uv));
        }
        if !geometry.uv1.is_empty() {
            let uv = accessor::encode_vec2(&convert::tex_coords(&geometry.uv1))?;
            attributes.insert("TEXCOORD_1".to_string(), self.push_accessor(uv));
        }
        if !geometry.colors.is_empty() {
            let colors: Vec<[f32; 4]> = geometry.colors.iter().map(|c| c.to_array()).collect();
            let colors = accessor::encode_colors(&colors)?;
            attributes.insert("COLOR_0".to_string(), self.push_accessor(colors));
        }

        let mut templates = Vec::with_capacity(geometry.submesh_count());
        for triangles in &geometry.submeshes {
            if triangles.is_empty() {
                templates.push(None);
                continue;
            }
            let indices = accessor::encode_indices(&convert::flip_faces(triangles))?;
            templates.push(Some(PrimitiveTemplate {
                attributes: attributes.clone(),
                indices: self.push_accessor(indices),
            }));
        }
        Ok(templates)
    }
}
