//! State owned by a single export call

use super::accessor::EncodedAccessor;
use super::buffer::BufferManager;
use super::cache::ExportCaches;
use super::material::ShaderRegistry;
use super::texture::ImageRequest;
use super::{ContainerFormat, ExportJob, ExportOptions, ExportedDocument};
use crate::document::{Accessor, Buffer, Root};
use crate::scene::{EntityId, ExportTarget, Renderer, Scene};
use crate::Result;
use std::collections::HashMap;

/// Document, buffer and caches for one export call
///
/// A session is created per call and consumed by [`ExportSession::finish`];
/// nothing in it outlives the call. Shader strategies receive the session so
/// they can export the textures they reference.
pub struct ExportSession<'a> {
    pub(crate) scene: &'a Scene,
    pub(crate) options: &'a ExportOptions,
    pub(crate) registry: &'a ShaderRegistry,
    pub(crate) target: ExportTarget,
    /// Baked renderers standing in for the owner's own renderer
    pub(crate) baked: HashMap<EntityId, Renderer>,
    pub(crate) root: Root,
    pub(crate) buffer: BufferManager,
    pub(crate) caches: ExportCaches,
    pub(crate) images: Vec<ImageRequest>,
}

impl<'a> ExportSession<'a> {
    pub(crate) fn new(
        scene: &'a Scene,
        options: &'a ExportOptions,
        registry: &'a ShaderRegistry,
        job: &ExportJob,
    ) -> Result<Self> {
        let mut baked = HashMap::new();
        for mesh in &job.baked {
            scene.entity(mesh.owner)?;
            scene.geometry(mesh.geometry)?;
            baked.insert(mesh.owner, mesh.renderer());
        }

        let mut root = Root::new(&options.generator);
        root.use_extension(crate::document::KHR_LIGHTS_PUNCTUAL);

        Ok(Self {
            scene,
            options,
            registry,
            target: job.target,
            baked,
            root,
            buffer: BufferManager::new(),
            caches: ExportCaches::default(),
            images: Vec::new(),
        })
    }

    /// The scene being exported
    pub fn scene(&self) -> &'a Scene {
        self.scene
    }

    /// Append an encoded stream to the buffer and register its accessor
    pub(crate) fn push_accessor(&mut self, encoded: EncodedAccessor) -> usize {
        let view = self.buffer.append(&encoded.bytes, Some(encoded.target));
        self.root.accessors.push(Accessor {
            buffer_view: view,
            component_type: encoded.component_type,
            count: encoded.count,
            kind: encoded.kind,
            min: encoded.min,
            max: encoded.max,
        });
        self.root.accessors.len() - 1
    }

    /// Close the document: attach buffer views and the buffer itself
    pub(crate) fn finish(self, format: ContainerFormat, name: &str) -> ExportedDocument {
        let cache_hits = self.caches.total_hits();
        let mut root = self.root;
        let (binary, views) = self.buffer.into_parts();

        root.buffer_views = views;
        if !binary.is_empty() {
            root.buffers.push(Buffer {
                byte_length: binary.len(),
                uri: match format {
                    ContainerFormat::Split => Some(format!("{name}.bin")),
                    ContainerFormat::Glb => None,
                },
            });
        }

        tracing::debug!(
            "Closed document '{}': {} nodes, {} meshes, {} accessors, {} bytes, {} cache hits",
            name,
            root.nodes.len(),
            root.meshes.len(),
            root.accessors.len(),
            binary.len(),
            cache_hits
        );

        ExportedDocument {
            root,
            binary,
            images: self.images,
        }
    }
}
