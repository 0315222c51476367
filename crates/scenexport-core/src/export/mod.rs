//! glTF 2.0 export of scene subtrees
//!
//! An [`Exporter`] turns an [`ExportJob`] into a document, either in memory
//! ([`Exporter::build`]) or on disk ([`Exporter::export`]). Every call runs in
//! a fresh [`ExportSession`], so no cache or buffer state leaks between calls.

pub mod accessor;
pub mod buffer;
pub mod cache;
mod camera;
mod container;
pub mod convert;
mod images;
mod light;
mod material;
mod mesh;
mod node;
mod session;
mod texture;

pub use container::{to_glb, write_atomic};
pub use images::{ImagePassStats, ImageSink, PngImageSink, write_images};
pub use material::{
    PropertyMapStrategy, ShaderProperties, ShaderRegistry, ShaderStrategy, StandardStrategy,
    UrpLitStrategy, fill_pbr,
};
pub use mesh::{PrimKey, Renderable};
pub use session::ExportSession;
pub use texture::{ImageRequest, TextureMapType, image_file_name, image_file_stem};

use crate::document::Root;
use crate::scene::{BakedMesh, EntityId, ExportTarget, LodPolicy, LodVisibilityGuard, Scene};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Output container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerFormat {
    /// `<name>.gltf` with an external `<name>.bin`
    #[default]
    Split,
    /// Single `<name>.glb`
    Glb,
}

impl ContainerFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "gltf" => Some(Self::Split),
            "glb" => Some(Self::Glb),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Split => "gltf",
            Self::Glb => "glb",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Split => "glTF (JSON + BIN)",
            Self::Glb => "GLB (Binary)",
        }
    }
}

/// Export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub format: ContainerFormat,
    /// Which LOD level is kept for LOD groups
    pub lod_policy: LodPolicy,
    /// List used extensions in `extensionsRequired` too
    pub require_extensions: bool,
    /// Run the image pass after writing the document
    pub write_images: bool,
    /// `asset.generator` string
    pub generator: String,
    /// Extra shader name to property table mappings
    pub shaders: BTreeMap<String, ShaderProperties>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ContainerFormat::Split,
            lod_policy: LodPolicy::Highest,
            require_extensions: false,
            write_images: true,
            generator: concat!("scenexport ", env!("CARGO_PKG_VERSION")).to_string(),
            shaders: BTreeMap::new(),
        }
    }
}

/// One export request: which subtrees, under which name
#[derive(Debug, Clone, Default)]
pub struct ExportJob {
    pub name: String,
    pub roots: Vec<EntityId>,
    pub target: ExportTarget,
    /// Geometry baked upstream, standing in for the owners' renderers
    pub baked: Vec<BakedMesh>,
    /// Image file names written by an earlier pass
    pub pre_exported: HashSet<String>,
}

impl ExportJob {
    pub fn new(name: impl Into<String>, roots: Vec<EntityId>) -> Self {
        Self {
            name: name.into(),
            roots,
            ..Default::default()
        }
    }

    /// Job over every root of `scene`
    pub fn whole_scene(name: impl Into<String>, scene: &Scene) -> Self {
        Self::new(name, scene.roots())
    }

    pub fn with_target(mut self, target: ExportTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_baked(mut self, baked: Vec<BakedMesh>) -> Self {
        self.baked = baked;
        self
    }

    pub fn with_pre_exported(mut self, file_names: impl IntoIterator<Item = String>) -> Self {
        self.pre_exported = file_names.into_iter().collect();
        self
    }
}

/// A finished document held in memory
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub root: Root,
    /// Contents of the single buffer
    pub binary: Vec<u8>,
    /// Images the document references, in first-use order
    pub images: Vec<ImageRequest>,
}

impl ExportedDocument {
    pub fn json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&self.root)?)
    }

    pub fn json_pretty(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.root)?)
    }

    pub fn to_glb(&self) -> Result<Vec<u8>> {
        to_glb(&self.json()?, &self.binary)
    }
}

/// Result of a successful export to disk
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub name: String,
    pub format: ContainerFormat,
    /// Primary files, in write order
    pub files: Vec<PathBuf>,
    pub node_count: usize,
    pub mesh_count: usize,
    pub material_count: usize,
    pub buffer_bytes: usize,
    pub images: ImagePassStats,
}

impl fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exported '{}' as {} ({} nodes, {} meshes, {} materials, {} bytes; images: {} written, {} skipped, {} missing)",
            self.name,
            self.format.name(),
            self.node_count,
            self.mesh_count,
            self.material_count,
            self.buffer_bytes,
            self.images.written,
            self.images.skipped,
            self.images.missing
        )
    }
}

/// Scene exporter holding options and the shader registry
#[derive(Debug, Clone)]
pub struct Exporter {
    options: ExportOptions,
    registry: ShaderRegistry,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportOptions::default())
    }
}

impl Exporter {
    /// Exporter with the built-in shaders plus those mapped in `options`
    pub fn new(options: ExportOptions) -> Self {
        let registry = ShaderRegistry::with_mappings(&options.shaders);
        Self { options, registry }
    }

    pub fn with_registry(options: ExportOptions, registry: ShaderRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn registry_mut(&mut self) -> &mut ShaderRegistry {
        &mut self.registry
    }

    /// Build the document in memory
    ///
    /// LOD visibility is adjusted for the duration of the call and restored
    /// before returning, on success and on error.
    pub fn build(&self, scene: &mut Scene, job: &ExportJob) -> Result<ExportedDocument> {
        self.build_document(scene, job)
            .map_err(|err| failed(&job.name, err))
    }

    /// Build and write the document to `out_dir` with PNG images
    pub fn export(&self, scene: &mut Scene, job: &ExportJob, out_dir: &Path) -> Result<ExportSummary> {
        self.export_with_sink(scene, job, out_dir, &mut PngImageSink)
    }

    pub fn export_with_sink(
        &self,
        scene: &mut Scene,
        job: &ExportJob,
        out_dir: &Path,
        sink: &mut dyn ImageSink,
    ) -> Result<ExportSummary> {
        self.write_document(scene, job, out_dir, sink)
            .map_err(|err| failed(&job.name, err))
    }

    fn build_document(&self, scene: &mut Scene, job: &ExportJob) -> Result<ExportedDocument> {
        if job.name.is_empty() {
            return Err(Error::InvalidArgument("export name is empty".to_string()));
        }

        let guard = LodVisibilityGuard::apply(scene, &job.roots, &job.target, self.options.lod_policy);
        let mut session = ExportSession::new(&guard, &self.options, &self.registry, job)?;
        session.export_scene_roots(&job.name, &job.roots)?;
        Ok(session.finish(self.options.format, &job.name))
    }

    fn write_document(
        &self,
        scene: &mut Scene,
        job: &ExportJob,
        out_dir: &Path,
        sink: &mut dyn ImageSink,
    ) -> Result<ExportSummary> {
        let document = self.build_document(scene, job)?;
        std::fs::create_dir_all(out_dir)?;

        let files = match self.options.format {
            ContainerFormat::Split => {
                container::write_split(out_dir, &job.name, &document.json_pretty()?, &document.binary)?
            }
            ContainerFormat::Glb => {
                vec![container::write_glb(out_dir, &job.name, &document.json()?, &document.binary)?]
            }
        };

        let images = if self.options.write_images {
            write_images(scene, &document.images, out_dir, &job.pre_exported, sink)?
        } else {
            ImagePassStats::default()
        };

        let summary = ExportSummary {
            name: job.name.clone(),
            format: self.options.format,
            files,
            node_count: document.root.nodes.len(),
            mesh_count: document.root.meshes.len(),
            material_count: document.root.materials.len(),
            buffer_bytes: document.binary.len(),
            images,
        };
        tracing::info!("{}", summary);
        Ok(summary)
    }
}

fn failed(name: &str, err: Error) -> Error {
    tracing::error!("Export of '{}' failed: {}", name, err);
    Error::ExportFailed {
        name: name.to_string(),
        source: Box::new(err),
    }
}
