//! # Scenexport Core
//!
//! Scene graph to glTF 2.0 serialization.
//!
//! A [`scene::Scene`] holds entities, geometry, materials and textures in
//! arenas addressed by stable ids. The [`export::Exporter`] walks selected
//! subtrees of it and produces a glTF document, either as a `.gltf` + `.bin`
//! pair or as a single `.glb`, plus the image files the document references.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use scenexport_core::prelude::*;
//!
//! let mut scene = Scene::new();
//! let cube = scene.add_geometry(cube_geometry());
//! let material = scene.add_material(Material::new("crate", "Standard"));
//! scene.spawn(Entity::new("crate").with_renderer(Renderer::single(cube, material)));
//!
//! let job = ExportJob::whole_scene("level", &scene);
//! let summary = Exporter::default().export(&mut scene, &job, Path::new("out"))?;
//! println!("{summary}");
//! ```
//!
//! ## Conventions
//!
//! - **Source space**: left-handed, Y-up, +Z forward. Geometry and transforms
//!   are mirrored on X during export.
//! - **Texture coordinates**: V is flipped (`v' = 1 - v`).
//! - **Angles**: light spot angles are stored in degrees, exported in radians.

pub mod document;
pub mod export;
pub mod scene;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Scene model
    pub use crate::scene::{
        BakedMesh, Camera, Entity, EntityId, ExportTarget, Geometry, GeometryId, Light, LightKind,
        LodGroup, LodPolicy, Material, MaterialId, Renderer, Scene, Texture, TextureFilter,
        TextureId, TextureSlot, TextureWrap, Transform,
    };

    // Export
    pub use crate::export::{
        ContainerFormat, ExportJob, ExportOptions, ExportSummary, ExportedDocument, Exporter,
        ShaderProperties, ShaderRegistry, ShaderStrategy,
    };

    // Math (re-export glam)
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

    // Error handling
    pub use crate::{Error, Result};
}
