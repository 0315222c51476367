//! In-memory source scene graph consumed by the exporter
//!
//! The scene is an arena: entities, geometries, materials and textures live in
//! flat vectors and refer to each other through small `u32` handles. Those
//! handles are the stable identities every export cache is keyed on.
//!
//! The source convention is left-handed and Y-up with +Z forward. Conversion to
//! glTF happens during export, never here.

mod asset;
mod baked;
mod filter;
mod lod;

pub use asset::{
    Geometry, Material, MaterialProperty, PropertyValue, Texture, TextureFilter, TextureSlot,
    TextureWrap,
};
pub use baked::BakedMesh;
pub use filter::ExportTarget;
pub use lod::{LodGroup, LodPolicy, LodVisibilityGuard};

use crate::{Error, Result};
use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! handle {
    ($(#[$meta:meta])* $name:ident, $err:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Position of the object in its scene arena
            pub fn index(self) -> usize {
                self.0 as usize
            }

            fn missing(self) -> Error {
                Error::$err(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

handle!(
    /// Handle to an [`Entity`]
    EntityId,
    UnknownEntity
);
handle!(
    /// Handle to a [`Geometry`]
    GeometryId,
    UnknownGeometry
);
handle!(
    /// Handle to a [`Material`]
    MaterialId,
    UnknownMaterial
);
handle!(
    /// Handle to a [`Texture`]
    TextureId,
    UnknownTexture
);

/// Local transform relative to the parent entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Exact comparison against the identity transform
    pub fn is_identity(&self) -> bool {
        self.translation == Vec3::ZERO && self.rotation == Quat::IDENTITY && self.scale == Vec3::ONE
    }
}

/// Draws one geometry with one material per submesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Renderer {
    pub geometry: GeometryId,
    /// Per-submesh materials; `None` is a missing material slot
    #[serde(default)]
    pub materials: Vec<Option<MaterialId>>,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl Renderer {
    pub fn new(geometry: GeometryId, materials: Vec<Option<MaterialId>>) -> Self {
        Self {
            geometry,
            materials,
            enabled: true,
        }
    }

    /// Renderer with exactly one material slot
    pub fn single(geometry: GeometryId, material: MaterialId) -> Self {
        Self::new(geometry, vec![Some(material)])
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// Camera described by its projection matrix (OpenGL clip conventions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(default)]
    pub orthographic: bool,
    pub projection: Mat4,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl Camera {
    /// Finite perspective camera, `fov_y` in radians
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            orthographic: false,
            projection: Mat4::perspective_rh_gl(fov_y, aspect, near, far),
            enabled: true,
        }
    }

    /// Perspective camera without a far plane
    pub fn infinite_perspective(fov_y: f32, aspect: f32, near: f32) -> Self {
        let f = 1.0 / (0.5 * fov_y).tan();
        let projection = Mat4::from_cols(
            Vec4::new(f / aspect, 0.0, 0.0, 0.0),
            Vec4::new(0.0, f, 0.0, 0.0),
            Vec4::new(0.0, 0.0, -1.0, -1.0),
            Vec4::new(0.0, 0.0, -2.0 * near, 0.0),
        );
        Self {
            orthographic: false,
            projection,
            enabled: true,
        }
    }

    /// Orthographic camera spanning `half_height` above and below the view axis
    pub fn orthographic(half_height: f32, aspect: f32, near: f32, far: f32) -> Self {
        let half_width = half_height * aspect;
        Self {
            orthographic: true,
            projection: Mat4::orthographic_rh_gl(
                -half_width,
                half_width,
                -half_height,
                half_height,
                near,
                far,
            ),
            enabled: true,
        }
    }
}

/// Punctual light source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Spot,
    Directional,
    Point,
    Area,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    #[serde(default = "white")]
    pub color: Vec3,
    #[serde(default = "one")]
    pub intensity: f32,
    #[serde(default = "ten")]
    pub range: f32,
    /// Full cone angle in degrees, spot lights only
    #[serde(default = "thirty")]
    pub spot_angle: f32,
    #[serde(default = "enabled")]
    pub enabled: bool,
}

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            color: Vec3::ONE,
            intensity: 1.0,
            range: 10.0,
            spot_angle: 30.0,
            enabled: true,
        }
    }

    pub fn with_color(mut self, color: Vec3) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_range(mut self, range: f32) -> Self {
        self.range = range;
        self
    }

    pub fn with_spot_angle(mut self, degrees: f32) -> Self {
        self.spot_angle = degrees;
        self
    }
}

/// A node of the source transform hierarchy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default = "enabled")]
    pub active: bool,
    #[serde(default)]
    pub children: Vec<EntityId>,
    /// Rebuilt from `children` when a scene is loaded
    #[serde(skip)]
    pub parent: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<Renderer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<Light>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lod_group: Option<LodGroup>,
    /// Marks an independently exported object
    #[serde(default)]
    pub dynamic: bool,
    /// Rendered by an external hook, never exported as a regular node
    #[serde(default)]
    pub custom_render: bool,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            active: true,
            children: Vec::new(),
            parent: None,
            renderer: None,
            camera: None,
            light: None,
            lod_group: None,
            dynamic: false,
            custom_render: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_renderer(mut self, renderer: Renderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.light = Some(light);
        self
    }

    pub fn with_lod_group(mut self, group: LodGroup) -> Self {
        self.lod_group = Some(group);
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn custom_render(mut self) -> Self {
        self.custom_render = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Arena holding the whole source scene
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub geometries: Vec<Geometry>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub textures: Vec<Texture>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a scene description from JSON, relinking parents and checking handles
    pub fn from_json(json: &str) -> Result<Self> {
        let mut scene: Self = serde_json::from_str(json)?;
        scene.link_parents()?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() as u32 - 1)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() as u32 - 1)
    }

    /// Add a root entity
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        self.entities.push(entity);
        EntityId(self.entities.len() as u32 - 1)
    }

    /// Add an entity as the last child of `parent`
    pub fn spawn_child(&mut self, parent: EntityId, mut entity: Entity) -> Result<EntityId> {
        self.entity(parent)?;
        entity.parent = Some(parent);
        let id = self.spawn(entity);
        self.entity_mut(parent)?.children.push(id);
        Ok(id)
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities.get(id.index()).ok_or_else(|| id.missing())
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities.get_mut(id.index()).ok_or_else(|| id.missing())
    }

    pub fn geometry(&self, id: GeometryId) -> Result<&Geometry> {
        self.geometries.get(id.index()).ok_or_else(|| id.missing())
    }

    pub fn material(&self, id: MaterialId) -> Result<&Material> {
        self.materials.get(id.index()).ok_or_else(|| id.missing())
    }

    pub fn texture(&self, id: TextureId) -> Result<&Texture> {
        self.textures.get(id.index()).ok_or_else(|| id.missing())
    }

    /// Entities without a parent, in arena order
    pub fn roots(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, e)| e.parent.is_none())
            .map(|(i, _)| EntityId(i as u32))
            .collect()
    }

    /// Active flag of the entity and all of its ancestors
    pub fn is_active_in_hierarchy(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.entities.get(id.index()) {
                Some(entity) if entity.active => current = entity.parent,
                _ => return false,
            }
        }
        true
    }

    fn link_parents(&mut self) -> Result<()> {
        for entity in &mut self.entities {
            entity.parent = None;
        }
        for index in 0..self.entities.len() {
            let parent = EntityId(index as u32);
            for child in self.entities[index].children.clone() {
                let slot = self.entity_mut(child)?;
                if slot.parent.is_some() || child == parent {
                    return Err(Error::InvalidArgument(format!(
                        "entity {child} has more than one parent"
                    )));
                }
                slot.parent = Some(parent);
            }
        }

        // every ancestor chain must end at a root
        for index in 0..self.entities.len() {
            let mut current = self.entities[index].parent;
            let mut depth = 0;
            while let Some(id) = current {
                depth += 1;
                if depth > self.entities.len() {
                    return Err(Error::InvalidArgument(format!(
                        "entity {index} is part of a parent cycle"
                    )));
                }
                current = self.entity(id)?.parent;
            }
        }
        Ok(())
    }

    /// Check that every handle stored in the scene resolves
    pub fn validate(&self) -> Result<()> {
        for entity in &self.entities {
            for &child in &entity.children {
                self.entity(child)?;
            }
            if let Some(renderer) = &entity.renderer {
                self.geometry(renderer.geometry)?;
                for material in renderer.materials.iter().flatten() {
                    self.material(*material)?;
                }
            }
        }
        for material in &self.materials {
            for texture in material.texture_ids() {
                self.texture(texture)?;
            }
        }
        Ok(())
    }
}

fn enabled() -> bool {
    true
}

fn white() -> Vec3 {
    Vec3::ONE
}

fn one() -> f32 {
    1.0
}

fn ten() -> f32 {
    10.0
}

fn thirty() -> f32 {
    30.0
}
