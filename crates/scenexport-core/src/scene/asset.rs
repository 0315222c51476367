//! Geometry, material and texture assets referenced by entities

use super::TextureId;
use glam::{Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indexed triangle geometry with optional vertex streams
///
/// Attribute streams other than `positions` may be empty. Each submesh is a
/// flat triangle list indexing into the shared vertex streams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geometry {
    pub name: String,
    /// Project-relative source path; `None` for generated geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec4>,
    pub uv0: Vec<Vec2>,
    pub uv1: Vec<Vec2>,
    /// Linear RGBA vertex colors
    pub colors: Vec<Vec4>,
    pub submeshes: Vec<Vec<u32>>,
}

impl Geometry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_tangents(mut self, tangents: Vec<Vec4>) -> Self {
        self.tangents = tangents;
        self
    }

    pub fn with_uv0(mut self, uv: Vec<Vec2>) -> Self {
        self.uv0 = uv;
        self
    }

    pub fn with_uv1(mut self, uv: Vec<Vec2>) -> Self {
        self.uv1 = uv;
        self
    }

    pub fn with_colors(mut self, colors: Vec<Vec4>) -> Self {
        self.colors = colors;
        self
    }

    /// Append a submesh triangle list
    pub fn with_submesh(mut self, triangles: Vec<u32>) -> Self {
        self.submeshes.push(triangles);
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn submesh_count(&self) -> usize {
        self.submeshes.len()
    }

    /// True when the geometry comes from a project asset rather than a generator
    pub fn has_asset_path(&self) -> bool {
        self.asset_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Texture property with its UV transform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureSlot {
    #[serde(default)]
    pub texture: Option<TextureId>,
    #[serde(default)]
    pub offset: Vec2,
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
}

impl TextureSlot {
    pub fn new(texture: Option<TextureId>) -> Self {
        Self {
            texture,
            offset: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn has_identity_transform(&self) -> bool {
        self.offset == Vec2::ZERO && self.scale == Vec2::ONE
    }
}

fn unit_scale() -> Vec2 {
    Vec2::ONE
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    Float(f32),
    Color([f32; 4]),
    Texture(TextureSlot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperty {
    pub name: String,
    pub value: PropertyValue,
}

/// Shader-specific material: a shading-model name plus a property bag
///
/// Properties keep their insertion order, which is also the order texture
/// properties are enumerated in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub shader: String,
    #[serde(default)]
    pub properties: Vec<MaterialProperty>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Material {
    pub fn new(name: impl Into<String>, shader: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shader: shader.into(),
            properties: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    fn set(&mut self, name: &str, value: PropertyValue) {
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(property) => property.value = value,
            None => self.properties.push(MaterialProperty {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn with_float(mut self, name: &str, value: f32) -> Self {
        self.set(name, PropertyValue::Float(value));
        self
    }

    pub fn with_color(mut self, name: &str, rgba: [f32; 4]) -> Self {
        self.set(name, PropertyValue::Color(rgba));
        self
    }

    pub fn with_texture(self, name: &str, texture: TextureId) -> Self {
        self.with_texture_slot(name, TextureSlot::new(Some(texture)))
    }

    pub fn with_texture_slot(mut self, name: &str, slot: TextureSlot) -> Self {
        self.set(name, PropertyValue::Texture(slot));
        self
    }

    pub fn with_tag(mut self, key: &str, value: &str) -> Self {
        self.tags.insert(key.to_string(), value.to_string());
        self
    }

    fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.property(name)? {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn color(&self, name: &str) -> Option<[f32; 4]> {
        match self.property(name)? {
            PropertyValue::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn texture_slot(&self, name: &str) -> Option<&TextureSlot> {
        match self.property(name)? {
            PropertyValue::Texture(slot) => Some(slot),
            _ => None,
        }
    }

    /// Texture bound to a property, `None` when unset or empty
    pub fn texture(&self, name: &str) -> Option<TextureId> {
        self.texture_slot(name).and_then(|slot| slot.texture)
    }

    /// Names of texture-valued properties in insertion order
    pub fn texture_property_names(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|p| matches!(p.value, PropertyValue::Texture(_)))
            .map(|p| p.name.as_str())
    }

    pub(crate) fn texture_ids(&self) -> impl Iterator<Item = TextureId> + '_ {
        self.properties.iter().filter_map(|p| match p.value {
            PropertyValue::Texture(slot) => slot.texture,
            _ => None,
        })
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureWrap {
    #[default]
    Repeat,
    Clamp,
    Mirror,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    Point,
    #[default]
    Bilinear,
    Trilinear,
}

/// A 2D texture, optionally carrying RGBA8 pixels for the image pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Texture {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_path: Option<String>,
    pub wrap: TextureWrap,
    pub filter: TextureFilter,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixels: Option<Vec<u8>>,
}

impl Texture {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_asset_path(mut self, path: impl Into<String>) -> Self {
        self.asset_path = Some(path.into());
        self
    }

    pub fn with_wrap(mut self, wrap: TextureWrap) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_filter(mut self, filter: TextureFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Attach RGBA8 pixel data, row-major
    pub fn with_pixels(mut self, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        self.width = width;
        self.height = height;
        self.pixels = Some(rgba);
        self
    }
}
