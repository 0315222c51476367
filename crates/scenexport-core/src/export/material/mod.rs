//! Material translation into glTF PBR metallic-roughness
//!
//! Each source shading model is handled by a [`ShaderStrategy`] looked up by
//! shader name in a [`ShaderRegistry`]. Materials whose shader has no strategy
//! go through the name heuristic in [`fallback`].

mod builtin;
mod fallback;

pub use builtin::{PropertyMapStrategy, StandardStrategy, UrpLitStrategy};

use super::session::ExportSession;
use super::texture::TextureMapType;
use crate::document::{self, AlphaMode, PbrMetallicRoughness};
use crate::scene::{Material, MaterialId, TextureId};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Backface culling value meaning "render both sides"
const CULL_OFF: f32 = 0.0;

/// Property names a shading model stores its PBR inputs under
///
/// Unset names mean the model has no such input. Process shader names are
/// forwarded to the image sink with the texture they apply to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderProperties {
    pub albedo_map: Option<String>,
    pub albedo_color: Option<String>,
    pub metallic_map: Option<String>,
    pub metallic_power: Option<String>,
    pub metallic_process_shader: Option<String>,
    pub roughness_map: Option<String>,
    pub roughness_power: Option<String>,
    pub roughness_process_shader: Option<String>,
    pub normal_map: Option<String>,
    pub normal_power: Option<String>,
    pub normal_process_shader: Option<String>,
}

/// Translation rules for one or more shading models
///
/// The `try_get_*` methods read the named properties; override them when a
/// model stores an input differently (e.g. smoothness instead of roughness).
pub trait ShaderStrategy: Send + Sync {
    /// Shader identifiers this strategy handles
    fn shader_names(&self) -> Vec<&str>;

    fn properties(&self) -> &ShaderProperties;

    fn try_get_albedo_map(&self, material: &Material) -> Option<TextureId> {
        material.texture(self.properties().albedo_map.as_deref()?)
    }

    fn try_get_albedo_color(&self, material: &Material) -> Option<[f32; 4]> {
        material.color(self.properties().albedo_color.as_deref()?)
    }

    fn try_get_metallic_map(&self, material: &Material) -> Option<TextureId> {
        material.texture(self.properties().metallic_map.as_deref()?)
    }

    fn try_get_metallic_power(&self, material: &Material) -> Option<f32> {
        material.float(self.properties().metallic_power.as_deref()?)
    }

    fn try_get_roughness_map(&self, material: &Material) -> Option<TextureId> {
        material.texture(self.properties().roughness_map.as_deref()?)
    }

    fn try_get_roughness(&self, material: &Material) -> Option<f32> {
        material.float(self.properties().roughness_power.as_deref()?)
    }

    fn try_get_normal_map(&self, material: &Material) -> Option<TextureId> {
        material.texture(self.properties().normal_map.as_deref()?)
    }

    fn try_get_normal_power(&self, material: &Material) -> Option<f32> {
        material.float(self.properties().normal_power.as_deref()?)
    }

    /// Populate `out` from `material`
    fn fill_properties(
        &self,
        session: &mut ExportSession<'_>,
        material: &Material,
        out: &mut document::Material,
    ) -> Result<()> {
        fill_pbr(self, session, material, out)
    }
}

/// Shared translation: surface flags, PBR factors and maps, normal map
pub fn fill_pbr<S: ShaderStrategy + ?Sized>(
    strategy: &S,
    session: &mut ExportSession<'_>,
    material: &Material,
    out: &mut document::Material,
) -> Result<()> {
    apply_surface(material, out);

    let names = strategy.properties();
    let mut pbr = PbrMetallicRoughness::default();

    if let Some(texture) = strategy.try_get_albedo_map(material) {
        let mut info = session.export_texture_info(Some(texture), TextureMapType::Main, false, None)?;
        transform_for(session, &mut info, material, names.albedo_map.as_deref());
        pbr.base_color_texture = Some(info);
    }
    if let Some(color) = strategy.try_get_albedo_color(material) {
        pbr.base_color_factor = Some(color);
    }

    if let Some(texture) = strategy.try_get_metallic_map(material) {
        let mut info = session.export_texture_info(
            Some(texture),
            TextureMapType::MetallicGloss,
            true,
            names.metallic_process_shader.as_deref(),
        )?;
        transform_for(session, &mut info, material, names.metallic_map.as_deref());
        pbr.metallic_roughness_texture = Some(info);
    }
    if let Some(metallic) = strategy.try_get_metallic_power(material) {
        pbr.metallic_factor = metallic;
    }

    // a separate roughness map replaces the metallic one in the shared slot
    if let Some(texture) = strategy.try_get_roughness_map(material) {
        let mut info = session.export_texture_info(
            Some(texture),
            TextureMapType::MetallicGloss,
            true,
            names.roughness_process_shader.as_deref(),
        )?;
        transform_for(session, &mut info, material, names.roughness_map.as_deref());
        pbr.metallic_roughness_texture = Some(info);
    }
    if let Some(roughness) = strategy.try_get_roughness(material) {
        pbr.roughness_factor = roughness;
    }

    if let Some(texture) = strategy.try_get_normal_map(material) {
        let mut info = session.export_normal_texture_info(
            Some(texture),
            TextureMapType::Bump,
            material,
            strategy.try_get_normal_power(material),
            names.normal_process_shader.as_deref(),
        )?;
        transform_for(session, &mut info, material, names.normal_map.as_deref());
        out.normal_texture = Some(info);
    }

    out.pbr_metallic_roughness = Some(pbr);
    Ok(())
}

fn transform_for(
    session: &mut ExportSession<'_>,
    info: &mut impl document::TextureReference,
    material: &Material,
    property: Option<&str>,
) {
    if let Some(property) = property {
        session.export_texture_transform(info, material, property);
    }
}

/// Cull, cutoff and render-type flags shared by every translation path
pub(crate) fn apply_surface(material: &Material, out: &mut document::Material) {
    out.double_sided = material.float("_Cull") == Some(CULL_OFF);
    if let Some(cutoff) = material.float("_Cutoff") {
        out.alpha_cutoff = Some(cutoff);
    }
    out.alpha_mode = match material.tag("RenderType") {
        Some("TransparentCutout") => AlphaMode::Mask,
        Some("Transparent") => AlphaMode::Blend,
        _ => AlphaMode::Opaque,
    };
}

/// Shader name to strategy lookup
#[derive(Clone, Default)]
pub struct ShaderRegistry {
    strategies: HashMap<String, Arc<dyn ShaderStrategy>>,
}

impl fmt::Debug for ShaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.strategies.keys().collect();
        names.sort();
        f.debug_struct("ShaderRegistry").field("shaders", &names).finish()
    }
}

impl ShaderRegistry {
    /// Empty registry; every material goes through the fallback
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in shading models
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(StandardStrategy::new()));
        registry.register(Arc::new(UrpLitStrategy::new()));
        registry
    }

    /// Built-ins plus one [`PropertyMapStrategy`] per configured shader
    pub fn with_mappings(mappings: &BTreeMap<String, ShaderProperties>) -> Self {
        let mut registry = Self::builtin();
        for (shader, properties) in mappings {
            registry.register(Arc::new(PropertyMapStrategy::new(shader, properties.clone())));
        }
        registry
    }

    /// Register `strategy` under each of its shader names, replacing earlier entries
    pub fn register(&mut self, strategy: Arc<dyn ShaderStrategy>) {
        for name in strategy.shader_names() {
            tracing::debug!("Registered shader strategy for '{}'", name);
            self.strategies.insert(name.to_string(), Arc::clone(&strategy));
        }
    }

    pub fn get(&self, shader: &str) -> Option<&Arc<dyn ShaderStrategy>> {
        self.strategies.get(shader)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl ExportSession<'_> {
    /// Export a material once per identity; `None` becomes the "null" material
    pub fn export_material(&mut self, id: Option<MaterialId>) -> Result<usize> {
        if let Some(index) = self.caches.materials.lookup(&id) {
            return Ok(index);
        }

        let scene = self.scene;
        let registry = self.registry;

        let mut out = document::Material::default();
        match id {
            None => {
                out.name = Some("null".to_string());
                out.pbr_metallic_roughness = Some(PbrMetallicRoughness::default());
            }
            Some(id) => {
                let material = scene.material(id)?;
                out.name = Some(material.name.clone());
                match registry.get(&material.shader) {
                    Some(strategy) => strategy.fill_properties(self, material, &mut out)?,
                    None => fallback::fill(self, material, &mut out)?,
                }
            }
        }

        self.root.materials.push(out);
        let index = self.root.materials.len() - 1;
        self.caches.materials.record(id, index);
        Ok(index)
    }
}
