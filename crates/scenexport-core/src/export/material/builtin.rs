//! Strategies for the shading models known out of the box

use super::{ShaderProperties, ShaderStrategy, fill_pbr};
use crate::document;
use crate::export::session::ExportSession;
use crate::scene::Material;
use crate::Result;

fn name(value: &str) -> Option<String> {
    Some(value.to_string())
}

/// Metallic workflow of the built-in "Standard" shader
///
/// Stores smoothness as `_Glossiness` and carries an ambient occlusion map.
#[derive(Debug, Clone)]
pub struct StandardStrategy {
    properties: ShaderProperties,
}

impl StandardStrategy {
    pub fn new() -> Self {
        Self {
            properties: ShaderProperties {
                albedo_map: name("_MainTex"),
                albedo_color: name("_Color"),
                metallic_map: name("_MetallicGlossMap"),
                metallic_power: name("_Metallic"),
                roughness_power: name("_Glossiness"),
                normal_map: name("_BumpMap"),
                normal_power: name("_BumpScale"),
                ..Default::default()
            },
        }
    }
}

impl Default for StandardStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderStrategy for StandardStrategy {
    fn shader_names(&self) -> Vec<&str> {
        vec!["Standard"]
    }

    fn properties(&self) -> &ShaderProperties {
        &self.properties
    }

    fn try_get_roughness(&self, material: &Material) -> Option<f32> {
        material.float("_Glossiness").map(|gloss| 1.0 - gloss)
    }

    fn fill_properties(
        &self,
        session: &mut ExportSession<'_>,
        material: &Material,
        out: &mut document::Material,
    ) -> Result<()> {
        fill_pbr(self, session, material, out)?;

        if let Some(texture) = material.texture("_OcclusionMap") {
            let mut info = session.export_occlusion_texture_info(Some(texture), material)?;
            session.export_texture_transform(&mut info, material, "_OcclusionMap");
            out.occlusion_texture = Some(info);
        }
        Ok(())
    }
}

/// Universal render pipeline "Lit" shader
#[derive(Debug, Clone)]
pub struct UrpLitStrategy {
    properties: ShaderProperties,
}

impl UrpLitStrategy {
    pub fn new() -> Self {
        Self {
            properties: ShaderProperties {
                albedo_map: name("_BaseMap"),
                albedo_color: name("_BaseColor"),
                metallic_map: name("_MetallicGlossMap"),
                metallic_power: name("_Metallic"),
                roughness_power: name("_Smoothness"),
                normal_map: name("_BumpMap"),
                normal_power: name("_BumpScale"),
                ..Default::default()
            },
        }
    }
}

impl Default for UrpLitStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl ShaderStrategy for UrpLitStrategy {
    fn shader_names(&self) -> Vec<&str> {
        vec!["Universal Render Pipeline/Lit"]
    }

    fn properties(&self) -> &ShaderProperties {
        &self.properties
    }

    fn try_get_roughness(&self, material: &Material) -> Option<f32> {
        material.float("_Smoothness").map(|smoothness| 1.0 - smoothness)
    }
}

/// Strategy described only by a property-name table
///
/// Used for shaders mapped in configuration; every input is read verbatim.
#[derive(Debug, Clone)]
pub struct PropertyMapStrategy {
    shader: String,
    properties: ShaderProperties,
}

impl PropertyMapStrategy {
    pub fn new(shader: impl Into<String>, properties: ShaderProperties) -> Self {
        Self {
            shader: shader.into(),
            properties,
        }
    }
}

impl ShaderStrategy for PropertyMapStrategy {
    fn shader_names(&self) -> Vec<&str> {
        vec![self.shader.as_str()]
    }

    fn properties(&self) -> &ShaderProperties {
        &self.properties
    }
}
