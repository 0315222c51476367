//! Best-effort translation for shaders without a registered strategy
//!
//! Texture property names are matched case-insensitively against every
//! combination of a common main-texture prefix and suffix. The first texture
//! property (in the material's property order) that matches and holds a
//! texture becomes the base color map.

use super::apply_surface;
use crate::document::{self, PbrMetallicRoughness};
use crate::export::session::ExportSession;
use crate::export::texture::TextureMapType;
use crate::scene::{Material, TextureId};
use crate::Result;

const NAME_STARTS: [&str; 12] = [
    "_diffuse",
    "_albedo",
    "_main",
    "_maincolor",
    "_color",
    "_base",
    "diffuse",
    "albedo",
    "main",
    "maincolor",
    "base",
    "color",
];

const NAME_ENDS: [&str; 4] = ["map", "tex", "texture", ""];

fn is_main_texture_name(property: &str) -> bool {
    let lower = property.to_lowercase();
    NAME_STARTS.iter().any(|start| {
        lower
            .strip_prefix(start)
            .is_some_and(|rest| NAME_ENDS.contains(&rest))
    })
}

/// First texture property that looks like a base color map
fn find_main_texture(material: &Material) -> Option<(&str, TextureId)> {
    material
        .texture_property_names()
        .filter(|name| is_main_texture_name(name))
        .find_map(|name| material.texture(name).map(|texture| (name, texture)))
}

pub(super) fn fill(
    session: &mut ExportSession<'_>,
    material: &Material,
    out: &mut document::Material,
) -> Result<()> {
    apply_surface(material, out);
    let mut pbr = PbrMetallicRoughness::default();

    match find_main_texture(material) {
        Some((property, texture)) => {
            let mut info =
                session.export_texture_info(Some(texture), TextureMapType::Main, false, None)?;
            session.export_texture_transform(&mut info, material, property);
            pbr.base_color_texture = Some(info);
            tracing::debug!(
                "Material '{}' ({}) exported with '{}' as main texture",
                material.name,
                material.shader,
                property
            );
        }
        None => {
            tracing::debug!(
                "Material '{}' ({}) has no recognizable main texture",
                material.name,
                material.shader
            );
        }
    }

    out.pbr_metallic_roughness = Some(pbr);
    Ok(())
}
