//! Texture, image and sampler export
//!
//! A glTF texture is identified by the source texture *and* the role it plays
//! in a material, so one source image used as both a base color and a normal
//! map becomes two textures and two image files.

use super::session::ExportSession;
use crate::document::{
    self, Image, NormalTextureInfo, OcclusionTextureInfo, Sampler, TextureInfo, TextureReference,
    TextureTransform, sampler,
};
use crate::scene::{Material, Texture, TextureFilter, TextureId, TextureWrap};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Semantic role of a texture inside a material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureMapType {
    Main,
    Bump,
    SpecGloss,
    Emission,
    MetallicGloss,
    Light,
    Occlusion,
}

impl fmt::Display for TextureMapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Main => "Main",
            Self::Bump => "Bump",
            Self::SpecGloss => "SpecGloss",
            Self::Emission => "Emission",
            Self::MetallicGloss => "MetallicGloss",
            Self::Light => "Light",
            Self::Occlusion => "Occlusion",
        };
        f.write_str(name)
    }
}

/// Pixel-writing work queued for the image pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub texture: TextureId,
    pub map_type: TextureMapType,
    /// Write without sRGB conversion
    pub linear: bool,
    /// Shader to run over the pixels before writing, if any
    pub shader_override: Option<String>,
    /// File name relative to the output directory
    pub file_name: String,
}

fn stable_hash(value: &str) -> u32 {
    crc32fast::hash(value.as_bytes())
}

/// Unreserved URI characters only
fn is_uri_safe(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'))
}

/// Deterministic `<path hash><name><map type>` stem shared by texture names and image files
///
/// Names that are not URI-safe are replaced by their hash so the stem is always
/// usable as a file name.
pub fn image_file_stem(texture: &Texture, map_type: TextureMapType) -> String {
    let path_hash = stable_hash(texture.asset_path.as_deref().unwrap_or_default());
    if is_uri_safe(&texture.name) {
        format!("{path_hash}{}{map_type}", texture.name)
    } else {
        format!("{path_hash}{}{map_type}", stable_hash(&texture.name))
    }
}

pub fn image_file_name(texture: &Texture, map_type: TextureMapType) -> String {
    format!("{}.png", image_file_stem(texture, map_type))
}

fn sampler_for(wrap: TextureWrap, filter: TextureFilter) -> Sampler {
    let wrap = match wrap {
        TextureWrap::Clamp => sampler::CLAMP_TO_EDGE,
        TextureWrap::Repeat | TextureWrap::Mirror => sampler::REPEAT,
    };
    let (min, mag) = match filter {
        TextureFilter::Point => (sampler::NEAREST_MIPMAP_NEAREST, sampler::NEAREST),
        TextureFilter::Bilinear => (sampler::NEAREST_MIPMAP_LINEAR, sampler::LINEAR),
        TextureFilter::Trilinear => (sampler::LINEAR_MIPMAP_LINEAR, sampler::LINEAR),
    };
    Sampler {
        mag_filter: Some(mag),
        min_filter: Some(min),
        wrap_s: wrap,
        wrap_t: wrap,
    }
}

impl ExportSession<'_> {
    pub fn export_texture_info(
        &mut self,
        texture: Option<TextureId>,
        map_type: TextureMapType,
        linear: bool,
        shader_override: Option<&str>,
    ) -> Result<TextureInfo> {
        let index = self.export_texture(texture, map_type, linear, shader_override)?;
        Ok(TextureInfo::new(index))
    }

    /// Normal map reference; `scale` falls back to the material's `_BumpScale`
    pub fn export_normal_texture_info(
        &mut self,
        texture: Option<TextureId>,
        map_type: TextureMapType,
        material: &Material,
        scale: Option<f32>,
        shader_override: Option<&str>,
    ) -> Result<NormalTextureInfo> {
        let index = self.export_texture(texture, map_type, true, shader_override)?;
        Ok(NormalTextureInfo {
            index,
            scale: scale.or_else(|| material.float("_BumpScale")),
            extensions: None,
        })
    }

    pub fn export_occlusion_texture_info(
        &mut self,
        texture: Option<TextureId>,
        material: &Material,
    ) -> Result<OcclusionTextureInfo> {
        let index = self.export_texture(texture, TextureMapType::Occlusion, true, None)?;
        Ok(OcclusionTextureInfo {
            index,
            strength: material.float("_OcclusionStrength"),
            extensions: None,
        })
    }

    /// Attach KHR_texture_transform when the property's UV transform is not identity
    pub fn export_texture_transform(
        &mut self,
        info: &mut impl TextureReference,
        material: &Material,
        property: &str,
    ) {
        let Some(slot) = material.texture_slot(property) else {
            return;
        };
        if slot.has_identity_transform() {
            return;
        }

        self.root.use_extension(document::KHR_TEXTURE_TRANSFORM);
        if self.options.require_extensions {
            self.root.require_extension(document::KHR_TEXTURE_TRANSFORM);
        }

        info.set_transform(TextureTransform {
            offset: [slot.offset.x, -slot.offset.y],
            scale: slot.scale.to_array(),
        });
    }

    pub(crate) fn export_texture(
        &mut self,
        texture: Option<TextureId>,
        map_type: TextureMapType,
        linear: bool,
        shader_override: Option<&str>,
    ) -> Result<usize> {
        let key = (texture, map_type);
        if let Some(index) = self.caches.textures.lookup(&key) {
            return Ok(index);
        }

        let exported = match texture {
            // missing texture: keep the slot valid with an empty texture
            None => document::Texture::default(),
            Some(id) => {
                let scene = self.scene;
                let source = scene.texture(id)?;
                document::Texture {
                    name: Some(image_file_stem(source, map_type)),
                    source: Some(self.export_image(id, source, map_type, linear, shader_override)),
                    sampler: Some(self.export_sampler(source)),
                }
            }
        };

        self.root.textures.push(exported);
        let index = self.root.textures.len() - 1;
        self.caches.textures.record(key, index);
        Ok(index)
    }

    fn export_image(
        &mut self,
        id: TextureId,
        source: &Texture,
        map_type: TextureMapType,
        linear: bool,
        shader_override: Option<&str>,
    ) -> usize {
        let key = (id, map_type);
        if let Some(index) = self.caches.images.lookup(&key) {
            return index;
        }

        let file_name = image_file_name(source, map_type);
        self.images.push(ImageRequest {
            texture: id,
            map_type,
            linear,
            shader_override: shader_override.map(str::to_string),
            file_name: file_name.clone(),
        });

        self.root.images.push(Image {
            name: Some(image_file_stem(source, map_type)),
            uri: Some(file_name),
        });
        let index = self.root.images.len() - 1;
        self.caches.images.record(key, index);
        index
    }

    fn export_sampler(&mut self, source: &Texture) -> usize {
        let key = (source.wrap, source.filter);
        if let Some(index) = self.caches.samplers.lookup(&key) {
            return index;
        }

        self.root.samplers.push(sampler_for(source.wrap, source.filter));
        let index = self.root.samplers.len() - 1;
        self.caches.samplers.record(key, index);
        index
    }
}
