//! Out-of-band image pass run after the document is written

use super::container::write_atomic;
use super::texture::ImageRequest;
use crate::scene::{Scene, Texture};
use crate::{Error, Result};
use image::{ImageFormat, RgbaImage};
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;

/// Destination for queued image requests
///
/// Returns `Ok(false)` when the texture has nothing to write.
pub trait ImageSink {
    fn write_image(&mut self, texture: &Texture, request: &ImageRequest, path: &Path) -> Result<bool>;
}

/// Encodes the texture's RGBA8 pixels as PNG
///
/// Linear and process-shader hints are ignored; pixels are written as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngImageSink;

impl ImageSink for PngImageSink {
    fn write_image(&mut self, texture: &Texture, request: &ImageRequest, path: &Path) -> Result<bool> {
        let Some(pixels) = &texture.pixels else {
            tracing::warn!(
                "Texture '{}' has no pixel data, {} not written",
                texture.name,
                request.file_name
            );
            return Ok(false);
        };

        let image = RgbaImage::from_raw(texture.width, texture.height, pixels.clone()).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "texture '{}' has {} bytes for {}x{} RGBA pixels",
                texture.name,
                pixels.len(),
                texture.width,
                texture.height
            ))
        })?;

        let mut encoded = Cursor::new(Vec::new());
        image.write_to(&mut encoded, ImageFormat::Png)?;
        write_atomic(path, &encoded.into_inner())?;
        Ok(true)
    }
}

/// Counts from one image pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImagePassStats {
    pub written: usize,
    /// Already produced by an earlier pass
    pub skipped: usize,
    /// Textures the sink had nothing to write for
    pub missing: usize,
}

/// Hand every request not named in `pre_exported` to `sink`
pub fn write_images(
    scene: &Scene,
    requests: &[ImageRequest],
    dir: &Path,
    pre_exported: &HashSet<String>,
    sink: &mut dyn ImageSink,
) -> Result<ImagePassStats> {
    let mut stats = ImagePassStats::default();
    for request in requests {
        if pre_exported.contains(&request.file_name) {
            tracing::debug!("Skipping pre-exported image {}", request.file_name);
            stats.skipped += 1;
            continue;
        }

        let texture = scene.texture(request.texture)?;
        if sink.write_image(texture, request, &dir.join(&request.file_name))? {
            stats.written += 1;
        } else {
            stats.missing += 1;
        }
    }
    Ok(stats)
}
