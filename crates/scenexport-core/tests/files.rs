//! Exports written to disk and read back with the `gltf` crate

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use scenexport_core::export::{ImageRequest, ImageSink, image_file_name, TextureMapType};
use scenexport_core::prelude::*;
use std::path::{Path, PathBuf};

fn checker(name: &str) -> Texture {
    Texture::new(name)
        .with_asset_path(format!("Assets/Textures/{name}.png"))
        .with_pixels(
            2,
            2,
            vec![
                255, 255, 255, 255, 0, 0, 0, 255, //
                0, 0, 0, 255, 255, 255, 255, 255,
            ],
        )
}

fn textured_scene() -> Scene {
    let mut scene = Scene::new();
    let quad = scene.add_geometry(
        Geometry::new("quad")
            .with_asset_path("Assets/Meshes/quad.fbx")
            .with_positions(vec![
                Vec3::new(-0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, -0.5),
                Vec3::new(0.5, 0.0, 0.5),
                Vec3::new(-0.5, 0.0, 0.5),
            ])
            .with_normals(vec![Vec3::Y; 4])
            .with_uv0(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ])
            .with_submesh(vec![0, 2, 1, 0, 3, 2]),
    );
    let albedo = scene.add_texture(checker("floor_albedo"));
    let normal = scene.add_texture(checker("floor_normal"));
    let floor = scene.add_material(
        Material::new("floor", "Standard")
            .with_texture("_MainTex", albedo)
            .with_texture("_BumpMap", normal)
            .with_float("_Glossiness", 0.5),
    );

    let level = scene.spawn(Entity::new("level"));
    scene
        .spawn_child(
            level,
            Entity::new("floor")
                .with_transform(Transform::from_translation(Vec3::new(2.0, 0.0, 1.0)))
                .with_renderer(Renderer::single(quad, floor)),
        )
        .unwrap();
    scene
        .spawn_child(
            level,
            Entity::new("lamp").with_light(Light::new(LightKind::Spot).with_spot_angle(45.0)),
        )
        .unwrap();
    scene
}

fn options(format: ContainerFormat) -> ExportOptions {
    ExportOptions {
        format,
        ..Default::default()
    }
}

#[test]
fn glb_reads_back() {
    let mut scene = textured_scene();
    let job = ExportJob::whole_scene("level", &scene);
    let dir = tempfile::tempdir().unwrap();

    let summary = Exporter::new(options(ContainerFormat::Glb))
        .export(&mut scene, &job, dir.path())
        .unwrap();

    let path = dir.path().join("level.glb");
    assert_eq!(summary.files, vec![path.clone()]);
    assert!(!dir.path().join("level.bin").exists());

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(&bytes[0..4], b"glTF");
    assert_eq!(u32::from_le_bytes(bytes[8..12].try_into().unwrap()) as usize, bytes.len());
    assert_eq!(bytes.len() % 4, 0);

    let gltf = gltf::Gltf::from_slice(&bytes).unwrap();
    let blob = gltf.blob.as_ref().unwrap();
    assert!(blob.len() >= summary.buffer_bytes);

    let document = &gltf.document;
    assert_eq!(document.nodes().count(), 3);
    assert_eq!(document.meshes().count(), 1);
    assert_eq!(document.lights().unwrap().count(), 1);

    let buffer = document.buffers().next().unwrap();
    assert!(matches!(buffer.source(), gltf::buffer::Source::Bin));
    assert_eq!(buffer.length(), summary.buffer_bytes);
}

#[test]
fn split_export_writes_document_buffer_and_images() {
    let mut scene = textured_scene();
    let job = ExportJob::whole_scene("level", &scene);
    let dir = tempfile::tempdir().unwrap();

    let summary = Exporter::default().export(&mut scene, &job, dir.path()).unwrap();

    let gltf_path = dir.path().join("level.gltf");
    let bin_path = dir.path().join("level.bin");
    assert_eq!(summary.files, vec![bin_path.clone(), gltf_path.clone()]);
    assert_eq!(std::fs::metadata(&bin_path).unwrap().len() as usize, summary.buffer_bytes);
    assert_eq!(summary.images.written, 2);
    assert_eq!(summary.images.skipped, 0);

    let (document, buffers, images) = gltf::import(&gltf_path).unwrap();
    assert_eq!(buffers.len(), 1);
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].width, 2);

    let floor = document
        .nodes()
        .find(|n| n.name() == Some("floor"))
        .unwrap();
    let (translation, _, _) = floor.transform().decomposed();
    assert_eq!(translation, [-2.0, 0.0, 1.0]);

    let primitive = floor.mesh().unwrap().primitives().next().unwrap();
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
    let positions: Vec<[f32; 3]> = reader.read_positions().unwrap().collect();
    assert_eq!(positions[1], [-0.5, 0.0, -0.5]);
    let uvs: Vec<[f32; 2]> = reader.read_tex_coords(0).unwrap().into_f32().collect();
    assert_eq!(uvs[0], [0.0, 1.0]);
    let indices: Vec<u32> = reader.read_indices().unwrap().into_u32().collect();
    assert_eq!(indices, vec![1, 2, 0, 2, 3, 0]);

    let material = primitive.material();
    assert!(material.normal_texture().is_some());
    assert_eq!(material.pbr_metallic_roughness().roughness_factor(), 0.5);
}

#[test]
fn skip_list_suppresses_rewrites() {
    let mut scene = textured_scene();
    let dir = tempfile::tempdir().unwrap();
    let albedo = scene.texture(TextureId(0)).unwrap().clone();
    let skipped = image_file_name(&albedo, TextureMapType::Main);

    let job = ExportJob::whole_scene("level", &scene).with_pre_exported([skipped.clone()]);
    let summary = Exporter::default().export(&mut scene, &job, dir.path()).unwrap();

    assert_eq!(summary.images.written, 1);
    assert_eq!(summary.images.skipped, 1);
    assert!(!dir.path().join(&skipped).exists());
}

#[test]
fn images_can_be_disabled() {
    let mut scene = textured_scene();
    let dir = tempfile::tempdir().unwrap();
    let job = ExportJob::whole_scene("level", &scene);
    let options = ExportOptions {
        write_images: false,
        ..Default::default()
    };

    let summary = Exporter::new(options).export(&mut scene, &job, dir.path()).unwrap();

    assert_eq!(summary.images.written, 0);
    let pngs = std::fs::read_dir(dir.path())
        .unwrap()
        .filter(|e| e.as_ref().unwrap().path().extension().is_some_and(|x| x == "png"))
        .count();
    assert_eq!(pngs, 0);
}

/// Sink recording what it was asked to write
#[derive(Default)]
struct Recording {
    calls: Vec<(String, bool, PathBuf)>,
}

impl ImageSink for Recording {
    fn write_image(&mut self, _texture: &Texture, request: &ImageRequest, path: &Path) -> Result<bool> {
        self.calls
            .push((request.file_name.clone(), request.linear, path.to_path_buf()));
        Ok(true)
    }
}

#[test]
fn custom_sink_receives_requests_in_first_use_order() {
    let mut scene = textured_scene();
    let dir = tempfile::tempdir().unwrap();
    let job = ExportJob::whole_scene("level", &scene);
    let mut sink = Recording::default();

    Exporter::default()
        .export_with_sink(&mut scene, &job, dir.path(), &mut sink)
        .unwrap();

    assert_eq!(sink.calls.len(), 2);
    assert!(sink.calls[0].0.ends_with("floor_albedoMain.png"));
    assert!(!sink.calls[0].1);
    assert!(sink.calls[1].0.ends_with("floor_normalBump.png"));
    assert!(sink.calls[1].1);
    assert_eq!(sink.calls[0].2, dir.path().join(&sink.calls[0].0));
}

#[test]
fn dynamic_entity_exports_to_its_own_file() {
    let mut scene = textured_scene();
    let prop = scene.spawn(Entity::new("prop").dynamic());
    scene
        .spawn_child(
            prop,
            Entity::new("part").with_transform(Transform::from_translation(Vec3::Y)),
        )
        .unwrap();
    let dir = tempfile::tempdir().unwrap();

    let job = ExportJob::new("prop", vec![prop]).with_target(ExportTarget::Dynamic(prop));
    let summary = Exporter::new(options(ContainerFormat::Glb))
        .export(&mut scene, &job, dir.path())
        .unwrap();

    assert_eq!(summary.node_count, 2);
    assert_eq!(summary.mesh_count, 0);
    assert_eq!(summary.buffer_bytes, 0);

    let bytes = std::fs::read(dir.path().join("prop.glb")).unwrap();
    // header, JSON chunk, and an empty BIN chunk header
    let json_length = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), 12 + 8 + json_length + 8);
}

#[test]
fn failed_export_leaves_no_document() {
    let mut scene = textured_scene();
    let geometry = scene.add_geometry(
        Geometry::new("broken")
            .with_asset_path("Assets/broken.fbx")
            .with_positions(vec![Vec3::ZERO, Vec3::X])
            .with_submesh(vec![0, 1, 5]),
    );
    scene.spawn(Entity::new("broken").with_renderer(Renderer::new(geometry, vec![None])));
    let dir = tempfile::tempdir().unwrap();
    let job = ExportJob::whole_scene("level", &scene);

    let err = Exporter::default().export(&mut scene, &job, dir.path()).unwrap_err();

    assert!(matches!(err, Error::ExportFailed { .. }));
    assert!(!dir.path().join("level.gltf").exists());
    assert!(!dir.path().join("level.bin").exists());
}
