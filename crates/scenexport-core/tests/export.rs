//! In-memory export of small scenes

// Tests are allowed to use expect/unwrap for cleaner error messages
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use scenexport_core::document::{AlphaMode, KHR_LIGHTS_PUNCTUAL, KHR_TEXTURE_TRANSFORM, LightType};
use scenexport_core::export::{ExportedDocument, TextureMapType};
use scenexport_core::prelude::*;

fn cube(asset_path: Option<&str>) -> Geometry {
    let positions = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
    ];
    let triangles = vec![
        0, 2, 1, 0, 3, 2, // back
        4, 5, 6, 4, 6, 7, // front
        0, 1, 5, 0, 5, 4, // bottom
        3, 6, 2, 3, 7, 6, // top
        0, 4, 7, 0, 7, 3, // left
        1, 2, 6, 1, 6, 5, // right
    ];
    let geometry = Geometry::new("cube")
        .with_positions(positions)
        .with_submesh(triangles);
    match asset_path {
        Some(path) => geometry.with_asset_path(path),
        None => geometry,
    }
}

/// Three one-triangle submeshes over the same vertices
fn three_submeshes() -> Geometry {
    Geometry::new("tris")
        .with_asset_path("Assets/tris.fbx")
        .with_positions(vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z])
        .with_submesh(vec![0, 1, 2])
        .with_submesh(vec![0, 2, 3])
        .with_submesh(vec![1, 2, 3])
}

fn build(scene: &mut Scene) -> ExportedDocument {
    build_with(scene, ExportOptions::default())
}

fn build_with(scene: &mut Scene, options: ExportOptions) -> ExportedDocument {
    let job = ExportJob::whole_scene("level", scene);
    Exporter::new(options).build(scene, &job).unwrap()
}

fn node_named<'a>(document: &'a ExportedDocument, name: &str) -> &'a scenexport_core::document::Node {
    document
        .root
        .nodes
        .iter()
        .find(|n| n.name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no node named {name}"))
}

fn has_node(document: &ExportedDocument, name: &str) -> bool {
    document.root.nodes.iter().any(|n| n.name.as_deref() == Some(name))
}

#[test]
fn unregistered_shader_uses_main_tex_as_base_color() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let albedo = scene.add_texture(Texture::new("crate_albedo").with_asset_path("Assets/crate.png"));
    let bump = scene.add_texture(Texture::new("crate_normal"));
    let material = scene.add_material(
        Material::new("crate", "Custom/Unlit")
            .with_texture("_BumpMap", bump)
            .with_texture("_MainTex", albedo),
    );
    scene.spawn(Entity::new("cube").with_renderer(Renderer::single(geometry, material)));

    let document = build(&mut scene);
    let root = &document.root;

    assert_eq!(root.materials.len(), 1);
    let pbr = root.materials[0].pbr_metallic_roughness.as_ref().unwrap();
    let texture = &root.textures[pbr.base_color_texture.as_ref().unwrap().index];
    let image = &root.images[texture.source.unwrap()];

    assert!(image.uri.as_deref().unwrap().ends_with("crate_albedoMain.png"));
    assert_eq!(pbr.metallic_factor, 0.0);
    assert_eq!(pbr.roughness_factor, 1.0);
    assert_eq!(document.images.len(), 1);
    assert_eq!(document.images[0].texture, albedo);
}

#[test]
fn unmatched_fallback_still_exports_default_material() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let material = scene.add_material(
        Material::new("glass", "Custom/Glass")
            .with_float("_Cull", 0.0)
            .with_tag("RenderType", "Transparent"),
    );
    scene.spawn(Entity::new("pane").with_renderer(Renderer::single(geometry, material)));

    let document = build(&mut scene);
    let exported = &document.root.materials[0];

    assert_eq!(exported.name.as_deref(), Some("glass"));
    assert!(exported.double_sided);
    assert_eq!(exported.alpha_mode, AlphaMode::Blend);
    let pbr = exported.pbr_metallic_roughness.as_ref().unwrap();
    assert!(pbr.base_color_texture.is_none());
    assert!(document.root.textures.is_empty());
}

#[test]
fn siblings_sharing_geometry_and_materials_share_one_mesh() {
    let mut single = Scene::new();
    let geometry = single.add_geometry(cube(Some("Assets/cube.fbx")));
    let material = single.add_material(Material::new("m", "Standard"));
    single.spawn(Entity::new("a").with_renderer(Renderer::single(geometry, material)));

    let mut pair = single.clone();
    pair.spawn(
        Entity::new("b")
            .with_transform(Transform::from_translation(Vec3::X * 3.0))
            .with_renderer(Renderer::single(geometry, material)),
    );

    let one = build(&mut single);
    let two = build(&mut pair);

    assert_eq!(two.root.meshes.len(), 1);
    assert_eq!(two.root.nodes.len(), 2);
    assert_eq!(node_named(&two, "a").mesh, Some(0));
    assert_eq!(node_named(&two, "b").mesh, Some(0));

    // the second use writes nothing new
    assert_eq!(two.root.buffer_views.len(), one.root.buffer_views.len());
    assert_eq!(two.root.accessors.len(), one.root.accessors.len());
    assert_eq!(two.binary.len(), one.binary.len());
}

#[test]
fn same_geometry_with_other_materials_reuses_accessors() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let red = scene.add_material(Material::new("red", "Standard").with_color("_Color", [1.0, 0.0, 0.0, 1.0]));
    let blue = scene.add_material(Material::new("blue", "Standard").with_color("_Color", [0.0, 0.0, 1.0, 1.0]));
    scene.spawn(Entity::new("a").with_renderer(Renderer::single(geometry, red)));
    scene.spawn(Entity::new("b").with_renderer(Renderer::single(geometry, blue)));

    let document = build(&mut scene);
    let root = &document.root;

    assert_eq!(root.meshes.len(), 2);
    // POSITION and indices, encoded once
    assert_eq!(root.accessors.len(), 2);
    let a = &root.meshes[0].primitives[0];
    let b = &root.meshes[1].primitives[0];
    assert_eq!(a.attributes, b.attributes);
    assert_eq!(a.indices, b.indices);
    assert_ne!(a.material, b.material);
}

#[test]
fn empty_submeshes_are_dropped() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(
        Geometry::new("gappy")
            .with_asset_path("Assets/gappy.fbx")
            .with_positions(vec![Vec3::ZERO, Vec3::X, Vec3::Y])
            .with_submesh(vec![0, 1, 2])
            .with_submesh(vec![])
            .with_submesh(vec![2, 1, 0]),
    );
    let materials: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| Some(scene.add_material(Material::new(name, "Standard"))))
        .collect();
    scene.spawn(Entity::new("gappy").with_renderer(Renderer::new(geometry, materials)));

    let document = build(&mut scene);
    let primitives = &document.root.meshes[0].primitives;

    assert_eq!(primitives.len(), 2);
    let names: Vec<_> = primitives
        .iter()
        .map(|p| document.root.materials[p.material.unwrap()].name.clone().unwrap())
        .collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[test]
fn geometry_with_only_empty_submeshes_gets_no_mesh() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(
        Geometry::new("empty")
            .with_asset_path("Assets/empty.fbx")
            .with_positions(vec![Vec3::ZERO])
            .with_submesh(vec![]),
    );
    scene.spawn(Entity::new("empty").with_renderer(Renderer::new(geometry, vec![None])));

    let document = build(&mut scene);

    assert!(document.root.meshes.is_empty());
    assert_eq!(node_named(&document, "empty").mesh, None);
}

#[test]
fn last_assigned_material_carries_over() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(three_submeshes());
    let a = scene.add_material(Material::new("a", "Standard"));
    let b = scene.add_material(Material::new("b", "Standard"));
    scene.spawn(Entity::new("one").with_renderer(Renderer::new(geometry, vec![Some(a)])));
    scene.spawn(Entity::new("two").with_renderer(Renderer::new(geometry, vec![Some(a), Some(b)])));

    let document = build(&mut scene);
    let materials_of = |name: &str| -> Vec<Option<usize>> {
        let mesh = node_named(&document, name).mesh.unwrap();
        document.root.meshes[mesh].primitives.iter().map(|p| p.material).collect()
    };

    assert_eq!(materials_of("one"), vec![Some(0), Some(0), Some(0)]);
    assert_eq!(materials_of("two"), vec![Some(0), Some(1), Some(1)]);
}

#[test]
fn missing_material_exports_null_material() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    scene.spawn(Entity::new("bare").with_renderer(Renderer::new(geometry, vec![None])));

    let document = build(&mut scene);
    let material = &document.root.materials[0];

    assert_eq!(material.name.as_deref(), Some("null"));
    let pbr = material.pbr_metallic_roughness.as_ref().unwrap();
    assert_eq!(pbr.metallic_factor, 0.0);
    assert_eq!(pbr.roughness_factor, 1.0);
}

#[test]
fn leaf_children_fold_into_parent_mesh() {
    let mut scene = Scene::new();
    let body = scene.add_geometry(cube(Some("Assets/body.fbx")));
    let trim = scene.add_geometry(three_submeshes());
    let paint = scene.add_material(Material::new("paint", "Standard"));
    let chrome = scene.add_material(Material::new("chrome", "Standard"));

    let car = scene.spawn(Entity::new("car").with_renderer(Renderer::single(body, paint)));
    scene
        .spawn_child(car, Entity::new("bumper").with_renderer(Renderer::single(trim, chrome)))
        .unwrap();
    scene
        .spawn_child(
            car,
            Entity::new("wheel")
                .with_transform(Transform::from_translation(Vec3::new(1.0, 0.0, 1.0)))
                .with_renderer(Renderer::single(body, chrome)),
        )
        .unwrap();

    let document = build(&mut scene);

    assert!(!has_node(&document, "bumper"));
    assert!(has_node(&document, "wheel"));

    let car_mesh = &document.root.meshes[node_named(&document, "car").mesh.unwrap()];
    // cube submesh + three bumper submeshes
    assert_eq!(car_mesh.primitives.len(), 4);
    assert!(node_named(&document, "wheel").mesh.is_some());
    assert_eq!(node_named(&document, "car").children.len(), 1);
}

#[test]
fn children_of_geometry_less_parent_stay_nodes() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let material = scene.add_material(Material::new("m", "Standard"));
    let group = scene.spawn(Entity::new("group"));
    scene
        .spawn_child(group, Entity::new("box").with_renderer(Renderer::single(geometry, material)))
        .unwrap();

    let document = build(&mut scene);

    assert_eq!(node_named(&document, "group").mesh, None);
    assert!(node_named(&document, "box").mesh.is_some());
}

#[test]
fn parents_precede_children() {
    let mut scene = Scene::new();
    let a = scene.spawn(Entity::new("a"));
    let b = scene.spawn_child(a, Entity::new("b")).unwrap();
    scene.spawn_child(b, Entity::new("d")).unwrap();
    scene.spawn_child(a, Entity::new("c")).unwrap();

    let document = build(&mut scene);
    let names: Vec<_> = document
        .root
        .nodes
        .iter()
        .map(|n| n.name.clone().unwrap())
        .collect();

    assert_eq!(names, vec!["a", "b", "d", "c"]);
    assert_eq!(document.root.nodes[0].children, vec![1, 3]);
    assert_eq!(document.root.scenes[0].nodes, vec![0]);
    assert_eq!(document.root.scene, Some(0));
}

#[test]
fn dynamic_entities_are_exported_on_their_own() {
    let mut scene = Scene::new();
    let level = scene.spawn(Entity::new("level"));
    scene.spawn_child(level, Entity::new("door").dynamic()).unwrap();
    scene.spawn_child(level, Entity::new("wall")).unwrap();
    let crate_id = scene.spawn(Entity::new("crate").dynamic());
    scene.spawn_child(crate_id, Entity::new("lid").dynamic()).unwrap();
    scene.spawn_child(crate_id, Entity::new("handle")).unwrap();
    scene.spawn(Entity::new("hud").custom_render());

    let whole = build(&mut scene);
    assert!(has_node(&whole, "level"));
    assert!(has_node(&whole, "wall"));
    for excluded in ["door", "crate", "lid", "handle", "hud"] {
        assert!(!has_node(&whole, excluded), "{excluded} should be excluded");
    }

    let job = ExportJob::whole_scene("crate", &scene).with_target(ExportTarget::Dynamic(crate_id));
    let single = Exporter::default().build(&mut scene, &job).unwrap();
    let names: Vec<_> = single.root.nodes.iter().map(|n| n.name.clone().unwrap()).collect();
    assert_eq!(names, vec!["crate", "handle"]);
}

#[test]
fn inactive_entities_are_skipped() {
    let mut scene = Scene::new();
    let root = scene.spawn(Entity::new("root"));
    let off = scene.spawn_child(root, Entity::new("off").inactive()).unwrap();
    scene.spawn_child(off, Entity::new("below_off")).unwrap();

    let document = build(&mut scene);

    assert!(!has_node(&document, "off"));
    assert!(!has_node(&document, "below_off"));
}

fn lod_scene() -> (Scene, [EntityId; 3]) {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/tree.fbx")));
    let bark = scene.add_material(Material::new("bark", "Standard"));
    let tree = scene.spawn(Entity::new("tree"));
    let levels = ["lod0", "lod1", "lod2"].map(|name| {
        scene
            .spawn_child(tree, Entity::new(name).with_renderer(Renderer::single(geometry, bark)))
            .unwrap()
    });
    scene.entity_mut(tree).unwrap().lod_group =
        Some(LodGroup::new(levels.iter().map(|&id| vec![id]).collect()));
    (scene, levels)
}

fn all_enabled(scene: &Scene, ids: &[EntityId]) -> bool {
    ids.iter()
        .all(|&id| scene.entity(id).unwrap().renderer.as_ref().unwrap().enabled)
}

#[test]
fn lod_policy_selects_exported_level() {
    let (mut scene, levels) = lod_scene();

    let highest = build(&mut scene);
    assert!(node_named(&highest, "lod0").mesh.is_some());
    assert!(node_named(&highest, "lod1").mesh.is_none());
    assert!(node_named(&highest, "lod2").mesh.is_none());
    assert!(all_enabled(&scene, &levels));

    let lowest = build_with(
        &mut scene,
        ExportOptions {
            lod_policy: LodPolicy::Lowest,
            ..Default::default()
        },
    );
    assert!(node_named(&lowest, "lod0").mesh.is_none());
    assert!(node_named(&lowest, "lod2").mesh.is_some());
    assert!(all_enabled(&scene, &levels));
}

#[test]
fn failed_export_restores_lod_renderers() {
    let (mut scene, levels) = lod_scene();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    scene.spawn(Entity::new("broken").with_renderer(Renderer::single(geometry, MaterialId(42))));

    let job = ExportJob::whole_scene("level", &scene);
    let err = Exporter::default().build(&mut scene, &job).unwrap_err();

    match err {
        Error::ExportFailed { name, source } => {
            assert_eq!(name, "level");
            assert!(matches!(*source, Error::UnknownMaterial(42)));
        }
        other => panic!("unexpected error {other}"),
    }
    assert!(all_enabled(&scene, &levels));
}

#[test]
fn baked_geometry_replaces_renderer() {
    let mut scene = Scene::new();
    let generated = scene.add_geometry(cube(None));
    let skin = scene.add_material(Material::new("skin", "Standard"));
    let character = scene.spawn(Entity::new("character"));
    scene.spawn(Entity::new("procedural").with_renderer(Renderer::single(generated, skin)));

    let job = ExportJob::whole_scene("level", &scene)
        .with_baked(vec![BakedMesh::new(character, generated, Some(skin))]);
    let document = Exporter::default().build(&mut scene, &job).unwrap();

    assert!(node_named(&document, "character").mesh.is_some());
    // generated geometry without a baked override is not exported
    assert!(node_named(&document, "procedural").mesh.is_none());
}

#[test]
fn standard_shader_translation() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let albedo = scene.add_texture(Texture::new("albedo"));
    let occlusion = scene.add_texture(Texture::new("ao"));
    let material = scene.add_material(
        Material::new("metal", "Standard")
            .with_texture("_MainTex", albedo)
            .with_color("_Color", [0.5, 0.5, 0.5, 1.0])
            .with_float("_Metallic", 0.4)
            .with_float("_Glossiness", 0.75)
            .with_texture("_OcclusionMap", occlusion)
            .with_float("_OcclusionStrength", 0.5)
            .with_float("_Cutoff", 0.3)
            .with_tag("RenderType", "TransparentCutout"),
    );
    scene.spawn(Entity::new("plate").with_renderer(Renderer::single(geometry, material)));

    let document = build(&mut scene);
    let exported = &document.root.materials[0];
    let pbr = exported.pbr_metallic_roughness.as_ref().unwrap();

    assert_eq!(pbr.base_color_factor, Some([0.5, 0.5, 0.5, 1.0]));
    assert_relative_eq!(pbr.metallic_factor, 0.4);
    assert_relative_eq!(pbr.roughness_factor, 0.25);
    assert_eq!(exported.alpha_mode, AlphaMode::Mask);
    assert_eq!(exported.alpha_cutoff, Some(0.3));

    let occlusion_info = exported.occlusion_texture.as_ref().unwrap();
    assert_eq!(occlusion_info.strength, Some(0.5));
    let image = &document.root.images[document.root.textures[occlusion_info.index].source.unwrap()];
    assert!(image.uri.as_deref().unwrap().ends_with("aoOcclusion.png"));
}

#[test]
fn one_texture_in_two_roles_yields_two_images() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let shared = scene.add_texture(Texture::new("shared"));
    let material = scene.add_material(
        Material::new("m", "Standard")
            .with_texture("_MainTex", shared)
            .with_texture("_BumpMap", shared)
            .with_float("_BumpScale", 0.8),
    );
    scene.spawn(Entity::new("e").with_renderer(Renderer::single(geometry, material)));

    let document = build(&mut scene);
    let root = &document.root;

    assert_eq!(root.textures.len(), 2);
    assert_eq!(root.images.len(), 2);
    assert_eq!(root.samplers.len(), 1);
    assert_ne!(root.images[0].uri, root.images[1].uri);

    let normal = root.materials[0].normal_texture.as_ref().unwrap();
    assert_eq!(normal.scale, Some(0.8));

    let linear: Vec<_> = document.images.iter().map(|r| (r.map_type, r.linear)).collect();
    assert_eq!(
        linear,
        vec![(TextureMapType::Main, false), (TextureMapType::Bump, true)]
    );
}

#[test]
fn texture_transform_extension() {
    let mut scene = Scene::new();
    let geometry = scene.add_geometry(cube(Some("Assets/cube.fbx")));
    let texture = scene.add_texture(Texture::new("tiles"));
    let slot = TextureSlot::new(Some(texture))
        .with_offset(Vec2::new(0.25, 0.5))
        .with_scale(Vec2::new(2.0, 2.0));
    let a = scene.add_material(Material::new("a", "Standard").with_texture_slot("_MainTex", slot));
    let b = scene.add_material(Material::new("b", "Universal Render Pipeline/Lit").with_texture_slot("_BaseMap", slot));
    let plain = scene.add_material(Material::new("plain", "Standard").with_texture("_MainTex", texture));
    scene.spawn(Entity::new("a").with_renderer(Renderer::single(geometry, a)));
    scene.spawn(Entity::new("b").with_renderer(Renderer::single(geometry, b)));
    scene.spawn(Entity::new("plain").with_renderer(Renderer::single(geometry, plain)));

    let document = build(&mut scene);
    let root = &document.root;

    assert_eq!(root.extensions_used, vec![KHR_LIGHTS_PUNCTUAL, KHR_TEXTURE_TRANSFORM]);
    assert!(root.extensions_required.is_empty());

    let info = root.materials[0]
        .pbr_metallic_roughness
        .as_ref()
        .unwrap()
        .base_color_texture
        .as_ref()
        .unwrap();
    let transform = info.extensions.as_ref().unwrap().texture_transform.unwrap();
    assert_eq!(transform.offset, [0.25, -0.5]);
    assert_eq!(transform.scale, [2.0, 2.0]);

    let plain_info = root.materials[2]
        .pbr_metallic_roughness
        .as_ref()
        .unwrap()
        .base_color_texture
        .as_ref()
        .unwrap();
    assert!(plain_info.extensions.is_none());

    let required = build_with(
        &mut scene,
        ExportOptions {
            require_extensions: true,
            ..Default::default()
        },
    );
    assert_eq!(required.root.extensions_required, vec![KHR_TEXTURE_TRANSFORM]);
}

#[test]
fn cameras_are_decomposed() {
    let mut scene = Scene::new();
    scene.spawn(Entity::new("eye").with_camera(Camera::perspective(1.0, 1.5, 0.1, 100.0)));
    let mut off = Camera::orthographic(5.0, 1.0, 0.1, 50.0);
    off.enabled = false;
    scene.spawn(Entity::new("off").with_camera(off));

    let document = build(&mut scene);

    assert_eq!(document.root.cameras.len(), 1);
    assert_eq!(node_named(&document, "eye").camera, Some(0));
    assert_eq!(node_named(&document, "off").camera, None);

    let perspective = document.root.cameras[0].perspective.unwrap();
    assert_relative_eq!(perspective.yfov, 1.0, epsilon = 1e-5);
    assert_relative_eq!(perspective.aspect_ratio, 1.5, epsilon = 1e-5);
    assert_relative_eq!(perspective.znear, 0.1, max_relative = 1e-3);
    assert_relative_eq!(perspective.zfar.unwrap(), 100.0, max_relative = 1e-3);
}

#[test]
fn light_direction_matches_source_forward() {
    let mut scene = Scene::new();
    let rotation = Quat::from_euler(glam::EulerRot::YXZ, 0.7, -0.4, 0.2);
    let sun = scene.spawn(
        Entity::new("sun")
            .with_transform(Transform::IDENTITY.with_rotation(rotation))
            .with_light(Light::new(LightKind::Directional).with_intensity(2.0)),
    );

    let document = build(&mut scene);
    let node = node_named(&document, "sun");

    assert_eq!(node.light(), Some(0));
    let lights = document.root.lights();
    assert_eq!(lights.len(), 1);
    assert_eq!(lights[0].kind, LightType::Directional);
    assert_eq!(lights[0].range, None);

    // glTF lights shine down local -Z
    let exported = Quat::from_array(node.rotation.unwrap());
    let direction = exported * Vec3::NEG_Z;
    let forward = rotation * Vec3::Z;
    assert_relative_eq!(direction.x, -forward.x, epsilon = 1e-5);
    assert_relative_eq!(direction.y, forward.y, epsilon = 1e-5);
    assert_relative_eq!(direction.z, forward.z, epsilon = 1e-5);

    // the scene itself is untouched
    assert_eq!(scene.entity(sun).unwrap().transform.rotation, rotation);
}

#[test]
fn light_extension_is_always_declared() {
    let mut scene = Scene::new();
    scene.spawn(Entity::new("empty"));

    let document = build(&mut scene);

    assert_eq!(document.root.extensions_used, vec![KHR_LIGHTS_PUNCTUAL]);
    assert!(document.root.extensions.is_none());
    assert!(document.root.buffers.is_empty());
}
