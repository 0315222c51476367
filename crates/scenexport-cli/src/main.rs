//! Scenexport CLI - export scene descriptions to glTF 2.0

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scenexport_core::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "scenexport")]
#[command(about = "Export scene graphs to glTF 2.0 / GLB", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene description file
    Export {
        /// Scene description (JSON)
        #[arg(short, long)]
        scene: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Output base name
        #[arg(short, long, default_value = "scene")]
        name: String,

        /// Export options file (JSON); flags below override it
        #[arg(long)]
        options: Option<PathBuf>,

        /// Container format
        #[arg(long, value_parser = ["gltf", "glb"])]
        format: Option<String>,

        /// Export only the subtree of this dynamic entity
        #[arg(long)]
        dynamic: Option<u32>,

        /// File listing image names already exported, one per line
        #[arg(long)]
        skip_list: Option<PathBuf>,

        /// Keep the lowest LOD level instead of the highest
        #[arg(long)]
        lowest_lod: bool,

        /// Mark used extensions as required
        #[arg(long)]
        require_extensions: bool,

        /// Do not write image files
        #[arg(long)]
        no_images: bool,
    },

    /// Print statistics of a .gltf or .glb file
    Inspect {
        /// File to inspect
        file: PathBuf,
    },

    /// Write a small demo scene description
    Demo {
        /// Output file
        #[arg(short, long, default_value = "demo-scene.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    match cli.command {
        Commands::Export {
            scene,
            out,
            name,
            options,
            format,
            dynamic,
            skip_list,
            lowest_lod,
            require_extensions,
            no_images,
        } => {
            let mut options = load_options(options.as_deref())?;
            if let Some(format) = format {
                options.format = match format.as_str() {
                    "glb" => ContainerFormat::Glb,
                    _ => ContainerFormat::Split,
                };
            }
            if lowest_lod {
                options.lod_policy = LodPolicy::Lowest;
            }
            options.require_extensions |= require_extensions;
            options.write_images &= !no_images;

            run_export(&scene, &out, &name, options, dynamic, skip_list.as_deref())?;
        }
        Commands::Inspect { file } => {
            run_inspect(&file)?;
        }
        Commands::Demo { output } => {
            write_demo(&output)?;
        }
    }

    Ok(())
}

fn load_options(path: Option<&Path>) -> Result<ExportOptions> {
    let Some(path) = path else {
        return Ok(ExportOptions::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read options {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid options file {}", path.display()))
}

fn load_skip_list(path: Option<&Path>) -> Result<HashSet<String>> {
    let Some(path) = path else {
        return Ok(HashSet::new());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read skip list {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_export(
    scene_path: &Path,
    out: &Path,
    name: &str,
    options: ExportOptions,
    dynamic: Option<u32>,
    skip_list: Option<&Path>,
) -> Result<()> {
    let text = std::fs::read_to_string(scene_path)
        .with_context(|| format!("Failed to read scene {}", scene_path.display()))?;
    let mut scene = Scene::from_json(&text)
        .with_context(|| format!("Invalid scene {}", scene_path.display()))?;

    let mut job = ExportJob::whole_scene(name, &scene).with_pre_exported(load_skip_list(skip_list)?);
    if let Some(id) = dynamic {
        let id = EntityId(id);
        scene.entity(id)?;
        job = ExportJob::new(name, vec![id])
            .with_target(ExportTarget::Dynamic(id))
            .with_pre_exported(job.pre_exported);
    }

    let summary = Exporter::new(options).export(&mut scene, &job, out)?;
    println!("{summary}");
    for file in &summary.files {
        println!("  {}", file.display());
    }
    Ok(())
}

fn run_inspect(path: &Path) -> Result<()> {
    let gltf = gltf::Gltf::open(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let document = &gltf.document;

    let primitives: usize = document.meshes().map(|m| m.primitives().count()).sum();
    let buffer_bytes: usize = document.buffers().map(|b| b.length()).sum();

    println!("{}", path.display());
    println!("  Scenes:     {}", document.scenes().count());
    println!("  Nodes:      {}", document.nodes().count());
    println!("  Meshes:     {} ({} primitives)", document.meshes().count(), primitives);
    println!("  Materials:  {}", document.materials().count());
    println!("  Textures:   {}", document.textures().count());
    println!("  Images:     {}", document.images().count());
    println!("  Cameras:    {}", document.cameras().count());
    println!("  Accessors:  {}", document.accessors().count());
    println!("  Buffers:    {} ({} bytes)", document.buffers().count(), buffer_bytes);
    if let Some(lights) = document.lights() {
        println!("  Lights:     {}", lights.count());
    }
    if let Some(blob) = &gltf.blob {
        println!("  GLB binary: {} bytes", blob.len());
    }
    Ok(())
}

fn write_demo(output: &Path) -> Result<()> {
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
    let checker = scene.add_texture(
        Texture::new("checker")
            .with_asset_path("Assets/Textures/checker.png")
            .with_pixels(2, 2, vec![
                255, 255, 255, 255, 0, 0, 0, 255, //
                0, 0, 0, 255, 255, 255, 255, 255,
            ]),
    );
    let floor = scene.add_material(
        Material::new("floor", "Standard")
            .with_texture("_MainTex", checker)
            .with_color("_Color", [1.0, 1.0, 1.0, 1.0])
            .with_float("_Glossiness", 0.2),
    );

    let level = scene.spawn(Entity::new("level"));
    scene.spawn_child(
        level,
        Entity::new("floor")
            .with_transform(Transform::IDENTITY.with_scale(Vec3::new(10.0, 1.0, 10.0)))
            .with_renderer(Renderer::single(quad, floor)),
    )?;
    scene.spawn_child(
        level,
        Entity::new("sun")
            .with_transform(Transform::IDENTITY.with_rotation(Quat::from_rotation_x(0.8)))
            .with_light(Light::new(LightKind::Directional).with_intensity(1.2)),
    )?;
    scene.spawn_child(
        level,
        Entity::new("camera")
            .with_transform(Transform::from_translation(Vec3::new(0.0, 2.0, -6.0)))
            .with_camera(Camera::perspective(1.0, 16.0 / 9.0, 0.1, 100.0)),
    )?;
    scene.spawn(
        Entity::new("crate")
            .dynamic()
            .with_transform(Transform::from_translation(Vec3::new(1.0, 0.5, 0.0)))
            .with_renderer(Renderer::single(quad, floor)),
    );

    std::fs::write(output, scene.to_json()?)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote demo scene to {}", output.display());
    Ok(())
}
