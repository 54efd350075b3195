//! cuboid-export - cuboid model export tool
//!
//! Converts a skinned box mesh scene (.json) into a cuboid model document
//! (.model.json)

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use cuboid_export::{
    check_scene, export_scene, render_document, ExportConfig, ModelNode, Scene, Skeleton,
};

/// Extension appended to the scene's file stem when no output is given
const MODEL_EXT: &str = "model.json";

#[derive(Parser)]
#[command(name = "cuboid-export")]
#[command(about = "Cuboid model export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a scene to a cuboid model document
    Export {
        /// Input scene file (.json)
        scene: PathBuf,

        /// Output document (default: <scene>.model.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to cuboid.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate that every bone decomposes into cuboids, without exporting
    Check {
        /// Input scene file (.json)
        scene: PathBuf,

        /// Path to cuboid.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// List the bone hierarchy of a scene
    Bones {
        /// Input scene file (.json)
        scene: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export {
            scene,
            output,
            config,
            verbose,
        } => {
            let output = output.unwrap_or_else(|| scene.with_extension(MODEL_EXT));
            tracing::info!("Exporting {:?} -> {:?}", scene, output);

            let config = ExportConfig::load_or_default(config.as_deref())?;
            let mut loaded = Scene::load(&scene)?;
            let model = export_scene(&mut loaded, &config)
                .with_context(|| format!("Failed to export {:?}", scene))?;

            if verbose {
                log_node(&model, 0);
            }

            // Render fully before touching the output path
            let document = render_document(&model);
            write_atomic(&output, &document)?;
            tracing::info!(
                "Done! {} nodes, {} cuboids",
                model.node_count(),
                model.cuboid_count()
            );
        }

        Commands::Check { scene, config } => {
            tracing::info!("Checking scene {:?}", scene);
            let config = ExportConfig::load_or_default(config.as_deref())?;
            let loaded = Scene::load(&scene)?;
            let reports = check_scene(&loaded, &config)
                .with_context(|| format!("Scene {:?} cannot be exported", scene))?;
            for report in &reports {
                tracing::info!(
                    "  {}{}: {} vertices, {} cuboids",
                    "  ".repeat(report.depth),
                    report.name,
                    report.vertices,
                    report.cuboids
                );
            }
            tracing::info!("Scene is valid!");
        }

        Commands::Bones { scene } => {
            let loaded = Scene::load(&scene)?;
            let skeleton = Skeleton::from_defs(&loaded.armature.bones)?;
            tracing::info!("Bones in {:?}:", scene);
            for (id, depth) in skeleton.walk()? {
                let bone = skeleton.bone(id);
                tracing::info!(
                    "  {}{} head ({}, {}, {})",
                    "  ".repeat(depth),
                    bone.name,
                    bone.head.x,
                    bone.head.y,
                    bone.head.z
                );
            }
        }
    }

    Ok(())
}

fn log_node(node: &ModelNode, depth: usize) {
    tracing::info!(
        "  {}{}: {} cuboids",
        "  ".repeat(depth),
        node.name,
        node.mesh.len()
    );
    for child in &node.children {
        log_node(child, depth + 1);
    }
}

/// Write `content` next to `path` and rename it into place, so a failed
/// write never leaves a partial document behind.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content).with_context(|| format!("Failed to write {:?}", tmp))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move {:?} to {:?}", tmp, path))?;
    Ok(())
}
