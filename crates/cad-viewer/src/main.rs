//! cad-inspect - load a CAD assembly document and report what the viewer would show

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cad_core::{AssemblyReport, load_assembly};
use cad_viewer::{PartTree, Viewer, ViewerConfig};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cad-inspect")]
#[command(about = "Inspect CAD assembly documents", long_about = None)]
struct Cli {
    /// Viewer configuration (RON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print shells, faces and the part hierarchy of an assembly
    Info {
        /// Assembly document (.ron)
        file: PathBuf,
    },
    /// Print the part tree as the viewer shows it
    Tree {
        /// Assembly document (.ron)
        file: PathBuf,
        /// Materialize and show every face, edge and curve node
        #[arg(long)]
        expand: bool,
    },
    /// Build render primitives and print statistics
    Build {
        /// Assembly document (.ron)
        file: PathBuf,
        /// Skip edge wireframe generation
        #[arg(long)]
        no_edges: bool,
    },
}

fn main() -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cad_viewer=debug,cad_scene=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    match cli.command {
        Commands::Info { file } => show_info(&file),
        Commands::Tree { file, expand } => show_tree(&file, expand),
        Commands::Build { file, no_edges } => {
            let mut config = config;
            if no_edges {
                config.build.generate_edges = false;
            }
            build(&file, config)
        }
    }
}

fn show_info(file: &Path) -> Result<()> {
    let assembly = load_assembly(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    print!("{}", AssemblyReport::new(&assembly));
    Ok(())
}

fn show_tree(file: &Path, expand: bool) -> Result<()> {
    let assembly = load_assembly(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let mut tree = PartTree::build(&assembly);
    if expand {
        tree.expand_all(&assembly);
    }
    print!("{}", tree.outline_text());
    Ok(())
}

fn build(file: &Path, config: ViewerConfig) -> Result<()> {
    let mut viewer = Viewer::new(config);
    let stats = viewer
        .load_file(file)
        .with_context(|| format!("Failed to display {}", file.display()))?;

    println!("Parts: {}", stats.parts);
    println!("Meshes: {}", stats.meshes);
    println!("Edge polylines: {}", stats.polylines);
    if stats.skipped_faces > 0 {
        println!("Skipped faces: {}", stats.skipped_faces);
    }

    let bounds = viewer.scene().bounds();
    if bounds.is_valid() {
        println!("Bounds: {:?} .. {:?}", bounds.min, bounds.max);
    }
    if let Some(target) = viewer.camera_request() {
        println!(
            "Camera: center {:?}, distance {:.3}",
            target.center, target.distance
        );
    }
    Ok(())
}
