//! Write the derived terrain grids of a world as images for inspection

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use world_renderer::export::export_masks;
use world_renderer::{RenderConfig, SeedStream, TerrainAnalysis, WorldGrid};

#[derive(Parser, Debug)]
#[command(name = "debug_masks")]
#[command(about = "Export elevation, distance and feature masks of a tile world")]
struct Args {
    /// World description (JSON)
    world: PathBuf,

    #[arg(short, long, default_value = "world")]
    seed: String,

    /// Render configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RenderConfig::load(path)?,
        None => RenderConfig::default(),
    };
    let world = WorldGrid::load(&args.world)?;
    let seeds = SeedStream::new(&args.seed);
    println!("World size: {}x{}, seed {:?}", world.width, world.height, seeds.seed());

    let analysis = TerrainAnalysis::build(&world, &seeds, &config)?;
    println!("{}", analysis.stats());

    std::fs::create_dir_all(&args.out_dir)?;
    let stem = args
        .world
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "world".to_string());
    for path in export_masks(&analysis, &args.out_dir, &stem)? {
        println!("Saved {}", path.display());
    }
    Ok(())
}
