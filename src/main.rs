use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;

use world_renderer::config::{RenderConfig, RenderStyle};
use world_renderer::png::write_png;
use world_renderer::render::{render_closeup, render_overview, resolve_crop, CropOrigin};
use world_renderer::{Compositor, SeedStream, TerrainAnalysis, WorldGrid};

#[derive(Parser, Debug)]
#[command(name = "world_renderer")]
#[command(about = "Render overview and close-up images of a tile world")]
struct Args {
    /// World description (JSON)
    world: PathBuf,

    /// Seed string every noise field and random stage derives from
    #[arg(short, long, default_value = "world")]
    seed: String,

    /// Render configuration (JSON); missing fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the images are written to
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Compositor style: shaded or flat
    #[arg(long)]
    style: Option<RenderStyle>,

    /// Tiles per overview pixel
    #[arg(long)]
    overview_scale: Option<usize>,

    /// Close-up crop origin in tiles (default: searched)
    #[arg(long, requires = "crop_y")]
    crop_x: Option<usize>,

    #[arg(long, requires = "crop_x")]
    crop_y: Option<usize>,

    /// Close-up crop size in tiles
    #[arg(long)]
    crop_w: Option<usize>,

    #[arg(long)]
    crop_h: Option<usize>,

    /// Close-up pixels per tile
    #[arg(long)]
    tile_px: Option<usize>,

    /// Center the close-up on the structure nearest the world center
    #[arg(long, conflicts_with = "crop_x")]
    focus_structure: bool,

    /// Composite terrain rows in parallel
    #[arg(long)]
    parallel: bool,
}

impl Args {
    fn render_config(&self) -> Result<RenderConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => RenderConfig::load(path)?,
            None => RenderConfig::default(),
        };
        if let Some(style) = self.style {
            config.compositor.style = style;
        }
        let view = &mut config.view;
        if let Some(scale) = self.overview_scale {
            view.overview_scale = scale;
        }
        if let Some(w) = self.crop_w {
            view.closeup_width = w;
        }
        if let Some(h) = self.crop_h {
            view.closeup_height = h;
        }
        if let Some(px) = self.tile_px {
            view.tile_px = px;
        }
        view.parallel |= self.parallel;
        Ok(config)
    }

    fn crop_origin(&self) -> CropOrigin {
        match (self.crop_x, self.crop_y) {
            (Some(x), Some(y)) => CropOrigin::Fixed { x, y },
            _ if self.focus_structure => CropOrigin::FocusStructure,
            _ => CropOrigin::Search,
        }
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "world".to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let config = args.render_config()?;
    let seeds = SeedStream::new(&args.seed);

    println!("Loading world from {}", args.world.display());
    let world = WorldGrid::load(&args.world)?;
    println!("World size: {}x{} ({} tile definitions)", world.width, world.height, world.tile_defs.len());
    println!("Seed: {:?} ({} style)", seeds.seed(), config.compositor.style);

    println!("Analyzing terrain...");
    let analysis = TerrainAnalysis::build(&world, &seeds, &config)?;
    let stats = analysis.stats();
    println!(
        "Rivers: {} sources, {} tiles | Lakes: {} basins, {} tiles | Paths: {} walks, {} tiles | Cliffs: {} tiles",
        stats.river_sources,
        stats.river_tiles,
        stats.lake_basins,
        stats.lake_tiles,
        stats.path_walks,
        stats.path_tiles,
        stats.cliff_tiles
    );

    let compositor = Compositor::new(&analysis, &config.compositor, &config.terrain);
    std::fs::create_dir_all(&args.out_dir)?;
    let stem = file_stem(&args.world);

    println!("Rendering overview...");
    let overview = render_overview(&compositor, &world, &config.view)?;
    let overview_path = args.out_dir.join(format!("{}-overview.png", stem));
    write_png(&overview_path, &overview)?;
    println!("Saved {} ({}x{})", overview_path.display(), overview.width(), overview.height());

    println!("Rendering close-up...");
    let crop = resolve_crop(&analysis, &world, &config.view, args.crop_origin(), &seeds)?;
    info!("close-up crop: {:?}", crop);
    let closeup = render_closeup(&compositor, &world, &config.view, crop, &seeds)?;
    let closeup_path = args.out_dir.join(format!("{}-closeup.png", stem));
    write_png(&closeup_path, &closeup)?;
    println!(
        "Saved {} ({}x{}, tiles {}..{} x {}..{})",
        closeup_path.display(),
        closeup.width(),
        closeup.height(),
        crop.x,
        crop.x + crop.width,
        crop.y,
        crop.y + crop.height
    );

    println!("Done!");
    Ok(())
}
