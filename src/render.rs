//! Overview and close-up rendering on top of the compositor.
//!
//! The terrain pass is a pure per-tile query and may run row-parallel; the
//! sprite pass writes overlapping pixels and always runs afterwards on the
//! calling thread.

use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;
use rayon::prelude::*;

use crate::analysis::TerrainAnalysis;
use crate::canvas::PixelBuffer;
use crate::color::{lerp, Color};
use crate::compositor::flat::{dot_color, micro_dots};
use crate::compositor::Compositor;
use crate::config::{RenderStyle, ViewConfig};
use crate::error::WorldError;
use crate::hydrology::sample_coord;
use crate::palette::{decoration_color, FLAT_TREE_TINT, STRUCTURE_MARKER};
use crate::seeds::{SeedStream, StageRng};
use crate::sprites::{draw_decoration, draw_flat_decoration, draw_house, draw_tuft, has_ground_cover, tuft_color};
use crate::world::{Structure, WorldGrid};

/// Tile size the flat micro-texture offsets are laid out for.
const MICRO_CELL: i32 = 12;

/// Crop center used when no candidate scores above zero.
const FALLBACK_CENTER: (usize, usize) = (500, 500);

/// Margins kept between random crop candidates and the world edge.
const SEARCH_MARGIN: (usize, usize) = (60, 40);

/// Weight of `FLAT_TREE_TINT` on flat-style overview tree tiles.
const FLAT_TREE_BLEND: f32 = 0.2;

/// How the close-up picks its crop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropOrigin {
    /// Top-left tile given explicitly; clamped to the world
    Fixed { x: usize, y: usize },
    /// Best-scoring window from a random search
    Search,
    /// Centered on the structure nearest the world center
    FocusStructure,
}

/// A resolved rectangle of tiles, fully inside the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crop {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Crop {
    /// Whether the `w` x `h` tile rectangle at `(x, y)` overlaps the crop.
    pub fn intersects(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        x < (self.x + self.width) as i32
            && y < (self.y + self.height) as i32
            && x + w > self.x as i32
            && y + h > self.y as i32
    }
}

fn clamp_origin(center: i64, size: usize, extent: usize) -> usize {
    center.clamp(0, (extent - size) as i64) as usize
}

/// Composite the tiles `(x0 + i * step, y0 + j * step)` for `i < cols`,
/// `j < rows`, returned row-major.
fn tile_colors(
    comp: &Compositor,
    origin: (usize, usize),
    cols: usize,
    rows: usize,
    step: usize,
    parallel: bool,
) -> Vec<Color> {
    let (x0, y0) = origin;
    let row = |j: usize| -> Vec<Color> {
        (0..cols)
            .map(|i| comp.color_at(x0 + i * step, y0 + j * step))
            .collect()
    };
    if parallel {
        (0..rows).into_par_iter().flat_map_iter(row).collect()
    } else {
        (0..rows).flat_map(row).collect()
    }
}

/// Color and weight an overview pixel is pulled toward for decoration `id`.
/// Shaded overviews blend every known decoration; flat ones only trees.
fn overview_decoration_tint(
    analysis: &TerrainAnalysis,
    id: u32,
    style: RenderStyle,
    weight: f32,
) -> Option<(Color, f32)> {
    if id == 0 {
        return None;
    }
    let def = analysis.registry.get(id)?;
    match style {
        RenderStyle::Shaded => decoration_color(&def.name).map(|c| (c, weight)),
        RenderStyle::Flat => def.name.contains("tree").then_some((FLAT_TREE_TINT, FLAT_TREE_BLEND)),
    }
}

/// Low-resolution view of the whole world, one pixel per `scale` tiles.
pub fn render_overview(comp: &Compositor, world: &WorldGrid, view: &ViewConfig) -> Result<PixelBuffer, WorldError> {
    let scale = view.overview_scale;
    if scale == 0 {
        return Err(WorldError::InvalidView("overview scale must be at least 1".into()));
    }
    let (ow, oh) = (world.width / scale, world.height / scale);
    if ow == 0 || oh == 0 {
        return Err(WorldError::InvalidView(format!(
            "overview scale {} exceeds the {}x{} world",
            scale, world.width, world.height
        )));
    }

    let analysis = comp.analysis();
    let colors = tile_colors(comp, (0, 0), ow, oh, scale, view.parallel);
    let mut buf = PixelBuffer::new(ow as u32, oh as u32);
    for oy in 0..oh {
        for ox in 0..ow {
            let mut color = colors[oy * ow + ox];
            let id = world.decoration_at(ox * scale, oy * scale);
            let tint = overview_decoration_tint(analysis, id, comp.style(), view.overview_decoration_tint);
            if let Some((deco, t)) = tint {
                color = lerp(color, deco, t);
            }
            buf.set(ox as i32, oy as i32, color);
        }
    }

    if view.structure_markers {
        for s in world.structures() {
            let (mx, my) = (s.x / scale as i32, s.y / scale as i32);
            buf.fill_rect(mx - 1, my - 1, 3, 3, STRUCTURE_MARKER);
        }
    }

    info!("overview {}x{} (scale {})", ow, oh, scale);
    Ok(buf)
}

/// Score a candidate crop center by what a sparse window around it shows.
pub fn score_window(analysis: &TerrainAnalysis, cx: usize, cy: usize, radius: i32, stride: usize) -> u32 {
    let biomes = &analysis.biomes;
    let mut seen = HashSet::new();
    let (mut ocean, mut land, mut river, mut lake, mut path) = (0u32, 0u32, 0u32, 0u32, 0u32);

    for dy in (-radius..=radius).step_by(stride.max(1)) {
        for dx in (-radius..=radius).step_by(stride.max(1)) {
            let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
            if !biomes.tilemap().contains(nx, ny) {
                continue;
            }
            let (x, y) = (nx as usize, ny as usize);
            let Some(biome) = biomes.get(x, y) else {
                continue;
            };
            seen.insert(biome);
            if biome.is_ocean() {
                ocean += 1;
            } else {
                land += 1;
            }
            if analysis.rivers.width_at(x, y) > 0 {
                river += 1;
            }
            if analysis.lakes.is_lake(x, y) {
                lake += 1;
            }
            if analysis.paths.is_path(x, y) {
                path += 1;
            }
        }
    }

    let mut score = seen.len() as u32 * 3;
    if ocean > 0 && land > 0 {
        score += 10;
    }
    if river > 2 {
        score += 8;
    }
    if lake > 2 {
        score += 6;
    }
    if path > 2 {
        score += 4;
    }
    score
}

/// Highest-scoring of `view.crop_search_attempts` random centers, clamped
/// into the world.
pub fn search_crop_center(analysis: &TerrainAnalysis, view: &ViewConfig, rng: &mut StageRng) -> (usize, usize) {
    let (width, height) = (analysis.width(), analysis.height());
    let mut best = FALLBACK_CENTER;
    let mut best_score = 0;
    for _ in 0..view.crop_search_attempts {
        let tx = sample_coord(rng, width, SEARCH_MARGIN.0);
        let ty = sample_coord(rng, height, SEARCH_MARGIN.1);
        let score = score_window(analysis, tx, ty, view.crop_search_radius, view.crop_search_stride);
        if score > best_score {
            best_score = score;
            best = (tx, ty);
        }
    }
    debug!("crop search picked ({}, {}) with score {}", best.0, best.1, best_score);
    (best.0.min(width - 1), best.1.min(height - 1))
}

/// The structure whose footprint center is nearest the world center.
pub fn central_structure(world: &WorldGrid) -> Option<&Structure> {
    let (mx, my) = (world.width as f32 / 2.0, world.height as f32 / 2.0);
    world.structures().iter().min_by(|a, b| {
        let da = (a.center().0 - mx).powi(2) + (a.center().1 - my).powi(2);
        let db = (b.center().0 - mx).powi(2) + (b.center().1 - my).powi(2);
        da.total_cmp(&db)
    })
}

/// Turn a crop request into a tile rectangle inside the world.
pub fn resolve_crop(
    analysis: &TerrainAnalysis,
    world: &WorldGrid,
    view: &ViewConfig,
    origin: CropOrigin,
    seeds: &SeedStream,
) -> Result<Crop, WorldError> {
    if view.closeup_width == 0 || view.closeup_height == 0 {
        return Err(WorldError::InvalidView(format!(
            "close-up crop {}x{} is empty",
            view.closeup_width, view.closeup_height
        )));
    }
    let width = view.closeup_width.min(world.width);
    let height = view.closeup_height.min(world.height);
    let half = ((width / 2) as i64, (height / 2) as i64);

    let search = || {
        let mut rng = seeds.rng("search");
        let (bx, by) = search_crop_center(analysis, view, &mut rng);
        (bx as i64 - half.0, by as i64 - half.1)
    };

    let (x, y) = match origin {
        CropOrigin::Fixed { x, y } => (x as i64, y as i64),
        CropOrigin::Search => search(),
        CropOrigin::FocusStructure => match central_structure(world) {
            Some(s) => (s.x as i64 - half.0 + 2, s.y as i64 - half.1 + 1),
            None => {
                info!("no structures to focus on, searching for a crop instead");
                search()
            }
        },
    };

    Ok(Crop {
        x: clamp_origin(x, width, world.width),
        y: clamp_origin(y, height, world.height),
        width,
        height,
    })
}

/// Full-resolution view of `crop`, `view.tile_px` pixels per tile, with
/// ground cover, decorations and houses drawn over the terrain.
pub fn render_closeup(
    comp: &Compositor,
    world: &WorldGrid,
    view: &ViewConfig,
    crop: Crop,
    seeds: &SeedStream,
) -> Result<PixelBuffer, WorldError> {
    if view.tile_px == 0 {
        return Err(WorldError::InvalidView("tile size must be at least 1 pixel".into()));
    }
    if crop.width == 0 || crop.height == 0 || crop.x + crop.width > world.width || crop.y + crop.height > world.height
    {
        return Err(WorldError::InvalidView(format!(
            "crop {}x{} at ({}, {}) is outside the {}x{} world",
            crop.width, crop.height, crop.x, crop.y, world.width, world.height
        )));
    }

    let t = view.tile_px as i32;
    let mut buf = PixelBuffer::new((crop.width * view.tile_px) as u32, (crop.height * view.tile_px) as u32);
    let colors = tile_colors(comp, (crop.x, crop.y), crop.width, crop.height, 1, view.parallel);
    let flat = comp.style() == RenderStyle::Flat;

    for ly in 0..crop.height {
        for lx in 0..crop.width {
            let color = colors[ly * crop.width + lx];
            let (px, py) = (lx as i32 * t, ly as i32 * t);
            buf.fill_rect(px, py, t, t, color);
            if flat {
                for dot in micro_dots(crop.x + lx, crop.y + ly) {
                    let dx = dot.dx as i32 * t / MICRO_CELL;
                    let dy = dot.dy as i32 * t / MICRO_CELL;
                    buf.set(px + dx, py + dy, dot_color(color, dot));
                }
            }
        }
    }

    let analysis = comp.analysis();
    if view.ground_cover {
        draw_ground_cover(&mut buf, analysis, world, crop, t, &mut seeds.rng("turf"));
    }

    let mut sizes = seeds.rng("size");
    let mut drawn = 0usize;
    for ly in 0..crop.height {
        for lx in 0..crop.width {
            let (x, y) = (crop.x + lx, crop.y + ly);
            let id = world.decoration_at(x, y);
            if id == 0 {
                continue;
            }
            let Some(def) = analysis.registry.get(id) else {
                debug!("decoration id {} at ({}, {}) has no definition", id, x, y);
                continue;
            };
            let (cx, cy) = (lx as i32 * t + t / 2, ly as i32 * t + t / 2);
            let tint = world.tint_at(x, y);
            let ok = if flat {
                draw_flat_decoration(&mut buf, cx, cy, &def.name, tint)
            } else {
                let size = sizes.gen_range(0.7..1.3);
                draw_decoration(&mut buf, cx, cy, &def.name, tint, size)
            };
            if ok {
                drawn += 1;
            }
        }
    }

    let mut houses = 0usize;
    for s in world.structures() {
        if !s.is_house() || !crop.intersects(s.x, s.y, s.w, s.h) {
            continue;
        }
        let sx = (s.x - crop.x as i32) * t;
        let sy = (s.y - crop.y as i32) * t;
        draw_house(&mut buf, sx, sy, t, s.variant);
        houses += 1;
    }

    info!(
        "close-up {}x{} px at tile ({}, {}): {} decorations, {} houses",
        buf.width(),
        buf.height(),
        crop.x,
        crop.y,
        drawn,
        houses
    );
    Ok(buf)
}

/// Grass tufts on undecorated grassland, forest and swamp tiles.
fn draw_ground_cover(
    buf: &mut PixelBuffer,
    analysis: &TerrainAnalysis,
    world: &WorldGrid,
    crop: Crop,
    t: i32,
    rng: &mut StageRng,
) {
    let span = (t - 4).max(1) as f32;
    for ly in 0..crop.height {
        for lx in 0..crop.width {
            let (x, y) = (crop.x + lx, crop.y + ly);
            let Some(biome) = analysis.biomes.get(x, y) else {
                continue;
            };
            if !has_ground_cover(biome) || world.decoration_at(x, y) != 0 {
                continue;
            }
            if analysis.rivers.width_at(x, y) > 0 || analysis.lakes.is_lake(x, y) || analysis.paths.is_path(x, y) {
                continue;
            }
            if analysis.noise.grass.at(x, y) < 0.35 || rng.gen::<f32>() > 0.4 {
                continue;
            }
            let px = lx as i32 * t + (rng.gen::<f32>() * span) as i32 + 2;
            let py = ly as i32 * t + (rng.gen::<f32>() * span) as i32 + 2;
            let wide = rng.gen::<f32>() > 0.5;
            draw_tuft(buf, px, py, tuft_color(biome), wide);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::MAGENTA;
    use crate::config::RenderConfig;
    use crate::palette::flat_decoration_variants;
    use crate::png::encode_buffer;
    use crate::world::test_support::{island_world, world_from_fn};
    use crate::world::{Biome, NEUTRAL_TINT};

    fn render_both(world: &WorldGrid, seed: &str, config: &RenderConfig) -> (Vec<u8>, Vec<u8>) {
        let seeds = SeedStream::new(seed);
        let analysis = TerrainAnalysis::build(world, &seeds, config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        let overview = render_overview(&comp, world, &config.view).unwrap();
        let crop = resolve_crop(&analysis, world, &config.view, CropOrigin::Search, &seeds).unwrap();
        let closeup = render_closeup(&comp, world, &config.view, crop, &seeds).unwrap();
        (encode_buffer(&overview).unwrap(), encode_buffer(&closeup).unwrap())
    }

    fn small_view(config: &mut RenderConfig) {
        config.view.closeup_width = 20;
        config.view.closeup_height = 12;
        config.view.crop_search_attempts = 50;
    }

    fn decorated_island(size: usize) -> WorldGrid {
        let mut world = island_world(size, size);
        for y in (4..size - 4).step_by(5) {
            for x in (4..size - 4).step_by(7) {
                world.decorations[y * size + x] = 100 + ((x + y) % 4) as u32;
            }
        }
        world.structures = Some(vec![Structure {
            kind: "house".into(),
            x: size as i32 / 2,
            y: size as i32 / 2,
            w: 4,
            h: 3,
            variant: 2,
        }]);
        world
    }

    #[test]
    fn test_render_is_deterministic() {
        let world = decorated_island(64);
        let mut config = RenderConfig::default();
        small_view(&mut config);
        let first = render_both(&world, "determinism", &config);
        let second = render_both(&world, "determinism", &config);
        assert_eq!(first, second);

        config.view.parallel = true;
        assert_eq!(render_both(&world, "determinism", &config), first);
    }

    #[test]
    fn test_flat_style_is_deterministic() {
        let world = decorated_island(48);
        let mut config = RenderConfig::default();
        small_view(&mut config);
        config.compositor.style = RenderStyle::Flat;
        assert_eq!(render_both(&world, "flat", &config), render_both(&world, "flat", &config));
    }

    #[test]
    fn test_overview_dimensions_and_markers() {
        let world = decorated_island(50);
        let config = RenderConfig::default();
        let analysis = TerrainAnalysis::build(&world, &SeedStream::new("ov"), &config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        let buf = render_overview(&comp, &world, &config.view).unwrap();
        assert_eq!((buf.width(), buf.height()), (25, 25));
        assert_eq!(buf.get(12, 12), Some(STRUCTURE_MARKER));
        assert_eq!(buf.get(13, 13), Some(STRUCTURE_MARKER));

        let mut view = config.view.clone();
        view.structure_markers = false;
        let plain = render_overview(&comp, &world, &view).unwrap();
        assert_ne!(plain.get(12, 12), Some(STRUCTURE_MARKER));
    }

    #[test]
    fn test_invalid_views() {
        let world = island_world(20, 20);
        let config = RenderConfig::default();
        let seeds = SeedStream::new("bad");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);

        let mut view = config.view.clone();
        view.overview_scale = 0;
        assert!(matches!(render_overview(&comp, &world, &view), Err(WorldError::InvalidView(_))));
        view.overview_scale = 40;
        assert!(matches!(render_overview(&comp, &world, &view), Err(WorldError::InvalidView(_))));

        let mut view = config.view.clone();
        view.closeup_width = 0;
        assert!(matches!(
            resolve_crop(&analysis, &world, &view, CropOrigin::Search, &seeds),
            Err(WorldError::InvalidView(_))
        ));

        let mut view = config.view.clone();
        view.tile_px = 0;
        let crop = Crop { x: 0, y: 0, width: 5, height: 5 };
        assert!(matches!(render_closeup(&comp, &world, &view, crop, &seeds), Err(WorldError::InvalidView(_))));
        let outside = Crop { x: 18, y: 0, width: 5, height: 5 };
        assert!(matches!(
            render_closeup(&comp, &world, &config.view, outside, &seeds),
            Err(WorldError::InvalidView(_))
        ));
    }

    #[test]
    fn test_crop_clamps_to_world() {
        let world = island_world(40, 30);
        let config = RenderConfig::default();
        let seeds = SeedStream::new("clamp");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();

        // Default crop is larger than the world: shrink to fit
        let crop = resolve_crop(&analysis, &world, &config.view, CropOrigin::Search, &seeds).unwrap();
        assert_eq!(crop, Crop { x: 0, y: 0, width: 40, height: 30 });

        let mut view = config.view.clone();
        view.closeup_width = 10;
        view.closeup_height = 8;
        let fixed = resolve_crop(&analysis, &world, &view, CropOrigin::Fixed { x: 100, y: 3 }, &seeds).unwrap();
        assert_eq!(fixed, Crop { x: 30, y: 3, width: 10, height: 8 });

        // Search results always land inside the world
        let searched = resolve_crop(&analysis, &world, &view, CropOrigin::Search, &seeds).unwrap();
        assert!(searched.x + searched.width <= 40 && searched.y + searched.height <= 30);
    }

    #[test]
    fn test_focus_structure_centers_crop() {
        let mut world = island_world(60, 60);
        world.structures = Some(vec![
            Structure { kind: "house".into(), x: 2, y: 2, w: 4, h: 3, variant: 0 },
            Structure { kind: "house".into(), x: 28, y: 29, w: 4, h: 3, variant: 1 },
        ]);
        let config = RenderConfig::default();
        let seeds = SeedStream::new("focus");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let mut view = config.view.clone();
        view.closeup_width = 20;
        view.closeup_height = 10;

        assert_eq!(central_structure(&world).map(|s| s.variant), Some(1));
        let crop = resolve_crop(&analysis, &world, &view, CropOrigin::FocusStructure, &seeds).unwrap();
        assert_eq!(crop, Crop { x: 28 - 10 + 2, y: 29 - 5 + 1, width: 20, height: 10 });
    }

    #[test]
    fn test_all_ocean_renders_without_features() {
        let world = world_from_fn(40, 40, |_, _| Biome::Ocean);
        let mut config = RenderConfig::default();
        small_view(&mut config);
        let seeds = SeedStream::new("ocean");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let stats = analysis.stats();
        assert_eq!((stats.river_tiles, stats.lake_tiles, stats.path_tiles), (0, 0, 0));

        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        let crop = resolve_crop(&analysis, &world, &config.view, CropOrigin::Search, &seeds).unwrap();
        let closeup = render_closeup(&comp, &world, &config.view, crop, &seeds).unwrap();
        // Blue dominates every pixel
        for px in closeup.as_raw().chunks(3) {
            assert!(px[2] > px[0] && px[2] >= px[1], "{:?}", px);
        }
    }

    #[test]
    fn test_unknown_tile_renders_magenta_block() {
        let mut world = world_from_fn(30, 30, |_, _| Biome::Grassland);
        world.terrain[10 * 30 + 12] = 4242;
        let mut config = RenderConfig::default();
        config.view.ground_cover = false;
        let seeds = SeedStream::new("magenta");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        let crop = Crop { x: 10, y: 8, width: 5, height: 5 };
        let buf = render_closeup(&comp, &world, &config.view, crop, &seeds).unwrap();

        let t = config.view.tile_px as i32;
        for (dx, dy) in [(0, 0), (t - 1, t - 1), (t / 2, 3)] {
            assert_eq!(buf.get(2 * t + dx, 2 * t + dy), Some(MAGENTA));
        }
        assert_ne!(buf.get(t / 2, t / 2), Some(MAGENTA));
    }

    #[test]
    fn test_closeup_draws_sprites() {
        let mut world = world_from_fn(12, 12, |_, _| Biome::Grassland);
        world.decorations[5 * 12 + 5] = 101;
        let mut config = RenderConfig::default();
        config.view.ground_cover = false;
        config.compositor.stages.rivers = false;
        config.compositor.stages.lakes = false;
        config.compositor.stages.paths = false;
        let seeds = SeedStream::new("sprites");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        let crop = Crop { x: 0, y: 0, width: 12, height: 12 };

        let bare = {
            let mut plain = world.clone();
            plain.decorations[5 * 12 + 5] = 0;
            render_closeup(&comp, &plain, &config.view, crop, &seeds).unwrap()
        };
        let with_rock = render_closeup(&comp, &world, &config.view, crop, &seeds).unwrap();
        let t = config.view.tile_px as i32;
        let center = (5 * t + t / 2, 5 * t + t / 2);
        assert_ne!(bare.get(center.0, center.1), with_rock.get(center.0, center.1));
    }

    fn bare_features() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.view.ground_cover = false;
        config.compositor.stages.rivers = false;
        config.compositor.stages.lakes = false;
        config.compositor.stages.paths = false;
        config
    }

    #[test]
    fn test_crop_intersects() {
        let crop = Crop { x: 10, y: 0, width: 10, height: 3 };
        assert!(crop.intersects(8, 2, 4, 3));
        assert!(crop.intersects(18, -2, 4, 3));
        assert!(!crop.intersects(6, 0, 4, 3));
        assert!(!crop.intersects(12, 3, 4, 3));
    }

    #[test]
    fn test_house_overlapping_by_one_corner_is_drawn() {
        let mut world = world_from_fn(30, 30, |_, _| Biome::Grassland);
        let config = bare_features();
        let seeds = SeedStream::new("corner");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        // Only the house's top-right tile (11, 2) falls inside
        let crop = Crop { x: 10, y: 0, width: 10, height: 3 };

        let bare = render_closeup(&comp, &world, &config.view, crop, &seeds).unwrap();
        world.structures = Some(vec![Structure { kind: "house".into(), x: 8, y: 2, w: 4, h: 3, variant: 0 }]);
        let with_house = render_closeup(&comp, &world, &config.view, crop, &seeds).unwrap();
        assert_ne!(bare.as_raw(), with_house.as_raw());
    }

    #[test]
    fn test_flat_closeup_uses_flat_sprites() {
        let mut world = world_from_fn(12, 12, |_, _| Biome::Grassland);
        world.decorations[5 * 12 + 5] = 100;
        let mut config = bare_features();
        config.compositor.style = RenderStyle::Flat;
        let seeds = SeedStream::new("flat-sprites");
        let analysis = TerrainAnalysis::build(&world, &seeds, &config).unwrap();
        let comp = Compositor::new(&analysis, &config.compositor, &config.terrain);
        let crop = Crop { x: 0, y: 0, width: 12, height: 12 };

        let buf = render_closeup(&comp, &world, &config.view, crop, &seeds).unwrap();
        let t = config.view.tile_px as i32;
        let pine = flat_decoration_variants("deco_tree_pine").unwrap();
        let expected = pine[NEUTRAL_TINT as usize % pine.len()];
        assert_eq!(buf.get(5 * t + t / 2, 5 * t + t / 2), Some(expected));
    }

    #[test]
    fn test_overview_tint_by_style() {
        let world = world_from_fn(10, 10, |_, _| Biome::Grassland);
        let config = bare_features();
        let analysis = TerrainAnalysis::build(&world, &SeedStream::new("tint"), &config).unwrap();

        assert_eq!(
            overview_decoration_tint(&analysis, 100, RenderStyle::Flat, 0.5),
            Some((FLAT_TREE_TINT, FLAT_TREE_BLEND))
        );
        assert_eq!(overview_decoration_tint(&analysis, 101, RenderStyle::Flat, 0.5), None);
        assert_eq!(
            overview_decoration_tint(&analysis, 101, RenderStyle::Shaded, 0.5),
            decoration_color("deco_rock_large").map(|c| (c, 0.5))
        );
        assert_eq!(overview_decoration_tint(&analysis, 0, RenderStyle::Shaded, 0.5), None);
    }

    #[test]
    fn test_score_window_rewards_variety() {
        let coast = world_from_fn(60, 60, |x, _| if x < 30 { Biome::Ocean } else { Biome::Forest });
        let plain = world_from_fn(60, 60, |_, _| Biome::Forest);
        let mut config = RenderConfig::default();
        config.compositor.stages.rivers = false;
        config.compositor.stages.lakes = false;
        config.compositor.stages.paths = false;
        let seeds = SeedStream::new("score");
        let coast = TerrainAnalysis::build(&coast, &seeds, &config).unwrap();
        let plain = TerrainAnalysis::build(&plain, &seeds, &config).unwrap();
        assert_eq!(score_window(&plain, 30, 30, 25, 4), 3);
        assert_eq!(score_window(&coast, 30, 30, 25, 4), 2 * 3 + 10);
    }
}
