//! River tracing by greedy steepest descent.
//!
//! Sources are the highest of a pool of random land samples. Each trace walks
//! to the lowest 8-neighbor (with a noise-driven, direction-dependent meander
//! bias), stamping a disk into the river mask whose radius grows with the
//! number of steps taken.

use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;

use super::sample_coord;
use crate::config::RiverParams;
use crate::elevation::ElevationModel;
use crate::noise_field::NoiseField;
use crate::tilemap::{Tilemap, DIR8};
use crate::world::BiomeMap;

/// Why a river trace stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiverEnd {
    /// Reached an ocean tile
    Ocean,
    /// Came back to a coordinate it already visited
    Cycle,
    /// Ran out of steps
    StepBudget,
    /// Reached the grid border or an undefined tile
    Edge,
}

/// One traced river: visited tiles in order with the width stamped at each.
#[derive(Clone, Debug)]
pub struct RiverTrace {
    pub source: (usize, usize),
    pub path: Vec<(usize, usize)>,
    pub widths: Vec<u8>,
    pub end: RiverEnd,
}

impl RiverTrace {
    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Width class at the mouth (last stamped tile).
    pub fn final_width(&self) -> u8 {
        self.widths.last().copied().unwrap_or(0)
    }
}

/// River width classes per tile (0 = dry) plus the traces that produced them.
#[derive(Clone, Debug)]
pub struct RiverNetwork {
    pub mask: Tilemap<u8>,
    pub traces: Vec<RiverTrace>,
}

impl RiverNetwork {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            mask: Tilemap::new_with(width, height, 0),
            traces: Vec::new(),
        }
    }

    pub fn width_at(&self, x: usize, y: usize) -> u8 {
        *self.mask.get(x, y)
    }

    pub fn tile_count(&self) -> usize {
        self.mask.count(|&w| w > 0)
    }
}

/// Draw candidate points and keep the highest qualifying ones as sources.
pub fn find_sources<R: Rng>(
    elevation: &ElevationModel,
    biomes: &BiomeMap,
    params: &RiverParams,
    rng: &mut R,
) -> Vec<(usize, usize)> {
    let width = elevation.width();
    let height = elevation.height();
    let mut sources = Vec::new();

    for _ in 0..params.candidate_attempts {
        let x = sample_coord(rng, width, params.margin);
        let y = sample_coord(rng, height, params.margin);
        if biomes.is_land(x, y) && elevation.get(x, y) > params.source_elevation {
            sources.push((x, y));
        }
    }

    sources.sort_by(|a, b| elevation.get(b.0, b.1).total_cmp(&elevation.get(a.0, a.1)));
    sources.truncate(params.max_sources);
    sources
}

/// Width class after `steps` steps: starts at 1, grows every
/// `steps_per_width` steps, capped at `max_width`.
fn width_class(steps: usize, params: &RiverParams) -> u8 {
    let grown = 1 + steps / params.steps_per_width.max(1);
    grown.min(params.max_width.max(1) as usize) as u8
}

/// Stamp a disk of the given radius, never lowering an existing width.
fn stamp_disk(mask: &mut Tilemap<u8>, cx: usize, cy: usize, radius: u8) {
    let r = radius as i32;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (nx, ny) = (cx as i32 + dx, cy as i32 + dy);
            if let Some(&existing) = mask.get_signed(nx, ny) {
                if radius > existing {
                    mask.set_signed(nx, ny, radius);
                }
            }
        }
    }
}

/// Trace one river from `source`, stamping into `mask`.
pub fn trace_river<R: Rng>(
    source: (usize, usize),
    elevation: &ElevationModel,
    biomes: &BiomeMap,
    meander: &NoiseField,
    params: &RiverParams,
    rng: &mut R,
    mask: &mut Tilemap<u8>,
) -> RiverTrace {
    let width = elevation.width() as i32;
    let height = elevation.height() as i32;
    let (mut x, mut y) = (source.0 as i32, source.1 as i32);
    let mut visited = HashSet::new();
    let mut path = Vec::new();
    let mut widths = Vec::new();
    let mut steps = 0usize;

    let end = loop {
        if steps >= params.max_steps {
            break RiverEnd::StepBudget;
        }
        if biomes.is_ocean_signed(x, y) {
            break RiverEnd::Ocean;
        }
        if x < 1 || y < 1 || x >= width - 1 || y >= height - 1 {
            break RiverEnd::Edge;
        }
        if !biomes.is_land_signed(x, y) {
            break RiverEnd::Edge;
        }
        if !visited.insert((x, y)) {
            break RiverEnd::Cycle;
        }

        let (ux, uy) = (x as usize, y as usize);
        let w = width_class(steps, params);
        stamp_disk(mask, ux, uy, w);
        path.push((ux, uy));
        widths.push(w);

        // Bias proportional to dx so the pull is directional, not a uniform offset
        let bias = (meander.sample(x as f64 * 0.5, y as f64 * 0.5) - 0.5) * params.meander_strength;
        let mut best = elevation.get(ux, uy);
        let mut next = None;
        for &(dx, dy) in DIR8.iter() {
            if let Some(e) = elevation.get_signed(x + dx, y + dy) {
                let score = e + bias * dx as f32;
                if score < best {
                    best = score;
                    next = Some((x + dx, y + dy));
                }
            }
        }

        match next {
            Some((nx, ny)) => {
                x = nx;
                y = ny;
            }
            None => {
                // Local minimum: one diagonal step in a random direction
                x += if rng.gen_bool(0.5) { 1 } else { -1 };
                y += if rng.gen_bool(0.5) { 1 } else { -1 };
            }
        }
        steps += 1;
    };

    RiverTrace { source, path, widths, end }
}

/// Find sources and trace every river into one network.
pub fn generate_rivers<R: Rng>(
    elevation: &ElevationModel,
    biomes: &BiomeMap,
    meander: &NoiseField,
    params: &RiverParams,
    rng: &mut R,
) -> RiverNetwork {
    let mut network = RiverNetwork::empty(elevation.width(), elevation.height());
    let sources = find_sources(elevation, biomes, params, rng);

    for source in sources {
        let trace = trace_river(source, elevation, biomes, meander, params, rng, &mut network.mask);
        debug!(
            "river from {:?}: {} steps, ended {:?}, width {}",
            trace.source,
            trace.len(),
            trace.end,
            trace.final_width()
        );
        if !trace.is_empty() {
            network.traces.push(trace);
        }
    }

    info!(
        "rivers: {} sources, {} river tiles",
        network.traces.len(),
        network.tile_count()
    );
    network
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TerrainParams;
    use crate::world::Biome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cone(size: usize, peak: (usize, usize)) -> ElevationModel {
        let mut grid = Tilemap::new_with(size, size, 0.0f32);
        for (x, y, v) in grid.iter_mut() {
            let d = ((x as f32 - peak.0 as f32).powi(2) + (y as f32 - peak.1 as f32).powi(2)).sqrt();
            *v = (0.95 - d * 0.02).max(0.05);
        }
        ElevationModel::from_grid(grid, &TerrainParams::default())
    }

    fn ocean_rimmed(size: usize, rim: usize) -> BiomeMap {
        let mut grid = Tilemap::new_with(size, size, Some(Biome::Grassland));
        for (x, y, b) in grid.iter_mut() {
            if x < rim || y < rim || x >= size - rim || y >= size - rim {
                *b = Some(Biome::Ocean);
            }
        }
        BiomeMap::from_tilemap(grid)
    }

    fn short_widths() -> RiverParams {
        RiverParams { steps_per_width: 3, ..RiverParams::default() }
    }

    #[test]
    fn test_trace_reaches_ocean_with_growing_width() {
        let elevation = cone(40, (20, 20));
        let biomes = ocean_rimmed(40, 4);
        let meander = NoiseField::new("test-meander", 0.03, 3);
        let params = short_widths();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut mask = Tilemap::new_with(40, 40, 0u8);

        let trace = trace_river((20, 20), &elevation, &biomes, &meander, &params, &mut rng, &mut mask);

        assert_eq!(trace.end, RiverEnd::Ocean);
        assert!(trace.len() > 5);
        assert!(trace.widths.windows(2).all(|w| w[0] <= w[1]), "widths {:?}", trace.widths);
        assert!(trace.final_width() > 1);
        assert!(trace.final_width() <= params.max_width);
        for (&(x, y), &w) in trace.path.iter().zip(&trace.widths) {
            assert!(*mask.get(x, y) >= w);
        }
    }

    #[test]
    fn test_ocean_in_border_row_ends_as_ocean() {
        let mut grid = Tilemap::new_with(20, 16, 0.0f32);
        for (x, y, v) in grid.iter_mut() {
            *v = 0.05 + 0.04 * x as f32 + 0.01 * (y as f32 - 8.0).abs();
        }
        let elevation = ElevationModel::from_grid(grid, &TerrainParams::default());
        let mut cells = Tilemap::new_with(20, 16, Some(Biome::Grassland));
        for y in 0..16 {
            cells.set(0, y, Some(Biome::Ocean));
        }
        let biomes = BiomeMap::from_tilemap(cells);
        let meander = NoiseField::new("border", 0.03, 3);
        let params = RiverParams { meander_strength: 0.0, max_steps: 100, ..RiverParams::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut mask = Tilemap::new_with(20, 16, 0u8);

        let trace = trace_river((10, 8), &elevation, &biomes, &meander, &params, &mut rng, &mut mask);

        assert_eq!(trace.end, RiverEnd::Ocean);
        assert_eq!(trace.path.last(), Some(&(1, 8)));
    }

    #[test]
    fn test_single_peak_on_flat_land_terminates() {
        let mut grid = Tilemap::new_with(32, 32, 0.3f32);
        grid.set(16, 16, 0.9);
        let elevation = ElevationModel::from_grid(grid, &TerrainParams::default());
        let biomes = BiomeMap::from_tilemap(Tilemap::new_with(32, 32, Some(Biome::Grassland)));
        let meander = NoiseField::new("flat-meander", 0.03, 3);
        let params = RiverParams { max_steps: 200, ..RiverParams::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut mask = Tilemap::new_with(32, 32, 0u8);

        let trace = trace_river((16, 16), &elevation, &biomes, &meander, &params, &mut rng, &mut mask);

        assert!(trace.len() <= params.max_steps);
        assert!(matches!(
            trace.end,
            RiverEnd::StepBudget | RiverEnd::Cycle | RiverEnd::Edge | RiverEnd::Ocean
        ));
        assert!(trace.widths.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_step_budget_stops_trace() {
        let elevation = cone(60, (30, 30));
        let biomes = BiomeMap::from_tilemap(Tilemap::new_with(60, 60, Some(Biome::Forest)));
        let meander = NoiseField::new("budget", 0.03, 3);
        let params = RiverParams { max_steps: 4, ..RiverParams::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut mask = Tilemap::new_with(60, 60, 0u8);

        let trace = trace_river((30, 30), &elevation, &biomes, &meander, &params, &mut rng, &mut mask);
        assert_eq!(trace.end, RiverEnd::StepBudget);
        assert_eq!(trace.len(), 4);
    }

    #[test]
    fn test_sources_sorted_and_above_threshold() {
        let elevation = cone(80, (40, 40));
        let biomes = ocean_rimmed(80, 2);
        let params = RiverParams { max_sources: 10, ..RiverParams::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let sources = find_sources(&elevation, &biomes, &params, &mut rng);
        assert!(!sources.is_empty());
        assert!(sources.len() <= 10);
        let elevations: Vec<f32> = sources.iter().map(|&(x, y)| elevation.get(x, y)).collect();
        assert!(elevations.iter().all(|&e| e > params.source_elevation));
        assert!(elevations.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let elevation = cone(64, (32, 30));
        let biomes = ocean_rimmed(64, 3);
        let meander = NoiseField::new("det", 0.03, 3);
        let params = RiverParams { margin: 4, ..RiverParams::default() };

        let a = generate_rivers(&elevation, &biomes, &meander, &params, &mut ChaCha8Rng::seed_from_u64(11));
        let b = generate_rivers(&elevation, &biomes, &meander, &params, &mut ChaCha8Rng::seed_from_u64(11));
        assert_eq!(a.mask, b.mask);
        assert!(a.tile_count() > 0);
    }
}
