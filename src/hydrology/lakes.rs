//! Lake basins filled from low-lying land.
//!
//! A candidate center grows a 4-connected region of land whose elevation stays
//! within a small threshold of the center. Fills that stay tiny or grow past
//! the size cap are discarded without touching the mask.

use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;

use super::sample_coord;
use crate::config::LakeParams;
use crate::elevation::ElevationModel;
use crate::noise_field::NoiseField;
use crate::tilemap::Tilemap;
use crate::world::BiomeMap;

/// A committed lake.
#[derive(Clone, Debug)]
pub struct LakeBasin {
    pub center: (usize, usize),
    pub source_elevation: f32,
    pub tiles: Vec<(usize, usize)>,
}

impl LakeBasin {
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

/// Result of filling one candidate basin.
#[derive(Clone, Debug)]
pub enum BasinFill {
    Committed(LakeBasin),
    /// Fewer tiles than the minimum size
    TooSmall(usize),
    /// The fill grew past the maximum size and was abandoned
    TooLarge,
}

/// Lake membership per tile plus the basins that produced it.
#[derive(Clone, Debug)]
pub struct LakeSet {
    pub mask: Tilemap<bool>,
    pub basins: Vec<LakeBasin>,
}

impl LakeSet {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            mask: Tilemap::new_with(width, height, false),
            basins: Vec::new(),
        }
    }

    pub fn is_lake(&self, x: usize, y: usize) -> bool {
        *self.mask.get(x, y)
    }

    pub fn tile_count(&self) -> usize {
        self.mask.count(|&l| l)
    }

    fn commit(&mut self, basin: LakeBasin) {
        for &(x, y) in &basin.tiles {
            self.mask.set(x, y, true);
        }
        self.basins.push(basin);
    }
}

/// Flood-fill the basin around `center` with an explicit stack.
pub fn flood_basin(
    center: (usize, usize),
    elevation: &ElevationModel,
    biomes: &BiomeMap,
    params: &LakeParams,
) -> BasinFill {
    let source_elevation = elevation.get(center.0, center.1);
    let limit = source_elevation + params.fill_threshold;
    let mut stack = vec![center];
    let mut visited = HashSet::new();
    let mut tiles = Vec::new();

    while let Some((x, y)) = stack.pop() {
        if !visited.insert((x, y)) {
            continue;
        }
        if !biomes.is_land(x, y) || elevation.get(x, y) > limit {
            continue;
        }
        tiles.push((x, y));
        if tiles.len() > params.max_size {
            return BasinFill::TooLarge;
        }
        for (nx, ny) in biomes.tilemap().neighbors(x, y) {
            if !visited.contains(&(nx, ny)) {
                stack.push((nx, ny));
            }
        }
    }

    if tiles.len() < params.min_size {
        BasinFill::TooSmall(tiles.len())
    } else {
        BasinFill::Committed(LakeBasin { center, source_elevation, tiles })
    }
}

/// Sample candidate centers and commit every basin of acceptable size.
pub fn generate_lakes<R: Rng>(
    elevation: &ElevationModel,
    biomes: &BiomeMap,
    likelihood: &NoiseField,
    params: &LakeParams,
    rng: &mut R,
) -> LakeSet {
    let width = elevation.width();
    let height = elevation.height();
    let mut lakes = LakeSet::empty(width, height);
    let (mut small, mut large) = (0usize, 0usize);

    for _ in 0..params.candidate_attempts {
        let x = sample_coord(rng, width, params.margin);
        let y = sample_coord(rng, height, params.margin);
        if !biomes.is_land(x, y) {
            continue;
        }
        let e = elevation.get(x, y);
        if e < params.min_elevation || e > params.max_elevation {
            continue;
        }
        if likelihood.at(x, y) > params.likelihood_gate {
            continue;
        }

        match flood_basin((x, y), elevation, biomes, params) {
            BasinFill::Committed(basin) => {
                debug!("lake at ({}, {}): {} tiles", x, y, basin.size());
                lakes.commit(basin);
            }
            BasinFill::TooSmall(_) => small += 1,
            BasinFill::TooLarge => large += 1,
        }
    }

    info!(
        "lakes: {} basins, {} lake tiles ({} too small, {} too large)",
        lakes.basins.len(),
        lakes.tile_count(),
        small,
        large
    );
    lakes
}
