//! Derived terrain grids, computed once per world and shared read-only by
//! every image rendered from it.

use std::fmt;

use log::info;

use crate::config::RenderConfig;
use crate::distance::DistanceGrid;
use crate::elevation::{detect_cliffs, ElevationModel};
use crate::error::WorldError;
use crate::hydrology::{generate_lakes, generate_rivers, LakeSet, RiverNetwork};
use crate::noise_field::NoiseBank;
use crate::paths::{generate_paths, PathNetwork};
use crate::seeds::SeedStream;
use crate::tilemap::Tilemap;
use crate::world::{BiomeMap, TileRegistry, WorldGrid};

/// Every grid and mask the compositor reads.
pub struct TerrainAnalysis {
    pub registry: TileRegistry,
    pub biomes: BiomeMap,
    pub noise: NoiseBank,
    pub elevation: ElevationModel,
    pub distance: DistanceGrid,
    pub rivers: RiverNetwork,
    pub lakes: LakeSet,
    pub paths: PathNetwork,
    pub cliffs: Tilemap<u8>,
}

impl TerrainAnalysis {
    /// Validate the world, then compute all derived grids eagerly.
    ///
    /// Disabled compositor stages skip their generator and leave an empty
    /// mask behind.
    pub fn build(world: &WorldGrid, seeds: &SeedStream, config: &RenderConfig) -> Result<Self, WorldError> {
        world.validate()?;
        let (width, height) = (world.width, world.height);
        let stages = &config.compositor.stages;

        let registry = TileRegistry::new(&world.tile_defs);
        let biomes = BiomeMap::from_world(world, &registry);
        let noise = NoiseBank::new(seeds, &config.noise);

        let elevation = ElevationModel::generate(width, height, &noise.elevation, &config.terrain);
        let distance = DistanceGrid::compute(&biomes, config.terrain.distance_cap);
        let cliffs = detect_cliffs(&elevation, &biomes, &config.terrain);

        let rivers = if stages.rivers {
            let mut rng = seeds.rng("rivers");
            generate_rivers(&elevation, &biomes, &noise.river, &config.rivers, &mut rng)
        } else {
            RiverNetwork::empty(width, height)
        };

        let lakes = if stages.lakes {
            let mut rng = seeds.rng("lakes");
            generate_lakes(&elevation, &biomes, &noise.lake, &config.lakes, &mut rng)
        } else {
            LakeSet::empty(width, height)
        };

        let paths = if stages.paths {
            let mut rng = seeds.rng("paths");
            generate_paths(&biomes, &noise.path, &config.paths, &mut rng)
        } else {
            PathNetwork::empty(width, height)
        };

        let analysis = Self {
            registry,
            biomes,
            noise,
            elevation,
            distance,
            rivers,
            lakes,
            paths,
            cliffs,
        };
        info!("terrain analysis for {}x{} world: {}", width, height, analysis.stats());
        Ok(analysis)
    }

    pub fn width(&self) -> usize {
        self.biomes.width()
    }

    pub fn height(&self) -> usize {
        self.biomes.height()
    }

    pub fn stats(&self) -> TerrainStats {
        TerrainStats {
            land_tiles: self.biomes.land_count(),
            river_sources: self.rivers.traces.len(),
            river_tiles: self.rivers.tile_count(),
            lake_basins: self.lakes.basins.len(),
            lake_tiles: self.lakes.tile_count(),
            path_walks: self.paths.walks.len(),
            path_tiles: self.paths.tile_count(),
            cliff_tiles: self.cliffs.count(|&c| c > 0),
        }
    }
}

/// Tile counts of the derived features.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TerrainStats {
    pub land_tiles: usize,
    pub river_sources: usize,
    pub river_tiles: usize,
    pub lake_basins: usize,
    pub lake_tiles: usize,
    pub path_walks: usize,
    pub path_tiles: usize,
    pub cliff_tiles: usize,
}

impl fmt::Display for TerrainStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} land, {} rivers ({} tiles), {} lakes ({} tiles), {} paths ({} tiles), {} cliff tiles",
            self.land_tiles,
            self.river_sources,
            self.river_tiles,
            self.lake_basins,
            self.lake_tiles,
            self.path_walks,
            self.path_tiles,
            self.cliff_tiles
        )
    }
}
