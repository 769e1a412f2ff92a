//! Per-tile color resolution.
//!
//! `Compositor::color_at` is a pure function of the precomputed grids in a
//! `TerrainAnalysis`. The shaded style resolves water tiles directly and runs
//! land tiles through an ordered list of stages over a shared `TileContext`;
//! the flat style picks hashed tile variants with dithered biome borders.

pub mod flat;
mod shaded;

pub use flat::tile_hash;
pub use shaded::LandStage;

use crate::analysis::TerrainAnalysis;
use crate::color::{Color, MAGENTA};
use crate::config::{CompositorConfig, RenderStyle, TerrainParams};
use crate::elevation::NEUTRAL_SHADE;
use crate::world::Biome;

/// State of one land tile while it passes through the stage list.
pub struct TileContext<'a> {
    pub x: usize,
    pub y: usize,
    pub biome: Biome,
    pub elevation: f32,
    /// Color-variation noise sample, shared by the base shade and the blend ring
    pub selector: f32,
    pub color: Color,
    pub analysis: &'a TerrainAnalysis,
}

/// Resolves tile colors for one render configuration.
pub struct Compositor<'a> {
    analysis: &'a TerrainAnalysis,
    config: &'a CompositorConfig,
    terrain: &'a TerrainParams,
    stages: Vec<LandStage>,
}

impl<'a> Compositor<'a> {
    pub fn new(analysis: &'a TerrainAnalysis, config: &'a CompositorConfig, terrain: &'a TerrainParams) -> Self {
        let stages = LandStage::ORDER
            .iter()
            .copied()
            .filter(|stage| stage.enabled(&config.stages))
            .collect();
        Self {
            analysis,
            config,
            terrain,
            stages,
        }
    }

    /// Land stages this compositor runs, in order.
    pub fn stages(&self) -> &[LandStage] {
        &self.stages
    }

    pub fn analysis(&self) -> &TerrainAnalysis {
        self.analysis
    }

    pub fn style(&self) -> RenderStyle {
        self.config.style
    }

    /// Final color of tile `(x, y)`. Tiles without a definition render magenta.
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        let Some(biome) = self.analysis.biomes.get(x, y) else {
            return MAGENTA;
        };
        match self.config.style {
            RenderStyle::Shaded => self.shaded_color(x, y, biome),
            RenderStyle::Flat => flat::tile_color(self.analysis, self.config, x, y, biome),
        }
    }

    fn hillshade(&self, x: usize, y: usize) -> f32 {
        if self.config.stages.hillshade {
            self.analysis.elevation.hillshade(x, y)
        } else {
            NEUTRAL_SHADE
        }
    }

    fn shaded_color(&self, x: usize, y: usize, biome: Biome) -> Color {
        let a = self.analysis;
        let stages = &self.config.stages;

        if stages.lakes && a.lakes.is_lake(x, y) {
            return self.lake_color(x, y);
        }
        if stages.rivers && a.rivers.width_at(x, y) > 0 && !biome.is_ocean() {
            return self.river_color(x, y);
        }
        if biome.is_ocean() {
            return self.ocean_color(x, y);
        }

        let selector = a.noise.color.at(x, y);
        let mut ctx = TileContext {
            x,
            y,
            biome,
            elevation: a.elevation.get(x, y),
            selector,
            color: crate::palette::pick_shade(crate::palette::shaded_palette(biome), selector),
            analysis: a,
        };
        for stage in &self.stages {
            stage.apply(self, &mut ctx);
        }
        ctx.color
    }
}
