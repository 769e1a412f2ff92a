//! Shaded style: water colors and the ordered land stages.

use super::{Compositor, TileContext};
use crate::color::{average, lerp, offset, scale, Color};
use crate::config::StageToggles;
use crate::palette::{
    pick_shade, shaded_palette, CLIFF, FOAM, LAKE, MUDDY_BANK, OCEAN_DEPTH, PATH, PATH_EDGE, RIVER,
    SAND_PARTICLES, SNOW, WET_SAND,
};
use crate::tilemap::DIR4;
use crate::world::Biome;

/// One step of the land pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandStage {
    Detail,
    Hillshade,
    Path,
    Snow,
    Cliff,
    BiomeBlend,
    BiomeEffects,
    CloudShadow,
}

impl LandStage {
    /// Fixed evaluation order.
    pub const ORDER: [LandStage; 8] = [
        LandStage::Detail,
        LandStage::Hillshade,
        LandStage::Path,
        LandStage::Snow,
        LandStage::Cliff,
        LandStage::BiomeBlend,
        LandStage::BiomeEffects,
        LandStage::CloudShadow,
    ];

    pub fn enabled(self, toggles: &StageToggles) -> bool {
        match self {
            LandStage::Detail => toggles.detail,
            LandStage::Hillshade => toggles.hillshade,
            LandStage::Path => toggles.paths,
            LandStage::Snow => toggles.snow,
            LandStage::Cliff => toggles.cliffs,
            LandStage::BiomeBlend => toggles.biome_blend,
            LandStage::BiomeEffects => toggles.biome_effects,
            LandStage::CloudShadow => toggles.cloud_shadow,
        }
    }

    pub fn apply(self, comp: &Compositor, ctx: &mut TileContext) {
        match self {
            LandStage::Detail => detail(comp, ctx),
            LandStage::Hillshade => ctx.color = scale(ctx.color, comp.hillshade(ctx.x, ctx.y)),
            LandStage::Path => path(comp, ctx),
            LandStage::Snow => snow(comp, ctx),
            LandStage::Cliff => cliff(ctx),
            LandStage::BiomeBlend => biome_blend(comp, ctx),
            LandStage::BiomeEffects => biome_effects(ctx),
            LandStage::CloudShadow => cloud_shadow(comp, ctx),
        }
    }
}

fn detail(comp: &Compositor, ctx: &mut TileContext) {
    let jitter = (ctx.analysis.noise.detail.at(ctx.x, ctx.y) - 0.5) * comp.config.detail_amplitude;
    ctx.color = offset(ctx.color, jitter);
}

fn path(comp: &Compositor, ctx: &mut TileContext) {
    let paths = &ctx.analysis.paths;
    if !paths.is_path(ctx.x, ctx.y) {
        return;
    }
    ctx.color = lerp(ctx.color, PATH, comp.config.path_strength);
    let at_edge = paths
        .mask
        .neighbors(ctx.x, ctx.y)
        .any(|(nx, ny)| !paths.is_path(nx, ny));
    if at_edge {
        ctx.color = lerp(ctx.color, PATH_EDGE, 0.3);
    }
}

fn snow(comp: &Compositor, ctx: &mut TileContext) {
    let t = comp.terrain;
    if ctx.elevation > t.snow_threshold {
        let ramp = ((ctx.elevation - t.snow_threshold) / t.snow_ramp.max(f32::EPSILON)).min(1.0);
        ctx.color = lerp(ctx.color, SNOW, ramp * t.snow_strength);
    }
}

fn cliff(ctx: &mut TileContext) {
    let class = *ctx.analysis.cliffs.get(ctx.x, ctx.y);
    if class > 0 {
        ctx.color = lerp(ctx.color, CLIFF, (class as f32 * 0.2).min(0.6));
    }
}

/// Mix toward the palettes of differing land biomes found on a ring of eight
/// offsets around the tile.
fn biome_blend(comp: &Compositor, ctx: &mut TileContext) {
    let r = comp.config.blend_radius;
    let ring = [(-r, 0), (r, 0), (0, -r), (0, r), (-r, -r), (r, r), (r, -r), (-r, r)];
    let biomes = &ctx.analysis.biomes;
    let (x, y) = (ctx.x as i32, ctx.y as i32);

    let samples: Vec<Color> = ring
        .iter()
        .filter_map(|&(dx, dy)| biomes.get_signed(x + dx, y + dy))
        .filter(|&nb| nb != ctx.biome && !nb.is_ocean())
        .map(|nb| pick_shade(shaded_palette(nb), ctx.selector))
        .collect();

    if let Some(target) = average(&samples) {
        let weight = comp.config.blend_max.min(samples.len() as f32 / ring.len() as f32 * 0.45);
        let blend = ctx.analysis.noise.blend.at(ctx.x, ctx.y);
        ctx.color = lerp(ctx.color, target, weight * (0.4 + blend * 0.6));
    }
}

fn biome_effects(ctx: &mut TileContext) {
    if ctx.biome == Biome::Beach {
        let (x, y) = (ctx.x as i32, ctx.y as i32);
        let biomes = &ctx.analysis.biomes;
        let wet = DIR4
            .iter()
            .any(|&(dx, dy)| biomes.is_ocean_signed(x + dx * 2, y + dy * 2));
        if wet {
            ctx.color = lerp(ctx.color, WET_SAND, 0.3);
        }
    }
}

fn cloud_shadow(comp: &Compositor, ctx: &mut TileContext) {
    let threshold = comp.config.cloud_threshold;
    let cloud = ctx.analysis.noise.cloud.at(ctx.x, ctx.y);
    if cloud > threshold {
        let darken = (cloud - threshold) / (1.0 - threshold).max(f32::EPSILON) * 0.2;
        ctx.color = scale(ctx.color, 1.0 - darken);
    }
}

impl<'a> Compositor<'a> {
    pub(super) fn lake_color(&self, x: usize, y: usize) -> Color {
        let noise = &self.analysis.noise;
        let base = lerp(LAKE[0], LAKE[2], noise.lake.at(x, y));
        let wave = (noise.wave.sample(x as f64 * 2.0, y as f64 * 2.0) - 0.5) * 8.0;
        scale(offset(base, wave), self.hillshade(x, y) * 0.95 + 0.05)
    }

    pub(super) fn river_color(&self, x: usize, y: usize) -> Color {
        let a = self.analysis;
        let wave = (a.noise.wave.sample(x as f64 * 2.0, y as f64 * 2.0) - 0.5) * 10.0;
        let mut color = offset(RIVER, wave);
        let on_bank = a
            .biomes
            .tilemap()
            .neighbors(x, y)
            .any(|(nx, ny)| a.rivers.width_at(nx, ny) == 0 && a.biomes.is_land(nx, ny));
        if on_bank {
            color = lerp(color, MUDDY_BANK, 0.3);
        }
        scale(color, self.hillshade(x, y))
    }

    pub(super) fn ocean_color(&self, x: usize, y: usize) -> Color {
        let a = self.analysis;
        let dist = a.distance.get(x, y);

        if self.config.stages.ocean_details {
            if dist <= 1 && a.noise.foam.at(x, y) > self.config.foam_threshold {
                return FOAM;
            }
            if (2..=4).contains(&dist)
                && a.noise.wave.sample(x as f64 * 1.5, y as f64 * 1.5) > self.config.wave_band_threshold
            {
                return lerp(OCEAN_DEPTH[0], FOAM, 0.3);
            }
            if (1..=3).contains(&dist) && a.noise.detail.sample(x as f64 * 2.0, y as f64 * 2.0) > 0.7 {
                return lerp(OCEAN_DEPTH[0], SAND_PARTICLES, 0.2);
            }
        }

        let bands = OCEAN_DEPTH.len();
        let depth = (dist as f32 / self.config.ocean_depth_span.max(1.0)).min(1.0);
        let pos = depth * (bands - 1) as f32;
        let band = (pos as usize).min(bands - 2);
        let mut color = lerp(OCEAN_DEPTH[band], OCEAN_DEPTH[band + 1], pos - band as f32);
        color = offset(color, (a.noise.wave.at(x, y) - 0.5) * 8.0);
        scale(color, 0.85 + (self.hillshade(x, y) - 1.0) * 0.25)
    }
}
