//! Flat style: crisp per-tile colors picked by a positional hash.
//!
//! No noise field is consulted for the tile color; the hash of `(x, y)` picks
//! a palette variant and decides whether a biome-border tile shows its
//! neighbor's colors instead of its own.

use crate::analysis::TerrainAnalysis;
use crate::color::{offset, Color};
use crate::config::CompositorConfig;
use crate::palette::{
    flat_palette, FLAT_LAKE, FLAT_OCEAN_COAST, FLAT_OCEAN_DEEP, FLAT_OCEAN_MID, FLAT_OCEAN_SHALLOW,
    FLAT_PATH, FLAT_RIVER, FLAT_SNOW,
};
use crate::world::Biome;

/// Fast positional hash with wrapping 32-bit arithmetic.
pub fn tile_hash(x: u32, y: u32) -> u32 {
    (x.wrapping_mul(374_761_393).wrapping_add(y.wrapping_mul(668_265_263))) ^ x.wrapping_mul(1_274_126_177)
}

fn pick(palette: &[Color], x: usize, y: usize) -> Color {
    palette[tile_hash(x as u32, y as u32) as usize % palette.len()]
}

pub(super) fn tile_color(
    analysis: &TerrainAnalysis,
    config: &CompositorConfig,
    x: usize,
    y: usize,
    biome: Biome,
) -> Color {
    let stages = &config.stages;

    if stages.lakes && analysis.lakes.is_lake(x, y) {
        return pick(&FLAT_LAKE, x, y);
    }
    if !biome.is_ocean() {
        if stages.rivers && analysis.rivers.width_at(x, y) > 0 {
            return pick(&FLAT_RIVER, x, y);
        }
        if stages.paths && analysis.paths.is_path(x, y) {
            return pick(&FLAT_PATH, x, y);
        }
    }

    if biome.is_ocean() {
        let band: &[Color] = match analysis.distance.get(x, y) {
            d if d <= 2 => &FLAT_OCEAN_COAST,
            d if d <= 5 => &FLAT_OCEAN_SHALLOW,
            d if d <= 10 => &FLAT_OCEAN_MID,
            _ => &FLAT_OCEAN_DEEP,
        };
        return pick(band, x, y);
    }

    if stages.snow && analysis.elevation.get(x, y) > config.flat_snow_threshold {
        return pick(&FLAT_SNOW, x, y);
    }

    if stages.biome_blend {
        // Only the first differing land neighbor is considered
        let border = analysis
            .biomes
            .tilemap()
            .neighbors(x, y)
            .filter_map(|(nx, ny)| analysis.biomes.get(nx, ny))
            .find(|nb| *nb != biome && !nb.is_ocean());
        if let Some(neighbor) = border {
            let (hx, hy) = (x as u32, y as u32);
            let roll = tile_hash(hx.wrapping_mul(3).wrapping_add(1), hy.wrapping_mul(7).wrapping_add(2)) % 10;
            if roll < config.dither_tenths {
                return pick(flat_palette(neighbor), x, y);
            }
        }
    }

    pick(flat_palette(biome), x, y)
}

/// One shaded dot of the close-up micro-texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MicroDot {
    /// Offset inside a 12-unit tile cell
    pub dx: u32,
    pub dy: u32,
    pub shade: i8,
}

/// One to three hash-positioned dots that break up a flat tile in close-ups.
pub fn micro_dots(x: usize, y: usize) -> impl Iterator<Item = MicroDot> {
    let h = tile_hash(x as u32, y as u32);
    let count = h % 3 + 1;
    (0..count).map(move |d| MicroDot {
        dx: (h >> (d * 4)) % 10 + 1,
        dy: (h >> (d * 4 + 2)) % 8 + 2,
        shade: if (h >> (d * 6)) % 2 == 0 { 8 } else { -8 },
    })
}

/// Apply a micro-dot shade to a tile color.
pub fn dot_color(base: Color, dot: MicroDot) -> Color {
    offset(base, dot.shade as f32)
}
