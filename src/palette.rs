//! Fixed color tables for both render styles.

use crate::color::{hex, Color};
use crate::world::Biome;

// Shaded style: per-biome shade ramps ordered dark to light
const OCEAN: [Color; 5] = [hex(0x082A54), hex(0x0D3B6E), hex(0x134D85), hex(0x1B5E9A), hex(0x2472AF)];
const BEACH: [Color; 5] = [hex(0xC2AE6B), hex(0xCEBC78), hex(0xDCCC88), hex(0xE8D88C), hex(0xF4E8A2)];
const GRASSLAND: [Color; 6] = [
    hex(0x356B20),
    hex(0x42802D),
    hex(0x529638),
    hex(0x5DAA40),
    hex(0x72B855),
    hex(0x88C56A),
];
const FOREST: [Color; 5] = [hex(0x123E14), hex(0x1A501E), hex(0x226328), hex(0x2E7D32), hex(0x368A3A)];
const DESERT: [Color; 6] = [
    hex(0xA88840),
    hex(0xBC9C4C),
    hex(0xCEAE58),
    hex(0xDBB85C),
    hex(0xE8C868),
    hex(0xF0D878),
];
const MOUNTAIN: [Color; 5] = [hex(0x585858), hex(0x6E6E6E), hex(0x848484), hex(0x9E9E9E), hex(0xB2B2B2)];
const TUNDRA: [Color; 5] = [hex(0xAAB8C8), hex(0xBEC8D6), hex(0xD0D8E4), hex(0xE0E8F0), hex(0xEEF2F8)];
const SWAMP: [Color; 5] = [hex(0x284028), hex(0x335033), hex(0x3E5E3E), hex(0x4A6E48), hex(0x567D54)];

/// Shade ramp used by the shaded style.
pub fn shaded_palette(biome: Biome) -> &'static [Color] {
    match biome {
        Biome::Ocean => &OCEAN,
        Biome::Beach => &BEACH,
        Biome::Grassland => &GRASSLAND,
        Biome::Forest => &FOREST,
        Biome::Desert => &DESERT,
        Biome::Mountain => &MOUNTAIN,
        Biome::Tundra => &TUNDRA,
        Biome::Swamp => &SWAMP,
    }
}

/// Pick a palette entry from a [0, 1] selector.
pub fn pick_shade(palette: &[Color], selector: f32) -> Color {
    let last = palette.len() - 1;
    let idx = ((selector * palette.len() as f32) as usize).min(last);
    palette[idx]
}

/// Ocean depth bands from the shoreline outward.
pub const OCEAN_DEPTH: [Color; 7] = [
    hex(0x5AB8D0),
    hex(0x429EC0),
    hex(0x3085B5),
    hex(0x2472AF),
    hex(0x185A95),
    hex(0x0D3B6E),
    hex(0x082A54),
];

pub const LAKE: [Color; 3] = [hex(0x4AA8C4), hex(0x3E98B8), hex(0x3288AC)];
pub const RIVER: Color = hex(0x3085B5);
pub const MUDDY_BANK: Color = hex(0x5A7A4A);
pub const FOAM: Color = hex(0xE8F0F4);
pub const SAND_PARTICLES: Color = hex(0xD0C8A0);
pub const PATH: Color = hex(0x9E8860);
pub const PATH_EDGE: Color = hex(0x6E5A3A);
pub const CLIFF: Color = hex(0x554A3E);
pub const SNOW: Color = hex(0xF0F5FA);
pub const WET_SAND: Color = hex(0x9A8860);

// Flat style: distinct per-tile variants, picked by position hash
pub const FLAT_OCEAN_DEEP: [Color; 3] = [hex(0x143C78), hex(0x123872), hex(0x16407E)];
pub const FLAT_OCEAN_MID: [Color; 3] = [hex(0x1E5698), hex(0x1C5292), hex(0x205A9E)];
pub const FLAT_OCEAN_SHALLOW: [Color; 3] = [hex(0x2E7ABC), hex(0x307EC0), hex(0x2C76B8)];
pub const FLAT_OCEAN_COAST: [Color; 3] = [hex(0x489ECC), hex(0x449AC8), hex(0x4CA2D0)];
pub const FLAT_SNOW: [Color; 4] = [hex(0xF0F4F8), hex(0xECF0F4), hex(0xF4F8FC), hex(0xE8EEF2)];
pub const FLAT_RIVER: [Color; 3] = [hex(0x287AB0), hex(0x2C7EB4), hex(0x2476AC)];
pub const FLAT_LAKE: [Color; 3] = [hex(0x3890C0), hex(0x348CBC), hex(0x3C94C4)];
pub const FLAT_PATH: [Color; 3] = [hex(0x9A865C), hex(0x968258), hex(0x9E8A60)];

const FLAT_BEACH: [Color; 4] = [hex(0xE4D082), hex(0xE0CC7E), hex(0xE8D488), hex(0xDCC87A)];
const FLAT_GRASSLAND: [Color; 7] = [
    hex(0x4CAA36),
    hex(0x50AE3A),
    hex(0x48A632),
    hex(0x54B23E),
    hex(0x58B642),
    hex(0x44A22E),
    hex(0x5CBA46),
];
const FLAT_FOREST: [Color; 6] = [
    hex(0x287E2C),
    hex(0x247628),
    hex(0x2C8230),
    hex(0x207224),
    hex(0x308634),
    hex(0x1C6E20),
];
const FLAT_DESERT: [Color; 5] = [hex(0xD8BC5C), hex(0xD4B858), hex(0xDCC060), hex(0xE0C464), hex(0xD0B454)];
const FLAT_MOUNTAIN: [Color; 6] = [
    hex(0x888682),
    hex(0x84827E),
    hex(0x8C8A86),
    hex(0x807E7A),
    hex(0x94928E),
    hex(0x787672),
];
const FLAT_TUNDRA: [Color; 4] = [hex(0xD8E4EE), hex(0xD4E0EA), hex(0xDCE8F2), hex(0xE0ECF4)];
const FLAT_SWAMP: [Color; 5] = [hex(0x3A623A), hex(0x365E36), hex(0x3E663E), hex(0x426A42), hex(0x345C34)];

/// Tile variants used by the flat style. Ocean returns the deep band.
pub fn flat_palette(biome: Biome) -> &'static [Color] {
    match biome {
        Biome::Ocean => &FLAT_OCEAN_DEEP,
        Biome::Beach => &FLAT_BEACH,
        Biome::Grassland => &FLAT_GRASSLAND,
        Biome::Forest => &FLAT_FOREST,
        Biome::Desert => &FLAT_DESERT,
        Biome::Mountain => &FLAT_MOUNTAIN,
        Biome::Tundra => &FLAT_TUNDRA,
        Biome::Swamp => &FLAT_SWAMP,
    }
}

/// Base color of a decoration family, keyed by tile definition name.
pub fn decoration_color(name: &str) -> Option<Color> {
    let color = match name {
        "deco_tree_pine" => hex(0x1B5E20),
        "deco_tree_oak" => hex(0x388E3C),
        "deco_tree_palm" => hex(0x66BB6A),
        "deco_rock_small" => hex(0x757575),
        "deco_rock_large" => hex(0x616161),
        "deco_flower" => hex(0xE91E63),
        "deco_cactus" => hex(0x2E7D32),
        "deco_mushroom" => hex(0xD32F2F),
        "deco_reed" => hex(0x8BC34A),
        "deco_snowdrift" => hex(0xFFFFFF),
        "deco_seaweed" => hex(0x00695C),
        _ => return None,
    };
    Some(color)
}

/// Color variants of a decoration in the flat style; the tint picks one.
pub fn flat_decoration_variants(name: &str) -> Option<&'static [Color]> {
    let variants: &'static [Color] = match name {
        "deco_tree_pine" => &const { [hex(0x185C1C), hex(0x145418), hex(0x1C6020)] },
        "deco_tree_oak" => &const { [hex(0x308834), hex(0x2C8430), hex(0x348C38)] },
        "deco_tree_palm" => &const { [hex(0x54AA58), hex(0x50A654), hex(0x58AE5C)] },
        "deco_rock_small" => &const { [hex(0x6E6C68), hex(0x72706C)] },
        "deco_rock_large" => &const { [hex(0x5A5854), hex(0x5E5C58)] },
        "deco_flower" => &const { [hex(0xE83060), hex(0xE08020), hex(0x9040C0), hex(0xFFC010)] },
        "deco_cactus" => &const { [hex(0x2A782E), hex(0x2E7C32)] },
        "deco_mushroom" => &const { [hex(0xCC2C2C), hex(0xD03030)] },
        "deco_reed" => &const { [hex(0x7EB042), hex(0x82B446)] },
        "deco_snowdrift" => &const { [hex(0xE8F0F6), hex(0xECF4FA)] },
        _ => return None,
    };
    Some(variants)
}

/// Flat-style overviews pull tree tiles toward this green.
pub const FLAT_TREE_TINT: Color = hex(0x28782C);

/// Roof, wall and door colors of one house variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HousePalette {
    pub roof: Color,
    pub wall: Color,
    pub door: Color,
}

pub const HOUSE_PALETTES: [HousePalette; 4] = [
    HousePalette { roof: hex(0x8B4513), wall: hex(0xF5E6CC), door: hex(0x5D340F) },
    HousePalette { roof: hex(0xB7410E), wall: hex(0xFAEBD7), door: hex(0x6B3A2E) },
    HousePalette { roof: hex(0x2E4A62), wall: hex(0xECE5D8), door: hex(0x4A3528) },
    HousePalette { roof: hex(0x6B8E23), wall: hex(0xF0E6D2), door: hex(0x5C4033) },
];

pub fn house_palette(variant: usize) -> HousePalette {
    HOUSE_PALETTES[variant % HOUSE_PALETTES.len()]
}

/// Structure markers on the overview.
pub const STRUCTURE_MARKER: Color = hex(0xFF4400);
