//! Procedural decoration and structure sprites for close-up renders.
//!
//! Shapes are built from pixel offsets around an anchor and clipped by the
//! canvas, so sprites near the image border draw partially.

use std::collections::HashSet;

use crate::canvas::PixelBuffer;
use crate::color::{hex, offset, offset_rgb, Color};
use crate::palette::{decoration_color, flat_decoration_variants, house_palette, shaded_palette};
use crate::tilemap::DIR4;
use crate::world::{Biome, NEUTRAL_TINT};

const TRUNK: Color = hex(0x5D340F);
const PALM_TRUNK: Color = hex(0x8B6B3D);
const FLOWER_CENTER: Color = hex(0xFFEB3B);
const MUSHROOM_SPOT: Color = hex(0xFFFFFF);
const MUSHROOM_STEM: Color = hex(0xE8D8B0);
const SNOW_FILL: Color = hex(0xF0F8FF);
const SNOW_EDGE: Color = hex(0xC0D0E0);
const HOUSE_LINE: Color = [40, 30, 20];
const DOOR_KNOB: Color = hex(0xDDAA00);
const WINDOW: Color = hex(0x87CEEB);
const FLAT_TRUNK: Color = hex(0x5A3814);
const FLAT_STEM: Color = hex(0xE0D0A0);
const FLAT_MUSHROOM_DOT: Color = hex(0xF8F0F0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TreeKind {
    Pine,
    Oak,
    Palm,
}

impl TreeKind {
    fn canopy_size(self) -> f32 {
        match self {
            TreeKind::Pine => 6.0,
            TreeKind::Oak => 5.0,
            TreeKind::Palm => 4.0,
        }
    }
}

/// Shape recipe of a decoration, resolved from its definition name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecorationFamily {
    Tree(TreeKind),
    Rock { large: bool },
    Flower,
    Mushroom,
    Snow,
    Cactus,
    /// Reeds, seaweed and anything else drawn as a thin stroke
    Stalk,
}

impl DecorationFamily {
    pub fn from_name(name: &str) -> Self {
        if name.contains("tree") {
            let kind = if name.contains("palm") {
                TreeKind::Palm
            } else if name.contains("oak") {
                TreeKind::Oak
            } else {
                TreeKind::Pine
            };
            DecorationFamily::Tree(kind)
        } else if name.contains("rock") {
            DecorationFamily::Rock { large: name.contains("large") }
        } else if name.contains("flower") {
            DecorationFamily::Flower
        } else if name.contains("mushroom") {
            DecorationFamily::Mushroom
        } else if name.contains("snow") {
            DecorationFamily::Snow
        } else if name.contains("cactus") {
            DecorationFamily::Cactus
        } else {
            DecorationFamily::Stalk
        }
    }
}

/// Fill `points` and darken every 4-neighbor outside the shape.
fn draw_outlined(buf: &mut PixelBuffer, points: &[(i32, i32)], fill: Color, outline: Color) {
    let inside: HashSet<(i32, i32)> = points.iter().copied().collect();
    for &(x, y) in points {
        buf.set(x, y, fill);
    }
    for &(x, y) in points {
        for &(dx, dy) in DIR4.iter() {
            if !inside.contains(&(x + dx, y + dy)) {
                buf.set(x + dx, y + dy, outline);
            }
        }
    }
}

/// Diamond rows `dy` in `rows`, half-width `radius - |dy|`.
fn diamond(cx: i32, cy: i32, radius: i32, rows: std::ops::RangeInclusive<i32>) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    for dy in rows {
        let w = radius - dy.abs();
        for dx in -w..=w {
            points.push((cx + dx, cy + dy));
        }
    }
    points
}

fn disc(cx: i32, cy: i32, r: i32) -> Vec<(i32, i32)> {
    let mut points = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r + 1 {
                points.push((cx + dx, cy + dy));
            }
        }
    }
    points
}

/// Draw the decoration named `name` centered at pixel `(cx, cy)`.
///
/// `tint` shifts the family color (4 is neutral, 0 means untinted) and
/// `size` scales trees and rocks. Returns `false` when the name has no
/// known base color, in which case nothing is drawn.
pub fn draw_decoration(buf: &mut PixelBuffer, cx: i32, cy: i32, name: &str, tint: u8, size: f32) -> bool {
    let Some(base) = decoration_color(name) else {
        return false;
    };
    let tint = if tint == 0 { NEUTRAL_TINT } else { tint };
    let color = offset(base, (tint as f32 - NEUTRAL_TINT as f32) * 6.0);
    let dark = offset(color, -50.0);

    match DecorationFamily::from_name(name) {
        DecorationFamily::Tree(kind) => draw_tree(buf, cx, cy, kind, color, dark, size),
        DecorationFamily::Rock { large } => {
            let r = ((if large { 4.0 } else { 2.0 }) * size).round() as i32;
            for (x, y) in disc(cx + 1, cy + 1, r) {
                buf.shade(x, y, 0.6);
            }
            draw_outlined(buf, &disc(cx, cy, r), color, dark);
            buf.set(cx - 1, cy - 1, offset(color, 40.0));
        }
        DecorationFamily::Flower => {
            draw_outlined(buf, &diamond(cx, cy, 2, -2..=2), color, dark);
            buf.set(cx, cy, FLOWER_CENTER);
        }
        DecorationFamily::Mushroom => {
            draw_outlined(buf, &diamond(cx, cy, 3, -3..=0), color, dark);
            buf.set(cx - 1, cy - 2, MUSHROOM_SPOT);
            buf.set(cx + 1, cy - 1, MUSHROOM_SPOT);
            for dy in 1..=3 {
                buf.set(cx, cy + dy, MUSHROOM_STEM);
                buf.set(cx - 1, cy + dy, MUSHROOM_STEM);
            }
        }
        DecorationFamily::Snow => {
            draw_outlined(buf, &diamond(cx, cy, 3, -3..=3), SNOW_FILL, SNOW_EDGE);
        }
        DecorationFamily::Cactus => {
            for dy in -5..=5 {
                buf.set(cx, cy + dy, color);
                buf.set(cx + 1, cy + dy, color);
            }
            for d in 1..=3 {
                buf.set(cx + 1 + d, cy - 2, color);
                buf.set(cx - d, cy + 1, color);
            }
            // Arm tips bend upward
            for (x, y) in [(cx + 4, cy - 3), (cx + 4, cy - 4), (cx - 3, cy), (cx - 3, cy - 1)] {
                buf.set(x, y, color);
            }
        }
        DecorationFamily::Stalk => {
            for dy in -4..=4 {
                buf.set(cx, cy + dy, color);
            }
            buf.set(cx - 1, cy - 2, color);
            buf.set(cx + 1, cy + 1, color);
        }
    }
    true
}

fn draw_tree(buf: &mut PixelBuffer, cx: i32, cy: i32, kind: TreeKind, color: Color, dark: Color, size: f32) {
    let sz = (kind.canopy_size() * size).round().max(1.0) as i32;

    for (x, y) in diamond(cx + 2, cy + 1, sz, -sz..=sz - 1) {
        buf.shade(x, y, 0.55);
    }

    let canopy = diamond(cx, cy - 1, sz, -sz..=sz - 1);
    draw_outlined(buf, &canopy, color, dark);
    let highlight = offset(color, 30.0);
    for &(x, y) in canopy.iter().take(4) {
        buf.set(x, y, highlight);
    }

    let trunk = if kind == TreeKind::Palm { PALM_TRUNK } else { TRUNK };
    for dy in sz - 1..=sz + 2 {
        buf.set(cx, cy + dy, trunk);
        buf.set(cx - 1, cy + dy, trunk);
    }
}

/// Flat-style counterpart of [`draw_decoration`]: small fixed-size shapes
/// without outlines or shadows. `tint` indexes the family's color variants.
pub fn draw_flat_decoration(buf: &mut PixelBuffer, cx: i32, cy: i32, name: &str, tint: u8) -> bool {
    let Some(variants) = flat_decoration_variants(name) else {
        return false;
    };
    let color = variants[tint as usize % variants.len()];
    let dark = offset(color, -30.0);

    match DecorationFamily::from_name(name) {
        DecorationFamily::Tree(kind) => draw_flat_tree(buf, cx, cy, kind, color),
        DecorationFamily::Rock { large } => {
            let r = if large { 3 } else { 2 };
            for dy in -r + 1..=r {
                for dx in -r + 1..=r {
                    if dx * dx + dy * dy <= r * r {
                        buf.set(cx + dx, cy + dy, color);
                    }
                }
            }
            for dx in -r + 1..=r {
                buf.set(cx + dx, cy + r, dark);
            }
            buf.set(cx, cy - r + 1, offset(color, 30.0));
        }
        DecorationFamily::Flower => {
            for (dx, dy) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
                buf.set(cx + dx, cy + dy, color);
            }
            buf.set(cx, cy, FLOWER_CENTER);
        }
        DecorationFamily::Cactus => {
            for dy in -4..=4 {
                buf.set(cx, cy + dy, color);
            }
            for (dx, dy) in [(1, -2), (2, -2), (2, -3), (-1, 1), (-2, 1), (-2, 0)] {
                buf.set(cx + dx, cy + dy, color);
            }
        }
        DecorationFamily::Mushroom => {
            for dx in -1..=1 {
                buf.set(cx + dx, cy, color);
                buf.set(cx + dx, cy - 1, color);
            }
            buf.set(cx, cy + 1, FLAT_STEM);
            buf.set(cx, cy + 2, FLAT_STEM);
            buf.set(cx, cy - 1, FLAT_MUSHROOM_DOT);
        }
        DecorationFamily::Snow => {
            for dx in -2..=2 {
                buf.set(cx + dx, cy, color);
            }
            for dx in -1..=1 {
                buf.set(cx + dx, cy - 1, color);
            }
        }
        DecorationFamily::Stalk => {
            for dy in -3..=3 {
                buf.set(cx, cy + dy, color);
            }
            buf.set(cx - 1, cy - 1, color);
        }
    }
    true
}

/// Rounded blob canopy, darker along the right and bottom edges, on a
/// two-pixel trunk.
fn draw_flat_tree(buf: &mut PixelBuffer, cx: i32, cy: i32, kind: TreeKind, color: Color) {
    let dark = offset(color, -35.0);
    let sz: i32 = if kind == TreeKind::Palm { 3 } else { 4 };

    for dy in -sz..sz {
        let ry = dy.abs() as f32 / sz as f32;
        let w = (sz as f32 * (1.0 - ry * ry).sqrt()).round() as i32;
        let row = if dy == sz - 1 { dark } else { color };
        for dx in -w..=w {
            buf.set(cx + dx, cy + dy, row);
        }
        buf.set(cx + w, cy + dy, dark);
    }

    let highlight = offset(color, 25.0);
    buf.set(cx - 1, cy - sz + 1, highlight);
    buf.set(cx, cy - sz + 1, highlight);

    buf.set(cx, cy + sz, FLAT_TRUNK);
    buf.set(cx, cy + sz + 1, FLAT_TRUNK);
}

/// Draw a 4x3-tile house whose top-left tile corner is at pixel `(sx, sy)`.
pub fn draw_house(buf: &mut PixelBuffer, sx: i32, sy: i32, tile_px: i32, variant: usize) {
    let pal = house_palette(variant);
    let house_w = 4 * tile_px;
    let house_h = 3 * tile_px;
    let cx = sx + house_w / 2;
    let roof_top = sy + 4;
    let wall_top = sy + tile_px + 8;
    let wall_bot = sy + house_h - 2;
    let wall_l = sx + 4;
    let wall_r = sx + house_w - 5;

    // Ground shadow
    for y in wall_top..=wall_bot + 2 {
        for x in wall_l + 3..=wall_r + 3 {
            buf.shade(x, y, 0.45);
        }
    }

    for y in wall_top..=wall_bot {
        for x in wall_l..=wall_r {
            buf.set(x, y, pal.wall);
        }
    }
    for x in wall_l..=wall_r {
        buf.set(x, wall_top, HOUSE_LINE);
        buf.set(x, wall_bot, HOUSE_LINE);
    }
    for y in wall_top..=wall_bot {
        buf.set(wall_l, y, HOUSE_LINE);
        buf.set(wall_r, y, HOUSE_LINE);
    }

    // Roof: lighter at the ridge, darker at the eaves
    let roof_h = (wall_top - roof_top).max(1);
    for dy in 0..=roof_h {
        let half = (house_w / 2 + 4) * dy / roof_h;
        let shade = 15.0 - 30.0 * dy as f32 / roof_h as f32;
        let roof = offset(pal.roof, shade);
        for dx in -half..=half {
            buf.set(cx + dx, roof_top + dy, roof);
        }
        buf.set(cx - half, roof_top + dy, HOUSE_LINE);
        buf.set(cx + half, roof_top + dy, HOUSE_LINE);
    }
    for dx in -2..=2 {
        buf.set(cx + dx, roof_top, HOUSE_LINE);
    }

    let (door_l, door_r) = (cx - 3, cx + 3);
    let (door_top, door_bot) = (wall_bot - 14, wall_bot);
    for y in door_top..=door_bot {
        for x in door_l..=door_r {
            buf.set(x, y, pal.door);
        }
    }
    for x in door_l - 1..=door_r + 1 {
        buf.set(x, door_top - 1, HOUSE_LINE);
    }
    for y in door_top..=door_bot {
        buf.set(door_l - 1, y, HOUSE_LINE);
        buf.set(door_r + 1, y, HOUSE_LINE);
    }
    buf.set(door_r - 1, (door_top + door_bot) / 2, DOOR_KNOB);

    let win = 5;
    let win_y = wall_top + 6;
    for win_x in [cx - 12, cx + 12] {
        for dy in 0..win {
            for dx in 0..win {
                buf.set(win_x + dx, win_y + dy, WINDOW);
            }
        }
        for d in -1..=win {
            buf.set(win_x + d, win_y - 1, HOUSE_LINE);
            buf.set(win_x + d, win_y + win, HOUSE_LINE);
            buf.set(win_x - 1, win_y + d, HOUSE_LINE);
            buf.set(win_x + win, win_y + d, HOUSE_LINE);
        }
        // Cross mullions
        for d in 1..=3 {
            buf.set(win_x + 2, win_y + d, HOUSE_LINE);
            buf.set(win_x + d, win_y + 2, HOUSE_LINE);
        }
    }
}

/// Biomes that grow grass tufts in close-ups.
pub fn has_ground_cover(biome: Biome) -> bool {
    matches!(biome, Biome::Grassland | Biome::Forest | Biome::Swamp)
}

/// Tuft color: the biome's darkest shade, nudged toward green.
pub fn tuft_color(biome: Biome) -> Color {
    let base = shaded_palette(biome)[0];
    let shift = if biome == Biome::Forest { -15.0 } else { 10.0 };
    offset_rgb(base, [shift, shift + 8.0, shift])
}

/// A two or three pixel grass tuft with its base at `(x, y)`.
pub fn draw_tuft(buf: &mut PixelBuffer, x: i32, y: i32, color: Color, wide: bool) {
    buf.set(x, y, color);
    buf.set(x, y - 1, color);
    if wide {
        buf.set(x + 1, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROUND: Color = [100, 150, 100];

    fn ground(w: u32, h: u32) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h);
        buf.fill_rect(0, 0, w as i32, h as i32, GROUND);
        buf
    }

    fn changed(buf: &PixelBuffer) -> usize {
        buf.as_raw().chunks(3).filter(|px| *px != GROUND).count()
    }

    #[test]
    fn test_family_resolution() {
        assert_eq!(DecorationFamily::from_name("deco_tree_palm"), DecorationFamily::Tree(TreeKind::Palm));
        assert_eq!(DecorationFamily::from_name("deco_rock_large"), DecorationFamily::Rock { large: true });
        assert_eq!(DecorationFamily::from_name("deco_snowdrift"), DecorationFamily::Snow);
        assert_eq!(DecorationFamily::from_name("deco_seaweed"), DecorationFamily::Stalk);
    }

    #[test]
    fn test_unknown_decoration_draws_nothing() {
        let mut buf = ground(16, 16);
        assert!(!draw_decoration(&mut buf, 8, 8, "deco_statue", 4, 1.0));
        assert_eq!(changed(&buf), 0);
    }

    #[test]
    fn test_tree_has_canopy_outline_trunk_and_shadow() {
        let mut buf = ground(32, 32);
        assert!(draw_decoration(&mut buf, 16, 16, "deco_tree_oak", 4, 1.0));
        let oak = decoration_color("deco_tree_oak").unwrap();
        let pixels: Vec<Color> = buf.as_raw().chunks(3).map(|p| [p[0], p[1], p[2]]).collect();
        assert!(pixels.contains(&oak));
        assert!(pixels.contains(&offset(oak, -50.0)));
        assert!(pixels.contains(&offset(oak, 30.0)));
        assert!(pixels.contains(&TRUNK));
        // Some shadow pixels survive to the lower right of the canopy
        let shadow = crate::color::scale(GROUND, 0.55);
        assert!(pixels.contains(&shadow));
    }

    #[test]
    fn test_tint_shifts_color() {
        let mut buf = ground(16, 16);
        draw_decoration(&mut buf, 8, 8, "deco_flower", 6, 1.0);
        let petal = offset(decoration_color("deco_flower").unwrap(), 12.0);
        assert_eq!(buf.get(8, 7), Some(petal));
        assert_eq!(buf.get(8, 8), Some(FLOWER_CENTER));

        // Tint 0 is treated as neutral
        let mut buf = ground(16, 16);
        draw_decoration(&mut buf, 8, 8, "deco_flower", 0, 1.0);
        assert_eq!(buf.get(8, 7), decoration_color("deco_flower"));
    }

    #[test]
    fn test_sprites_clip_at_border() {
        let mut buf = ground(8, 8);
        for name in ["deco_tree_pine", "deco_rock_large", "deco_cactus", "deco_mushroom", "deco_reed"] {
            draw_decoration(&mut buf, 0, 0, name, 4, 1.3);
            draw_decoration(&mut buf, 7, 7, name, 4, 1.3);
        }
        draw_house(&mut buf, -20, -10, 16, 2);
        assert!(changed(&buf) > 0);
    }

    #[test]
    fn test_house_layers() {
        let mut buf = ground(80, 60);
        draw_house(&mut buf, 8, 6, 16, 1);
        let pal = house_palette(1);
        let pixels: Vec<Color> = buf.as_raw().chunks(3).map(|p| [p[0], p[1], p[2]]).collect();
        for expected in [pal.wall, pal.door, WINDOW, DOOR_KNOB, HOUSE_LINE] {
            assert!(pixels.contains(&expected), "missing {:?}", expected);
        }
        // Windows are symmetric about the house center
        let cx = 8 + 32;
        let win_y = 6 + 16 + 8 + 6;
        assert_eq!(buf.get(cx - 12, win_y), Some(WINDOW));
        assert_eq!(buf.get(cx + 12, win_y), Some(WINDOW));
    }

    #[test]
    fn test_flat_and_shaded_trees_differ() {
        let mut shaded = ground(32, 32);
        let mut flat = ground(32, 32);
        assert!(draw_decoration(&mut shaded, 16, 16, "deco_tree_oak", 1, 1.0));
        assert!(draw_flat_decoration(&mut flat, 16, 16, "deco_tree_oak", 1));
        assert_ne!(shaded.as_raw(), flat.as_raw());

        let leaf = flat_decoration_variants("deco_tree_oak").unwrap()[1];
        assert_eq!(flat.get(16, 16), Some(leaf));
        // Right rim and bottom row are darkened
        assert_eq!(flat.get(20, 16), Some(offset(leaf, -35.0)));
        assert_eq!(flat.get(16, 19), Some(offset(leaf, -35.0)));
        assert_eq!(flat.get(16, 13), Some(offset(leaf, 25.0)));
        assert_eq!(flat.get(16, 20), Some(FLAT_TRUNK));
        assert_eq!(flat.get(16, 21), Some(FLAT_TRUNK));
        // No drop shadow in the flat style
        assert!(flat.as_raw().chunks(3).all(|p| *p != crate::color::scale(GROUND, 0.55)));
        assert!(changed(&flat) < changed(&shaded));
    }

    #[test]
    fn test_flat_tint_picks_variant() {
        let variants = flat_decoration_variants("deco_flower").unwrap();
        let mut buf = ground(16, 16);
        assert!(draw_flat_decoration(&mut buf, 8, 8, "deco_flower", 5));
        assert_eq!(buf.get(7, 8), Some(variants[5 % variants.len()]));
        assert_eq!(buf.get(8, 8), Some(FLOWER_CENTER));

        let mut buf = ground(16, 16);
        assert!(draw_flat_decoration(&mut buf, 8, 8, "deco_rock_small", 0));
        let rock = flat_decoration_variants("deco_rock_small").unwrap()[0];
        assert_eq!(buf.get(8, 8), Some(rock));
        assert_eq!(buf.get(8, 10), Some(offset(rock, -30.0)));

        let mut buf = ground(16, 16);
        assert!(!draw_flat_decoration(&mut buf, 8, 8, "deco_statue", 0));
        assert_eq!(changed(&buf), 0);
    }

    #[test]
    fn test_tuft_colors() {
        assert_eq!(tuft_color(Biome::Grassland), offset_rgb(shaded_palette(Biome::Grassland)[0], [10.0, 18.0, 10.0]));
        assert!(has_ground_cover(Biome::Swamp));
        assert!(!has_ground_cover(Biome::Desert));
    }
}
