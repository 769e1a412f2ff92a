use std::path::{Path, PathBuf};

use log::info;

use crate::analysis::TerrainAnalysis;
use crate::canvas::PixelBuffer;
use crate::color::{lerp, Color, MAGENTA};
use crate::error::EncodeError;
use crate::palette::{flat_palette, FLAT_LAKE, FLAT_PATH, FLAT_RIVER};
use crate::png::write_png;
use crate::tilemap::Tilemap;

const BACKGROUND: Color = [30, 30, 30];
const LABEL_BAR: Color = [50, 50, 50];
const LABEL_TEXT: Color = [220, 220, 220];
const LABEL_HEIGHT: u32 = 20;
const SHEET_COLUMNS: u32 = 3;

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f32) -> Color {
    let colors: [[f32; 3]; 11] = [
        [0.37, 0.31, 0.64],
        [0.20, 0.53, 0.74],
        [0.40, 0.76, 0.65],
        [0.67, 0.87, 0.64],
        [0.90, 0.96, 0.60],
        [1.00, 1.00, 0.75],
        [1.00, 0.88, 0.55],
        [0.99, 0.68, 0.38],
        [0.96, 0.43, 0.26],
        [0.84, 0.24, 0.31],
        [0.62, 0.00, 0.26],
    ];

    let t_scaled = t.clamp(0.0, 1.0) * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f32;
    let (c1, c2) = (colors[idx], colors[idx + 1]);

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

fn render_grid<T: Clone>(grid: &Tilemap<T>, color: impl Fn(&T) -> Color) -> PixelBuffer {
    let mut buf = PixelBuffer::new(grid.width as u32, grid.height as u32);
    for (x, y, value) in grid.iter() {
        buf.set(x as i32, y as i32, color(value));
    }
    buf
}

/// Elevation through the spectral colormap, normalized to the grid's range.
pub fn render_elevation(analysis: &TerrainAnalysis) -> PixelBuffer {
    let grid = analysis.elevation.grid();
    let (min, max) = grid.min_max();
    let range = max - min;
    if range < 0.001 {
        // Flat terrain
        return render_grid(grid, |_| [128, 128, 128]);
    }
    render_grid(grid, |&e| spectral_colormap((e - min) / range))
}

/// Distance to land as grayscale; land is black, unreached cells white.
pub fn render_distance(analysis: &TerrainAnalysis) -> PixelBuffer {
    let cap = analysis.distance.cap().max(1) as f32;
    render_grid(analysis.distance.grid(), |&d| {
        let gray = if d < 0 { 255 } else { (d as f32 / cap * 255.0).min(255.0) as u8 };
        [gray, gray, gray]
    })
}

/// Biome categories in their flat palette, unknown tiles magenta.
pub fn render_biomes(analysis: &TerrainAnalysis) -> PixelBuffer {
    render_grid(analysis.biomes.tilemap(), |b| match b {
        Some(biome) => flat_palette(*biome)[0],
        None => MAGENTA,
    })
}

/// Dims the biome map so a feature mask stands out on top of it.
fn backdrop(analysis: &TerrainAnalysis, x: usize, y: usize) -> Color {
    let base = match analysis.biomes.get(x, y) {
        Some(biome) => flat_palette(biome)[0],
        None => MAGENTA,
    };
    lerp(base, BACKGROUND, 0.7)
}

/// River width classes, brighter for wider channels.
pub fn render_rivers(analysis: &TerrainAnalysis) -> PixelBuffer {
    let max = analysis.rivers.mask.as_slice().iter().copied().max().unwrap_or(0).max(1) as f32;
    let mut buf = PixelBuffer::new(analysis.width() as u32, analysis.height() as u32);
    for (x, y, &w) in analysis.rivers.mask.iter() {
        let color = if w > 0 {
            lerp(FLAT_RIVER[0], [255, 255, 255], 0.5 * w as f32 / max)
        } else {
            backdrop(analysis, x, y)
        };
        buf.set(x as i32, y as i32, color);
    }
    buf
}

fn render_bool_mask(analysis: &TerrainAnalysis, mask: &Tilemap<bool>, on: Color) -> PixelBuffer {
    let mut buf = PixelBuffer::new(analysis.width() as u32, analysis.height() as u32);
    for (x, y, &set) in mask.iter() {
        buf.set(x as i32, y as i32, if set { on } else { backdrop(analysis, x, y) });
    }
    buf
}

pub fn render_lakes(analysis: &TerrainAnalysis) -> PixelBuffer {
    render_bool_mask(analysis, &analysis.lakes.mask, FLAT_LAKE[0])
}

pub fn render_paths(analysis: &TerrainAnalysis) -> PixelBuffer {
    render_bool_mask(analysis, &analysis.paths.mask, FLAT_PATH[0])
}

/// Cliff intensity classes 1-3 as yellow to red.
pub fn render_cliffs(analysis: &TerrainAnalysis) -> PixelBuffer {
    let mut buf = PixelBuffer::new(analysis.width() as u32, analysis.height() as u32);
    for (x, y, &class) in analysis.cliffs.iter() {
        let color = match class {
            0 => backdrop(analysis, x, y),
            1 => [240, 220, 60],
            2 => [240, 140, 40],
            _ => [220, 40, 30],
        };
        buf.set(x as i32, y as i32, color);
    }
    buf
}

/// Every debug layer with its label, in sheet order.
pub fn render_layers(analysis: &TerrainAnalysis) -> Vec<(&'static str, PixelBuffer)> {
    vec![
        ("elevation", render_elevation(analysis)),
        ("distance", render_distance(analysis)),
        ("biomes", render_biomes(analysis)),
        ("rivers", render_rivers(analysis)),
        ("lakes", render_lakes(analysis)),
        ("paths", render_paths(analysis)),
        ("cliffs", render_cliffs(analysis)),
    ]
}

/// Lay the layers out in a labelled grid, three per row.
pub fn contact_sheet(layers: &[(&str, PixelBuffer)]) -> PixelBuffer {
    let tile_w = layers.iter().map(|(_, b)| b.width()).max().unwrap_or(0);
    let tile_h = layers.iter().map(|(_, b)| b.height()).max().unwrap_or(0);
    let rows = (layers.len() as u32).div_ceil(SHEET_COLUMNS);
    let cols = SHEET_COLUMNS.min(layers.len() as u32);

    let (sheet_w, sheet_h) = (tile_w * cols, (tile_h + LABEL_HEIGHT) * rows);
    let mut sheet = PixelBuffer::new(sheet_w, sheet_h);
    sheet.fill_rect(0, 0, sheet_w as i32, sheet_h as i32, BACKGROUND);

    for (idx, (label, layer)) in layers.iter().enumerate() {
        let col = idx as u32 % SHEET_COLUMNS;
        let row = idx as u32 / SHEET_COLUMNS;
        let offset_x = (col * tile_w) as i32;
        let label_y = (row * (tile_h + LABEL_HEIGHT)) as i32;
        let offset_y = label_y + LABEL_HEIGHT as i32;

        for (x, y, px) in layer.image().enumerate_pixels() {
            sheet.set(offset_x + x as i32, offset_y + y as i32, px.0);
        }
        sheet.fill_rect(offset_x, label_y, tile_w as i32, LABEL_HEIGHT as i32, LABEL_BAR);
        draw_label(&mut sheet, label, offset_x + 4, label_y + 6);
    }
    sheet
}

/// Write each layer as `<stem>-<layer>.png` plus a combined `<stem>-masks.png`.
pub fn export_masks(analysis: &TerrainAnalysis, dir: &Path, stem: &str) -> Result<Vec<PathBuf>, EncodeError> {
    let layers = render_layers(analysis);
    let mut written = Vec::with_capacity(layers.len() + 1);
    for (name, layer) in &layers {
        let path = dir.join(format!("{}-{}.png", stem, name));
        write_png(&path, layer)?;
        written.push(path);
    }
    let path = dir.join(format!("{}-masks.png", stem));
    write_png(&path, &contact_sheet(&layers))?;
    written.push(path);
    info!("wrote {} debug images to {}", written.len(), dir.display());
    Ok(written)
}

fn draw_label(buf: &mut PixelBuffer, text: &str, x: i32, y: i32) {
    for (i, c) in text.chars().enumerate() {
        draw_char(buf, c.to_ascii_uppercase(), x + i as i32 * 6, y);
    }
}

/// 5x7 bitmap glyph; characters without a glyph leave a gap.
fn draw_char(buf: &mut PixelBuffer, c: char, x: i32, y: i32) {
    let Some(bitmap) = glyph(c) else {
        return;
    };
    for (row, bits) in bitmap.iter().enumerate() {
        for col in 0..5 {
            if (bits >> (4 - col)) & 1 == 1 {
                buf.set(x + col, y + row as i32, LABEL_TEXT);
            }
        }
    }
}

fn glyph(c: char) -> Option<[u8; 7]> {
    let bitmap = match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01110, 0b10001, 0b10000, 0b01110, 0b00001, 0b10001, 0b01110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        _ => return None,
    };
    Some(bitmap)
}
