//! RGB color arithmetic.
//!
//! Colors are plain `[u8; 3]` triples. Every operation computes in `f32`,
//! clamps to [0, 255] and truncates, so results never wrap.

pub type Color = [u8; 3];

/// Returned for tiles whose definition is missing.
pub const MAGENTA: Color = [255, 0, 255];

/// Build a color from a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> Color {
    [(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]
}

/// Clamp a channel value into [0, 255] and truncate.
pub fn channel(v: f32) -> u8 {
    // NaN falls through clamp and casts to 0
    v.clamp(0.0, 255.0) as u8
}

pub fn lerp(a: Color, b: Color, t: f32) -> Color {
    let mix = |i: usize| channel(a[i] as f32 + (b[i] as f32 - a[i] as f32) * t);
    [mix(0), mix(1), mix(2)]
}

/// Add the same amount to every channel.
pub fn offset(c: Color, amount: f32) -> Color {
    offset_rgb(c, [amount; 3])
}

pub fn offset_rgb(c: Color, amounts: [f32; 3]) -> Color {
    [
        channel(c[0] as f32 + amounts[0]),
        channel(c[1] as f32 + amounts[1]),
        channel(c[2] as f32 + amounts[2]),
    ]
}

/// Multiply every channel by `factor`.
pub fn scale(c: Color, factor: f32) -> Color {
    [
        channel(c[0] as f32 * factor),
        channel(c[1] as f32 * factor),
        channel(c[2] as f32 * factor),
    ]
}

/// Channel-wise mean of a set of colors (`None` when empty).
pub fn average(colors: &[Color]) -> Option<Color> {
    if colors.is_empty() {
        return None;
    }
    let mut sum = [0.0f32; 3];
    for c in colors {
        for i in 0..3 {
            sum[i] += c[i] as f32;
        }
    }
    let n = colors.len() as f32;
    Some([channel(sum[0] / n), channel(sum[1] / n), channel(sum[2] / n)])
}
