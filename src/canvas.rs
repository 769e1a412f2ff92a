//! The RGB pixel buffer one render call draws into.

use image::{Rgb, RgbImage};

use crate::color::{scale, Color};

/// Bounds-checked RGB canvas. Writes and reads outside the image are ignored.
pub struct PixelBuffer {
    image: RgbImage,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::new(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    fn index(&self, x: i32, y: i32) -> Option<(u32, u32)> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return None;
        }
        Some((x as u32, y as u32))
    }

    pub fn set(&mut self, x: i32, y: i32, color: Color) {
        if let Some((px, py)) = self.index(x, y) {
            self.image.put_pixel(px, py, Rgb(color));
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|(px, py)| self.image.get_pixel(px, py).0)
    }

    /// Multiply the existing pixel by `factor` (drop shadows).
    pub fn shade(&mut self, x: i32, y: i32, factor: f32) {
        if let Some(current) = self.get(x, y) {
            self.set(x, y, scale(current, factor));
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for py in y.max(0)..(y + h).min(self.height() as i32) {
            for px in x.max(0)..(x + w).min(self.width() as i32) {
                self.image.put_pixel(px as u32, py as u32, Rgb(color));
            }
        }
    }

    /// Row-major RGB bytes, three per pixel.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_is_ignored() {
        let mut buf = PixelBuffer::new(4, 3);
        buf.set(-1, 0, [255, 0, 0]);
        buf.set(4, 0, [255, 0, 0]);
        buf.set(0, 3, [255, 0, 0]);
        buf.shade(10, 10, 0.5);
        assert_eq!(buf.get(-1, 0), None);
        assert!(buf.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_set_get_shade() {
        let mut buf = PixelBuffer::new(4, 3);
        buf.set(2, 1, [100, 200, 50]);
        assert_eq!(buf.get(2, 1), Some([100, 200, 50]));
        buf.shade(2, 1, 0.5);
        assert_eq!(buf.get(2, 1), Some([50, 100, 25]));
        // Row-major layout
        let i = (1 * 4 + 2) * 3;
        assert_eq!(&buf.as_raw()[i..i + 3], &[50, 100, 25]);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut buf = PixelBuffer::new(5, 5);
        buf.fill_rect(-2, 3, 4, 10, [9, 9, 9]);
        let filled = (0..5)
            .flat_map(|y| (0..5).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.get(x, y) == Some([9, 9, 9]))
            .count();
        assert_eq!(filled, 4);
    }
}
