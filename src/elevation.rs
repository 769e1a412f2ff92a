//! Elevation grid, hillshading and cliff detection.
//!
//! Elevation is materialized once per tile because hillshade and slope need
//! neighbor differences.

use crate::config::TerrainParams;
use crate::noise_field::NoiseField;
use crate::tilemap::Tilemap;
use crate::world::BiomeMap;

/// Neutral multiplicative shade, used on border tiles.
pub const NEUTRAL_SHADE: f32 = 1.0;

/// Highest cliff intensity class.
pub const MAX_CLIFF_CLASS: u8 = 3;

/// Per-tile elevation in [0, 1] with the lighting derived from it.
#[derive(Clone, Debug)]
pub struct ElevationModel {
    elevation: Tilemap<f32>,
    gain: f32,
    azimuth: f32,
    altitude: f32,
    shade_offset: f32,
    shade_scale: f32,
    shade_min: f32,
    shade_max: f32,
}

impl ElevationModel {
    /// Sample the elevation field once per tile at integer coordinates.
    pub fn generate(width: usize, height: usize, field: &NoiseField, params: &TerrainParams) -> Self {
        let mut elevation = Tilemap::new_with(width, height, 0.0f32);
        for (x, y, value) in elevation.iter_mut() {
            *value = field.at(x, y);
        }
        Self::from_grid(elevation, params)
    }

    /// Wrap an existing elevation grid.
    pub fn from_grid(elevation: Tilemap<f32>, params: &TerrainParams) -> Self {
        Self {
            elevation,
            gain: params.hillshade_gain,
            azimuth: params.light_azimuth.to_radians(),
            altitude: params.light_altitude.to_radians(),
            shade_offset: params.shade_offset,
            shade_scale: params.shade_scale,
            shade_min: params.shade_min,
            shade_max: params.shade_max,
        }
    }

    pub fn width(&self) -> usize {
        self.elevation.width
    }

    pub fn height(&self) -> usize {
        self.elevation.height
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        *self.elevation.get(x, y)
    }

    pub fn get_signed(&self, x: i32, y: i32) -> Option<f32> {
        self.elevation.get_signed(x, y).copied()
    }

    pub fn grid(&self) -> &Tilemap<f32> {
        &self.elevation
    }

    fn is_interior(&self, x: usize, y: usize) -> bool {
        x > 0 && y > 0 && x + 1 < self.width() && y + 1 < self.height()
    }

    /// Raw central differences `(dz/dx, dz/dy)`; `None` on the grid border.
    pub fn gradient(&self, x: usize, y: usize) -> Option<(f32, f32)> {
        if !self.is_interior(x, y) {
            return None;
        }
        let dzdx = self.get(x + 1, y) - self.get(x - 1, y);
        let dzdy = self.get(x, y + 1) - self.get(x, y - 1);
        Some((dzdx, dzdy))
    }

    /// Magnitude of the raw central-difference gradient (0 on the border).
    pub fn slope_magnitude(&self, x: usize, y: usize) -> f32 {
        match self.gradient(x, y) {
            Some((dzdx, dzdy)) => (dzdx * dzdx + dzdy * dzdy).sqrt(),
            None => 0.0,
        }
    }

    /// Multiplicative brightness from a fixed directional light.
    ///
    /// `shade = cos(alt)cos(slope) + sin(alt)sin(slope)cos(azimuth - aspect)`,
    /// remapped by offset/scale and clamped. Border tiles are neutral.
    pub fn hillshade(&self, x: usize, y: usize) -> f32 {
        let Some((dx, dy)) = self.gradient(x, y) else {
            return NEUTRAL_SHADE;
        };
        let dzdx = dx * self.gain;
        let dzdy = dy * self.gain;
        let slope = (dzdx * dzdx + dzdy * dzdy).sqrt().atan();
        let aspect = (-dzdy).atan2(-dzdx);

        let shade = self.altitude.cos() * slope.cos()
            + self.altitude.sin() * slope.sin() * (self.azimuth - aspect).cos();

        (self.shade_offset + shade * self.shade_scale).clamp(self.shade_min, self.shade_max)
    }
}

/// Flag steep land tiles with a cliff intensity class (0 = none, up to 3).
pub fn detect_cliffs(elevation: &ElevationModel, biomes: &BiomeMap, params: &TerrainParams) -> Tilemap<u8> {
    let mut cliffs = Tilemap::new_with(elevation.width(), elevation.height(), 0u8);
    let step = params.cliff_step.max(f32::EPSILON);

    for y in 0..elevation.height() {
        for x in 0..elevation.width() {
            if !biomes.is_land(x, y) {
                continue;
            }
            let slope = elevation.slope_magnitude(x, y);
            if slope > params.cliff_threshold {
                let class = ((slope / step) as u32).min(MAX_CLIFF_CLASS as u32) as u8;
                cliffs.set(x, y, class);
            }
        }
    }

    cliffs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Biome;

    fn ramp(width: usize, height: usize, slope_x: f32, slope_y: f32) -> ElevationModel {
        let mut grid = Tilemap::new_with(width, height, 0.0f32);
        for (x, y, v) in grid.iter_mut() {
            *v = 0.5 + slope_x * x as f32 + slope_y * y as f32;
        }
        ElevationModel::from_grid(grid, &TerrainParams::default())
    }

    #[test]
    fn test_border_is_neutral() {
        let model = ramp(8, 8, 0.05, 0.0);
        assert_eq!(model.hillshade(0, 3), NEUTRAL_SHADE);
        assert_eq!(model.hillshade(7, 3), NEUTRAL_SHADE);
        assert_eq!(model.hillshade(3, 0), NEUTRAL_SHADE);
        assert_eq!(model.slope_magnitude(0, 0), 0.0);
    }

    #[test]
    fn test_flat_terrain_shade() {
        let model = ramp(6, 6, 0.0, 0.0);
        let params = TerrainParams::default();
        // Flat: shade = cos(alt), remapped
        let expected = params.shade_offset + params.light_altitude.to_radians().cos() * params.shade_scale;
        assert!((model.hillshade(3, 3) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_shade_faces_light() {
        // Aspect equal to the light azimuth is fully lit, the mirrored slope
        // is in shadow.
        let facing = ramp(8, 8, -0.03, 0.03);
        let away = ramp(8, 8, 0.03, -0.03);
        let flat = ramp(8, 8, 0.0, 0.0);
        assert!(facing.hillshade(4, 4) > flat.hillshade(4, 4));
        assert!(away.hillshade(4, 4) < flat.hillshade(4, 4));
    }

    #[test]
    fn test_shade_is_clamped() {
        let params = TerrainParams::default();
        for slope in [0.0, 0.01, 0.1, 1.0, 10.0] {
            for model in [ramp(5, 5, slope, 0.0), ramp(5, 5, -slope, slope)] {
                let s = model.hillshade(2, 2);
                assert!(s >= params.shade_min && s <= params.shade_max);
            }
        }
    }

    #[test]
    fn test_cliffs_only_on_steep_land() {
        let model = ramp(6, 3, 0.05, 0.0); // central difference 0.1 on x
        let mut biome_grid = Tilemap::new_with(6, 3, Some(Biome::Mountain));
        biome_grid.set(2, 1, Some(Biome::Ocean));
        let biomes = BiomeMap::from_tilemap(biome_grid);

        let cliffs = detect_cliffs(&model, &biomes, &TerrainParams::default());
        assert_eq!(*cliffs.get(1, 1), 3);
        assert_eq!(*cliffs.get(2, 1), 0, "ocean is never a cliff");
        assert_eq!(*cliffs.get(0, 1), 0, "border has no slope");

        let gentle = ramp(6, 3, 0.01, 0.0);
        let cliffs = detect_cliffs(&gentle, &biomes, &TerrainParams::default());
        assert_eq!(cliffs.count(|&c| c > 0), 0);
    }
}
