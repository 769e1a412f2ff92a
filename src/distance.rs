//! Distance from land over the ocean.
//!
//! Multi-source BFS seeded from every land tile at once, expanding through
//! 4-neighbors up to a radius cap.

use std::collections::VecDeque;

use crate::tilemap::Tilemap;
use crate::world::BiomeMap;

/// Value of cells the BFS never reached within the cap.
pub const UNREACHED: i16 = -1;

/// BFS distance (in 4-neighbor steps) to the nearest land tile.
#[derive(Clone, Debug)]
pub struct DistanceGrid {
    distances: Tilemap<i16>,
    cap: i16,
}

impl DistanceGrid {
    pub fn compute(biomes: &BiomeMap, cap: i16) -> Self {
        let width = biomes.width();
        let height = biomes.height();
        let mut distances = Tilemap::new_with(width, height, UNREACHED);
        let mut queue = VecDeque::new();

        for y in 0..height {
            for x in 0..width {
                if biomes.is_land(x, y) {
                    distances.set(x, y, 0);
                    queue.push_back((x, y));
                }
            }
        }

        while let Some((x, y)) = queue.pop_front() {
            let d = *distances.get(x, y);
            if d >= cap {
                continue;
            }
            for (nx, ny) in biomes.tilemap().neighbors(x, y) {
                if *distances.get(nx, ny) == UNREACHED {
                    distances.set(nx, ny, d + 1);
                    queue.push_back((nx, ny));
                }
            }
        }

        Self { distances, cap }
    }

    /// Raw distance, `UNREACHED` beyond the cap.
    pub fn raw(&self, x: usize, y: usize) -> i16 {
        *self.distances.get(x, y)
    }

    /// Distance with unreached cells reported as the cap ("far").
    pub fn get(&self, x: usize, y: usize) -> i16 {
        match self.raw(x, y) {
            UNREACHED => self.cap,
            d => d,
        }
    }

    pub fn cap(&self) -> i16 {
        self.cap
    }

    pub fn grid(&self) -> &Tilemap<i16> {
        &self.distances
    }
}
