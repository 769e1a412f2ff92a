//! Dirt paths between random pairs of nearby land points.
//!
//! Each walk steps toward its target one tile at a time with a noise wobble on
//! the direction, stopping on arrival, when it leaves land, or when its step
//! budget runs out. Walks never cross water.

use log::{debug, info};
use rand::Rng;

use crate::config::PathParams;
use crate::hydrology::sample_coord;
use crate::noise_field::NoiseField;
use crate::tilemap::Tilemap;
use crate::world::BiomeMap;

/// How a path walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    Arrived,
    LeftLand,
    StepBudget,
}

#[derive(Clone, Debug)]
pub struct PathWalk {
    pub start: (i32, i32),
    pub end: (i32, i32),
    pub steps: usize,
    pub outcome: WalkOutcome,
}

/// Path membership per tile plus the walks that drew it.
#[derive(Clone, Debug)]
pub struct PathNetwork {
    pub mask: Tilemap<bool>,
    pub walks: Vec<PathWalk>,
}

impl PathNetwork {
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            mask: Tilemap::new_with(width, height, false),
            walks: Vec::new(),
        }
    }

    pub fn is_path(&self, x: usize, y: usize) -> bool {
        *self.mask.get(x, y)
    }

    pub fn tile_count(&self) -> usize {
        self.mask.count(|&p| p)
    }
}

/// -1, 0 or 1. `f32::signum` maps zero to 1, which would bias walks.
fn step_sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Mark `(x, y)`, and its east neighbor for wide strokes when that is land.
fn stamp(mask: &mut Tilemap<bool>, biomes: &BiomeMap, x: i32, y: i32, stroke_width: u8) {
    mask.set_signed(x, y, true);
    if stroke_width >= 2 && biomes.is_land_signed(x + 1, y) {
        mask.set_signed(x + 1, y, true);
    }
}

/// Walk from `start` toward `end`, stamping into `mask`.
pub fn walk_path(
    start: (i32, i32),
    end: (i32, i32),
    biomes: &BiomeMap,
    wobble: &NoiseField,
    params: &PathParams,
    mask: &mut Tilemap<bool>,
) -> PathWalk {
    let max_x = biomes.width() as i32 - 1;
    let max_y = biomes.height() as i32 - 1;
    let (mut x, mut y) = start;
    let mut steps = 0;

    let outcome = loop {
        let dx = end.0 - x;
        let dy = end.1 - y;
        if dx.abs() <= 1 && dy.abs() <= 1 {
            if biomes.is_land_signed(x, y) {
                stamp(mask, biomes, x, y, params.stroke_width);
            }
            break WalkOutcome::Arrived;
        }
        if steps >= params.max_steps {
            break WalkOutcome::StepBudget;
        }
        if !biomes.is_land_signed(x, y) {
            break WalkOutcome::LeftLand;
        }
        stamp(mask, biomes, x, y, params.stroke_width);

        let w = (wobble.sample(x as f64 * 0.3, y as f64 * 0.3) - 0.5) * params.wobble;
        x = (x + step_sign(dx as f32 + w)).clamp(0, max_x);
        y = (y + step_sign(dy as f32 + w * 0.5)).clamp(0, max_y);
        steps += 1;
    };

    PathWalk { start, end, steps, outcome }
}

/// Draw endpoint pairs and walk a path between every valid pair.
pub fn generate_paths<R: Rng>(
    biomes: &BiomeMap,
    wobble: &NoiseField,
    params: &PathParams,
    rng: &mut R,
) -> PathNetwork {
    let width = biomes.width();
    let height = biomes.height();
    let mut network = PathNetwork::empty(width, height);
    let offset = params.max_offset.max(1);

    for _ in 0..params.attempts {
        let x1 = sample_coord(rng, width, params.margin) as i32;
        let y1 = sample_coord(rng, height, params.margin) as i32;
        let x2 = x1 + rng.gen_range(-offset..offset);
        let y2 = y1 + rng.gen_range(-offset..offset);
        if !biomes.is_land_signed(x1, y1) || !biomes.is_land_signed(x2, y2) {
            continue;
        }

        let walk = walk_path((x1, y1), (x2, y2), biomes, wobble, params, &mut network.mask);
        debug!("path {:?} -> {:?}: {} steps, {:?}", walk.start, walk.end, walk.steps, walk.outcome);
        network.walks.push(walk);
    }

    info!(
        "paths: {} walks, {} path tiles",
        network.walks.len(),
        network.tile_count()
    );
    network
}
