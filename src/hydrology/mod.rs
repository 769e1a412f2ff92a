//! Derived surface water: rivers traced downhill and lakes filled in basins.
//!
//! Both produce masks that the compositor reads; neither modifies elevation.

pub mod lakes;
pub mod rivers;

pub use lakes::{flood_basin, generate_lakes, BasinFill, LakeBasin, LakeSet};
pub use rivers::{find_sources, generate_rivers, trace_river, RiverEnd, RiverNetwork, RiverTrace};

use rand::Rng;

/// Pick a coordinate along one axis, keeping `margin` tiles away from both
/// edges when the axis is long enough to allow it.
pub(crate) fn sample_coord<R: Rng>(rng: &mut R, extent: usize, margin: usize) -> usize {
    if extent > margin * 2 {
        rng.gen_range(margin..extent - margin)
    } else {
        rng.gen_range(0..extent)
    }
}
