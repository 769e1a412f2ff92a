//! Tiled world renderer library
//!
//! Derives terrain features from a tile world and rasterizes overview and
//! close-up images. Re-exports modules for use by binaries and tools.

pub mod analysis;
pub mod canvas;
pub mod color;
pub mod compositor;
pub mod config;
pub mod distance;
pub mod elevation;
pub mod error;
pub mod export;
pub mod hydrology;
pub mod noise_field;
pub mod palette;
pub mod paths;
pub mod png;
pub mod render;
pub mod seeds;
pub mod sprites;
pub mod tilemap;
pub mod world;

pub use analysis::{TerrainAnalysis, TerrainStats};
pub use compositor::Compositor;
pub use config::RenderConfig;
pub use error::{EncodeError, WorldError};
pub use seeds::SeedStream;
pub use world::WorldGrid;
