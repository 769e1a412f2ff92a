//! Render configuration.
//!
//! Every tunable constant of the pipeline lives here with its default. A JSON
//! file may override any subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Frequency and octave count of one named noise field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    pub frequency: f64,
    pub octaves: u32,
}

impl NoiseSpec {
    pub const fn new(frequency: f64, octaves: u32) -> Self {
        Self { frequency, octaves }
    }
}

/// Parameters of every named noise field the pipeline samples.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Palette shade selection on land
    pub color: NoiseSpec,
    /// Per-tile elevation
    pub elevation: NoiseSpec,
    /// Fine brightness jitter
    pub detail: NoiseSpec,
    /// Biome edge blend weight
    pub blend: NoiseSpec,
    /// Shoreline foam
    pub foam: NoiseSpec,
    /// Water surface texture and near-shore wave bands
    pub wave: NoiseSpec,
    /// Drifting cloud shadows
    pub cloud: NoiseSpec,
    /// Ground cover density in close-ups
    pub grass: NoiseSpec,
    /// River meander bias
    pub river: NoiseSpec,
    /// Path wobble
    pub path: NoiseSpec,
    /// Lake likelihood gate and lake shade
    pub lake: NoiseSpec,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            color: NoiseSpec::new(0.035, 5),
            elevation: NoiseSpec::new(0.012, 6),
            detail: NoiseSpec::new(0.18, 3),
            blend: NoiseSpec::new(0.06, 3),
            foam: NoiseSpec::new(0.2, 2),
            wave: NoiseSpec::new(0.08, 3),
            cloud: NoiseSpec::new(0.008, 4),
            grass: NoiseSpec::new(0.25, 2),
            river: NoiseSpec::new(0.03, 3),
            path: NoiseSpec::new(0.05, 3),
            lake: NoiseSpec::new(0.025, 4),
        }
    }
}

/// Elevation-derived terrain parameters (hillshade, cliffs, snow, distance).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Multiplier applied to central differences before computing slope
    pub hillshade_gain: f32,
    /// Light azimuth in degrees (315 = north-west)
    pub light_azimuth: f32,
    /// Light altitude in degrees above the horizon
    pub light_altitude: f32,
    /// Brightness offset and scale applied to the raw lighting term
    pub shade_offset: f32,
    pub shade_scale: f32,
    /// Clamp range of the multiplicative shade factor
    pub shade_min: f32,
    pub shade_max: f32,
    /// Raw slope magnitude above which a land tile is a cliff
    pub cliff_threshold: f32,
    /// Slope per cliff intensity class
    pub cliff_step: f32,
    /// Elevation above which tiles blend toward snow
    pub snow_threshold: f32,
    /// Elevation span over which snow coverage ramps to full
    pub snow_ramp: f32,
    /// Maximum blend factor toward snow
    pub snow_strength: f32,
    /// BFS radius cap of the distance-to-land grid
    pub distance_cap: i16,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            hillshade_gain: 5.0,
            light_azimuth: 315.0,
            light_altitude: 40.0,
            shade_offset: 0.5,
            shade_scale: 0.9,
            shade_min: 0.5,
            shade_max: 1.4,
            cliff_threshold: 0.06,
            cliff_step: 0.03,
            snow_threshold: 0.76,
            snow_ramp: 0.12,
            snow_strength: 0.75,
            distance_cap: 25,
        }
    }
}

/// River tracing parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverParams {
    /// Random candidate points drawn when looking for sources
    pub candidate_attempts: usize,
    /// Candidates must sit strictly above this elevation
    pub source_elevation: f32,
    /// Highest candidates kept as sources
    pub max_sources: usize,
    /// Step budget of a single trace
    pub max_steps: usize,
    /// Largest width class a river can reach
    pub max_width: u8,
    /// Steps walked per width class increase
    pub steps_per_width: usize,
    /// Strength of the noise-driven meander bias
    pub meander_strength: f32,
    /// Candidates keep this distance from the grid edge
    pub margin: usize,
}

impl Default for RiverParams {
    fn default() -> Self {
        Self {
            candidate_attempts: 2000,
            source_elevation: 0.55,
            max_sources: 80,
            max_steps: 2000,
            max_width: 4,
            steps_per_width: 60,
            meander_strength: 0.02,
            margin: 20,
        }
    }
}

/// Lake basin parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeParams {
    pub candidate_attempts: usize,
    /// Elevation band a basin center must fall within
    pub min_elevation: f32,
    pub max_elevation: f32,
    /// Candidates whose lake-noise sample exceeds this are rejected
    pub likelihood_gate: f32,
    /// A neighbor joins the fill if its elevation <= source + threshold
    pub fill_threshold: f32,
    /// Committed basins hold between `min_size` and `max_size` tiles
    pub min_size: usize,
    pub max_size: usize,
    pub margin: usize,
}

impl Default for LakeParams {
    fn default() -> Self {
        Self {
            candidate_attempts: 300,
            min_elevation: 0.2,
            max_elevation: 0.45,
            likelihood_gate: 0.45,
            fill_threshold: 0.015,
            min_size: 8,
            max_size: 80,
            margin: 20,
        }
    }
}

/// Dirt path parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathParams {
    pub attempts: usize,
    /// Endpoint offset range (each axis) from the start point
    pub max_offset: i32,
    pub max_steps: usize,
    /// Amplitude of the wobble added to the step direction
    pub wobble: f32,
    /// Tiles stamped per step (1 or 2)
    pub stroke_width: u8,
    pub margin: usize,
}

impl Default for PathParams {
    fn default() -> Self {
        Self {
            attempts: 40,
            max_offset: 60,
            max_steps: 500,
            wobble: 3.0,
            stroke_width: 2,
            margin: 50,
        }
    }
}

/// Visual style of the compositor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Noise-selected shades, hillshading, smooth biome blending
    #[default]
    Shaded,
    /// Hash-picked flat tile colors with dithered biome borders
    Flat,
}

impl std::str::FromStr for RenderStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shaded" => Ok(RenderStyle::Shaded),
            "flat" => Ok(RenderStyle::Flat),
            other => Err(format!("unknown render style `{}` (expected shaded or flat)", other)),
        }
    }
}

impl std::fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderStyle::Shaded => write!(f, "shaded"),
            RenderStyle::Flat => write!(f, "flat"),
        }
    }
}

/// Independently toggleable compositor stages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageToggles {
    pub lakes: bool,
    pub rivers: bool,
    pub paths: bool,
    pub hillshade: bool,
    pub detail: bool,
    pub snow: bool,
    pub cliffs: bool,
    pub biome_blend: bool,
    pub biome_effects: bool,
    pub cloud_shadow: bool,
    /// Foam, wave bands and sand particles on the ocean
    pub ocean_details: bool,
}

impl Default for StageToggles {
    fn default() -> Self {
        Self {
            lakes: true,
            rivers: true,
            paths: true,
            hillshade: true,
            detail: true,
            snow: true,
            cliffs: true,
            biome_blend: true,
            biome_effects: true,
            cloud_shadow: true,
            ocean_details: true,
        }
    }
}

/// Compositor parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    pub style: RenderStyle,
    pub stages: StageToggles,
    /// Offset of the ring sampled for biome edge blending
    pub blend_radius: i32,
    /// Maximum blend factor toward neighboring biomes
    pub blend_max: f32,
    /// Distance at which the ocean reaches its deepest band
    pub ocean_depth_span: f32,
    /// Foam noise threshold on tiles at distance <= 1
    pub foam_threshold: f32,
    /// Wave noise threshold inside the near-shore band
    pub wave_band_threshold: f32,
    /// Cloud noise above this darkens the ground
    pub cloud_threshold: f32,
    /// Amplitude of the land detail jitter (channel units)
    pub detail_amplitude: f32,
    /// Blend factor toward the path color
    pub path_strength: f32,
    /// Flat style: chance in tenths that a border tile shows its neighbor
    pub dither_tenths: u32,
    /// Flat style: elevation above which tiles are snow
    pub flat_snow_threshold: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            style: RenderStyle::Shaded,
            stages: StageToggles::default(),
            blend_radius: 6,
            blend_max: 0.4,
            ocean_depth_span: 22.0,
            foam_threshold: 0.38,
            wave_band_threshold: 0.62,
            cloud_threshold: 0.6,
            detail_amplitude: 14.0,
            path_strength: 0.6,
            dither_tenths: 3,
            flat_snow_threshold: 0.78,
        }
    }
}

/// Output image parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Tiles per overview pixel along each axis
    pub overview_scale: usize,
    /// Close-up crop size in tiles
    pub closeup_width: usize,
    pub closeup_height: usize,
    /// Pixels per tile in the close-up
    pub tile_px: usize,
    /// Random crop centers scored when no crop origin is given
    pub crop_search_attempts: usize,
    /// Half-size and stride of the sparse window scored per candidate
    pub crop_search_radius: i32,
    pub crop_search_stride: usize,
    /// Grass tufts on grassland, forest and swamp tiles
    pub ground_cover: bool,
    /// Orange markers at structure positions on the overview
    pub structure_markers: bool,
    /// Blend factor toward decoration colors on shaded overviews
    pub overview_decoration_tint: f32,
    /// Composite terrain rows on the rayon pool
    pub parallel: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            overview_scale: 2,
            closeup_width: 80,
            closeup_height: 50,
            tile_px: 16,
            crop_search_attempts: 1000,
            crop_search_radius: 25,
            crop_search_stride: 4,
            ground_cover: true,
            structure_markers: true,
            overview_decoration_tint: 0.2,
            parallel: false,
        }
    }
}

/// Complete configuration of one render invocation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub noise: NoiseConfig,
    pub terrain: TerrainParams,
    pub rivers: RiverParams,
    pub lakes: LakeParams,
    pub paths: PathParams,
    pub compositor: CompositorConfig,
    pub view: ViewConfig,
}

impl RenderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        serde_json::from_str(json).map_err(|e| WorldError::Parse(e.to_string()))
    }

    /// Load a configuration file. Fields absent from the file keep defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| WorldError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }
}
