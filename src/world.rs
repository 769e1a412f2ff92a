//! World description consumed by the renderer.
//!
//! A `WorldGrid` is produced upstream (blueprint generation, tile assignment,
//! structure placement) and persisted as JSON. The renderer only reads it.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::tilemap::Tilemap;

/// Categorical terrain type of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Ocean,
    Beach,
    Grassland,
    Forest,
    Desert,
    Mountain,
    Tundra,
    Swamp,
}

impl Biome {
    pub fn all() -> &'static [Biome] {
        &[
            Biome::Ocean,
            Biome::Beach,
            Biome::Grassland,
            Biome::Forest,
            Biome::Desert,
            Biome::Mountain,
            Biome::Tundra,
            Biome::Swamp,
        ]
    }

    pub fn is_ocean(&self) -> bool {
        matches!(self, Biome::Ocean)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Beach => "Beach",
            Biome::Grassland => "Grassland",
            Biome::Forest => "Forest",
            Biome::Desert => "Desert",
            Biome::Mountain => "Mountain",
            Biome::Tundra => "Tundra",
            Biome::Swamp => "Swamp",
        }
    }
}

/// One entry of the tile definition table. Terrain and decoration ids both
/// resolve through this table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileDef {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub biome: Biome,
    #[serde(default)]
    pub walkable: bool,
    #[serde(default)]
    pub variant: Option<u8>,
}

/// A multi-tile structure anchored at its top-left tile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    #[serde(rename = "type")]
    pub kind: String,
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_structure_w")]
    pub w: i32,
    #[serde(default = "default_structure_h")]
    pub h: i32,
    #[serde(default)]
    pub variant: usize,
}

fn default_structure_w() -> i32 {
    4
}

fn default_structure_h() -> i32 {
    3
}

impl Structure {
    pub fn is_house(&self) -> bool {
        self.kind == "house"
    }

    /// Center of the footprint in tile units.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.w as f32 / 2.0,
            self.y as f32 + self.h as f32 / 2.0,
        )
    }
}

/// Tint applied to decorations when a world carries no `decoTints`.
pub const NEUTRAL_TINT: u8 = 4;

/// The tile-based world to render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldGrid {
    pub width: usize,
    pub height: usize,
    pub terrain: Vec<u32>,
    pub decorations: Vec<u32>,
    pub tile_defs: Vec<TileDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structures: Option<Vec<Structure>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deco_tints: Option<Vec<u8>>,
}

impl WorldGrid {
    /// Parse and validate a JSON world description.
    pub fn from_json_str(json: &str) -> Result<Self, WorldError> {
        let world: WorldGrid =
            serde_json::from_str(json).map_err(|e| WorldError::Parse(e.to_string()))?;
        world.validate()?;
        Ok(world)
    }

    /// Read, parse and validate a world description file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, WorldError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| WorldError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Check array lengths against the declared dimensions. Must pass before
    /// any derived grid is computed.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::EmptyWorld {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self
            .width
            .checked_mul(self.height)
            .ok_or(WorldError::TooLarge { width: self.width, height: self.height })?;
        check_len("terrain", expected, self.terrain.len())?;
        check_len("decorations", expected, self.decorations.len())?;
        if let Some(tints) = &self.deco_tints {
            check_len("decoTints", expected, tints.len())?;
        }
        Ok(())
    }

    pub fn tile_count(&self) -> usize {
        self.width * self.height
    }

    pub fn structures(&self) -> &[Structure] {
        self.structures.as_deref().unwrap_or(&[])
    }

    pub fn decoration_at(&self, x: usize, y: usize) -> u32 {
        self.decorations[y * self.width + x]
    }

    pub fn tint_at(&self, x: usize, y: usize) -> u8 {
        self.deco_tints
            .as_ref()
            .map(|t| t[y * self.width + x])
            .unwrap_or(NEUTRAL_TINT)
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), WorldError> {
    if expected != actual {
        return Err(WorldError::LengthMismatch { field, expected, actual });
    }
    Ok(())
}

/// Tile definitions indexed by id.
#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    defs: HashMap<u32, TileDef>,
}

impl TileRegistry {
    pub fn new(defs: &[TileDef]) -> Self {
        Self {
            defs: defs.iter().map(|d| (d.id, d.clone())).collect(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&TileDef> {
        self.defs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Per-tile biome, resolved once from `terrain` through the tile definitions.
///
/// A tile whose id has no definition holds `None`: it is never land, never
/// ocean, and renders as the missing-definition sentinel.
#[derive(Clone, Debug)]
pub struct BiomeMap {
    biomes: Tilemap<Option<Biome>>,
}

impl BiomeMap {
    pub fn from_world(world: &WorldGrid, registry: &TileRegistry) -> Self {
        let mut biomes = Tilemap::new_with(world.width, world.height, None);
        for (x, y, slot) in biomes.iter_mut() {
            let id = world.terrain[y * world.width + x];
            *slot = registry.get(id).map(|d| d.biome);
        }
        Self { biomes }
    }

    /// Build directly from a biome grid (synthetic worlds, tests).
    pub fn from_tilemap(biomes: Tilemap<Option<Biome>>) -> Self {
        Self { biomes }
    }

    pub fn width(&self) -> usize {
        self.biomes.width
    }

    pub fn height(&self) -> usize {
        self.biomes.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Biome> {
        *self.biomes.get(x, y)
    }

    /// Biome at a signed coordinate; `None` when out of bounds or undefined.
    pub fn get_signed(&self, x: i32, y: i32) -> Option<Biome> {
        self.biomes.get_signed(x, y).copied().flatten()
    }

    /// Defined and not ocean.
    pub fn is_land(&self, x: usize, y: usize) -> bool {
        matches!(self.get(x, y), Some(b) if !b.is_ocean())
    }

    pub fn is_land_signed(&self, x: i32, y: i32) -> bool {
        matches!(self.get_signed(x, y), Some(b) if !b.is_ocean())
    }

    pub fn is_ocean_signed(&self, x: i32, y: i32) -> bool {
        matches!(self.get_signed(x, y), Some(Biome::Ocean))
    }

    pub fn tilemap(&self) -> &Tilemap<Option<Biome>> {
        &self.biomes
    }

    pub fn land_count(&self) -> usize {
        self.biomes.count(|b| matches!(b, Some(b) if !b.is_ocean()))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_parse_camel_case_world() {
        let json = r#"{
            "width": 2, "height": 1,
            "terrain": [1, 2],
            "decorations": [0, 7],
            "tileDefs": [
                {"id": 1, "name": "water", "biome": "ocean", "walkable": false},
                {"id": 2, "name": "sand", "biome": "beach", "walkable": true, "variant": 2},
                {"id": 7, "name": "deco_rock_small", "biome": "beach", "walkable": false}
            ],
            "structures": [{"type": "house", "x": 0, "y": 0, "w": 4, "h": 3, "variant": 1}],
            "decoTints": [4, 6]
        }"#;
        let world = WorldGrid::from_json_str(json).unwrap();
        assert_eq!(world.tile_defs[1].variant, Some(2));
        assert_eq!(world.structures().len(), 1);
        assert!(world.structures()[0].is_house());
        assert_eq!(world.tint_at(1, 0), 6);
    }

    #[test]
    fn test_missing_array_is_parse_error() {
        let json = r#"{"width": 1, "height": 1, "terrain": [1], "tileDefs": []}"#;
        assert!(matches!(WorldGrid::from_json_str(json), Err(WorldError::Parse(_))));
    }

    #[test]
    fn test_length_mismatch_fails_fast() {
        let mut world = world_from_fn(4, 4, |_, _| Biome::Grassland);
        world.terrain.pop();
        assert_eq!(
            world.validate(),
            Err(WorldError::LengthMismatch { field: "terrain", expected: 16, actual: 15 })
        );

        let mut world = world_from_fn(4, 4, |_, _| Biome::Grassland);
        world.deco_tints = Some(vec![4; 3]);
        assert!(matches!(
            world.validate(),
            Err(WorldError::LengthMismatch { field: "decoTints", .. })
        ));
    }

    #[test]
    fn test_empty_world_rejected() {
        let world = world_from_fn(0, 5, |_, _| Biome::Ocean);
        assert!(matches!(world.validate(), Err(WorldError::EmptyWorld { .. })));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let json = r#"{
            "width": 4294967296, "height": 4294967296,
            "terrain": [], "decorations": [], "tileDefs": []
        }"#;
        assert_eq!(
            WorldGrid::from_json_str(json).unwrap_err(),
            WorldError::TooLarge { width: 4294967296, height: 4294967296 }
        );
    }

    #[test]
    fn test_biome_map_unknown_id_is_none() {
        let mut world = world_from_fn(3, 1, |_, _| Biome::Forest);
        world.terrain[1] = 999;
        let registry = TileRegistry::new(&world.tile_defs);
        let biomes = BiomeMap::from_world(&world, &registry);

        assert_eq!(biomes.get(0, 0), Some(Biome::Forest));
        assert_eq!(biomes.get(1, 0), None);
        assert!(!biomes.is_land(1, 0));
        assert!(!biomes.is_ocean_signed(1, 0));
        assert_eq!(biomes.land_count(), 2);
    }
}
