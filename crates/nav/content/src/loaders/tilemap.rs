//! Layered walkability grid loader.
//!
//! A scene's navigation data is a list of layers, each a dense grid of tiles.
//! The RON file only spells out what differs from the layer defaults:
//!
//! ```ron
//! (
//!     layers: [
//!         (
//!             dimensions: (16, 12),
//!             origin: (-8.0, -6.0),
//!             height: 0.0,
//!             tiles: [(3, 4, 0.5, 2)],
//!             obstacles: [(5, 5), (5, 6)],
//!             portals: [(15, 0)],
//!         ),
//!     ],
//! )
//! ```

use std::collections::HashSet;
use std::path::Path;

use nav_core::{NavTile, TilePosition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Whole navigation map of a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilemapSpec {
    pub layers: Vec<LayerSpec>,
}

/// One navigation layer as written in the RON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Width and height in tiles.
    pub dimensions: (u32, u32),
    /// World `(x, z)` of the corner of tile `(0, 0)`.
    #[serde(default)]
    pub origin: (f32, f32),
    #[serde(default = "LayerSpec::default_tile_size")]
    pub tile_size: f32,
    /// Terrain height of every tile not listed in `tiles`.
    #[serde(default)]
    pub height: f32,
    /// Explicit tiles: `(x, y, height, distance_to_nearest_obstacle)`.
    #[serde(default)]
    pub tiles: Vec<(i32, i32, f32, u8)>,
    /// Shorthand for tiles with a zero obstacle distance at the layer height.
    #[serde(default)]
    pub obstacles: Vec<(i32, i32)>,
    /// Inter-layer transition tiles.
    #[serde(default)]
    pub portals: Vec<(i32, i32)>,
}

impl LayerSpec {
    const DEFAULT_TILE_SIZE: f32 = 1.0;

    fn default_tile_size() -> f32 {
        Self::DEFAULT_TILE_SIZE
    }

    /// Flat, fully walkable layer.
    pub fn flat(width: u32, height: u32, terrain_height: f32) -> Self {
        Self {
            dimensions: (width, height),
            origin: (0.0, 0.0),
            tile_size: Self::DEFAULT_TILE_SIZE,
            height: terrain_height,
            tiles: Vec::new(),
            obstacles: Vec::new(),
            portals: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    pub fn height_in_tiles(&self) -> u32 {
        self.dimensions.1
    }

    pub fn contains(&self, tile: TilePosition) -> bool {
        tile.x >= 0
            && tile.y >= 0
            && (tile.x as u32) < self.width()
            && (tile.y as u32) < self.height_in_tiles()
    }

    /// Row-major tile grid with overrides applied. Obstacles win over explicit
    /// tiles listed at the same position.
    pub fn dense_tiles(&self) -> Vec<NavTile> {
        let width = self.width() as usize;
        let mut tiles =
            vec![NavTile::walkable(self.height); width * self.height_in_tiles() as usize];

        for &(x, y, height, distance) in &self.tiles {
            let tile = TilePosition::new(x, y);
            if self.contains(tile) {
                tiles[y as usize * width + x as usize] = NavTile::new(height, distance);
            }
        }
        for &(x, y) in &self.obstacles {
            let tile = TilePosition::new(x, y);
            if self.contains(tile) {
                let index = y as usize * width + x as usize;
                tiles[index].distance_to_nearest_obstacle = 0;
            }
        }
        tiles
    }

    pub fn portal_tiles(&self) -> HashSet<TilePosition> {
        self.portals
            .iter()
            .map(|&(x, y)| TilePosition::new(x, y))
            .collect()
    }

    fn validate(&self, index: usize) -> LoadResult<()> {
        if self.width() == 0 || self.height_in_tiles() == 0 {
            anyhow::bail!("layer {} has empty dimensions {:?}", index, self.dimensions);
        }
        if self.tile_size.is_nan() || self.tile_size <= 0.0 {
            anyhow::bail!("layer {} has non-positive tile size {}", index, self.tile_size);
        }

        let listed = self
            .tiles
            .iter()
            .map(|&(x, y, _, _)| (x, y))
            .chain(self.obstacles.iter().copied())
            .chain(self.portals.iter().copied());
        for (x, y) in listed {
            if !self.contains(TilePosition::new(x, y)) {
                anyhow::bail!(
                    "layer {} lists tile ({}, {}) outside its {}x{} grid",
                    index,
                    x,
                    y,
                    self.width(),
                    self.height_in_tiles()
                );
            }
        }
        Ok(())
    }
}

/// Loader for navigation grids from RON files.
pub struct TilemapLoader;

impl TilemapLoader {
    /// Load and validate a tilemap from a RON file.
    pub fn load(path: &Path) -> LoadResult<TilemapSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse and validate a tilemap from RON text.
    pub fn parse(content: &str) -> LoadResult<TilemapSpec> {
        let spec: TilemapSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tilemap RON: {}", e))?;

        if spec.layers.is_empty() {
            anyhow::bail!("tilemap defines no layers");
        }
        for (index, layer) in spec.layers.iter().enumerate() {
            layer.validate(index)?;
        }
        Ok(spec)
    }
}
