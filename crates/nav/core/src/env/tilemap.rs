use std::collections::HashSet;

use glam::Vec3;

use crate::state::{ActorId, Layer, TilePosition};

/// Navigation data of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavTile {
    /// Terrain height in world units.
    pub height: f32,
    /// Distance in tiles to the closest obstacle; zero means the tile is an obstacle.
    pub distance_to_nearest_obstacle: u8,
}

impl NavTile {
    pub const fn new(height: f32, distance_to_nearest_obstacle: u8) -> Self {
        Self {
            height,
            distance_to_nearest_obstacle,
        }
    }

    pub const fn walkable(height: f32) -> Self {
        Self::new(height, u8::MAX)
    }

    pub const fn obstacle(height: f32) -> Self {
        Self::new(height, 0)
    }

    pub const fn is_walkable(&self) -> bool {
        self.distance_to_nearest_obstacle > 0
    }
}

/// Read-only layered walkability grid.
///
/// Implementations must tolerate concurrent readers: the path planner queries
/// [`find_path`](Self::find_path) from a worker thread while the simulation
/// thread keeps resolving steps against the same map.
pub trait TilemapOracle: Send + Sync {
    fn layer_count(&self) -> usize;

    /// Tile under a world position, if the position falls inside the layer.
    fn tile(&self, position: Vec3, layer: Layer) -> Option<NavTile>;

    fn tile_position(&self, position: Vec3, layer: Layer) -> TilePosition;

    /// Centre of `tile` in world space, at the tile's terrain height.
    fn world_position(&self, tile: TilePosition, layer: Layer) -> Vec3;

    fn contains(&self, tile: TilePosition, layer: Layer) -> bool;

    /// Nearest walkable tile among the neighbours of `tile`.
    fn adjacent_walkable_tile(&self, tile: TilePosition, layer: Layer) -> Option<TilePosition>;

    /// True for tiles flagged as inter-layer transition zones.
    fn is_inside_portal_area(&self, tile: TilePosition, layer: Layer) -> bool;

    /// Tiles to walk from `from` to `to`, excluding `from`. Empty when unreachable.
    fn find_path(
        &self,
        from: TilePosition,
        to: TilePosition,
        layer: Layer,
        obstacles: &HashSet<TilePosition>,
    ) -> Vec<TilePosition>;
}

/// Supplies tiles currently blocked by other actors.
pub trait ObstacleOracle: Send + Sync {
    /// Tiles occupied on `layer` by any active actor not listed in `excluded`.
    fn blocking_tiles(&self, layer: Layer, excluded: &[ActorId]) -> HashSet<TilePosition>;
}

/// No actor ever blocks a tile.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObstacles;

impl ObstacleOracle for NoObstacles {
    fn blocking_tiles(&self, _layer: Layer, _excluded: &[ActorId]) -> HashSet<TilePosition> {
        HashSet::new()
    }
}

/// The eight compass neighbours of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    pub const fn neighbour_of(self, tile: TilePosition) -> TilePosition {
        let (dx, dy) = self.delta();
        tile.offset(dx, dy)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn compass_covers_all_neighbours_once() {
        let neighbours: HashSet<_> = Direction::iter()
            .map(|direction| direction.neighbour_of(TilePosition::ORIGIN))
            .collect();

        assert_eq!(neighbours.len(), 8);
        assert!(!neighbours.contains(&TilePosition::ORIGIN));
        assert_eq!(Direction::iter().filter(|d| d.is_diagonal()).count(), 4);
    }
}
