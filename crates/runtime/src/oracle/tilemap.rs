//! Layered grid served through [`nav_core::TilemapOracle`].
use std::collections::HashSet;

use glam::{Vec2, Vec3};
use nav_content::{LayerSpec, TilemapSpec};
use nav_core::{Direction, Layer, NavTile, TilePosition, TilemapOracle};
use pathfinding::prelude::astar;
use strum::IntoEnumIterator;

const STRAIGHT_COST: u32 = 10;
const DIAGONAL_COST: u32 = 14;

/// One navigation layer: a dense row-major grid anchored at `origin`.
#[derive(Debug, Clone)]
pub struct GridLayer {
    width: i32,
    height: i32,
    origin: Vec2,
    tile_size: f32,
    tiles: Vec<NavTile>,
    portals: HashSet<TilePosition>,
}

impl GridLayer {
    /// Flat, fully walkable layer with unit tiles anchored at the world origin.
    pub fn flat(width: u32, height: u32, terrain_height: f32) -> Self {
        Self::from_spec(&LayerSpec::flat(width, height, terrain_height))
    }

    pub fn from_spec(spec: &LayerSpec) -> Self {
        Self {
            width: spec.width() as i32,
            height: spec.height_in_tiles() as i32,
            origin: Vec2::new(spec.origin.0, spec.origin.1),
            tile_size: spec.tile_size,
            tiles: spec.dense_tiles(),
            portals: spec.portal_tiles(),
        }
    }

    pub fn with_origin(mut self, origin: Vec2) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_tile(mut self, tile: TilePosition, nav: NavTile) -> Self {
        if let Some(index) = self.index(tile) {
            self.tiles[index] = nav;
        }
        self
    }

    pub fn with_obstacle(self, tile: TilePosition) -> Self {
        let height = self.get(tile).map_or(0.0, |nav| nav.height);
        self.with_tile(tile, NavTile::obstacle(height))
    }

    pub fn with_portal(mut self, tile: TilePosition) -> Self {
        self.portals.insert(tile);
        self
    }

    pub fn contains(&self, tile: TilePosition) -> bool {
        self.index(tile).is_some()
    }

    pub fn get(&self, tile: TilePosition) -> Option<NavTile> {
        self.index(tile).map(|index| self.tiles[index])
    }

    fn index(&self, tile: TilePosition) -> Option<usize> {
        (tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height)
            .then(|| (tile.y * self.width + tile.x) as usize)
    }

    fn tile_position(&self, position: Vec3) -> TilePosition {
        TilePosition::new(
            ((position.x - self.origin.x) / self.tile_size).floor() as i32,
            ((position.z - self.origin.y) / self.tile_size).floor() as i32,
        )
    }

    fn world_position(&self, tile: TilePosition) -> Vec3 {
        let height = self.get(tile).map_or(0.0, |nav| nav.height);
        Vec3::new(
            self.origin.x + (tile.x as f32 + 0.5) * self.tile_size,
            height,
            self.origin.y + (tile.y as f32 + 0.5) * self.tile_size,
        )
    }

    fn is_walkable(&self, tile: TilePosition) -> bool {
        self.get(tile).is_some_and(|nav| nav.is_walkable())
    }
}

/// Immutable layered navigation grid.
///
/// Read-only after construction, so the simulation task and any number of
/// planner threads can share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct GridTilemap {
    layers: Vec<GridLayer>,
}

impl GridTilemap {
    pub fn new(layers: Vec<GridLayer>) -> Self {
        Self { layers }
    }

    pub fn from_spec(spec: &TilemapSpec) -> Self {
        Self::new(spec.layers.iter().map(GridLayer::from_spec).collect())
    }

    /// Single flat layer, handy for tools and tests.
    pub fn flat(width: u32, height: u32) -> Self {
        Self::new(vec![GridLayer::flat(width, height, 0.0)])
    }

    fn layer(&self, layer: Layer) -> Option<&GridLayer> {
        self.layers.get(layer.index())
    }
}

impl TilemapOracle for GridTilemap {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn tile(&self, position: Vec3, layer: Layer) -> Option<NavTile> {
        let grid = self.layer(layer)?;
        grid.get(grid.tile_position(position))
    }

    fn tile_position(&self, position: Vec3, layer: Layer) -> TilePosition {
        match self.layer(layer) {
            Some(grid) => grid.tile_position(position),
            None => TilePosition::new(position.x.floor() as i32, position.z.floor() as i32),
        }
    }

    fn world_position(&self, tile: TilePosition, layer: Layer) -> Vec3 {
        match self.layer(layer) {
            Some(grid) => grid.world_position(tile),
            None => Vec3::new(tile.x as f32 + 0.5, 0.0, tile.y as f32 + 0.5),
        }
    }

    fn contains(&self, tile: TilePosition, layer: Layer) -> bool {
        self.layer(layer).is_some_and(|grid| grid.contains(tile))
    }

    /// Prefers straight neighbours over diagonal ones, then the tile farthest
    /// from any obstacle.
    fn adjacent_walkable_tile(&self, tile: TilePosition, layer: Layer) -> Option<TilePosition> {
        let grid = self.layer(layer)?;
        Direction::iter()
            .filter_map(|direction| {
                let neighbour = direction.neighbour_of(tile);
                let nav = grid.get(neighbour).filter(|nav| nav.is_walkable())?;
                Some((direction.is_diagonal(), nav.distance_to_nearest_obstacle, neighbour))
            })
            .min_by_key(|&(diagonal, distance, _)| (diagonal, std::cmp::Reverse(distance)))
            .map(|(_, _, neighbour)| neighbour)
    }

    fn is_inside_portal_area(&self, tile: TilePosition, layer: Layer) -> bool {
        self.layer(layer)
            .is_some_and(|grid| grid.portals.contains(&tile))
    }

    fn find_path(
        &self,
        from: TilePosition,
        to: TilePosition,
        layer: Layer,
        obstacles: &HashSet<TilePosition>,
    ) -> Vec<TilePosition> {
        let Some(grid) = self.layer(layer) else {
            return Vec::new();
        };
        if !grid.is_walkable(to) {
            return Vec::new();
        }
        if from == to {
            return vec![to];
        }

        let passable =
            |tile: TilePosition| grid.is_walkable(tile) && (tile == to || !obstacles.contains(&tile));

        let result = astar(
            &from,
            |&tile| {
                Direction::iter()
                    .filter_map(|direction| {
                        let next = direction.neighbour_of(tile);
                        if !passable(next) {
                            return None;
                        }
                        if direction.is_diagonal() {
                            // No corner cutting between two blocked straight neighbours.
                            let (dx, dy) = direction.delta();
                            if !passable(tile.offset(dx, 0)) || !passable(tile.offset(0, dy)) {
                                return None;
                            }
                            return Some((next, DIAGONAL_COST));
                        }
                        Some((next, STRAIGHT_COST))
                    })
                    .collect::<Vec<_>>()
            },
            |&tile| octile_distance(tile, to),
            |&tile| tile == to,
        );

        match result {
            Some((tiles, _cost)) => tiles.into_iter().skip(1).collect(),
            None => Vec::new(),
        }
    }
}

fn octile_distance(a: TilePosition, b: TilePosition) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    STRAIGHT_COST * dx.max(dy) + (DIAGONAL_COST - STRAIGHT_COST) * dx.min(dy)
}
