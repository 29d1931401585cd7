//! In-crate fixtures for exercising the movement rules.
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use glam::Vec3;
use strum::IntoEnumIterator;

use crate::env::{Collider, Direction, NavTile, StandingPlatform, TilemapOracle};
use crate::state::{Layer, TilePosition};

struct FixtureLayer {
    width: i32,
    height: i32,
    tiles: Vec<NavTile>,
    portals: HashSet<TilePosition>,
}

impl FixtureLayer {
    fn flat(width: i32, height: i32, terrain_height: f32) -> Self {
        Self {
            width,
            height,
            tiles: vec![NavTile::walkable(terrain_height); (width * height) as usize],
            portals: HashSet::new(),
        }
    }

    fn index(&self, tile: TilePosition) -> Option<usize> {
        (tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height)
            .then(|| (tile.y * self.width + tile.x) as usize)
    }

    fn get(&self, tile: TilePosition) -> Option<NavTile> {
        self.index(tile).map(|index| self.tiles[index])
    }
}

/// Unit-sized tiles with the grid origin at world `(0, 0)`; tile `(x, y)`
/// spans world `x..x+1` on X and `y..y+1` on Z.
pub struct FixtureTilemap {
    layers: Vec<FixtureLayer>,
}

impl FixtureTilemap {
    pub fn flat(width: i32, height: i32, terrain_height: f32) -> Self {
        Self {
            layers: vec![FixtureLayer::flat(width, height, terrain_height)],
        }
    }

    /// Adds a layer the size of the first one.
    pub fn with_layer(self, terrain_height: f32) -> Self {
        let (width, height) = (self.layers[0].width, self.layers[0].height);
        self.with_sized_layer(width, height, terrain_height)
    }

    pub fn with_sized_layer(mut self, width: i32, height: i32, terrain_height: f32) -> Self {
        self.layers
            .push(FixtureLayer::flat(width, height, terrain_height));
        self
    }

    pub fn block(mut self, layer: Layer, tile: TilePosition) -> Self {
        self.update(layer, tile, |nav| nav.distance_to_nearest_obstacle = 0);
        self
    }

    pub fn with_height(mut self, layer: Layer, tile: TilePosition, terrain_height: f32) -> Self {
        self.update(layer, tile, |nav| nav.height = terrain_height);
        self
    }

    pub fn portal(mut self, layer: Layer, tile: TilePosition) -> Self {
        self.layers[layer.index()].portals.insert(tile);
        self
    }

    pub fn center(&self, tile: TilePosition, layer: Layer) -> Vec3 {
        self.world_position(tile, layer)
    }

    fn update(&mut self, layer: Layer, tile: TilePosition, edit: impl FnOnce(&mut NavTile)) {
        let grid = &mut self.layers[layer.index()];
        let index = grid.index(tile).expect("fixture tile inside the layer");
        edit(&mut grid.tiles[index]);
    }

    fn layer(&self, layer: Layer) -> Option<&FixtureLayer> {
        self.layers.get(layer.index())
    }

    fn is_passable(&self, tile: TilePosition, layer: Layer) -> bool {
        self.layer(layer)
            .and_then(|grid| grid.get(tile))
            .is_some_and(|nav| nav.is_walkable())
    }
}

impl TilemapOracle for FixtureTilemap {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn tile(&self, position: Vec3, layer: Layer) -> Option<NavTile> {
        let tile = self.tile_position(position, layer);
        self.layer(layer)?.get(tile)
    }

    fn tile_position(&self, position: Vec3, _layer: Layer) -> TilePosition {
        TilePosition::new(position.x.floor() as i32, position.z.floor() as i32)
    }

    fn world_position(&self, tile: TilePosition, layer: Layer) -> Vec3 {
        let height = self
            .layer(layer)
            .and_then(|grid| grid.get(tile))
            .map_or(0.0, |nav| nav.height);
        Vec3::new(tile.x as f32 + 0.5, height, tile.y as f32 + 0.5)
    }

    fn contains(&self, tile: TilePosition, layer: Layer) -> bool {
        self.layer(layer)
            .is_some_and(|grid| grid.index(tile).is_some())
    }

    fn adjacent_walkable_tile(&self, tile: TilePosition, layer: Layer) -> Option<TilePosition> {
        Direction::iter()
            .map(|direction| direction.neighbour_of(tile))
            .find(|neighbour| self.is_passable(*neighbour, layer))
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
        let mut parents = HashMap::from([(from, from)]);
        let mut frontier = VecDeque::from([from]);
        while let Some(tile) = frontier.pop_front() {
            if tile == to {
                break;
            }
            for next in Direction::iter().map(|direction| direction.neighbour_of(tile)) {
                let open = next == to || !obstacles.contains(&next);
                if open && self.is_passable(next, layer) && !parents.contains_key(&next) {
                    parents.insert(next, tile);
                    frontier.push_back(next);
                }
            }
        }

        if !parents.contains_key(&to) || from == to {
            return Vec::new();
        }
        let mut path = vec![to];
        let mut cursor = to;
        while let Some(&parent) = parents.get(&cursor) {
            if parent == from {
                break;
            }
            path.push(parent);
            cursor = parent;
        }
        path.reverse();
        path
    }
}

/// Axis-aligned cube.
pub struct BoxCollider {
    min: Vec3,
    max: Vec3,
}

impl BoxCollider {
    pub fn around(center: Vec3, half_extent: f32) -> Self {
        Self {
            min: center - Vec3::splat(half_extent),
            max: center + Vec3::splat(half_extent),
        }
    }
}

impl Collider for BoxCollider {
    fn contains_point(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Square platform, four units wide, that tests can slide around.
pub struct MovingPlatform {
    position: Mutex<Vec3>,
    surface_height: f32,
}

impl MovingPlatform {
    const HALF_WIDTH: f32 = 2.0;

    pub fn new(position: Vec3, surface_height: f32) -> Self {
        Self {
            position: Mutex::new(position),
            surface_height,
        }
    }

    pub fn move_by(&self, offset: Vec3) {
        *self.position.lock().expect("platform lock") += offset;
    }
}

impl Collider for MovingPlatform {
    fn contains_point(&self, point: Vec3) -> bool {
        let center = self.position();
        (point.x - center.x).abs() <= Self::HALF_WIDTH
            && (point.z - center.z).abs() <= Self::HALF_WIDTH
            && (point.y - self.surface_height).abs() <= 0.5
    }
}

impl StandingPlatform for MovingPlatform {
    fn position(&self) -> Vec3 {
        *self.position.lock().expect("platform lock")
    }

    fn surface_height(&self) -> f32 {
        self.surface_height
    }
}
