//! Snapping actors onto the grid outside of regular stepping.
use glam::Vec3;

use crate::env::{ActorProfile, SpawnBehaviour, TilemapOracle};
use crate::state::{Layer, TilePosition};

/// Initial world position of an actor entering the scene.
///
/// Unless the actor holds its authored position, a walkable spawn tile lends
/// its height and a blocked one is swapped for its nearest walkable neighbour.
pub fn spawn_position(tilemap: &dyn TilemapOracle, actor: &ActorProfile) -> Vec3 {
    let raw = actor.spawn_position;
    let layer = actor.spawn_layer;
    if actor.spawn_behaviour == SpawnBehaviour::Hold {
        return raw;
    }

    match tilemap.tile(raw, layer) {
        Some(tile) if tile.is_walkable() => Vec3::new(raw.x, tile.height, raw.z),
        Some(_) => {
            let tile = tilemap.tile_position(raw, layer);
            tilemap
                .adjacent_walkable_tile(tile, layer)
                .map_or(raw, |nearest| tilemap.world_position(nearest, layer))
        }
        None => raw,
    }
}

/// World position of `tile`, switching `layer` to the adjacent one when only
/// that layer contains the tile.
pub fn place_on_tile(tilemap: &dyn TilemapOracle, layer: &mut Layer, tile: TilePosition) -> Vec3 {
    if tilemap.layer_count() > 1 {
        let next = layer.adjacent();
        if !tilemap.contains(tile, *layer) && tilemap.contains(tile, next) {
            tracing::debug!(%tile, from = %layer, to = %next, "tile only exists on adjacent layer");
            *layer = next;
        }
    }
    tilemap.world_position(tile, *layer)
}

/// Tile under the horizontal world coordinates `(x, z)`, looked up on `layer`
/// first and on the adjacent layer second.
pub fn resolve_world_tile(
    tilemap: &dyn TilemapOracle,
    layer: Layer,
    x: f32,
    z: f32,
) -> Option<TilePosition> {
    let position = Vec3::new(x, 0.0, z);
    let tile = tilemap.tile_position(position, layer);
    if tilemap.contains(tile, layer) {
        return Some(tile);
    }

    if tilemap.layer_count() <= 1 {
        return None;
    }
    let next = layer.adjacent();
    let tile = tilemap.tile_position(position, next);
    tilemap.contains(tile, next).then_some(tile)
}
