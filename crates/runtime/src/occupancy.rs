//! Tiles held by active actors, shared with path planning.
use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use nav_core::{ActorId, Layer, ObstacleOracle, TilePosition};

/// Last known tile of every active actor.
///
/// The navigation worker writes after each tick; controllers read it when a
/// planning request is captured.
#[derive(Debug, Default)]
pub struct ActorOccupancy {
    tiles: RwLock<HashMap<ActorId, (Layer, TilePosition)>>,
}

impl ActorOccupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, actor: ActorId, layer: Layer, tile: TilePosition) {
        self.tiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(actor, (layer, tile));
    }

    pub fn remove(&self, actor: ActorId) {
        self.tiles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&actor);
    }

    pub fn len(&self) -> usize {
        self.tiles.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObstacleOracle for ActorOccupancy {
    fn blocking_tiles(&self, layer: Layer, excluded: &[ActorId]) -> HashSet<TilePosition> {
        self.tiles
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(actor, (on_layer, _))| *on_layer == layer && !excluded.contains(actor))
            .map(|(_, (_, tile))| *tile)
            .collect()
    }
}
