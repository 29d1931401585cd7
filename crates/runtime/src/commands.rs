//! Movement commands accepted by actor controllers.
use nav_core::{ActorId, Layer, MovementMode, TilePosition};
use serde::{Deserialize, Serialize};

/// Every command is addressed to one actor; controllers ignore the rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementCommand {
    /// Snap onto a tile, falling back to the adjacent layer when only that
    /// layer contains it.
    SetTilePosition { actor: ActorId, tile: TilePosition },

    /// Snap onto the tile under world `(x, z)`.
    SetWorldPosition { actor: ActorId, x: f32, z: f32 },

    /// Plan a route to a tile and follow it; the script waits until arrival.
    PathTo {
        actor: ActorId,
        tile: TilePosition,
        mode: MovementMode,
    },

    /// Plan a walking route but play a custom action instead of walking.
    WalkToUsingAction {
        actor: ActorId,
        tile: TilePosition,
        action: String,
    },

    /// Head straight for a tile, respecting obstacles.
    MoveTo {
        actor: ActorId,
        tile: TilePosition,
        mode: MovementMode,
    },

    /// Step back along the current facing by `distance` world units.
    MoveBackward { actor: ActorId, distance: f32 },

    /// Leave the scene through a tile, then deactivate. Walks straight there
    /// when no route exists.
    MoveOutOfScreen {
        actor: ActorId,
        tile: TilePosition,
        mode: MovementMode,
    },

    StopAndStand { actor: ActorId },

    SetNavLayer { actor: ActorId, layer: Layer },

    Activate { actor: ActorId, active: bool },
}

impl MovementCommand {
    pub fn actor(&self) -> ActorId {
        match self {
            Self::SetTilePosition { actor, .. }
            | Self::SetWorldPosition { actor, .. }
            | Self::PathTo { actor, .. }
            | Self::WalkToUsingAction { actor, .. }
            | Self::MoveTo { actor, .. }
            | Self::MoveBackward { actor, .. }
            | Self::MoveOutOfScreen { actor, .. }
            | Self::StopAndStand { actor }
            | Self::SetNavLayer { actor, .. }
            | Self::Activate { actor, .. } => *actor,
        }
    }
}
