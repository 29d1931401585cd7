//! Navigation rules shared by the movement runtime and developer tooling.
//!
//! `nav-core` defines the pure, synchronous half of actor movement: grid and
//! layer identifiers, the [`Path`] an actor follows, the capability traits
//! through which the tilemap and physics world are consulted, and the
//! per-tick algorithms ([`movement::move_towards`],
//! [`movement::can_goto_position`], collision recovery, platform
//! co-movement). Nothing here spawns threads or talks to channels; the
//! runtime crate drives these functions from its controller.
pub mod config;
pub mod env;
pub mod error;
pub mod geometry;
pub mod movement;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use config::MovementConfig;
pub use env::{
    ActionNames, ActorProfile, ActorRig, BodyKind, BodyProfile, Collider, ColliderId, Direction,
    NavTile, NoObstacles, ObstacleOracle, SpawnBehaviour, StandingPlatform, TilemapOracle,
};
pub use error::{ErrorSeverity, NavError, NavigationError};
pub use movement::{MovementContext, MovementResult};
pub use state::{
    ActorId, ContactTracker, EndOfPathAction, Layer, MovementMode, NavigationState, Path,
    TilePosition, Transform,
};
