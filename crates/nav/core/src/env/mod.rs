//! Capabilities the navigation rules consume but do not own.
//!
//! The tilemap, the physics world, and the actor's animation rig live outside
//! this crate. They are reached only through the traits declared here so the
//! rules can be exercised against small fixtures.
mod actor;
mod physics;
mod tilemap;

pub use actor::{ActionNames, ActorProfile, ActorRig, SpawnBehaviour};
pub use physics::{BodyKind, BodyProfile, Collider, ColliderId, StandingPlatform};
pub use tilemap::{Direction, NavTile, NoObstacles, ObstacleOracle, TilemapOracle};
