//! Per-tick movement rules.
//!
//! Every function here is synchronous and works on a borrowed
//! [`NavigationState`](crate::NavigationState); the runtime controller calls
//! them in a fixed order each tick:
//!
//! 1. [`resolve_collision_recovery`]
//! 2. [`move_towards`] for the current waypoint
//! 3. [`sync_platform_co_movement`]
mod placement;
mod recovery;
mod resolver;
mod walkability;

pub use placement::{place_on_tile, resolve_world_tile, spawn_position};
pub use recovery::{
    enter_platform, exit_platform, record_collision_enter, record_collision_exit,
    resolve_collision_recovery, sync_platform_co_movement,
};
pub use resolver::move_towards;
pub use walkability::{can_goto_position, is_near_portal_area};

use crate::config::MovementConfig;
use crate::env::{ActorProfile, BodyProfile, TilemapOracle};

/// Read-only collaborators a movement step consults.
#[derive(Clone, Copy)]
pub struct MovementContext<'a> {
    pub tilemap: &'a dyn TilemapOracle,
    pub config: &'a MovementConfig,
    pub actor: &'a ActorProfile,
    pub body: BodyProfile,
}

impl<'a> MovementContext<'a> {
    pub fn new(
        tilemap: &'a dyn TilemapOracle,
        config: &'a MovementConfig,
        actor: &'a ActorProfile,
        body: BodyProfile,
    ) -> Self {
        Self {
            tilemap,
            config,
            actor,
            body,
        }
    }
}

/// Outcome of a single [`move_towards`] step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementResult {
    /// The actor moved (or turned) but has not reached the target yet.
    InProgress,
    /// The walkability rules rejected the step; the actor did not move.
    Blocked,
    /// The actor is within the arrival radius of the target.
    Completed,
}
