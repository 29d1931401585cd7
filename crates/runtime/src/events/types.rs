//! Event types for different topics.

use glam::Vec3;
use nav_core::{ActorId, Layer};
use serde::{Deserialize, Serialize};

use crate::scheduling::ScriptWaiter;

/// How a followed path ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathOutcome {
    /// The last waypoint was reached.
    Completed,
    /// A step was rejected by the walkability rules.
    Blocked,
}

/// Events describing an actor's movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MovementEvent {
    /// A path was installed and the actor started following it.
    PathStarted {
        actor: ActorId,
        waypoints: usize,
        ignore_obstacle: bool,
    },

    /// The waypoint at `index` was reached.
    WaypointReached { actor: ActorId, index: usize },

    /// The path ended and its end-of-path action ran.
    PathFinished { actor: ActorId, outcome: PathOutcome },

    /// The actor stepped onto another navigation layer.
    LayerChanged {
        actor: ActorId,
        from: Layer,
        to: Layer,
    },

    /// The actor's world position changed during a tick or command.
    PositionChanged { actor: ActorId, position: Vec3 },
}

impl MovementEvent {
    pub fn actor(&self) -> ActorId {
        match self {
            Self::PathStarted { actor, .. }
            | Self::WaypointReached { actor, .. }
            | Self::PathFinished { actor, .. }
            | Self::LayerChanged { actor, .. }
            | Self::PositionChanged { actor, .. } => *actor,
        }
    }
}

/// Requests addressed to the script runner and actor lifecycle.
#[derive(Debug, Clone)]
pub enum ScriptEvent {
    /// The running script should block until `waiter` is released.
    WaitRequested { actor: ActorId, waiter: ScriptWaiter },

    /// The actor finished a dispose-self path and should be deactivated.
    DeactivateRequested { actor: ActorId },
}
