use glam::Vec3;

use super::physics::BodyProfile;
use crate::state::{ActorId, Layer, MovementMode};

/// How an actor is placed when it enters the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SpawnBehaviour {
    /// Snap onto the walkable grid.
    #[default]
    Default,
    /// Keep the authored position verbatim.
    Hold,
}

/// Names of the animation actions the controller triggers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionNames {
    pub idle: String,
    pub walk: String,
    pub run: String,
    pub backward: String,
}

impl Default for ActionNames {
    fn default() -> Self {
        Self {
            idle: "idle".to_owned(),
            walk: "walk".to_owned(),
            run: "run".to_owned(),
            backward: "step-back".to_owned(),
        }
    }
}

/// Static description of an actor, referenced but never mutated by movement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorProfile {
    pub id: ActorId,
    /// Speed attribute; zero or negative means "use the mode default".
    pub speed: f32,
    /// Primary (player-controlled) actors move at full speed.
    pub is_main: bool,
    pub spawn_position: Vec3,
    pub spawn_layer: Layer,
    pub spawn_behaviour: SpawnBehaviour,
    pub actions: ActionNames,
}

impl ActorProfile {
    pub fn new(id: ActorId) -> Self {
        Self {
            id,
            speed: 0.0,
            is_main: false,
            spawn_position: Vec3::ZERO,
            spawn_layer: Layer::GROUND,
            spawn_behaviour: SpawnBehaviour::Default,
            actions: ActionNames::default(),
        }
    }

    pub fn main(mut self) -> Self {
        self.is_main = true;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn spawn_at(mut self, position: Vec3, layer: Layer) -> Self {
        self.spawn_position = position;
        self.spawn_layer = layer;
        self
    }

    pub fn with_spawn_behaviour(mut self, behaviour: SpawnBehaviour) -> Self {
        self.spawn_behaviour = behaviour;
        self
    }

    pub fn idle_action(&self) -> &str {
        &self.actions.idle
    }

    pub fn movement_action(&self, mode: MovementMode) -> &str {
        match mode {
            MovementMode::Walk => &self.actions.walk,
            MovementMode::Run => &self.actions.run,
            MovementMode::Backward => &self.actions.backward,
        }
    }
}

/// Animation and rigid-body side of an actor, owned by the scene.
pub trait ActorRig: Send {
    fn perform_action(&mut self, action: &str);

    /// Action currently playing, if any.
    fn current_action(&self) -> Option<&str>;

    fn body(&self) -> BodyProfile;

    /// Zeroes the rigid body's velocity after a collision ends.
    fn reset_velocity(&mut self) {}
}
