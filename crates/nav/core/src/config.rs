use crate::state::MovementMode;

/// Movement tuning values and tolerances.
///
/// Defaults match the values the walkability and resolver rules were tuned
/// against; loaders may override any subset of them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Walk speed in world units per second when the actor has no speed attribute.
    pub walk_speed: f32,
    /// Run speed in world units per second when the actor has no speed attribute.
    pub run_speed: f32,
    /// Divisor converting an actor's speed attribute to world units per second.
    pub speed_attribute_divisor: f32,
    /// Multiplier applied to actors that are not the primary (player-controlled) actor.
    pub secondary_actor_speed_factor: f32,
    /// Largest height change accepted between the tentative and resolved position.
    pub max_height_step: f32,
    /// Largest height gap accepted when stepping onto the adjacent layer.
    pub max_height_step_cross_layer: f32,
    /// Largest height gap accepted when stepping onto a standing platform.
    pub max_height_step_cross_platform: f32,
    /// Facing rotation speed in degrees per second.
    pub rotation_speed: f32,
    /// Horizontal distance on both axes under which a waypoint counts as reached.
    pub arrival_radius: f32,
    /// Lower bound (inclusive) of the wait before a reversed path replays.
    pub reverse_delay_min: f32,
    /// Upper bound (exclusive) of the wait before a reversed path replays.
    pub reverse_delay_max: f32,
}

impl MovementConfig {
    pub const DEFAULT_WALK_SPEED: f32 = 5.0;
    pub const DEFAULT_RUN_SPEED: f32 = 11.0;
    pub const DEFAULT_SPEED_ATTRIBUTE_DIVISOR: f32 = 11.0;
    pub const DEFAULT_SECONDARY_ACTOR_SPEED_FACTOR: f32 = 0.5;
    pub const DEFAULT_MAX_HEIGHT_STEP: f32 = 2.0;
    pub const DEFAULT_MAX_HEIGHT_STEP_CROSS_LAYER: f32 = 2.0;
    pub const DEFAULT_MAX_HEIGHT_STEP_CROSS_PLATFORM: f32 = 1.5;
    pub const DEFAULT_ROTATION_SPEED: f32 = 20.0;
    pub const DEFAULT_ARRIVAL_RADIUS: f32 = 0.05;
    pub const DEFAULT_REVERSE_DELAY_MIN: f32 = 3.0;
    pub const DEFAULT_REVERSE_DELAY_MAX: f32 = 8.0;

    pub fn new() -> Self {
        Self {
            walk_speed: Self::DEFAULT_WALK_SPEED,
            run_speed: Self::DEFAULT_RUN_SPEED,
            speed_attribute_divisor: Self::DEFAULT_SPEED_ATTRIBUTE_DIVISOR,
            secondary_actor_speed_factor: Self::DEFAULT_SECONDARY_ACTOR_SPEED_FACTOR,
            max_height_step: Self::DEFAULT_MAX_HEIGHT_STEP,
            max_height_step_cross_layer: Self::DEFAULT_MAX_HEIGHT_STEP_CROSS_LAYER,
            max_height_step_cross_platform: Self::DEFAULT_MAX_HEIGHT_STEP_CROSS_PLATFORM,
            rotation_speed: Self::DEFAULT_ROTATION_SPEED,
            arrival_radius: Self::DEFAULT_ARRIVAL_RADIUS,
            reverse_delay_min: Self::DEFAULT_REVERSE_DELAY_MIN,
            reverse_delay_max: Self::DEFAULT_REVERSE_DELAY_MAX,
        }
    }

    /// Step speed in world units per second.
    ///
    /// A positive `speed_attribute` wins over the mode defaults; secondary
    /// actors move at a fraction of that speed.
    pub fn step_speed(&self, speed_attribute: f32, is_main_actor: bool, mode: MovementMode) -> f32 {
        let speed = if speed_attribute <= 0.0 {
            match mode {
                MovementMode::Run => self.run_speed,
                MovementMode::Walk | MovementMode::Backward => self.walk_speed,
            }
        } else {
            speed_attribute / self.speed_attribute_divisor
        };

        if is_main_actor {
            speed
        } else {
            speed * self.secondary_actor_speed_factor
        }
    }

    /// Maximum facing change in radians for a tick of `delta_time` seconds.
    pub fn max_rotation_step(&self, delta_time: f32) -> f32 {
        self.rotation_speed.to_radians() * delta_time
    }

    /// Clamped `[min, max)` range for the wait-and-reverse delay.
    pub fn reverse_delay_range(&self) -> (f32, f32) {
        let min = self.reverse_delay_min.max(0.0);
        (min, self.reverse_delay_max.max(min))
    }
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self::new()
    }
}
