//! Waypoint sequence followed by a single actor.
use glam::Vec3;

/// Locomotion style used while following a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementMode {
    #[default]
    Walk = 0,
    Run = 1,
    Backward = 2,
}

/// Movement mode code outside `0..=2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown movement mode code {0}")]
pub struct UnknownMovementMode(pub i32);

impl TryFrom<i32> for MovementMode {
    type Error = UnknownMovementMode;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Walk),
            1 => Ok(Self::Run),
            2 => Ok(Self::Backward),
            other => Err(UnknownMovementMode(other)),
        }
    }
}

/// What happens once the last waypoint is reached (or the path is blocked).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndOfPathAction {
    /// Stop and play the idle action.
    #[default]
    Idle,
    /// Ask the owner to deactivate the actor.
    DisposeSelf,
    /// Wait a random delay, then walk the same waypoints in reverse.
    WaitAndReverse,
}

/// Ordered waypoints plus a cursor into them.
///
/// The cursor always lies in `[0, len]`; the path is exhausted once it reaches
/// `len` or when there are no waypoints at all.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    waypoints: Vec<Vec3>,
    cursor: usize,
    mode: MovementMode,
    end_of_path_action: EndOfPathAction,
    ignore_obstacle: bool,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole path and rewinds the cursor.
    pub fn set(
        &mut self,
        waypoints: Vec<Vec3>,
        mode: MovementMode,
        end_of_path_action: EndOfPathAction,
        ignore_obstacle: bool,
    ) {
        self.waypoints = waypoints;
        self.cursor = 0;
        self.mode = mode;
        self.end_of_path_action = end_of_path_action;
        self.ignore_obstacle = ignore_obstacle;
    }

    /// Drops all waypoints. Mode and end-of-path policy are kept so callers can
    /// still ask how the actor was last moving.
    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.cursor = 0;
    }

    pub fn is_end_of_path(&self) -> bool {
        self.waypoints.is_empty() || self.cursor >= self.waypoints.len()
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.waypoints.get(self.cursor).copied()
    }

    /// Advances the cursor. Returns `false` once the path is exhausted; calling
    /// it again at the end leaves the cursor where it is.
    pub fn move_to_next_waypoint(&mut self) -> bool {
        if self.cursor < self.waypoints.len() {
            self.cursor += 1;
        }
        !self.is_end_of_path()
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    /// Waypoints in travel order reversed, for replaying the path backwards.
    pub fn reversed_waypoints(&self) -> Vec<Vec3> {
        self.waypoints.iter().rev().copied().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn end_of_path_action(&self) -> EndOfPathAction {
        self.end_of_path_action
    }

    pub fn ignore_obstacle(&self) -> bool {
        self.ignore_obstacle
    }
}
