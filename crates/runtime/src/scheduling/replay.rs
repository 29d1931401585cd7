use glam::Vec3;
use nav_core::MovementMode;

use super::CancellationScope;

/// Outcome of polling a [`ReverseReplay`].
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayPoll {
    /// Still waiting for the delay to elapse or the hold to lift.
    Pending,
    /// Start following `waypoints` now.
    Ready {
        waypoints: Vec<Vec3>,
        mode: MovementMode,
    },
    /// The scope was cancelled; drop the replay without further effect.
    Aborted,
}

/// Deferred replay of a finished path in reverse order.
///
/// The delay counts down in simulation time. Once it has elapsed the replay
/// additionally waits for any movement hold to be lifted.
#[derive(Debug, Clone)]
pub struct ReverseReplay {
    waypoints: Vec<Vec3>,
    mode: MovementMode,
    remaining: f32,
    scope: CancellationScope,
}

impl ReverseReplay {
    pub fn new(
        waypoints: Vec<Vec3>,
        mode: MovementMode,
        delay: f32,
        scope: CancellationScope,
    ) -> Self {
        Self {
            waypoints,
            mode,
            remaining: delay.max(0.0),
            scope,
        }
    }

    pub fn poll(&mut self, delta_time: f32, on_hold: bool) -> ReplayPoll {
        if self.scope.is_cancelled() {
            return ReplayPoll::Aborted;
        }

        self.remaining = (self.remaining - delta_time).max(0.0);
        if self.remaining > 0.0 || on_hold {
            return ReplayPoll::Pending;
        }

        ReplayPoll::Ready {
            waypoints: std::mem::take(&mut self.waypoints),
            mode: self.mode,
        }
    }
}
