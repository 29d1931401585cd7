//! Shared fixtures for the runtime integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use glam::Vec3;
use nav_core::{ActorId, ActorProfile, ActorRig, BodyProfile, Layer, TilePosition};
use nav_runtime::{
    ControllerEnv, Event, EventBus, GridTilemap, MovementController, MovementEvent, ScriptEvent,
};
use tokio::sync::broadcast;

pub const DT: f32 = 0.05;

/// Rig that remembers every action it was asked to play.
#[derive(Clone, Default)]
pub struct RecordingRig {
    current: Option<String>,
    actions: Arc<Mutex<Vec<String>>>,
    body: BodyProfile,
}

impl RecordingRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: BodyProfile) -> Self {
        self.body = body;
        self
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().expect("rig lock").clone()
    }

    pub fn last_action(&self) -> Option<String> {
        self.actions.lock().expect("rig lock").last().cloned()
    }
}

impl ActorRig for RecordingRig {
    fn perform_action(&mut self, action: &str) {
        self.current = Some(action.to_owned());
        self.actions.lock().expect("rig lock").push(action.to_owned());
    }

    fn current_action(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn body(&self) -> BodyProfile {
        self.body
    }
}

pub fn tile_center(x: i32, y: i32) -> Vec3 {
    Vec3::new(x as f32 + 0.5, 0.0, y as f32 + 0.5)
}

/// Main actor standing at the centre of `tile` on the ground layer.
pub fn actor_at(id: u32, tile: TilePosition) -> ActorProfile {
    ActorProfile::new(ActorId(id))
        .main()
        .spawn_at(tile_center(tile.x, tile.y), Layer::GROUND)
}

pub fn controller(
    map: GridTilemap,
    actor: ActorProfile,
    events: &EventBus,
) -> (MovementController, RecordingRig) {
    let rig = RecordingRig::new();
    let env = ControllerEnv::new(Arc::new(map), events.clone()).with_seed(7);
    let controller = MovementController::new(actor, Box::new(rig.clone()), env);
    (controller, rig)
}

/// Ticks until `done` holds, letting planner threads finish in between.
/// Returns the number of ticks taken.
pub fn tick_until(
    controller: &mut MovementController,
    max_ticks: usize,
    mut done: impl FnMut(&MovementController) -> bool,
) -> usize {
    for ticks in 0..max_ticks {
        if done(controller) {
            return ticks;
        }
        if controller.is_planning() {
            std::thread::sleep(Duration::from_millis(1));
        }
        controller.tick(DT);
    }
    panic!("condition not reached within {max_ticks} ticks");
}

pub fn drain_movement(rx: &mut broadcast::Receiver<Event>) -> Vec<MovementEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::Movement(event) = event {
            events.push(event);
        }
    }
    events
}

pub fn drain_script(rx: &mut broadcast::Receiver<Event>) -> Vec<ScriptEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Event::Script(event) = event {
            events.push(event);
        }
    }
    events
}

pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    Vec3::new(a.x - b.x, 0.0, a.z - b.z).length()
}

/// Square platform, four units wide, that tests can slide around.
pub struct SlidingPlatform {
    position: Mutex<Vec3>,
    surface_height: f32,
}

impl SlidingPlatform {
    pub fn new(position: Vec3, surface_height: f32) -> Self {
        Self {
            position: Mutex::new(position),
            surface_height,
        }
    }

    pub fn move_by(&self, offset: Vec3) {
        *self.position.lock().expect("platform lock") += offset;
    }
}

impl nav_core::Collider for SlidingPlatform {
    fn contains_point(&self, point: Vec3) -> bool {
        let center = nav_core::StandingPlatform::position(self);
        (point.x - center.x).abs() <= 2.0
            && (point.z - center.z).abs() <= 2.0
            && (point.y - self.surface_height).abs() <= 0.5
    }
}

impl nav_core::StandingPlatform for SlidingPlatform {
    fn position(&self) -> Vec3 {
        *self.position.lock().expect("platform lock")
    }

    fn surface_height(&self) -> f32 {
        self.surface_height
    }
}
