//! Per-actor movement controller.
//!
//! The controller owns an actor's [`Path`] and navigation state, reacts to
//! [`MovementCommand`]s and advances the actor once per [`tick`]. A tick runs
//! three phases in a fixed order:
//!
//! 1. collision recovery (the physics-phase correction for dynamic bodies),
//! 2. path advancement (planner results, reverse replays, direct moves and
//!    regular waypoint following),
//! 3. standing-platform co-movement.
//!
//! Background work (path planning threads, wait-and-reverse replays) never
//! touches the controller directly; it is polled here and consumed on the
//! simulation task.
//!
//! [`tick`]: MovementController::tick
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use glam::Vec3;
use nav_core::movement::{self, MovementContext, MovementResult};
use nav_core::{
    ActorId, ActorProfile, ActorRig, Collider, ColliderId, EndOfPathAction, Layer,
    MovementConfig, MovementMode, NavigationError, NavigationState, NoObstacles, ObstacleOracle,
    Path, StandingPlatform, TilePosition, TilemapOracle, Transform,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::commands::MovementCommand;
use crate::events::{EventBus, MovementEvent, PathOutcome, ScriptEvent};
use crate::planner::{PathPlanner, PendingPlan, PlanPoll, PlanRequest};
use crate::scheduling::{CancellationScope, ReplayPoll, ReverseReplay, ScriptWaiter};

/// Shared collaborators handed to every controller of a scene.
#[derive(Clone)]
pub struct ControllerEnv {
    pub tilemap: Arc<dyn TilemapOracle>,
    pub obstacles: Arc<dyn ObstacleOracle>,
    pub config: Arc<MovementConfig>,
    pub events: EventBus,
    /// Seed for the wait-and-reverse delay; entropy when unset.
    pub rng_seed: Option<u64>,
}

impl ControllerEnv {
    pub fn new(tilemap: Arc<dyn TilemapOracle>, events: EventBus) -> Self {
        Self {
            tilemap,
            obstacles: Arc::new(NoObstacles),
            config: Arc::new(MovementConfig::default()),
            events,
            rng_seed: None,
        }
    }

    pub fn with_obstacles(mut self, obstacles: Arc<dyn ObstacleOracle>) -> Self {
        self.obstacles = obstacles;
        self
    }

    pub fn with_config(mut self, config: Arc<MovementConfig>) -> Self {
        self.config = config;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }
}

/// Point-in-time view of a controller, cheap to send across tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub actor: ActorId,
    pub position: Vec3,
    pub forward: Vec3,
    pub layer: Layer,
    pub tile: TilePosition,
    pub moving: bool,
    pub on_hold: bool,
    pub planning: bool,
    pub active: bool,
    pub remaining_waypoints: usize,
}

pub struct MovementController {
    actor: ActorProfile,
    rig: Box<dyn ActorRig>,
    tilemap: Arc<dyn TilemapOracle>,
    obstacles: Arc<dyn ObstacleOracle>,
    config: Arc<MovementConfig>,
    planner: PathPlanner,
    events: EventBus,

    state: NavigationState,
    path: Path,
    on_hold: bool,
    active: bool,

    waiter: Option<ScriptWaiter>,
    scope: CancellationScope,
    pending_plan: Option<PendingPlan>,
    replay: Option<ReverseReplay>,
    direct_move: Option<(Vec3, MovementMode)>,
    rng: StdRng,
}

impl MovementController {
    /// Creates the controller and places the actor at its spawn point.
    pub fn new(actor: ActorProfile, rig: Box<dyn ActorRig>, env: ControllerEnv) -> Self {
        let position = movement::spawn_position(env.tilemap.as_ref(), &actor);
        let state = NavigationState::new(Transform::at(position), actor.spawn_layer);
        let rng = match env.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        debug!(actor = %actor.id, ?position, layer = %actor.spawn_layer, "movement controller ready");

        Self {
            planner: PathPlanner::new(Arc::clone(&env.tilemap)),
            actor,
            rig,
            tilemap: env.tilemap,
            obstacles: env.obstacles,
            config: env.config,
            events: env.events,
            state,
            path: Path::new(),
            on_hold: false,
            active: true,
            waiter: None,
            scope: CancellationScope::new(),
            pending_plan: None,
            replay: None,
            direct_move: None,
            rng,
        }
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Applies a command addressed to this actor.
    ///
    /// Commands for other actors are rejected with
    /// [`NavigationError::MisdirectedCommand`] and leave the controller
    /// untouched. While inactive, everything but re-activation is ignored.
    pub fn handle(&mut self, command: MovementCommand) -> Result<(), NavigationError> {
        let received = command.actor();
        if received != self.actor.id {
            return Err(NavigationError::MisdirectedCommand {
                expected: self.actor.id,
                received,
            });
        }
        if !self.active && !matches!(command, MovementCommand::Activate { active: true, .. }) {
            debug!(actor = %self.actor.id, ?command, "actor inactive, command ignored");
            return Ok(());
        }

        let before = (self.state.position(), self.state.layer);
        let outcome = self.apply(command);
        self.publish_changes(before);
        outcome
    }

    fn apply(&mut self, command: MovementCommand) -> Result<(), NavigationError> {
        match command {
            MovementCommand::SetTilePosition { tile, .. } => self.set_tile_position(tile),
            MovementCommand::SetWorldPosition { x, z, .. } => {
                let layer = self.state.layer;
                let tilemap = self.tilemap.as_ref();
                let tile = movement::resolve_world_tile(tilemap, layer, x, z).ok_or_else(|| {
                    NavigationError::TileOutOfBounds {
                        tile: tilemap.tile_position(Vec3::new(x, 0.0, z), layer),
                        layer,
                    }
                })?;
                self.set_tile_position(tile);
            }
            MovementCommand::PathTo { tile, mode, .. } => {
                self.begin_wait();
                self.request_path(tile, mode, EndOfPathAction::Idle, false, None);
            }
            MovementCommand::WalkToUsingAction { tile, action, .. } => {
                self.begin_wait();
                self.request_path(
                    tile,
                    MovementMode::Walk,
                    EndOfPathAction::Idle,
                    false,
                    Some(action),
                );
            }
            MovementCommand::MoveTo { tile, mode, .. } => {
                let destination = self.tilemap.world_position(tile, self.state.layer);
                self.move_to(destination, mode, false);
            }
            MovementCommand::MoveBackward { distance, .. } => {
                let destination =
                    self.state.position() - self.state.transform.forward() * distance;
                self.move_to(destination, MovementMode::Backward, true);
            }
            MovementCommand::MoveOutOfScreen { tile, mode, .. } => {
                self.begin_wait();
                self.request_path(tile, mode, EndOfPathAction::DisposeSelf, true, None);
            }
            MovementCommand::StopAndStand { .. } => self.stop_and_stand(),
            MovementCommand::SetNavLayer { layer, .. } => self.state.layer = layer,
            MovementCommand::Activate { active, .. } => self.set_active(active),
        }
        Ok(())
    }

    fn set_tile_position(&mut self, tile: TilePosition) {
        self.interrupt();
        let position = movement::place_on_tile(self.tilemap.as_ref(), &mut self.state.layer, tile);
        self.state.transform.position = position;

        if self.rig.current_action().is_some() {
            self.play_idle();
        }
    }

    /// Heads straight for `destination`; the script waits until arrival.
    fn move_to(&mut self, destination: Vec3, mode: MovementMode, ignore_obstacle: bool) {
        self.begin_wait();
        self.interrupt();
        self.set_path(
            vec![destination],
            mode,
            EndOfPathAction::Idle,
            ignore_obstacle,
            None,
        );
    }

    fn stop_and_stand(&mut self) {
        let was_moving = self.is_movement_in_progress() || self.direct_move.is_some();
        self.release_waiter();
        self.scope.renew();
        self.interrupt();
        if was_moving {
            self.play_idle();
        }
    }

    fn set_active(&mut self, active: bool) {
        if active == self.active {
            return;
        }
        if !active {
            self.release_waiter();
            self.scope.renew();
            self.interrupt();
            self.state.contacts.clear();
        }
        self.active = active;
        debug!(actor = %self.actor.id, active, "activation changed");
    }

    // ========================================================================
    // Path setup
    // ========================================================================

    /// Drops the current path and every piece of pending movement work.
    fn interrupt(&mut self) {
        self.path.clear();
        self.pending_plan = None;
        self.replay = None;
        self.direct_move = None;
    }

    fn request_path(
        &mut self,
        to: TilePosition,
        mode: MovementMode,
        end_of_path_action: EndOfPathAction,
        fallback_to_direct: bool,
        action: Option<String>,
    ) {
        self.interrupt();

        let layer = self.state.layer;
        let request = PlanRequest {
            actor: self.actor.id,
            from: self.tilemap.tile_position(self.state.position(), layer),
            to,
            layer,
            obstacles: self.obstacles.blocking_tiles(layer, &[self.actor.id]),
            mode,
            end_of_path_action,
            fallback_to_direct,
            action,
            scope: self.scope.clone(),
        };

        match self.planner.spawn(request) {
            Ok(pending) => self.pending_plan = Some(pending),
            Err(error) => {
                error!(actor = %self.actor.id, %error, "failed to start path planning");
                self.release_waiter();
            }
        }
    }

    /// Installs a path and starts its locomotion action (or `action`).
    pub fn set_path(
        &mut self,
        waypoints: Vec<Vec3>,
        mode: MovementMode,
        end_of_path_action: EndOfPathAction,
        ignore_obstacle: bool,
        action: Option<&str>,
    ) {
        let count = waypoints.len();
        self.path
            .set(waypoints, mode, end_of_path_action, ignore_obstacle);
        self.rig
            .perform_action(action.unwrap_or_else(|| self.actor.movement_action(mode)));

        self.events.publish(MovementEvent::PathStarted {
            actor: self.actor.id,
            waypoints: count,
            ignore_obstacle,
        });
    }

    /// Drives `move_towards` with obstacles ignored every tick until the
    /// actor arrives or can go no further, then idles.
    pub fn move_directly_to(&mut self, destination: Vec3, mode: MovementMode) {
        self.interrupt();
        self.direct_move = Some((destination, mode));
        self.rig.perform_action(self.actor.movement_action(mode));
    }

    /// Walks (or runs) to a tapped point, picking the point that belongs to
    /// the actor's layer when it is walkable, then the adjacent layer's point,
    /// then the lowest layer's.
    pub fn move_to_tap_point(&mut self, points: &BTreeMap<Layer, Vec3>, double_tap: bool) {
        let Some(&fallback) = points.values().next() else {
            return;
        };

        let layer = self.state.layer;
        let next = layer.adjacent();
        let on_current_layer = points.get(&layer).copied().filter(|point| {
            self.tilemap
                .tile(*point, layer)
                .is_some_and(|tile| tile.is_walkable())
        });
        let on_next_layer = (next.index() < self.tilemap.layer_count())
            .then(|| points.get(&next).copied())
            .flatten();
        let target = on_current_layer.or(on_next_layer).unwrap_or(fallback);

        let already_running =
            self.is_movement_in_progress() && self.path.mode() == MovementMode::Run;
        let mode = if double_tap || already_running {
            MovementMode::Run
        } else {
            MovementMode::Walk
        };

        self.interrupt();
        self.set_path(vec![target], mode, EndOfPathAction::Idle, false, None);
    }

    /// Teleports onto `position`. Off a platform the target tile must be
    /// walkable; returns whether the actor moved.
    pub fn portal_to_position(&mut self, position: Vec3, layer: Layer, on_platform: bool) -> bool {
        let before = (self.state.position(), self.state.layer);

        let destination = if on_platform {
            warn!(actor = %self.actor.id, ?position, %layer, "portal onto standing platform");
            position
        } else {
            match self.tilemap.tile(position, layer) {
                Some(tile) if tile.is_walkable() => {
                    warn!(
                        actor = %self.actor.id,
                        ?position,
                        %layer,
                        tile = %self.tilemap.tile_position(position, layer),
                        distance_to_obstacle = tile.distance_to_nearest_obstacle,
                        "portal"
                    );
                    Vec3::new(position.x, tile.height, position.z)
                }
                _ => return false,
            }
        };

        self.interrupt();
        self.play_idle();
        self.state.layer = layer;
        self.state.transform.position = destination;
        self.publish_changes(before);
        true
    }

    // ========================================================================
    // Hold
    // ========================================================================

    pub fn pause_movement(&mut self) {
        self.on_hold = true;
        if self.is_movement_in_progress() {
            self.play_idle();
        }
    }

    pub fn resume_movement(&mut self) {
        if !self.on_hold {
            return;
        }
        self.on_hold = false;
        if self.is_movement_in_progress() {
            self.rig
                .perform_action(self.actor.movement_action(self.path.mode()));
        }
    }

    // ========================================================================
    // Physics notifications
    // ========================================================================

    pub fn on_collision_enter(&mut self, id: ColliderId, collider: Weak<dyn Collider>) {
        movement::record_collision_enter(&mut self.state, self.tilemap.as_ref(), id, collider);
    }

    pub fn on_collision_exit(&mut self, id: ColliderId) {
        movement::record_collision_exit(&mut self.state, id);
        if self.rig.body().is_dynamic() {
            self.rig.reset_velocity();
        }
    }

    pub fn on_trigger_enter(&mut self, id: ColliderId, platform: &Arc<dyn StandingPlatform>) {
        movement::enter_platform(&mut self.state, &self.config, id, platform);
    }

    pub fn on_trigger_exit(&mut self, id: ColliderId) {
        movement::exit_platform(&mut self.state, id);
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Runs one simulation step of `delta_time` seconds.
    pub fn tick(&mut self, delta_time: f32) {
        if !self.active {
            return;
        }
        let before = (self.state.position(), self.state.layer);

        movement::resolve_collision_recovery(
            &mut self.state,
            self.tilemap.as_ref(),
            self.rig.body(),
        );
        self.advance_path(delta_time);
        movement::sync_platform_co_movement(&mut self.state);

        self.publish_changes(before);
    }

    fn advance_path(&mut self, delta_time: f32) {
        self.poll_plan();
        self.poll_replay(delta_time);

        if self.drive_direct_move(delta_time) {
            return;
        }
        if self.on_hold {
            return;
        }
        let Some(target) = self.path.current_waypoint() else {
            return;
        };

        let mode = self.path.mode();
        let ignore_obstacle = self.path.ignore_obstacle();
        match self.step_towards(target, mode, ignore_obstacle, delta_time) {
            MovementResult::InProgress => {}
            MovementResult::Blocked => {
                debug!(actor = %self.actor.id, ?target, "path blocked");
                self.reaching_end_of_path(PathOutcome::Blocked);
            }
            MovementResult::Completed => {
                self.events.publish(MovementEvent::WaypointReached {
                    actor: self.actor.id,
                    index: self.path.cursor(),
                });
                if !self.path.move_to_next_waypoint() {
                    self.reaching_end_of_path(PathOutcome::Completed);
                }
            }
        }
    }

    fn step_towards(
        &mut self,
        target: Vec3,
        mode: MovementMode,
        ignore_obstacle: bool,
        delta_time: f32,
    ) -> MovementResult {
        let body = self.rig.body();
        let ctx = MovementContext::new(self.tilemap.as_ref(), &self.config, &self.actor, body);
        movement::move_towards(
            &mut self.state,
            &ctx,
            target,
            mode,
            ignore_obstacle,
            delta_time,
        )
    }

    fn drive_direct_move(&mut self, delta_time: f32) -> bool {
        let Some((target, mode)) = self.direct_move else {
            return false;
        };
        if self.step_towards(target, mode, true, delta_time) != MovementResult::InProgress {
            self.direct_move = None;
            self.play_idle();
        }
        true
    }

    fn poll_plan(&mut self) {
        let poll = match self.pending_plan.as_mut() {
            Some(pending) => pending.poll(),
            None => return,
        };
        if poll == PlanPoll::Pending {
            return;
        }
        let Some(pending) = self.pending_plan.take() else {
            return;
        };

        let request = pending.into_request();
        if request.scope.is_cancelled() {
            debug!(actor = %self.actor.id, "discarding plan from a cancelled scope");
            return;
        }

        match poll {
            PlanPoll::Found(tiles) => {
                let waypoints = tiles
                    .into_iter()
                    .map(|tile| self.tilemap.world_position(tile, request.layer))
                    .collect();
                self.set_path(
                    waypoints,
                    request.mode,
                    request.end_of_path_action,
                    true,
                    request.action.as_deref(),
                );
            }
            PlanPoll::NotFound if request.fallback_to_direct => {
                let destination = self.tilemap.world_position(request.to, request.layer);
                self.set_path(
                    vec![destination],
                    request.mode,
                    request.end_of_path_action,
                    true,
                    request.action.as_deref(),
                );
            }
            PlanPoll::NotFound | PlanPoll::Pending => {
                self.release_waiter();
                let failure = NavigationError::NoPathFound {
                    from: request.from,
                    to: request.to,
                    layer: request.layer,
                };
                error!(actor = %self.actor.id, error = %failure, "path planning failed");
                if self.rig.current_action() != Some(self.actor.idle_action()) {
                    self.play_idle();
                }
            }
        }
    }

    fn poll_replay(&mut self, delta_time: f32) {
        let on_hold = self.on_hold;
        let poll = match self.replay.as_mut() {
            Some(replay) => replay.poll(delta_time, on_hold),
            None => return,
        };

        match poll {
            ReplayPoll::Pending => {}
            ReplayPoll::Aborted => self.replay = None,
            ReplayPoll::Ready { waypoints, mode } => {
                self.replay = None;
                self.set_path(waypoints, mode, EndOfPathAction::WaitAndReverse, true, None);
            }
        }
    }

    fn reaching_end_of_path(&mut self, outcome: PathOutcome) {
        self.release_waiter();

        match self.path.end_of_path_action() {
            EndOfPathAction::DisposeSelf => {
                self.events.publish(ScriptEvent::DeactivateRequested {
                    actor: self.actor.id,
                });
            }
            EndOfPathAction::Idle => self.play_idle(),
            EndOfPathAction::WaitAndReverse => {
                self.play_idle();
                let delay = self.reverse_delay();
                self.replay = Some(ReverseReplay::new(
                    self.path.reversed_waypoints(),
                    self.path.mode(),
                    delay,
                    self.scope.clone(),
                ));
            }
        }

        if self.path.mode() == MovementMode::Backward {
            self.state.transform.flip();
        }

        self.events.publish(MovementEvent::PathFinished {
            actor: self.actor.id,
            outcome,
        });
        self.path.clear();
    }

    fn reverse_delay(&mut self) -> f32 {
        let (min, max) = self.config.reverse_delay_range();
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn begin_wait(&mut self) {
        self.release_waiter();
        let waiter = ScriptWaiter::new();
        self.events.publish(ScriptEvent::WaitRequested {
            actor: self.actor.id,
            waiter: waiter.clone(),
        });
        self.waiter = Some(waiter);
    }

    fn release_waiter(&mut self) {
        if let Some(waiter) = self.waiter.take() {
            waiter.release();
        }
    }

    fn play_idle(&mut self) {
        self.rig.perform_action(self.actor.idle_action());
    }

    fn publish_changes(&self, (position, layer): (Vec3, Layer)) {
        if self.state.layer != layer {
            debug!(actor = %self.actor.id, from = %layer, to = %self.state.layer, "layer changed");
            self.events.publish(MovementEvent::LayerChanged {
                actor: self.actor.id,
                from: layer,
                to: self.state.layer,
            });
        }
        if self.state.position() != position {
            self.events.publish(MovementEvent::PositionChanged {
                actor: self.actor.id,
                position: self.state.position(),
            });
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn actor(&self) -> &ActorProfile {
        &self.actor
    }

    pub fn id(&self) -> ActorId {
        self.actor.id
    }

    pub fn is_movement_in_progress(&self) -> bool {
        !self.path.is_end_of_path()
    }

    pub fn is_planning(&self) -> bool {
        self.pending_plan.is_some()
    }

    pub fn is_on_hold(&self) -> bool {
        self.on_hold
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True while a wait-and-reverse replay is counting down.
    pub fn is_replay_pending(&self) -> bool {
        self.replay.is_some()
    }

    pub fn cancellation_scope(&self) -> &CancellationScope {
        &self.scope
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position()
    }

    pub fn layer(&self) -> Layer {
        self.state.layer
    }

    pub fn tile_position(&self) -> TilePosition {
        self.tilemap
            .tile_position(self.state.position(), self.state.layer)
    }

    pub fn rig(&self) -> &dyn ActorRig {
        self.rig.as_ref()
    }

    pub fn snapshot(&self) -> ActorSnapshot {
        ActorSnapshot {
            actor: self.actor.id,
            position: self.state.position(),
            forward: self.state.transform.forward(),
            layer: self.state.layer,
            tile: self.tile_position(),
            moving: self.is_movement_in_progress() || self.direct_move.is_some(),
            on_hold: self.on_hold,
            planning: self.is_planning(),
            active: self.active,
            remaining_waypoints: self.path.len() - self.path.cursor(),
        }
    }
}
