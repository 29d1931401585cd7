mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::*;
use glam::Vec3;
use nav_core::{
    ActorId, ColliderId, EndOfPathAction, Layer, MovementMode, NavigationError, StandingPlatform,
    TilePosition,
};
use nav_runtime::{
    EventBus, GridLayer, GridTilemap, MovementCommand, MovementEvent, PathOutcome, ScriptEvent,
    Topic,
};

const ACTOR: ActorId = ActorId(1);

/// Five-wide map with the column x = 2 fully blocked.
fn walled_map() -> GridTilemap {
    let layer = (0..5).fold(GridLayer::flat(5, 5, 0.0), |layer, y| {
        layer.with_obstacle(TilePosition::new(2, y))
    });
    GridTilemap::new(vec![layer])
}

fn wait_requested(events: Vec<ScriptEvent>) -> nav_runtime::ScriptWaiter {
    events
        .into_iter()
        .find_map(|event| match event {
            ScriptEvent::WaitRequested { waiter, .. } => Some(waiter),
            ScriptEvent::DeactivateRequested { .. } => None,
        })
        .expect("wait requested")
}

// ============================================================================
// Path following
// ============================================================================

#[test]
fn path_to_walkable_tile_arrives_with_progress_events() {
    let events = EventBus::new();
    let mut movement_rx = events.subscribe(Topic::Movement);
    let (mut controller, rig) = controller(
        GridTilemap::flat(8, 3),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );

    controller
        .handle(MovementCommand::PathTo {
            actor: ACTOR,
            tile: TilePosition::new(5, 0),
            mode: MovementMode::Walk,
        })
        .expect("path-to accepted");
    assert!(controller.is_planning());

    tick_until(&mut controller, 400, |c| {
        !c.is_planning() && !c.is_movement_in_progress()
    });

    assert!(horizontal_distance(controller.position(), tile_center(5, 0)) <= 0.05);
    assert_eq!(controller.tile_position(), TilePosition::new(5, 0));

    let progress = drain_movement(&mut movement_rx);
    assert_eq!(
        progress.first(),
        Some(&MovementEvent::PathStarted {
            actor: ACTOR,
            waypoints: 5,
            ignore_obstacle: true,
        })
    );
    let reached = progress
        .iter()
        .filter(|event| matches!(event, MovementEvent::WaypointReached { .. }))
        .count();
    assert_eq!(reached, 5);
    let finished: Vec<_> = progress
        .iter()
        .filter_map(|event| match event {
            MovementEvent::PathFinished { outcome, .. } => Some(*outcome),
            _ => None,
        })
        .collect();
    assert_eq!(finished, vec![PathOutcome::Completed]);

    assert_eq!(rig.actions().first().map(String::as_str), Some("walk"));
    assert_eq!(rig.last_action().as_deref(), Some("idle"));
}

#[test]
fn walk_to_using_action_plays_the_custom_action() {
    let events = EventBus::new();
    let (mut controller, rig) = controller(
        GridTilemap::flat(6, 1),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );

    controller
        .handle(MovementCommand::WalkToUsingAction {
            actor: ACTOR,
            tile: TilePosition::new(3, 0),
            action: "sneak".to_owned(),
        })
        .expect("walk-to accepted");
    tick_until(&mut controller, 400, |c| {
        !c.is_planning() && !c.is_movement_in_progress()
    });

    assert_eq!(controller.tile_position(), TilePosition::new(3, 0));
    assert_eq!(controller.path().mode(), MovementMode::Walk);
    assert_eq!(rig.actions(), vec!["sneak".to_owned(), "idle".to_owned()]);
}

#[test]
fn wait_and_reverse_replays_the_reversed_path_after_the_delay() {
    let events = EventBus::new();
    let (mut controller, _rig) = controller(
        GridTilemap::flat(8, 8),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );
    let (a, b, c) = (tile_center(0, 0), tile_center(2, 0), tile_center(2, 2));

    controller.set_path(
        vec![a, b, c],
        MovementMode::Walk,
        EndOfPathAction::WaitAndReverse,
        false,
        None,
    );
    tick_until(&mut controller, 200, |c| !c.is_movement_in_progress());
    assert!(controller.is_replay_pending());
    assert!(horizontal_distance(controller.position(), c) <= 0.05);

    let ticks = tick_until(&mut controller, 400, |c| c.is_movement_in_progress());
    let waited = ticks as f32 * DT;

    assert!(
        (3.0 - DT..=8.0 + 2.0 * DT).contains(&waited),
        "replay started after {waited}s"
    );
    assert_eq!(controller.path().waypoints(), &[c, b, a]);
    assert!(controller.path().ignore_obstacle());
    assert_eq!(
        controller.path().end_of_path_action(),
        EndOfPathAction::WaitAndReverse
    );
}

#[test]
fn stopping_during_the_reverse_delay_cancels_the_replay() {
    let events = EventBus::new();
    let (mut controller, _rig) = controller(
        GridTilemap::flat(8, 8),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );
    controller.set_path(
        vec![tile_center(0, 0), tile_center(1, 0)],
        MovementMode::Walk,
        EndOfPathAction::WaitAndReverse,
        false,
        None,
    );
    tick_until(&mut controller, 100, |c| !c.is_movement_in_progress());
    let scope = controller.cancellation_scope().clone();

    controller
        .handle(MovementCommand::StopAndStand { actor: ACTOR })
        .expect("stop accepted");
    for _ in 0..200 {
        controller.tick(DT);
    }

    assert!(scope.is_cancelled());
    assert!(!controller.is_replay_pending());
    assert!(!controller.is_movement_in_progress());
}

#[test]
fn unreachable_path_to_releases_the_waiter_without_moving() {
    let events = EventBus::new();
    let mut script_rx = events.subscribe(Topic::Script);
    let (mut controller, _rig) =
        controller(walled_map(), actor_at(1, TilePosition::new(0, 0)), &events);
    let start = controller.position();

    controller
        .handle(MovementCommand::PathTo {
            actor: ACTOR,
            tile: TilePosition::new(4, 0),
            mode: MovementMode::Walk,
        })
        .expect("path-to accepted");
    let waiter = wait_requested(drain_script(&mut script_rx));
    assert!(!waiter.is_released());

    tick_until(&mut controller, 1000, |c| !c.is_planning());

    assert!(waiter.is_released());
    assert_eq!(controller.position(), start);
    assert!(!controller.is_movement_in_progress());
}

#[test]
fn move_out_of_screen_walks_straight_through_and_requests_deactivation() {
    let events = EventBus::new();
    let mut script_rx = events.subscribe(Topic::Script);
    let (mut controller, _rig) =
        controller(walled_map(), actor_at(1, TilePosition::new(0, 0)), &events);

    controller
        .handle(MovementCommand::MoveOutOfScreen {
            actor: ACTOR,
            tile: TilePosition::new(4, 0),
            mode: MovementMode::Run,
        })
        .expect("move-out accepted");
    tick_until(&mut controller, 1000, |c| {
        !c.is_planning() && !c.is_movement_in_progress()
    });

    assert!(horizontal_distance(controller.position(), tile_center(4, 0)) <= 0.05);
    let script = drain_script(&mut script_rx);
    assert!(script.iter().any(|event| matches!(
        event,
        ScriptEvent::DeactivateRequested { actor } if *actor == ACTOR
    )));
    assert!(wait_requested(script).is_released());
}

#[test]
fn move_backward_steps_back_and_turns_around_at_the_end() {
    let events = EventBus::new();
    let (mut controller, rig) = controller(
        GridTilemap::flat(5, 5),
        actor_at(1, TilePosition::new(2, 2)),
        &events,
    );
    let facing = controller.state().transform.forward();

    controller
        .handle(MovementCommand::MoveBackward {
            actor: ACTOR,
            distance: 1.0,
        })
        .expect("move-backward accepted");
    assert_eq!(rig.last_action().as_deref(), Some("step-back"));
    tick_until(&mut controller, 200, |c| !c.is_movement_in_progress());

    let expected = tile_center(2, 2) - facing;
    assert!(horizontal_distance(controller.position(), expected) <= 0.05);
    assert!(controller.state().transform.forward().dot(facing) > 0.99);
}

// ============================================================================
// Stop, hold and activation
// ============================================================================

#[test]
fn stop_and_stand_halts_and_renews_the_scope() {
    let events = EventBus::new();
    let (mut controller, rig) = controller(
        GridTilemap::flat(8, 1),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );
    controller
        .handle(MovementCommand::MoveTo {
            actor: ACTOR,
            tile: TilePosition::new(6, 0),
            mode: MovementMode::Walk,
        })
        .expect("move-to accepted");
    for _ in 0..4 {
        controller.tick(DT);
    }
    assert!(controller.is_movement_in_progress());
    let previous = controller.cancellation_scope().clone();

    controller
        .handle(MovementCommand::StopAndStand { actor: ACTOR })
        .expect("stop accepted");

    assert!(!controller.is_movement_in_progress());
    assert!(previous.is_cancelled());
    assert!(!controller.cancellation_scope().same_scope(&previous));
    assert_eq!(rig.last_action().as_deref(), Some("idle"));

    let position = controller.position();
    controller.tick(DT);
    assert_eq!(controller.position(), position);
}

#[test]
fn pause_holds_position_and_resume_continues() {
    let events = EventBus::new();
    let (mut controller, rig) = controller(
        GridTilemap::flat(8, 1),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );
    controller
        .handle(MovementCommand::MoveTo {
            actor: ACTOR,
            tile: TilePosition::new(5, 0),
            mode: MovementMode::Run,
        })
        .expect("move-to accepted");
    controller.tick(DT);

    controller.pause_movement();
    assert_eq!(rig.last_action().as_deref(), Some("idle"));
    let held = controller.position();
    for _ in 0..10 {
        controller.tick(DT);
    }
    assert_eq!(controller.position(), held);
    assert!(controller.is_movement_in_progress());

    controller.resume_movement();
    assert_eq!(rig.last_action().as_deref(), Some("run"));
    controller.tick(DT);
    assert!(controller.position().x > held.x);
}

#[test]
fn inactive_actor_ignores_commands_until_reactivated() {
    let events = EventBus::new();
    let (mut controller, _rig) = controller(
        GridTilemap::flat(8, 1),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );
    let move_to = MovementCommand::MoveTo {
        actor: ACTOR,
        tile: TilePosition::new(3, 0),
        mode: MovementMode::Walk,
    };

    controller
        .handle(MovementCommand::Activate {
            actor: ACTOR,
            active: false,
        })
        .expect("deactivate accepted");
    controller.handle(move_to.clone()).expect("ignored quietly");
    assert!(!controller.is_movement_in_progress());

    controller
        .handle(MovementCommand::Activate {
            actor: ACTOR,
            active: true,
        })
        .expect("activate accepted");
    controller.handle(move_to).expect("move-to accepted");
    assert!(controller.is_movement_in_progress());
}

#[test]
fn commands_for_other_actors_are_rejected_without_side_effects() {
    let events = EventBus::new();
    let mut script_rx = events.subscribe(Topic::Script);
    let (mut controller, _rig) = controller(
        GridTilemap::flat(4, 4),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );

    let result = controller.handle(MovementCommand::MoveTo {
        actor: ActorId(99),
        tile: TilePosition::new(3, 3),
        mode: MovementMode::Walk,
    });

    assert_eq!(
        result,
        Err(NavigationError::MisdirectedCommand {
            expected: ACTOR,
            received: ActorId(99),
        })
    );
    assert!(!controller.is_movement_in_progress());
    assert!(drain_script(&mut script_rx).is_empty());
}

// ============================================================================
// Placement and layers
// ============================================================================

#[test]
fn world_position_snaps_to_the_tile_centre() {
    let events = EventBus::new();
    let (mut controller, _rig) = controller(
        GridTilemap::flat(4, 4),
        actor_at(1, TilePosition::new(0, 0)),
        &events,
    );

    controller
        .handle(MovementCommand::SetWorldPosition {
            actor: ACTOR,
            x: 2.7,
            z: 1.2,
        })
        .expect("inside the map");
    assert_eq!(controller.position(), tile_center(2, 1));

    let outside = controller.handle(MovementCommand::SetWorldPosition {
        actor: ACTOR,
        x: 10.0,
        z: 10.0,
    });
    assert_eq!(
        outside,
        Err(NavigationError::TileOutOfBounds {
            tile: TilePosition::new(10, 10),
            layer: Layer::GROUND,
        })
    );
    assert_eq!(controller.position(), tile_center(2, 1));
}

#[test]
fn tile_only_on_the_upper_layer_switches_layer() {
    let events = EventBus::new();
    let mut movement_rx = events.subscribe(Topic::Movement);
    let map = GridTilemap::new(vec![
        GridLayer::flat(2, 2, 0.0),
        GridLayer::flat(6, 6, 1.0),
    ]);
    let (mut controller, _rig) = controller(map, actor_at(1, TilePosition::new(0, 0)), &events);

    controller
        .handle(MovementCommand::SetTilePosition {
            actor: ACTOR,
            tile: TilePosition::new(4, 4),
        })
        .expect("tile on upper layer");

    assert_eq!(controller.layer(), Layer::UPPER);
    assert_eq!(controller.position(), Vec3::new(4.5, 1.0, 4.5));
    assert!(drain_movement(&mut movement_rx).contains(&MovementEvent::LayerChanged {
        actor: ACTOR,
        from: Layer::GROUND,
        to: Layer::UPPER,
    }));
}

#[test]
fn walking_onto_a_nearby_upper_layer_switches_layer() {
    let events = EventBus::new();
    let mut movement_rx = events.subscribe(Topic::Movement);
    let map = GridTilemap::new(vec![
        GridLayer::flat(6, 1, 0.0).with_obstacle(TilePosition::new(2, 0)),
        GridLayer::flat(6, 1, 1.5),
    ]);
    let (mut controller, _rig) = controller(map, actor_at(1, TilePosition::new(0, 0)), &events);

    controller
        .handle(MovementCommand::MoveTo {
            actor: ACTOR,
            tile: TilePosition::new(4, 0),
            mode: MovementMode::Walk,
        })
        .expect("move-to accepted");
    tick_until(&mut controller, 400, |c| !c.is_movement_in_progress());

    assert_eq!(controller.layer(), Layer::UPPER);
    assert_eq!(controller.position().y, 1.5);
    assert!(horizontal_distance(controller.position(), tile_center(4, 0)) <= 0.05);
    assert!(drain_movement(&mut movement_rx).contains(&MovementEvent::LayerChanged {
        actor: ACTOR,
        from: Layer::GROUND,
        to: Layer::UPPER,
    }));
}

#[test]
fn upper_layer_out_of_reach_blocks_the_path() {
    let events = EventBus::new();
    let mut movement_rx = events.subscribe(Topic::Movement);
    let map = GridTilemap::new(vec![
        GridLayer::flat(6, 1, 0.0).with_obstacle(TilePosition::new(2, 0)),
        GridLayer::flat(6, 1, 2.5),
    ]);
    let (mut controller, rig) = controller(map, actor_at(1, TilePosition::new(0, 0)), &events);

    controller
        .handle(MovementCommand::MoveTo {
            actor: ACTOR,
            tile: TilePosition::new(4, 0),
            mode: MovementMode::Walk,
        })
        .expect("move-to accepted");
    tick_until(&mut controller, 400, |c| !c.is_movement_in_progress());

    assert_eq!(controller.layer(), Layer::GROUND);
    assert!(controller.position().x < 2.0);
    assert!(drain_movement(&mut movement_rx).contains(&MovementEvent::PathFinished {
        actor: ACTOR,
        outcome: PathOutcome::Blocked,
    }));
    assert_eq!(rig.last_action().as_deref(), Some("idle"));
}

#[test]
fn portal_requires_a_walkable_tile_unless_on_a_platform() {
    let events = EventBus::new();
    let map = GridTilemap::new(vec![
        GridLayer::flat(6, 6, 0.0),
        GridLayer::flat(6, 6, 3.0).with_obstacle(TilePosition::new(1, 1)),
    ]);
    let (mut controller, _rig) = controller(map, actor_at(1, TilePosition::new(0, 0)), &events);

    assert!(!controller.portal_to_position(tile_center(1, 1), Layer::UPPER, false));
    assert_eq!(controller.layer(), Layer::GROUND);

    assert!(controller.portal_to_position(tile_center(3, 3), Layer::UPPER, false));
    assert_eq!(controller.layer(), Layer::UPPER);
    assert_eq!(controller.position(), Vec3::new(3.5, 3.0, 3.5));

    let on_platform = Vec3::new(1.5, 7.0, 1.5);
    assert!(controller.portal_to_position(on_platform, Layer::GROUND, true));
    assert_eq!(controller.position(), on_platform);
}

// ============================================================================
// Tap and direct moves
// ============================================================================

#[test]
fn tap_point_prefers_a_walkable_point_on_the_current_layer() {
    let events = EventBus::new();
    let map = GridTilemap::new(vec![
        GridLayer::flat(6, 1, 0.0).with_obstacle(TilePosition::new(4, 0)),
        GridLayer::flat(6, 1, 0.0),
    ]);
    let (mut controller, _rig) = controller(map, actor_at(1, TilePosition::new(0, 0)), &events);

    let walkable = BTreeMap::from([
        (Layer::GROUND, tile_center(3, 0)),
        (Layer::UPPER, tile_center(5, 0)),
    ]);
    controller.move_to_tap_point(&walkable, false);
    assert_eq!(controller.path().waypoints(), &[tile_center(3, 0)]);
    assert_eq!(controller.path().mode(), MovementMode::Walk);

    let blocked = BTreeMap::from([
        (Layer::GROUND, tile_center(4, 0)),
        (Layer::UPPER, tile_center(5, 0)),
    ]);
    controller.move_to_tap_point(&blocked, true);
    assert_eq!(controller.path().waypoints(), &[tile_center(5, 0)]);
    assert_eq!(controller.path().mode(), MovementMode::Run);
    assert!(!controller.path().ignore_obstacle());
}

#[test]
fn direct_move_ignores_obstacles_and_idles_on_arrival() {
    let events = EventBus::new();
    let map = GridTilemap::new(vec![
        GridLayer::flat(6, 1, 0.0).with_obstacle(TilePosition::new(2, 0)),
    ]);
    let (mut controller, rig) = controller(map, actor_at(1, TilePosition::new(0, 0)), &events);

    controller.move_directly_to(tile_center(4, 0), MovementMode::Walk);
    assert!(controller.snapshot().moving);
    tick_until(&mut controller, 200, |c| !c.snapshot().moving);

    assert!(horizontal_distance(controller.position(), tile_center(4, 0)) <= 0.05);
    assert_eq!(rig.actions(), vec!["walk".to_owned(), "idle".to_owned()]);
    assert!(controller.path().is_empty());
}

// ============================================================================
// Platforms
// ============================================================================

#[test]
fn actor_rides_a_standing_platform_until_it_leaves_the_trigger() {
    let events = EventBus::new();
    let (mut controller, _rig) = controller(
        GridTilemap::flat(8, 8),
        actor_at(1, TilePosition::new(2, 2)),
        &events,
    );
    let platform = Arc::new(SlidingPlatform::new(tile_center(2, 2), 0.5));
    let shared: Arc<dyn StandingPlatform> = platform.clone();

    controller.on_trigger_enter(ColliderId(5), &shared);
    assert_eq!(controller.position().y, 0.5);

    platform.move_by(Vec3::X);
    controller.tick(DT);
    assert_eq!(controller.position(), Vec3::new(3.5, 0.5, 2.5));

    controller.on_trigger_exit(ColliderId(5));
    platform.move_by(Vec3::X);
    controller.tick(DT);
    assert_eq!(controller.position(), Vec3::new(3.5, 0.5, 2.5));
}
