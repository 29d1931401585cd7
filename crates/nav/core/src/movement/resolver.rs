use glam::Vec3;

use super::walkability::can_goto_position;
use super::{MovementContext, MovementResult};
use crate::geometry;
use crate::state::{MovementMode, NavigationState};

/// Advances the actor one tick towards `target`.
///
/// The step length is the configured speed times `delta_time` and never
/// overshoots. While a dynamic body overlaps a collider and the step would
/// still end inside it, the actor only turns. Otherwise the step is checked
/// with [`can_goto_position`] and the vertical tolerance; with
/// `ignore_obstacle` both rejections are waived and the height falls back to
/// the current one. A waived step never drops the actor to height zero.
pub fn move_towards(
    state: &mut NavigationState,
    ctx: &MovementContext<'_>,
    target: Vec3,
    mode: MovementMode,
    ignore_obstacle: bool,
    delta_time: f32,
) -> MovementResult {
    let current = state.position();
    let speed = ctx
        .config
        .step_speed(ctx.actor.speed, ctx.actor.is_main, mode);
    let tentative = geometry::move_towards(current, target, speed * delta_time);

    if state.contacts.is_during_collision()
        && ctx.body.is_dynamic()
        && is_step_inside_collider(state, ctx, current, tentative)
    {
        rotate_towards(state, ctx, current, tentative, mode, delta_time);
        return MovementResult::InProgress;
    }

    let resolved = can_goto_position(state, ctx, current, tentative);
    if resolved.is_none() && !ignore_obstacle {
        return MovementResult::Blocked;
    }
    let mut height = resolved.unwrap_or(current.y);

    if (height - tentative.y).abs() > ctx.config.max_height_step {
        if !ignore_obstacle {
            return MovementResult::Blocked;
        }
        height = current.y;
    }

    rotate_towards(state, ctx, current, tentative, mode, delta_time);
    state.transform.position = Vec3::new(tentative.x, height, tentative.z);

    if geometry::within_horizontal_radius(state.position(), target, ctx.config.arrival_radius) {
        MovementResult::Completed
    } else {
        MovementResult::InProgress
    }
}

fn rotate_towards(
    state: &mut NavigationState,
    ctx: &MovementContext<'_>,
    current: Vec3,
    next: Vec3,
    mode: MovementMode,
    delta_time: f32,
) {
    let direction = geometry::horizontal_direction(current, next);
    if direction == Vec3::ZERO {
        return;
    }

    let forward = match mode {
        MovementMode::Backward => direction,
        MovementMode::Walk | MovementMode::Run => geometry::rotate_towards(
            state.transform.forward(),
            direction,
            ctx.config.max_rotation_step(delta_time),
        ),
    };
    state.transform.set_forward(forward);
}

/// Probes one capsule radius ahead of the tentative position, at the actor's
/// centre height, against every live collider the actor is touching.
fn is_step_inside_collider(
    state: &mut NavigationState,
    ctx: &MovementContext<'_>,
    current: Vec3,
    tentative: Vec3,
) -> bool {
    let Some(radius) = ctx.body.capsule_radius else {
        return false;
    };

    let center_y = current.y + ctx.body.center_height;
    let from = Vec3::new(current.x, center_y, current.z);
    let to = Vec3::new(tentative.x, center_y, tentative.z);
    let probe = to + (to - from).normalize_or_zero() * radius;

    state
        .contacts
        .live_colliders()
        .iter()
        .any(|collider| collider.contains_point(probe))
}
