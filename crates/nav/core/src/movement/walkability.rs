//! Walkability and layer-transition policy.
use glam::Vec3;
use strum::IntoEnumIterator;

use super::MovementContext;
use crate::env::{Direction, TilemapOracle};
use crate::state::{Layer, NavigationState};

/// Decides whether the actor may step from `current` to `candidate` and, if so,
/// at which height it ends up.
///
/// Checks run in priority order and the first match wins:
///
/// 1. the active standing platform, when the candidate lies on its surface and
///    the actor is close enough vertically;
/// 2. a walkable tile on the current layer;
/// 3. a walkable tile on the adjacent layer within the cross-layer tolerance,
///    which also switches `state.layer`;
/// 4. a portal area (or one of its eight neighbours) on either layer, keeping
///    the current height.
///
/// Single-layer maps stop after step 2. A walkable adjacent-layer tile whose
/// height gap is too large blocks the step outright, portal or not.
pub fn can_goto_position(
    state: &mut NavigationState,
    ctx: &MovementContext<'_>,
    current: Vec3,
    candidate: Vec3,
) -> Option<f32> {
    if let Some(platform) = state.contacts.active_platform() {
        let surface = platform.surface_height();
        let on_surface = Vec3::new(candidate.x, surface, candidate.z);
        if platform.contains_point(on_surface)
            && (current.y - surface).abs() <= ctx.config.max_height_step_cross_platform
        {
            return Some(surface);
        }
    }

    if let Some(tile) = ctx.tilemap.tile(candidate, state.layer)
        && tile.is_walkable()
    {
        return Some(tile.height);
    }

    if ctx.tilemap.layer_count() <= 1 {
        return None;
    }

    let next_layer = state.layer.adjacent();
    if let Some(tile) = ctx.tilemap.tile(candidate, next_layer)
        && tile.is_walkable()
    {
        if (current.y - tile.height).abs() > ctx.config.max_height_step_cross_layer {
            return None;
        }
        tracing::debug!(from = %state.layer, to = %next_layer, "switching navigation layer");
        state.layer = next_layer;
        return Some(tile.height);
    }

    if is_near_portal_area(ctx.tilemap, candidate, state.layer)
        || is_near_portal_area(ctx.tilemap, candidate, next_layer)
    {
        return Some(current.y);
    }

    None
}

/// True when the tile under `position`, or any of its eight neighbours, is a
/// portal area on `layer`.
pub fn is_near_portal_area(tilemap: &dyn TilemapOracle, position: Vec3, layer: Layer) -> bool {
    let tile = tilemap.tile_position(position, layer);
    tilemap.is_inside_portal_area(tile, layer)
        || Direction::iter()
            .any(|direction| tilemap.is_inside_portal_area(direction.neighbour_of(tile), layer))
}
