//! Collision recovery and standing-platform bookkeeping.
//!
//! The physics world pushes a dynamic body around during collisions while its
//! vertical axis stays locked, so the actor can end up inside an obstacle tile
//! or at the wrong height. These helpers pull it back onto valid terrain and
//! carry it along with moving platforms.
use std::sync::{Arc, Weak};

use glam::Vec3;

use crate::config::MovementConfig;
use crate::env::{BodyProfile, Collider, ColliderId, StandingPlatform, TilemapOracle};
use crate::state::NavigationState;

/// Physics-phase correction while a dynamic body is colliding.
///
/// Off-platform, a missing or blocked tile under the actor restores the last
/// valid position; a walkable one re-seats the actor at the tile's height.
/// Returns `true` when the position changed.
pub fn resolve_collision_recovery(
    state: &mut NavigationState,
    tilemap: &dyn TilemapOracle,
    body: BodyProfile,
) -> bool {
    if !state.contacts.is_during_collision()
        || !body.is_dynamic()
        || state.contacts.is_near_platform()
    {
        return false;
    }

    let current = state.position();
    let recovered = match tilemap.tile(current, state.layer) {
        Some(tile) if tile.is_walkable() => Vec3::new(current.x, tile.height, current.z),
        _ => {
            let restored = state.contacts.last_valid_position();
            tracing::warn!(from = ?current, to = ?restored, "restoring last valid position");
            restored
        }
    };

    if recovered == current {
        return false;
    }
    state.transform.position = recovered;
    true
}

/// Tracks a collider the actor started touching and remembers where it can
/// safely return to.
pub fn record_collision_enter(
    state: &mut NavigationState,
    tilemap: &dyn TilemapOracle,
    id: ColliderId,
    collider: Weak<dyn Collider>,
) {
    state.contacts.add_collider(id, collider);

    let current = state.position();
    let on_walkable_tile = tilemap
        .tile(current, state.layer)
        .is_some_and(|tile| tile.is_walkable());

    let valid = if state.contacts.is_near_platform() || on_walkable_tile {
        current
    } else {
        let tile = tilemap.tile_position(current, state.layer);
        tilemap
            .adjacent_walkable_tile(tile, state.layer)
            .map_or(current, |nearest| tilemap.world_position(nearest, state.layer))
    };
    state.contacts.set_last_valid_position(valid);
}

/// Stops tracking a collider. The caller is expected to zero the body's
/// velocity afterwards.
pub fn record_collision_exit(state: &mut NavigationState, id: ColliderId) -> bool {
    state.contacts.remove_collider(id)
}

/// Latches onto a standing platform and lifts the actor onto its surface when
/// the gap is small enough.
pub fn enter_platform(
    state: &mut NavigationState,
    config: &MovementConfig,
    id: ColliderId,
    platform: &Arc<dyn StandingPlatform>,
) {
    state
        .contacts
        .latch_platform(id, Arc::downgrade(platform), platform.position());

    let surface = platform.surface_height();
    let position = state.position();
    if (position.y - surface).abs() <= config.max_height_step_cross_platform {
        state.transform.position = Vec3::new(position.x, surface, position.z);
    }
}

pub fn exit_platform(state: &mut NavigationState, id: ColliderId) -> bool {
    state.contacts.release_platform(id)
}

/// Late-phase co-movement: translates the actor by however far the active
/// platform moved since the last tick. Returns the applied offset.
pub fn sync_platform_co_movement(state: &mut NavigationState) -> Option<Vec3> {
    let platform = state.contacts.active_platform()?;
    let last = state.contacts.platform_last_position()?;
    let now = platform.position();
    if now == last {
        return None;
    }

    let delta = now - last;
    state.transform.position += delta;
    state.contacts.set_platform_last_position(now);
    Some(delta)
}
