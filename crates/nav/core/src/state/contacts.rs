//! Colliders and standing platforms currently touching an actor.
//!
//! The physics world owns these objects and may destroy them at any time, so
//! the tracker only holds weak references and prunes dead ones whenever it
//! walks the set.
use std::collections::HashMap;
use std::sync::{Arc, Weak};

use glam::Vec3;

use crate::env::{Collider, ColliderId, StandingPlatform};

#[derive(Clone)]
struct PlatformContact {
    id: ColliderId,
    platform: Weak<dyn StandingPlatform>,
    near: bool,
    last_position: Vec3,
}

/// Collision and platform bookkeeping for one actor.
#[derive(Clone, Default)]
pub struct ContactTracker {
    colliders: HashMap<ColliderId, Weak<dyn Collider>>,
    last_valid_position: Vec3,
    platform: Option<PlatformContact>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while any collider (live or not yet pruned) overlaps the actor.
    pub fn is_during_collision(&self) -> bool {
        !self.colliders.is_empty()
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn add_collider(&mut self, id: ColliderId, collider: Weak<dyn Collider>) {
        self.colliders.insert(id, collider);
    }

    pub fn remove_collider(&mut self, id: ColliderId) -> bool {
        self.colliders.remove(&id).is_some()
    }

    /// Upgrades every tracked collider, dropping the ones that no longer exist.
    pub fn live_colliders(&mut self) -> Vec<Arc<dyn Collider>> {
        let mut live = Vec::with_capacity(self.colliders.len());
        self.colliders.retain(|id, collider| match collider.upgrade() {
            Some(collider) => {
                live.push(collider);
                true
            }
            None => {
                tracing::trace!("pruning destroyed collider {:?}", id);
                false
            }
        });
        live
    }

    pub fn last_valid_position(&self) -> Vec3 {
        self.last_valid_position
    }

    pub fn set_last_valid_position(&mut self, position: Vec3) {
        self.last_valid_position = position;
    }

    /// Makes `platform` the active standing platform and marks the actor near it.
    pub fn latch_platform(
        &mut self,
        id: ColliderId,
        platform: Weak<dyn StandingPlatform>,
        position: Vec3,
    ) {
        self.platform = Some(PlatformContact {
            id,
            platform,
            near: true,
            last_position: position,
        });
    }

    /// Leaves the platform if `id` is the active one. The reference itself is
    /// kept until another platform is latched.
    pub fn release_platform(&mut self, id: ColliderId) -> bool {
        match self.platform.as_mut() {
            Some(contact) if contact.id == id => {
                contact.near = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_near_platform(&self) -> bool {
        self.platform.as_ref().is_some_and(|contact| contact.near)
    }

    /// The platform the actor stands on or next to, if it still exists.
    pub fn active_platform(&self) -> Option<Arc<dyn StandingPlatform>> {
        self.platform
            .as_ref()
            .filter(|contact| contact.near)
            .and_then(|contact| contact.platform.upgrade())
    }

    pub fn platform_last_position(&self) -> Option<Vec3> {
        self.platform.as_ref().map(|contact| contact.last_position)
    }

    pub fn set_platform_last_position(&mut self, position: Vec3) {
        if let Some(contact) = self.platform.as_mut() {
            contact.last_position = position;
        }
    }

    /// Forgets every collider and platform.
    pub fn clear(&mut self) {
        self.colliders.clear();
        self.platform = None;
    }
}

impl std::fmt::Debug for ContactTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactTracker")
            .field("colliders", &self.colliders.keys().collect::<Vec<_>>())
            .field("last_valid_position", &self.last_valid_position)
            .field("near_platform", &self.is_near_platform())
            .finish()
    }
}
