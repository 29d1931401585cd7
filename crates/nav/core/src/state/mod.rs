//! Navigation state owned by a single actor's movement controller.
mod common;
mod contacts;
mod path;
mod transform;

pub use common::{ActorId, Layer, TilePosition};
pub use contacts::ContactTracker;
pub use path::{EndOfPathAction, MovementMode, Path, UnknownMovementMode};
pub use transform::Transform;

/// Physical navigation state of one actor: where it is, which layer it walks
/// on, and what it is touching.
#[derive(Clone, Debug, Default)]
pub struct NavigationState {
    pub transform: Transform,
    pub layer: Layer,
    pub contacts: ContactTracker,
}

impl NavigationState {
    pub fn new(transform: Transform, layer: Layer) -> Self {
        Self {
            transform,
            layer,
            contacts: ContactTracker::new(),
        }
    }

    pub fn position(&self) -> glam::Vec3 {
        self.transform.position
    }
}
