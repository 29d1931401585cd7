use glam::Vec3;

/// World-space position and facing of an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    forward: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, forward: Vec3) -> Self {
        let mut transform = Self {
            position,
            forward: Vec3::Z,
        };
        transform.set_forward(forward);
        transform
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::Z)
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Points the actor along `direction`. Zero-length directions are ignored.
    pub fn set_forward(&mut self, direction: Vec3) {
        if let Some(forward) = direction.try_normalize() {
            self.forward = forward;
        }
    }

    /// Turns the actor around.
    pub fn flip(&mut self) {
        self.forward = -self.forward;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}
