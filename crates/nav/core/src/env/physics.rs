use glam::Vec3;

/// Identity of an external collider, stable for the collider's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColliderId(pub u64);

/// Solid volume owned by the physics world.
pub trait Collider: Send + Sync {
    fn contains_point(&self, point: Vec3) -> bool;
}

/// Movable surface an actor can ride on.
pub trait StandingPlatform: Collider {
    /// Current world position of the platform object.
    fn position(&self) -> Vec3;

    /// World height of the surface actors stand on.
    fn surface_height(&self) -> f32;
}

/// How the actor's rigid body is simulated, if it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    #[default]
    None,
    Kinematic,
    Dynamic,
}

/// Physical shape of an actor as seen by the movement rules.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyProfile {
    pub kind: BodyKind,
    /// Radius of the capsule collider, when the actor has one.
    pub capsule_radius: Option<f32>,
    /// Height of the actor's visual centre above its feet.
    pub center_height: f32,
}

impl BodyProfile {
    pub const fn dynamic(capsule_radius: f32, center_height: f32) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            capsule_radius: Some(capsule_radius),
            center_height,
        }
    }

    pub const fn kinematic() -> Self {
        Self {
            kind: BodyKind::Kinematic,
            capsule_radius: None,
            center_height: 0.0,
        }
    }

    /// True for a rigid body driven by the physics step.
    pub const fn is_dynamic(&self) -> bool {
        matches!(self.kind, BodyKind::Dynamic)
    }
}
