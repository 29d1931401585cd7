//! Common error infrastructure for nav-core.
//!
//! Most movement failures are not errors at all: a rejected step is a
//! [`MovementResult::Blocked`](crate::MovementResult::Blocked) outcome, stale
//! collider references are pruned lazily, and unresolvable platform geometry
//! falls through to terrain checks. What remains is expressed as
//! [`NavigationError`] and classified with [`ErrorSeverity`] so the runtime can
//! decide between logging and surfacing.

use crate::state::{ActorId, Layer, TilePosition};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - play continues without the requested movement.
    ///
    /// Examples: no path to the destination
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: tile outside every layer, command addressed to another actor
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - navigation state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all navigation errors.
pub trait NavError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Failures raised while resolving movement requests.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationError {
    /// Pathfinding returned an empty route.
    #[error("no path from tile {from:?} to tile {to:?} on layer {layer}")]
    NoPathFound {
        from: TilePosition,
        to: TilePosition,
        layer: Layer,
    },

    /// Tile lies outside the requested layer (and its adjacent layer).
    #[error("tile {tile:?} is outside layer {layer}")]
    TileOutOfBounds { tile: TilePosition, layer: Layer },

    /// Command addressed to a different actor.
    #[error("command for actor {received} delivered to actor {expected}")]
    MisdirectedCommand { expected: ActorId, received: ActorId },
}

impl NavError for NavigationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoPathFound { .. } => ErrorSeverity::Recoverable,
            Self::TileOutOfBounds { .. } | Self::MisdirectedCommand { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoPathFound { .. } => "NO_PATH_FOUND",
            Self::TileOutOfBounds { .. } => "TILE_OUT_OF_BOUNDS",
            Self::MisdirectedCommand { .. } => "MISDIRECTED_COMMAND",
        }
    }
}
