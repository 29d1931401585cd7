//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, actor lookup and planner threads
//! so clients can bubble them up with consistent context.
use nav_core::{ActorId, ErrorSeverity, NavError, NavigationError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("navigation worker command channel closed")]
    CommandChannelClosed,

    #[error("navigation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("navigation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("actor {0} is not registered with the runtime")]
    ActorNotFound(ActorId),

    #[error("actor {0} is already registered with the runtime")]
    ActorAlreadySpawned(ActorId),

    #[error("failed to spawn path planner thread")]
    PlannerSpawn(#[source] std::io::Error),

    #[error("runtime requires a tilemap to be configured before building")]
    MissingTilemap,

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl NavError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Navigation(error) => error.severity(),
            Self::ActorNotFound(_) | Self::ActorAlreadySpawned(_) | Self::Config(_) => {
                ErrorSeverity::Validation
            }
            Self::MissingTilemap | Self::PlannerSpawn(_) => ErrorSeverity::Internal,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "WORKER_JOIN",
            Self::ActorNotFound(_) => "ACTOR_NOT_FOUND",
            Self::ActorAlreadySpawned(_) => "ACTOR_ALREADY_SPAWNED",
            Self::PlannerSpawn(_) => "PLANNER_SPAWN",
            Self::MissingTilemap => "MISSING_TILEMAP",
            Self::Navigation(error) => error.error_code(),
            Self::Config(_) => "CONFIG",
        }
    }
}

/// Invalid runtime configuration read from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid value")]
    InvalidValue { key: &'static str, value: String },

    #[error("failed to load movement config from {path}: {message}")]
    MovementFile { path: String, message: String },
}
