//! Runtime orchestration for actor movement and navigation.
//!
//! This crate wires the pure movement rules of `nav-core` into per-actor
//! controllers, runs path planning off the simulation task, and exposes the
//! whole thing through a command/event API. Consumers embed
//! [`NavigationRuntime`] to spawn actors and dispatch [`MovementCommand`]s
//! through [`RuntimeHandle`], or drive a [`MovementController`] directly from
//! their own frame loop.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`controller`] holds the per-actor state machine
//! - [`planner`] and [`scheduling`] provide the cooperative background work
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`oracle`] and [`occupancy`] implement the tilemap and obstacle traits
//! - [`workers`] keeps background tasks internal to the crate
pub mod api;
pub mod commands;
pub mod config;
pub mod controller;
pub mod events;
pub mod logging;
pub mod occupancy;
pub mod oracle;
pub mod planner;
pub mod runtime;
pub mod scheduling;

mod workers;

pub use api::{ConfigError, Result, RuntimeError, RuntimeHandle};
pub use commands::MovementCommand;
pub use config::RuntimeConfig;
pub use controller::{ActorSnapshot, ControllerEnv, MovementController};
pub use events::{Event, EventBus, MovementEvent, PathOutcome, ScriptEvent, Topic};
pub use logging::LogConfig;
pub use occupancy::ActorOccupancy;
pub use oracle::{GridLayer, GridTilemap};
pub use planner::{PathPlanner, PendingPlan, PlanPoll, PlanRequest};
pub use runtime::{NavigationRuntime, RuntimeBuilder};
pub use scheduling::{CancellationScope, ReplayPoll, ReverseReplay, ScriptWaiter};
