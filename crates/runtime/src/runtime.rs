//! High-level runtime orchestrator.
//!
//! The runtime owns the navigation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive actors.

use std::sync::Arc;

use nav_core::TilemapOracle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::config::RuntimeConfig;
use crate::controller::ControllerEnv;
use crate::events::EventBus;
use crate::occupancy::ActorOccupancy;
use crate::workers::NavigationWorker;

/// Main runtime that hosts every actor's movement controller.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct NavigationRuntime {
    handle: RuntimeHandle,
    occupancy: Arc<ActorOccupancy>,
    worker_handle: JoinHandle<()>,
}

impl NavigationRuntime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    ///
    /// The handle can be shared across clients and async tasks.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Tiles currently held by active actors.
    pub fn occupancy(&self) -> Arc<ActorOccupancy> {
        Arc::clone(&self.occupancy)
    }

    /// Shutdown the runtime gracefully
    ///
    /// The worker exits once this and every cloned handle are dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`NavigationRuntime`].
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    tilemap: Option<Arc<dyn TilemapOracle>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            tilemap: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the required scene tilemap
    pub fn tilemap(mut self, tilemap: Arc<dyn TilemapOracle>) -> Self {
        self.tilemap = Some(tilemap);
        self
    }

    /// Disable automatic ticking; time only advances through
    /// [`RuntimeHandle::step`].
    pub fn manual_ticks(mut self) -> Self {
        self.config.tick_hz = 0;
        self
    }

    /// Build the runtime and spawn its worker on the current tokio runtime.
    pub async fn build(self) -> Result<NavigationRuntime> {
        let tilemap = self.tilemap.ok_or(RuntimeError::MissingTilemap)?;
        let config = self.config;

        let event_bus = EventBus::with_capacity(config.event_buffer_size);
        let occupancy = Arc::new(ActorOccupancy::new());

        let mut env = ControllerEnv::new(tilemap, event_bus.clone())
            .with_obstacles(occupancy.clone())
            .with_config(Arc::new(config.movement.clone()));
        if let Some(seed) = config.rng_seed {
            env = env.with_seed(seed);
        }

        let (command_tx, command_rx) = mpsc::channel(config.command_buffer_size);
        let worker = NavigationWorker::new(
            env,
            Arc::clone(&occupancy),
            command_rx,
            config.tick_interval(),
        );
        let worker_handle = tokio::spawn(worker.run());

        tracing::info!(
            tick_hz = config.tick_hz,
            command_buffer = config.command_buffer_size,
            "navigation runtime started"
        );

        Ok(NavigationRuntime {
            handle: RuntimeHandle::new(command_tx, event_bus),
            occupancy,
            worker_handle,
        })
    }
}
