//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! dispatching movement commands, stepping the simulation or streaming events
//! from specific topics.
use std::collections::HashMap;

use nav_core::{ActorId, ActorProfile, ActorRig};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::commands::MovementCommand;
use crate::controller::ActorSnapshot;
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Deliver a movement command to the actor it addresses.
    ///
    /// Commands are applied in the order they are dispatched.
    pub async fn dispatch(&self, command: MovementCommand) -> Result<()> {
        self.request(|reply| Command::Dispatch { command, reply })
            .await?
    }

    /// Register an actor; returns where it was placed.
    pub async fn spawn_actor(
        &self,
        actor: ActorProfile,
        rig: impl ActorRig + 'static,
    ) -> Result<ActorSnapshot> {
        let rig: Box<dyn ActorRig> = Box::new(rig);
        self.request(|reply| Command::SpawnActor { actor, rig, reply })
            .await?
    }

    pub async fn snapshot(&self, actor: ActorId) -> Result<ActorSnapshot> {
        self.request(|reply| Command::Snapshot { actor, reply })
            .await?
    }

    /// Snapshots of every registered actor, ordered by id.
    pub async fn snapshots(&self) -> Result<Vec<ActorSnapshot>> {
        self.request(|reply| Command::SnapshotAll { reply }).await
    }

    /// Put an actor's movement on hold (e.g. during a dialogue).
    pub async fn pause(&self, actor: ActorId) -> Result<()> {
        self.request(|reply| Command::Pause { actor, reply })
            .await?
    }

    pub async fn resume(&self, actor: ActorId) -> Result<()> {
        self.request(|reply| Command::Resume { actor, reply })
            .await?
    }

    /// Advance every controller by `delta_time` seconds.
    ///
    /// This is the only way time passes when automatic ticking is disabled.
    pub async fn step(&self, delta_time: f32) -> Result<()> {
        self.request(|reply| Command::Step { delta_time, reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Movement` - Path progress, layer and position changes
    /// - `Topic::Script` - Wait requests and deactivation requests
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use nav_runtime::Topic;
    ///
    /// let mut movement_rx = handle.subscribe(Topic::Movement);
    /// while let Ok(event) = movement_rx.recv().await {
    ///     // Handle movement events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
