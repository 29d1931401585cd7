//! Navigation worker that owns every actor's [`MovementController`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), ticks all
//! controllers on a fixed interval (or on demand), and feeds deactivation
//! requests raised by dispose-self paths back into the owning controller.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use nav_core::{ActorId, ActorProfile, ActorRig};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::api::{Result, RuntimeError};
use crate::commands::MovementCommand;
use crate::controller::{ActorSnapshot, ControllerEnv, MovementController};
use crate::events::{Event, ScriptEvent, Topic};
use crate::occupancy::ActorOccupancy;

/// Commands that can be sent to the navigation worker
pub enum Command {
    /// Route a movement command to the actor it addresses.
    Dispatch {
        command: MovementCommand,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Register a new actor and place it at its spawn point.
    SpawnActor {
        actor: ActorProfile,
        rig: Box<dyn ActorRig>,
        reply: oneshot::Sender<Result<ActorSnapshot>>,
    },
    Snapshot {
        actor: ActorId,
        reply: oneshot::Sender<Result<ActorSnapshot>>,
    },
    SnapshotAll {
        reply: oneshot::Sender<Vec<ActorSnapshot>>,
    },
    /// Freeze path progression without dropping the path.
    Pause {
        actor: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    Resume {
        actor: ActorId,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Advance every controller by `delta_time` seconds.
    Step {
        delta_time: f32,
        reply: oneshot::Sender<()>,
    },
}

/// Background task that drives the movement controllers.
pub struct NavigationWorker {
    controllers: BTreeMap<ActorId, MovementController>,
    env: ControllerEnv,
    occupancy: Arc<ActorOccupancy>,
    command_rx: mpsc::Receiver<Command>,
    script_rx: broadcast::Receiver<Event>,
    tick_interval: Option<Duration>,
}

impl NavigationWorker {
    pub fn new(
        env: ControllerEnv,
        occupancy: Arc<ActorOccupancy>,
        command_rx: mpsc::Receiver<Command>,
        tick_interval: Option<Duration>,
    ) -> Self {
        let script_rx = env.events.subscribe(Topic::Script);
        info!(?tick_interval, "NavigationWorker initialized");

        Self {
            controllers: BTreeMap::new(),
            env,
            occupancy,
            command_rx,
            script_rx,
            tick_interval,
        }
    }

    /// Main worker loop. Returns once every command sender is dropped.
    pub async fn run(mut self) {
        let auto_tick = self.tick_interval.is_some();
        let period = self.tick_interval.unwrap_or(Duration::from_secs(1));
        let delta_time = period.as_secs_f32();
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                event = self.script_rx.recv() => match event {
                    Ok(Event::Script(ScriptEvent::DeactivateRequested { actor })) => {
                        self.deactivate(actor);
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "script event receiver lagged");
                    }
                    Err(RecvError::Closed) => {}
                },
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = ticker.tick(), if auto_tick => self.tick_all(delta_time),
            }
        }

        debug!("NavigationWorker stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Dispatch { command, reply } => {
                let result = self.dispatch(command);
                if reply.send(result).is_err() {
                    debug!("Dispatch reply channel closed (caller dropped)");
                }
            }
            Command::SpawnActor { actor, rig, reply } => {
                let result = self.spawn_actor(actor, rig);
                if reply.send(result).is_err() {
                    debug!("SpawnActor reply channel closed (caller dropped)");
                }
            }
            Command::Snapshot { actor, reply } => {
                let result = self
                    .controllers
                    .get(&actor)
                    .map(MovementController::snapshot)
                    .ok_or(RuntimeError::ActorNotFound(actor));
                if reply.send(result).is_err() {
                    debug!("Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::SnapshotAll { reply } => {
                let snapshots = self
                    .controllers
                    .values()
                    .map(MovementController::snapshot)
                    .collect();
                if reply.send(snapshots).is_err() {
                    debug!("SnapshotAll reply channel closed (caller dropped)");
                }
            }
            Command::Pause { actor, reply } => {
                let result = self
                    .controller_mut(actor)
                    .map(MovementController::pause_movement);
                if reply.send(result).is_err() {
                    debug!("Pause reply channel closed (caller dropped)");
                }
            }
            Command::Resume { actor, reply } => {
                let result = self
                    .controller_mut(actor)
                    .map(MovementController::resume_movement);
                if reply.send(result).is_err() {
                    debug!("Resume reply channel closed (caller dropped)");
                }
            }
            Command::Step { delta_time, reply } => {
                self.tick_all(delta_time);
                if reply.send(()).is_err() {
                    debug!("Step reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn dispatch(&mut self, command: MovementCommand) -> Result<()> {
        let actor = command.actor();
        self.controller_mut(actor)?.handle(command)?;
        self.refresh_occupancy(actor);
        Ok(())
    }

    fn spawn_actor(&mut self, actor: ActorProfile, rig: Box<dyn ActorRig>) -> Result<ActorSnapshot> {
        let id = actor.id;
        if self.controllers.contains_key(&id) {
            return Err(RuntimeError::ActorAlreadySpawned(id));
        }

        let controller = MovementController::new(actor, rig, self.env.clone());
        let snapshot = controller.snapshot();
        self.controllers.insert(id, controller);
        self.refresh_occupancy(id);

        debug!(actor = %id, position = ?snapshot.position, "actor spawned");
        Ok(snapshot)
    }

    fn deactivate(&mut self, actor: ActorId) {
        let Some(controller) = self.controllers.get_mut(&actor) else {
            warn!(%actor, "deactivation requested for unknown actor");
            return;
        };
        if let Err(error) = controller.handle(MovementCommand::Activate {
            actor,
            active: false,
        }) {
            warn!(%actor, %error, "deactivation rejected");
        }
        self.refresh_occupancy(actor);
    }

    fn tick_all(&mut self, delta_time: f32) {
        for controller in self.controllers.values_mut() {
            controller.tick(delta_time);
        }
        let ids: Vec<ActorId> = self.controllers.keys().copied().collect();
        for id in ids {
            self.refresh_occupancy(id);
        }
    }

    fn controller_mut(&mut self, actor: ActorId) -> Result<&mut MovementController> {
        self.controllers
            .get_mut(&actor)
            .ok_or(RuntimeError::ActorNotFound(actor))
    }

    /// Active actors block the tile they stand on; inactive ones block nothing.
    fn refresh_occupancy(&self, actor: ActorId) {
        match self.controllers.get(&actor) {
            Some(controller) if controller.is_active() => {
                self.occupancy
                    .update(actor, controller.layer(), controller.tile_position());
            }
            _ => self.occupancy.remove(actor),
        }
    }
}
