//! Scripted runtime simulation
//!
//! Spawns the actors of a scenario file, dispatches its timed commands and
//! steps the runtime with a fixed delta, printing the movement timeline.
//!
//! ```ron
//! #![enable(unwrap_newtypes, implicit_some)]
//! (
//!     actors: [
//!         (id: 1, tile: (x: 0, y: 0), main: true),
//!         (id: 2, tile: (x: 4, y: 2), layer: 1, speed: 33.0),
//!     ],
//!     commands: [
//!         (at: 0.0, command: PathTo(actor: 1, tile: (x: 6, y: 4), mode: Run)),
//!         (at: 2.5, command: StopAndStand(actor: 1)),
//!     ],
//! )
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::TryRecvError;

use nav_content::ConfigLoader;
use nav_core::{ActorId, ActorProfile, ActorRig, BodyProfile, Layer, TilePosition, TilemapOracle};
use nav_runtime::{
    ActorSnapshot, Event, MovementCommand, MovementEvent, NavigationRuntime, RuntimeConfig,
};

use crate::utils::load_tilemap;

/// Drive a scenario through the navigation runtime
#[derive(Parser)]
pub struct Simulate {
    /// Tilemap RON file
    #[arg(short, long, value_name = "FILE")]
    map: PathBuf,

    /// Scenario RON file (actors and timed commands)
    #[arg(short, long, value_name = "FILE")]
    scenario: PathBuf,

    /// Movement tuning TOML file (overrides NAV_MOVEMENT_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Number of simulation steps
    #[arg(short, long, default_value = "600")]
    ticks: usize,

    /// Seconds per step
    #[arg(long, default_value = "0.0166667")]
    dt: f32,

    /// Show position updates in the timeline
    #[arg(long)]
    positions: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    actors: Vec<ScenarioActor>,
    #[serde(default)]
    commands: Vec<TimedCommand>,
}

#[derive(Debug, Deserialize)]
struct ScenarioActor {
    id: ActorId,
    tile: TilePosition,
    #[serde(default)]
    layer: Layer,
    #[serde(default)]
    main: bool,
    #[serde(default)]
    speed: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct TimedCommand {
    /// Simulation time in seconds at which the command is dispatched
    #[serde(default)]
    at: f32,
    command: MovementCommand,
}

#[derive(Serialize)]
struct TimedEvent {
    time: f32,
    event: MovementEvent,
}

#[derive(Serialize)]
struct Report {
    elapsed: f32,
    events: Vec<TimedEvent>,
    lagged: u64,
    actors: Vec<ActorSnapshot>,
}

/// Rig without animation: it only remembers the action being played.
#[derive(Default)]
struct HeadlessRig {
    current: Option<String>,
}

impl ActorRig for HeadlessRig {
    fn perform_action(&mut self, action: &str) {
        self.current = Some(action.to_owned());
    }

    fn current_action(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn body(&self) -> BodyProfile {
        BodyProfile::kinematic()
    }
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        // Run async simulation in blocking context
        tokio::runtime::Runtime::new()?.block_on(self.execute_async())
    }

    async fn execute_async(&self) -> Result<()> {
        let tilemap = Arc::new(load_tilemap(&self.map)?);
        let mut scenario = load_scenario(&self.scenario)?;
        scenario
            .commands
            .sort_by(|a, b| a.at.total_cmp(&b.at));

        let mut config = RuntimeConfig::from_env().context("Invalid NAV_* environment")?;
        if let Some(path) = &self.config {
            config.movement = ConfigLoader::load(path)
                .with_context(|| format!("Invalid movement config: {}", path.display()))?;
        }

        let runtime = NavigationRuntime::builder()
            .config(config)
            .tilemap(tilemap.clone())
            .manual_ticks()
            .build()
            .await?;
        let handle = runtime.handle();
        let mut movement_rx = handle.subscribe(nav_runtime::Topic::Movement);

        for actor in &scenario.actors {
            let mut profile = ActorProfile::new(actor.id)
                .spawn_at(tilemap.world_position(actor.tile, actor.layer), actor.layer);
            if actor.main {
                profile = profile.main();
            }
            if let Some(speed) = actor.speed {
                profile = profile.with_speed(speed);
            }
            handle
                .spawn_actor(profile, HeadlessRig::default())
                .await
                .with_context(|| format!("Failed to spawn actor {}", actor.id))?;
        }

        let mut pending = scenario.commands.into_iter().peekable();
        let mut events = Vec::new();
        let mut lagged = 0;
        let mut elapsed = 0.0;

        for _ in 0..self.ticks {
            while let Some(next) = pending.next_if(|timed| timed.at <= elapsed) {
                let actor = next.command.actor();
                if let Err(error) = handle.dispatch(next.command).await {
                    eprintln!(
                        "{} actor {} at {:.2}s: {}",
                        style("✗ Command rejected:").red().bold(),
                        actor,
                        elapsed,
                        error
                    );
                }
            }

            handle.step(self.dt).await?;
            elapsed += self.dt;

            // Give planner threads a chance to finish between steps
            let snapshots = handle.snapshots().await?;
            if snapshots.iter().any(|snapshot| snapshot.planning) {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }

            loop {
                match movement_rx.try_recv() {
                    Ok(Event::Movement(event)) => {
                        if self.positions || !matches!(event, MovementEvent::PositionChanged { .. })
                        {
                            events.push(TimedEvent {
                                time: elapsed,
                                event,
                            });
                        }
                    }
                    Ok(_) => {}
                    Err(TryRecvError::Lagged(skipped)) => lagged += skipped,
                    Err(_) => break,
                }
            }
        }

        let report = Report {
            elapsed,
            events,
            lagged,
            actors: handle.snapshots().await?,
        };

        drop(handle);
        runtime.shutdown().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        Ok(())
    }
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario: {}", path.display()))?;
    ron::from_str(&content).with_context(|| format!("Failed to parse scenario: {}", path.display()))
}

fn print_report(report: &Report) {
    println!("{}", style("=== Timeline ===").bold().green());
    println!();
    for timed in &report.events {
        println!("  {:>7.2}s  {:?}", timed.time, timed.event);
    }
    if report.lagged > 0 {
        println!(
            "  {} {} events dropped",
            style("!").yellow().bold(),
            report.lagged
        );
    }
    println!();

    println!("{}", style("=== Actors ===").bold().green());
    println!();
    for actor in &report.actors {
        println!(
            "  {} {}  tile {} layer {}  ({:.2}, {:.2}, {:.2})",
            style("Actor").bold(),
            actor.actor,
            actor.tile,
            actor.layer,
            actor.position.x,
            actor.position.y,
            actor.position.z
        );
        println!(
            "      moving: {}  planning: {}  on hold: {}  active: {}",
            actor.moving, actor.planning, actor.on_hold, actor.active
        );
    }
    println!();
    println!(
        "{} {:.2}s simulated",
        style("✓ Done:").green().bold(),
        report.elapsed
    );
}
