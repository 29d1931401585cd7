//! Run the planner's grid search outside the runtime
//!
//! Useful for checking why an actor refuses to walk somewhere: the command
//! uses the same A* as the background planner, without other actors.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::collections::HashSet;
use std::path::PathBuf;

use nav_core::{Layer, TilePosition, TilemapOracle};

use crate::utils::{load_tilemap, parse_tile};

/// Search a route between two tiles
#[derive(Parser)]
pub struct FindPath {
    /// Tilemap RON file
    #[arg(short, long, value_name = "FILE")]
    map: PathBuf,

    /// Start tile as `x,y`
    #[arg(long, value_name = "X,Y", value_parser = parse_tile)]
    from: TilePosition,

    /// Goal tile as `x,y`
    #[arg(long, value_name = "X,Y", value_parser = parse_tile)]
    to: TilePosition,

    /// Navigation layer to search on
    #[arg(short, long, default_value = "0")]
    layer: u8,

    /// Extra blocked tiles as `x,y` (repeatable), as if occupied by actors
    #[arg(short, long, value_name = "X,Y", value_parser = parse_tile)]
    blocked: Vec<TilePosition>,

    /// Print the route as JSON
    #[arg(long)]
    json: bool,
}

#[derive(serde::Serialize)]
struct Waypoint {
    tile: TilePosition,
    world: [f32; 3],
}

impl FindPath {
    pub fn execute(self) -> Result<()> {
        let tilemap = load_tilemap(&self.map)?;
        let layer = Layer(self.layer);
        if usize::from(self.layer) >= tilemap.layer_count() {
            anyhow::bail!(
                "layer {} does not exist (map has {} layers)",
                self.layer,
                tilemap.layer_count()
            );
        }

        let obstacles: HashSet<_> = self.blocked.iter().copied().collect();
        let route: Vec<Waypoint> = tilemap
            .find_path(self.from, self.to, layer, &obstacles)
            .into_iter()
            .map(|tile| Waypoint {
                tile,
                world: tilemap.world_position(tile, layer).to_array(),
            })
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&route)?);
            return Ok(());
        }

        println!(
            "{} {} -> {} on layer {}",
            style("Route:").bold().cyan(),
            self.from,
            self.to,
            layer
        );
        if route.is_empty() {
            println!("{}", style("✗ No path found").red().bold());
            return Ok(());
        }

        for (index, waypoint) in route.iter().enumerate() {
            println!(
                "  {:>3}. {}  ({:.2}, {:.2}, {:.2})",
                index + 1,
                waypoint.tile,
                waypoint.world[0],
                waypoint.world[1],
                waypoint.world[2]
            );
        }
        println!();
        println!(
            "{} {} waypoints",
            style("✓ Path found:").green().bold(),
            route.len()
        );
        Ok(())
    }
}
