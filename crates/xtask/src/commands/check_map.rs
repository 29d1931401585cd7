//! Validate navigation content files
//!
//! Loads a tilemap (and optionally a movement config) the same way the
//! runtime does and prints what it found.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use nav_content::{ConfigLoader, TilemapLoader};

/// Validate a tilemap and print a per-layer summary
#[derive(Parser)]
pub struct CheckMap {
    /// Tilemap RON file
    #[arg(short, long, value_name = "FILE")]
    map: PathBuf,

    /// Movement tuning TOML file to validate alongside the map
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

impl CheckMap {
    pub fn execute(self) -> Result<()> {
        let spec = TilemapLoader::load(&self.map)
            .with_context(|| format!("Invalid tilemap: {}", self.map.display()))?;

        println!("{} {}", style("Tilemap:").bold().cyan(), self.map.display());
        println!("{} {}", style("Layers:").bold().cyan(), spec.layers.len());
        println!();

        for (index, layer) in spec.layers.iter().enumerate() {
            let tiles = layer.dense_tiles();
            let blocked = tiles.iter().filter(|tile| !tile.is_walkable()).count();

            println!("{}", style(format!("=== Layer {} ===", index)).bold().green());
            println!("  Size:      {}x{}", layer.width(), layer.height_in_tiles());
            println!("  Origin:    ({}, {})", layer.origin.0, layer.origin.1);
            println!("  Tile size: {}", layer.tile_size);
            println!("  Walkable:  {}/{}", tiles.len() - blocked, tiles.len());
            println!("  Portals:   {}", layer.portal_tiles().len());
            println!();
        }

        if let Some(path) = &self.config {
            let config = ConfigLoader::load(path)
                .with_context(|| format!("Invalid movement config: {}", path.display()))?;
            println!("{} {}", style("Movement config:").bold().cyan(), path.display());
            println!("{:#?}", config);
        }

        println!("{}", style("✓ Content is valid").green().bold());
        Ok(())
    }
}
