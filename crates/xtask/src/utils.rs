//! Utility functions for xtask commands

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use nav_content::TilemapLoader;
use nav_core::TilePosition;
use nav_runtime::GridTilemap;

/// Load a RON tilemap into a searchable grid
pub fn load_tilemap(path: &Path) -> Result<GridTilemap> {
    let spec = TilemapLoader::load(path)
        .with_context(|| format!("Failed to load tilemap: {}", path.display()))?;
    Ok(GridTilemap::from_spec(&spec))
}

/// Parse a tile written as `x,y`
pub fn parse_tile(value: &str) -> Result<TilePosition> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("expected a tile as `x,y`, got `{}`", value))?;
    let x = x
        .trim()
        .parse()
        .with_context(|| format!("invalid tile x in `{}`", value))?;
    let y = y
        .trim()
        .parse()
        .with_context(|| format!("invalid tile y in `{}`", value))?;
    Ok(TilePosition::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_parse_with_optional_spaces() {
        assert_eq!(parse_tile("3,4").expect("tile"), TilePosition::new(3, 4));
        assert_eq!(parse_tile(" -1 , 2").expect("tile"), TilePosition::new(-1, 2));
        assert!(parse_tile("3").is_err());
        assert!(parse_tile("a,b").is_err());
    }
}
