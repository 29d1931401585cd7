//! Data-driven navigation content.
//!
//! Scenes ship their walkability grids as RON files and their movement tuning
//! as TOML files. The loaders here turn those files into plain data that the
//! runtime wraps in its tilemap oracle; nothing in this crate holds per-actor
//! state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LayerSpec, TilemapLoader, TilemapSpec};
